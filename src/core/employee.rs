//! Employee business logic - registration, lookup and bootstrap.
//!
//! Login is handled elsewhere; this module only turns a verified token subject into
//! an [`Actor`] and keeps the configured administrators present.

use crate::{
    config::BootstrapAdmin,
    core::permission::{Actor, Capability},
    entities::{Employee, Role, employee},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument};

/// Fields needed to register an employee
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Display name
    pub name: String,
    /// Login e-mail
    pub email: String,
    /// Role
    pub role: Role,
    /// Capabilities to grant; every other flag starts false
    pub capabilities: Vec<Capability>,
}

/// Registers an active employee.
///
/// Fails with `Conflict` if the e-mail is already taken.
#[instrument(skip(db, new), fields(email = %new.email))]
pub async fn create_employee<C>(db: &C, new: NewEmployee) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let email = new.email.trim().to_lowercase();
    if new.name.trim().is_empty() || email.is_empty() {
        return Err(Error::bad_request("employee name and email are required"));
    }
    if get_employee_by_email(db, &email).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("an employee with email {email} already exists"),
        });
    }

    let has = |capability| new.capabilities.contains(&capability);
    let model = employee::ActiveModel {
        name: Set(new.name.trim().to_string()),
        email: Set(email),
        role: Set(new.role),
        is_active: Set(true),
        can_create_greater: Set(has(Capability::CreateGreater)),
        can_create_less: Set(has(Capability::CreateLess)),
        can_access_greater: Set(has(Capability::AccessGreater)),
        can_access_less: Set(has(Capability::AccessLess)),
        can_edit_greater: Set(has(Capability::EditGreater)),
        can_edit_less: Set(has(Capability::EditLess)),
        can_delete_greater: Set(has(Capability::DeleteGreater)),
        can_delete_less: Set(has(Capability::DeleteLess)),
        can_edit_process: Set(has(Capability::EditProcess)),
        can_access_processes: Set(has(Capability::AccessProcesses)),
        can_delete_client: Set(has(Capability::DeleteClient)),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(employee_id = created.id, "Employee created");
    Ok(created)
}

/// Finds an employee by e-mail (case-insensitive).
pub async fn get_employee_by_email<C>(db: &C, email: &str) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find()
        .filter(employee::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the active employee behind a verified token subject.
///
/// Unknown or deactivated employees are `Unauthorized`, the same as a bad token.
pub async fn resolve_actor<C>(db: &C, employee_id: i64) -> Result<Actor>
where
    C: ConnectionTrait,
{
    match Employee::find_by_id(employee_id).one(db).await? {
        Some(employee) if employee.is_active => Ok(Actor::new(employee)),
        _ => Err(Error::Unauthorized),
    }
}

/// Activates or deactivates an employee.
#[cfg(test)]
pub(crate) async fn set_employee_active<C>(db: &C, employee_id: i64, active: bool) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    let employee = Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("employee", employee_id))?;
    let mut model: employee::ActiveModel = employee.into();
    model.is_active = Set(active);
    model.update(db).await.map_err(Into::into)
}

/// Creates each configured administrator whose e-mail is not registered yet.
///
/// Returns the number of administrators created.
pub async fn seed_bootstrap_admins<C>(db: &C, admins: &[BootstrapAdmin]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for admin in admins {
        if get_employee_by_email(db, &admin.email).await?.is_some() {
            continue;
        }
        create_employee(
            db,
            NewEmployee {
                name: admin.name.clone(),
                email: admin.email.clone(),
                role: Role::Admin,
                capabilities: Vec::new(),
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}
