//! Permission model - capability checks for the acting employee.
//!
//! Employees carry a flat set of boolean flags. [`Capability`] names each flag so
//! callers ask `actor.can(Capability::EditProcess)` instead of reading columns, and
//! admins pass every check.

use crate::{
    entities::{ClientType, Role, employee},
    errors::{Error, Result},
};

/// A single permission an employee may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Register "greater than 10000" clients
    CreateGreater,
    /// Register "less than 10000" clients
    CreateLess,
    /// View "greater than 10000" clients
    AccessGreater,
    /// View "less than 10000" clients
    AccessLess,
    /// Edit "greater than 10000" clients
    EditGreater,
    /// Edit "less than 10000" clients
    EditLess,
    /// Delete "greater than 10000" records
    DeleteGreater,
    /// Delete "less than 10000" records
    DeleteLess,
    /// Edit any process
    EditProcess,
    /// Query processes and run reports
    AccessProcesses,
    /// Delete clients
    DeleteClient,
}

impl Capability {
    /// Create capability for a client type.
    #[must_use]
    pub const fn create(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Greater => Self::CreateGreater,
            ClientType::Less => Self::CreateLess,
        }
    }

    /// Access capability for a client type.
    #[must_use]
    pub const fn access(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Greater => Self::AccessGreater,
            ClientType::Less => Self::AccessLess,
        }
    }

    /// Edit capability for a client type.
    #[must_use]
    pub const fn edit(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Greater => Self::EditGreater,
            ClientType::Less => Self::EditLess,
        }
    }

    /// Short label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateGreater => "create clients greater than 10000",
            Self::CreateLess => "create clients less than 10000",
            Self::AccessGreater => "access clients greater than 10000",
            Self::AccessLess => "access clients less than 10000",
            Self::EditGreater => "edit clients greater than 10000",
            Self::EditLess => "edit clients less than 10000",
            Self::DeleteGreater => "delete records greater than 10000",
            Self::DeleteLess => "delete records less than 10000",
            Self::EditProcess => "edit processes",
            Self::AccessProcesses => "access processes",
            Self::DeleteClient => "delete clients",
        }
    }
}

/// The authenticated, active employee performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    employee: employee::Model,
}

impl Actor {
    /// Wraps an employee record. Callers are expected to have checked `is_active`.
    #[must_use]
    pub const fn new(employee: employee::Model) -> Self {
        Self { employee }
    }

    /// Employee id, compared against `employee_id` columns for ownership.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.employee.id
    }

    /// The underlying employee record.
    #[must_use]
    pub const fn employee(&self) -> &employee::Model {
        &self.employee
    }

    /// Whether the actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.employee.role == Role::Admin
    }

    /// Whether the actor holds `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        if self.is_admin() {
            return true;
        }
        let e = &self.employee;
        match capability {
            Capability::CreateGreater => e.can_create_greater,
            Capability::CreateLess => e.can_create_less,
            Capability::AccessGreater => e.can_access_greater,
            Capability::AccessLess => e.can_access_less,
            Capability::EditGreater => e.can_edit_greater,
            Capability::EditLess => e.can_edit_less,
            Capability::DeleteGreater => e.can_delete_greater,
            Capability::DeleteLess => e.can_delete_less,
            Capability::EditProcess => e.can_edit_process,
            Capability::AccessProcesses => e.can_access_processes,
            Capability::DeleteClient => e.can_delete_client,
        }
    }
}

/// Fails with `Forbidden` unless the actor holds `capability`.
pub fn require(actor: &Actor, capability: Capability) -> Result<()> {
    if actor.can(capability) {
        Ok(())
    } else {
        tracing::warn!(
            employee_id = actor.id(),
            "Denied: missing permission to {}",
            capability.label()
        );
        Err(Error::forbidden(format!(
            "you do not have permission to {}",
            capability.label()
        )))
    }
}

/// Fails with `Forbidden` unless the actor is an administrator.
pub fn require_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::employee_model;

    #[test]
    fn test_admin_holds_every_capability() {
        let actor = Actor::new(employee_model(1, Role::Admin));
        assert!(actor.can(Capability::DeleteClient));
        assert!(actor.can(Capability::EditProcess));
        assert!(require_admin(&actor).is_ok());
    }

    #[test]
    fn test_employee_without_flags_is_denied() {
        let actor = Actor::new(employee_model(2, Role::Employee));
        assert!(!actor.can(Capability::AccessProcesses));
        assert!(matches!(
            require(&actor, Capability::DeleteClient),
            Err(Error::Forbidden { .. })
        ));
        assert!(require_admin(&actor).is_err());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut employee = employee_model(3, Role::Employee);
        employee.can_create_less = true;
        let actor = Actor::new(employee);

        assert!(actor.can(Capability::create(ClientType::Less)));
        assert!(!actor.can(Capability::create(ClientType::Greater)));
        assert!(!actor.can(Capability::access(ClientType::Less)));
    }

    #[test]
    fn test_client_type_mapping() {
        assert_eq!(Capability::edit(ClientType::Greater), Capability::EditGreater);
        assert_eq!(Capability::access(ClientType::Less), Capability::AccessLess);
    }
}
