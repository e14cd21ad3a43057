//! Shared test utilities for the exchange desk.
//!
//! This module provides helpers for setting up test databases, recording
//! notifications and creating test entities with sensible defaults.

use crate::{
    core::{
        client::{Address, ClientInput, create_client},
        employee::{NewEmployee, create_employee, resolve_actor},
        permission::{Actor, Capability},
        process::ProcessInput,
    },
    entities::{ClientType, ProcessType, Role, client, employee, process},
    errors::Result,
    notify::{Event, Notification, Notifier},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Notifier that keeps every published notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Everything published so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Names of the published events, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.notifications().into_iter().map(|n| n.event).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, event: Event, payload: Value) {
        if let Ok(mut published) = self.published.lock() {
            published.push(Notification { event, payload });
        }
    }
}

/// An in-memory employee record with no capability flags.
pub fn employee_model(id: i64, role: Role) -> employee::Model {
    employee::Model {
        id,
        name: format!("Employee {id}"),
        email: format!("employee{id}@example.com"),
        role,
        is_active: true,
        can_create_greater: false,
        can_create_less: false,
        can_access_greater: false,
        can_access_less: false,
        can_edit_greater: false,
        can_edit_less: false,
        can_delete_greater: false,
        can_delete_less: false,
        can_edit_process: false,
        can_access_processes: false,
        can_delete_client: false,
    }
}

/// Registers a regular employee holding exactly `capabilities`.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    email: &str,
    capabilities: Vec<Capability>,
) -> Result<employee::Model> {
    create_employee(
        db,
        NewEmployee {
            name: "Test Employee".to_string(),
            email: email.to_string(),
            role: Role::Employee,
            capabilities,
        },
    )
    .await
}

/// Registers an employee with the given role and no explicit capabilities.
pub async fn create_test_employee_with_role(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<employee::Model> {
    create_employee(
        db,
        NewEmployee {
            name: "Test Employee".to_string(),
            email: email.to_string(),
            role,
            capabilities: Vec::new(),
        },
    )
    .await
}

/// Database, recording notifier and an admin actor.
pub async fn setup_with_admin() -> Result<(DatabaseConnection, RecordingNotifier, Actor)> {
    let db = setup_test_db().await?;
    let admin = create_test_employee_with_role(&db, "admin@example.com", Role::Admin).await?;
    let actor = resolve_actor(&db, admin.id).await?;
    Ok((db, RecordingNotifier::default(), actor))
}

/// Same as [`setup_with_admin`] plus one "less than 10000" client.
///
/// # Defaults
/// * `full_name`: "Test Client"
/// * `phone`: "0000"
/// * `minimum`: 0.0, `maximum`: 10000.0
pub async fn setup_with_client()
-> Result<(DatabaseConnection, RecordingNotifier, Actor, client::Model)> {
    let (db, notifier, actor) = setup_with_admin().await?;
    let client = create_test_client(&db, &actor, "Test Client", "0000", 0.0, 10_000.0).await?;
    Ok((db, notifier, actor, client))
}

fn test_address() -> Address {
    Address {
        country: "Turkey".to_string(),
        district: "Fatih".to_string(),
        building: "12".to_string(),
        street: "Main Street".to_string(),
    }
}

/// Input for a "less than 10000" client.
///
/// The national id is derived from the phone, so distinct phones never collide.
pub fn client_input(name: &str, phone: &str) -> ClientInput {
    ClientInput {
        full_name: name.to_string(),
        phone: phone.to_string(),
        national_id: format!("NID-{phone}"),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap_or_default(),
        current_address: test_address(),
        birth_address: test_address(),
        client_type: ClientType::Less,
        yearly_income: None,
        financial_status: None,
        banks_dealing_with: None,
        minimum: 0.0,
        maximum: 10_000.0,
    }
}

/// Input for a "greater than 10000" client with its financial fields filled.
pub fn greater_client_input(name: &str, phone: &str) -> ClientInput {
    ClientInput {
        client_type: ClientType::Greater,
        yearly_income: Some(250_000.0),
        financial_status: Some("stable".to_string()),
        banks_dealing_with: Some("Central Bank".to_string()),
        minimum: 10_000.0,
        maximum: 100_000.0,
        ..client_input(name, phone)
    }
}

/// Creates a "less than 10000" client with the given band.
pub async fn create_test_client(
    db: &DatabaseConnection,
    actor: &Actor,
    name: &str,
    phone: &str,
    minimum: f64,
    maximum: f64,
) -> Result<client::Model> {
    let notifier = RecordingNotifier::default();
    let input = ClientInput {
        minimum,
        maximum,
        ..client_input(name, phone)
    };
    create_client(db, &notifier, actor, &input).await
}

/// A complete buy process input. The sell side mirrors the buy amount.
///
/// # Defaults
/// * `to_currency`: "TRY" ("EUR" when buying TRY)
/// * `exchange_rate`: 1.0
/// * `process_date`: None (now)
pub fn process_input(client_id: i64, amount_buy: f64, from_currency: &str) -> ProcessInput {
    let to_currency = if from_currency.eq_ignore_ascii_case("TRY") {
        "EUR"
    } else {
        "TRY"
    };
    ProcessInput {
        client_id: Some(client_id),
        process_amount_sell: Some(amount_buy),
        process_amount_buy: Some(amount_buy),
        exchange_rate: Some(1.0),
        process_type: Some("Buy".to_string()),
        from_currency: Some(from_currency.to_string()),
        to_currency: Some(to_currency.to_string()),
        money_source: Some("salary".to_string()),
        money_destination: Some("travel".to_string()),
        process_date: None,
    }
}

/// An in-memory process record dated 2024-06-01.
pub fn process_model(
    id: i64,
    client_id: i64,
    amount_buy: f64,
    amount_sell: f64,
    from_currency: &str,
    to_currency: &str,
) -> process::Model {
    process::Model {
        id,
        client_id,
        employee_id: 1,
        client_name: format!("Client {client_id}"),
        process_date: Utc
            .with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
            .single()
            .unwrap_or_default(),
        process_amount_sell: amount_sell,
        process_amount_buy: amount_buy,
        exchange_rate: 1.0,
        process_type: ProcessType::Buy,
        from_currency: from_currency.to_string(),
        to_currency: to_currency.to_string(),
        money_source: None,
        money_destination: None,
    }
}

/// An in-memory "less than 10000" client record.
pub fn client_model(id: i64, name: &str) -> client::Model {
    client::Model {
        id,
        full_name: name.to_string(),
        phone: format!("phone-{id}"),
        national_id: format!("NID-{id}"),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap_or_default(),
        current_country: String::new(),
        current_district: String::new(),
        current_building: String::new(),
        current_street: String::new(),
        birth_country: String::new(),
        birth_district: String::new(),
        birth_building: String::new(),
        birth_street: String::new(),
        client_type: ClientType::Less,
        yearly_income: None,
        financial_status: None,
        banks_dealing_with: None,
        minimum: 0.0,
        maximum: 10_000.0,
        employee_id: 1,
        created_at: Utc::now(),
    }
}

