//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod company;
pub mod currency;
pub mod employee;
pub mod process;

// Re-export specific types to avoid conflicts
pub use client::{ClientType, Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use currency::{Column as CurrencyColumn, Entity as Currency, Model as CurrencyModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel, Role};
pub use process::{Column as ProcessColumn, Entity as Process, Model as ProcessModel, ProcessType};
