//! Currency business logic - adding, editing and listing tradable currencies.
//!
//! Codes are trimmed and upper-cased before every lookup, so `"usd"` and `"USD"`
//! name the same currency.

use crate::{
    entities::{Currency, currency},
    errors::{Error, Result},
    notify::{Event, Notifier, publish_serialized},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request body for adding or editing a currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInput {
    /// Display name
    pub name: String,
    /// Three-letter code; normalized to upper case
    pub code: String,
    /// Display symbol
    pub symbol: String,
}

/// Trims and upper-cases a code, rejecting anything but three ASCII letters.
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(Error::bad_request("currency code must be three letters"))
    }
}

fn validate(input: &CurrencyInput) -> Result<String> {
    if input.name.trim().is_empty() || input.symbol.trim().is_empty() {
        return Err(Error::bad_request("name, code and symbol are required"));
    }
    normalize_code(&input.code)
}

/// Finds a currency by code.
pub async fn get_currency_by_code<C>(db: &C, code: &str) -> Result<Option<currency::Model>>
where
    C: ConnectionTrait,
{
    let code = normalize_code(code)?;
    Currency::find()
        .filter(currency::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a currency. A code that already exists is a `Conflict`.
pub async fn add_currency<C>(db: &C, notifier: &dyn Notifier, input: &CurrencyInput) -> Result<currency::Model>
where
    C: ConnectionTrait,
{
    let code = validate(input)?;
    if get_currency_by_code(db, &code).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("currency {code} already exists"),
        });
    }

    let created = currency::ActiveModel {
        name: Set(input.name.trim().to_string()),
        code: Set(code),
        symbol: Set(input.symbol.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(code = %created.code, "Currency added");
    publish_serialized(notifier, Event::CurrencyAdded, &created);
    Ok(created)
}

/// Updates the currency currently stored under `code`.
///
/// The code itself may change, as long as the new one is free.
pub async fn update_currency<C>(
    db: &C,
    notifier: &dyn Notifier,
    code: &str,
    input: &CurrencyInput,
) -> Result<currency::Model>
where
    C: ConnectionTrait,
{
    let new_code = validate(input)?;
    let existing = get_currency_by_code(db, code)
        .await?
        .ok_or_else(|| Error::not_found("currency", code.trim().to_uppercase()))?;

    if new_code != existing.code && get_currency_by_code(db, &new_code).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("currency {new_code} already exists"),
        });
    }

    let mut model: currency::ActiveModel = existing.into();
    model.name = Set(input.name.trim().to_string());
    model.code = Set(new_code);
    model.symbol = Set(input.symbol.trim().to_string());
    let updated = model.update(db).await?;

    info!(code = %updated.code, "Currency updated");
    publish_serialized(notifier, Event::CurrencyUpdated, &updated);
    Ok(updated)
}

/// All currencies ordered by code.
pub async fn list_currencies<C>(db: &C) -> Result<Vec<currency::Model>>
where
    C: ConnectionTrait,
{
    Currency::find()
        .order_by_asc(currency::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn usd() -> CurrencyInput {
        CurrencyInput {
            name: "US Dollar".to_string(),
            code: " usd ".to_string(),
            symbol: "$".to_string(),
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("eur").ok().as_deref(), Some("EUR"));
        assert!(normalize_code("EURO").is_err());
        assert!(normalize_code("U$D").is_err());
        assert!(normalize_code("").is_err());
    }

    #[tokio::test]
    async fn test_add_currency_uppercases_code() -> Result<()> {
        let db = setup_test_db().await?;
        let notifier = RecordingNotifier::default();

        let created = add_currency(&db, &notifier, &usd()).await?;
        assert_eq!(created.code, "USD");
        assert_eq!(notifier.events(), vec![Event::CurrencyAdded]);

        let result = add_currency(&db, &notifier, &usd()).await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_currency_by_code() -> Result<()> {
        let db = setup_test_db().await?;
        let notifier = RecordingNotifier::default();
        add_currency(&db, &notifier, &usd()).await?;

        let edit = CurrencyInput {
            name: "United States Dollar".to_string(),
            ..usd()
        };
        let updated = update_currency(&db, &notifier, "usd", &edit).await?;
        assert_eq!(updated.name, "United States Dollar");
        assert_eq!(updated.code, "USD");

        let missing = update_currency(&db, &notifier, "GBP", &edit).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        assert_eq!(list_currencies(&db).await?.len(), 1);
        Ok(())
    }
}
