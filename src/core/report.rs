//! Report generation business logic.
//!
//! This module turns process records into per-currency totals and threshold
//! statuses, either for one client or for the whole client base. The pure
//! helpers (`normalize_currency`, `summarize_processes`, `get_status`) carry the
//! arithmetic; the async generators only fetch rows and assemble the results.

use crate::{
    core::{
        permission::{Actor, Capability, require},
        process::{BuyScope, DateRange, find_processes},
    },
    entities::{Client, client, process},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Display labels that older records use instead of the currency code.
/// Keys are matched after trimming, collapsing whitespace and upper-casing.
const CURRENCY_ALIASES: &[(&str, &str)] = &[
    ("US DOLLAR", "USD"),
    ("DOLLAR", "USD"),
    ("$", "USD"),
    ("دولار أمريكي", "USD"),
    ("دولار امريكي", "USD"),
    ("دولار", "USD"),
    ("EURO", "EUR"),
    ("€", "EUR"),
    ("يورو", "EUR"),
    ("BRITISH POUND", "GBP"),
    ("POUND STERLING", "GBP"),
    ("جنيه استرليني", "GBP"),
    ("TURKISH LIRA", "TRY"),
    ("ليرة تركية", "TRY"),
    ("SAUDI RIYAL", "SAR"),
    ("ريال سعودي", "SAR"),
    ("UAE DIRHAM", "AED"),
    ("درهم إماراتي", "AED"),
    ("EGYPTIAN POUND", "EGP"),
    ("جنيه مصري", "EGP"),
    ("IRAQI DINAR", "IQD"),
    ("دينار عراقي", "IQD"),
    ("SYRIAN POUND", "SYP"),
    ("ليرة سورية", "SYP"),
    ("JORDANIAN DINAR", "JOD"),
    ("دينار أردني", "JOD"),
];

/// Totals keyed by canonical currency code
pub type CurrencyTotals = BTreeMap<String, f64>;

/// Maps a currency label onto its canonical code.
///
/// Known aliases resolve to their code; anything else is returned trimmed and
/// upper-cased, so `" usd "` and `"USD"` aggregate together.
#[must_use]
pub fn normalize_currency(label: &str) -> String {
    let key = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    CURRENCY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or(key)
}

/// Classification of an amount against a client's expected band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Below the client's minimum
    Low,
    /// Within the band, boundaries included
    Medium,
    /// Above the client's maximum
    High,
}

/// Classifies `amount` against the band `[min, max]`.
///
/// `High` iff `amount > max`, `Low` iff `amount < min`, `Medium` otherwise. The
/// `max` comparison wins if the band is inverted.
#[must_use]
pub fn get_status(amount: f64, min: f64, max: f64) -> Status {
    if amount > max {
        Status::High
    } else if amount < min {
        Status::Low
    } else {
        Status::Medium
    }
}

/// Per-currency buy and sell totals for a set of processes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySummary {
    /// `from_currency` -> sum of `process_amount_buy`
    pub buy_totals_by_currency: CurrencyTotals,
    /// `to_currency` -> sum of `process_amount_sell`
    pub sell_totals_by_currency: CurrencyTotals,
}

/// Sums buy amounts by source currency and sell amounts by target currency.
#[must_use]
pub fn summarize_processes(processes: &[process::Model]) -> CurrencySummary {
    let mut summary = CurrencySummary::default();
    for p in processes {
        *summary
            .buy_totals_by_currency
            .entry(normalize_currency(&p.from_currency))
            .or_insert(0.0) += p.process_amount_buy;
        *summary
            .sell_totals_by_currency
            .entry(normalize_currency(&p.to_currency))
            .or_insert(0.0) += p.process_amount_sell;
    }
    summary
}

/// Which totals feed the status classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBasis {
    /// Buy total of the currency only
    #[default]
    Buy,
    /// Buy total plus sell total of the currency
    BuyAndSell,
}

/// Status of one currency in a client report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyStatus {
    /// Canonical currency code
    pub currency: String,
    /// Amount that was classified
    pub amount: f64,
    /// Classification against the client's band
    pub status: Status,
}

/// Computes one status per currency, in currency-code order.
#[must_use]
pub fn currency_statuses(
    summary: &CurrencySummary,
    basis: StatusBasis,
    min: f64,
    max: f64,
) -> Vec<CurrencyStatus> {
    let currencies: BTreeSet<&String> = match basis {
        StatusBasis::Buy => summary.buy_totals_by_currency.keys().collect(),
        StatusBasis::BuyAndSell => summary
            .buy_totals_by_currency
            .keys()
            .chain(summary.sell_totals_by_currency.keys())
            .collect(),
    };

    currencies
        .into_iter()
        .map(|currency| {
            let buy = summary
                .buy_totals_by_currency
                .get(currency)
                .copied()
                .unwrap_or(0.0);
            let amount = match basis {
                StatusBasis::Buy => buy,
                StatusBasis::BuyAndSell => {
                    buy + summary
                        .sell_totals_by_currency
                        .get(currency)
                        .copied()
                        .unwrap_or(0.0)
                }
            };
            CurrencyStatus {
                currency: currency.clone(),
                amount,
                status: get_status(amount, min, max),
            }
        })
        .collect()
}

/// Aggregated report for a single client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReport {
    /// The client being reported on
    pub client: client::Model,
    /// Buy-amount scope of the report
    pub scope: BuyScope,
    /// Processes included in the totals
    pub processes: Vec<process::Model>,
    /// Per-currency totals
    #[serde(flatten)]
    pub summary: CurrencySummary,
    /// Status of each currency against the client's band
    pub statuses: Vec<CurrencyStatus>,
}

/// Builds the report for one client over `range`.
///
/// Requires `AccessProcesses` and access to the client's type.
pub async fn generate_client_report(
    db: &DatabaseConnection,
    actor: &Actor,
    client_id: i64,
    range: DateRange,
    scope: BuyScope,
    basis: StatusBasis,
) -> Result<ClientReport> {
    require(actor, Capability::AccessProcesses)?;
    let client = Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("client", client_id))?;
    require(actor, Capability::access(client.client_type))?;

    let processes = find_processes(db, Some(client_id), range, Some(scope)).await?;
    let summary = summarize_processes(&processes);
    let statuses = currency_statuses(&summary, basis, client.minimum, client.maximum);

    Ok(ClientReport {
        client,
        scope,
        processes,
        summary,
        statuses,
    })
}

/// One client's line in the general report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRow {
    /// Client id
    pub client_id: i64,
    /// Current name of the client
    pub client_name: String,
    /// Processes counted in the range
    pub process_count: usize,
    /// Sum of `process_amount_buy`
    pub total_amount: f64,
}

/// Aggregated report over every client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralReport {
    /// Buy-amount scope of the report
    pub scope: BuyScope,
    /// Every client in the base, including those without rows
    pub total_clients: usize,
    /// Clients with at least one matching process, ordered by client id
    pub rows: Vec<ClientRow>,
    /// Sum of `total_amount` over the rows
    pub grand_total: f64,
}

/// Groups processes by client. Clients without processes produce no row.
#[must_use]
pub fn build_general_report(
    clients: &[client::Model],
    processes: &[process::Model],
    scope: BuyScope,
) -> GeneralReport {
    let mut per_client: HashMap<i64, (usize, f64)> = HashMap::new();
    for p in processes.iter().filter(|p| scope.contains(p.process_amount_buy)) {
        let entry = per_client.entry(p.client_id).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += p.process_amount_buy;
    }

    let rows: Vec<ClientRow> = clients
        .iter()
        .filter_map(|c| {
            per_client
                .get(&c.id)
                .filter(|(count, _)| *count > 0)
                .map(|&(process_count, total_amount)| ClientRow {
                    client_id: c.id,
                    client_name: c.full_name.clone(),
                    process_count,
                    total_amount,
                })
        })
        .collect();
    let grand_total = rows.iter().map(|r| r.total_amount).sum();

    GeneralReport {
        scope,
        total_clients: clients.len(),
        rows,
        grand_total,
    }
}

/// Builds the all-clients report over `range`. Requires `AccessProcesses`.
pub async fn generate_general_report(
    db: &DatabaseConnection,
    actor: &Actor,
    range: DateRange,
    scope: BuyScope,
) -> Result<GeneralReport> {
    require(actor, Capability::AccessProcesses)?;
    let clients = Client::find()
        .order_by_asc(client::Column::Id)
        .all(db)
        .await?;
    let processes = find_processes(db, None, range, Some(scope)).await?;
    Ok(build_general_report(&clients, &processes, scope))
}

/// Formats an amount for display with two decimals.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
