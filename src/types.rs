use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::store::TradeStore;

/// One executed trade, normalized from a broker CSV row.
///
/// `iso_date_time` is fixed-width (`YYYY-MM-DDTHH:MM:SS`), so lexical order
/// equals chronological order; it is the sole sort key within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "isoDate")]
    pub iso_date: String,
    #[serde(rename = "isoTime")]
    pub iso_time: String,
    #[serde(rename = "isoDateTime")]
    pub iso_date_time: String,
    pub symbol: String,
    #[serde(rename = "contractMonth")]
    pub contract_month: String,
    pub side: String, // broker-local literal, e.g. "買" / "売"
    pub action: String,
    pub quantity: f64,
    pub price: f64,
    pub fee: f64,
    #[serde(rename = "grossProfit")]
    pub gross_profit: f64,
    #[serde(rename = "netProfit")]
    pub net_profit: f64,
}

/// Daily P&L roll-up for calendar coloring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTradeSummary {
    #[serde(rename = "isoDate")]
    pub iso_date: String,
    #[serde(rename = "tradeCount")]
    pub trade_count: u32,
    #[serde(rename = "buyCount")]
    pub buy_count: u32,
    #[serde(rename = "sellCount")]
    pub sell_count: u32,
    #[serde(rename = "totalQuantity")]
    pub total_quantity: f64,
    #[serde(rename = "netProfit")]
    pub net_profit: f64,
}

/// Everything the calendar UI needs for one year: per-day summaries plus the
/// per-day trade lists, keyed by ISO date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeDataForYear {
    pub summaries: BTreeMap<String, DailyTradeSummary>,
    #[serde(rename = "tradesByDate")]
    pub trades_by_date: BTreeMap<String, Vec<TradeRecord>>,
}

/// Shared application state
pub struct AppState {
    pub store: TradeStore,
}
