//! Fold canonical trade records into per-day summaries for one year.

use std::collections::BTreeMap;

use crate::types::{DailyTradeSummary, TradeDataForYear, TradeRecord};

/// Broker-local side literals used for buy/sell classification.
pub const SIDE_BUY: &str = "買";
pub const SIDE_SELL: &str = "売";

/// Filter records to the requested year and fold them into daily summaries
/// plus per-day trade lists sorted ascending by `iso_date_time`.
///
/// Pure over already-validated records; recomputed in full on every call.
pub fn aggregate(records: &[TradeRecord], year: i32) -> TradeDataForYear {
    let year_prefix = format!("{year}-");

    let mut summaries: BTreeMap<String, DailyTradeSummary> = BTreeMap::new();
    let mut trades_by_date: BTreeMap<String, Vec<TradeRecord>> = BTreeMap::new();

    for record in records {
        if !record.iso_date.starts_with(&year_prefix) {
            continue;
        }

        let summary = summaries
            .entry(record.iso_date.clone())
            .or_insert_with(|| DailyTradeSummary {
                iso_date: record.iso_date.clone(),
                trade_count: 0,
                buy_count: 0,
                sell_count: 0,
                total_quantity: 0.0,
                net_profit: 0.0,
            });
        summary.trade_count += 1;
        summary.total_quantity += record.quantity;
        if record.side == SIDE_BUY {
            summary.buy_count += 1;
        } else if record.side == SIDE_SELL {
            summary.sell_count += 1;
        }
        summary.net_profit += record.net_profit;

        trades_by_date
            .entry(record.iso_date.clone())
            .or_default()
            .push(record.clone());
    }

    for trades in trades_by_date.values_mut() {
        // Stable sort: equal timestamps keep their CSV row order.
        trades.sort_by(|a, b| a.iso_date_time.cmp(&b.iso_date_time));
    }

    TradeDataForYear {
        summaries,
        trades_by_date,
    }
}
