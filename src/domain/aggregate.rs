//! Per-date withdrawal/deposit accumulation.

use crate::domain::transaction::Transaction;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Totals for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyFlow {
    pub withdrawal: f64,
    pub deposit: f64,
}

/// Accumulate withdrawal/deposit totals per distinct date. Transfers are
/// skipped entirely; every other transaction inserts its date, with void
/// transactions contributing zero to both totals.
pub fn aggregate_by_day(transactions: &[Transaction]) -> BTreeMap<NaiveDate, DailyFlow> {
    let mut flows: BTreeMap<NaiveDate, DailyFlow> = BTreeMap::new();

    for txn in transactions {
        if txn.is_transfer() {
            continue;
        }
        let flow = flows.entry(txn.date).or_default();
        flow.withdrawal += txn.withdrawal();
        flow.deposit += txn.deposit();
    }

    flows
}
