//! Daily bucketing of funding payments and trading rewards.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, Timestamp};

/// One time-stamped cash flow (funding payment, reward payout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub timestamp: Timestamp,
    /// Signed amount in quote currency: positive received, negative paid.
    pub amount: Decimal,
}

/// Net sign classification of a day's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Gain,
    Cost,
}

/// Net cash flow of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    /// Day-bucket boundary: 23:59:59 of the day the flows fell on.
    pub date: Timestamp,
    pub amount: Decimal,
    pub kind: FlowKind,
}

/// Sum cash flows per calendar day, classifying each day's net sign.
///
/// Pure streaming reduction keyed by day; no position state. Output is
/// sorted ascending by day.
pub fn aggregate_by_day(flows: &[CashFlow]) -> Vec<DayTotal> {
    let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for flow in flows {
        let day = flow.timestamp.day();
        let total = buckets.entry(day).or_insert_with(Decimal::zero);
        *total = (*total + flow.amount).rounded();
    }

    buckets
        .into_iter()
        .map(|(day, amount)| {
            let midnight = Timestamp::new(
                day.and_hms_opt(0, 0, 0)
                    .expect("midnight is a valid time of day")
                    .and_utc(),
            );
            DayTotal {
                date: midnight.day_end(),
                amount,
                kind: if amount.is_negative() {
                    FlowKind::Cost
                } else {
                    FlowKind::Gain
                },
            }
        })
        .collect()
}
