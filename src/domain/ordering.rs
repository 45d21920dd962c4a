//! Deterministic timestamp tie-breaking for trades.

use crate::domain::TradeRecord;

/// Spread trades sharing an identical input timestamp apart by whole
/// seconds, in input order.
///
/// The ledger is later grouped by day downstream, so emitted trade
/// timestamps must never collide. Offsets are strictly increasing and
/// purely a function of input order, so the result is reproducible for
/// the same input sequence. Trade keys are left untouched; they identify
/// the original fill.
pub fn decollide_timestamps(trades: &mut [TradeRecord]) {
    let mut last = None;
    for trade in trades.iter_mut() {
        if let Some(prev) = last {
            if trade.timestamp <= prev {
                trade.timestamp = prev.plus_seconds(1);
            }
        }
        last = Some(trade.timestamp);
    }
}
