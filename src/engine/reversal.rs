//! Splitting of trades that cross through flat.

use crate::domain::{Decimal, TradeRecord};

/// Decompose a trade whose size exceeds the open opposite-direction
/// position into a closing sub-trade and an opening sub-trade.
///
/// The closing half covers exactly the open position size and is
/// timestamped one second before the original trade; the opening half
/// carries the remainder at the original timestamp. Fed back into the
/// tracker in that order, the close always precedes the open both in
/// emission order and in timestamp order, even when ledger rows are later
/// grouped by day.
///
/// The input trade's whole fee rides on the closing half; the opening
/// half carries zero fee. Fee attribution across reversals is a known
/// approximation carried over from the source data (see DESIGN.md).
pub fn split_reversal(trade: &TradeRecord, closing_size: Decimal) -> (TradeRecord, TradeRecord) {
    let closing = trade.with_size_and_time(
        closing_size,
        trade.timestamp.minus_seconds(1),
        trade.fee,
    );
    let opening = trade.with_size_and_time(
        (trade.size - closing_size).rounded(),
        trade.timestamp,
        Decimal::zero(),
    );
    (closing, opening)
}
