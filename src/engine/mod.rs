//! The position accounting engine: a deterministic fold of a trade stream
//! into position lifecycle events and ledger transactions.

use crate::domain::{Decimal, TradeRecord};

pub mod calendar;
pub mod ledger;
pub mod margin;
pub mod position;
pub mod reversal;
pub mod tracker;

pub use calendar::{aggregate_by_day, CashFlow, DayTotal, FlowKind};
pub use ledger::{build_ledger, LedgerBuilder};
pub use margin::MarginSimulator;
pub use position::{Borrow, Position};
pub use reversal::split_reversal;
pub use tracker::PositionTracker;

/// Lifecycle classification of one applied trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A flat market gained a position.
    Opened,
    /// A same-direction trade grew the position.
    Scaled,
    /// An opposite-direction trade shrank the position without closing it.
    PartiallyClosed,
    /// The position's size returned to zero.
    Closed,
    /// The trade closed the position and opened one in the other direction.
    Reversed,
}

/// Result of applying one trade to the tracker.
#[derive(Debug, Clone)]
pub struct Applied {
    pub outcome: Outcome,
    /// Ordered events; two for a reversal, one otherwise.
    pub events: Vec<PositionEvent>,
}

/// One position lifecycle event, carrying the (sub-)trade that caused it.
#[derive(Debug, Clone)]
pub enum PositionEvent {
    Opened {
        trade: TradeRecord,
        size: Decimal,
        avg_entry_price: Decimal,
    },
    Scaled {
        trade: TradeRecord,
        size: Decimal,
        avg_entry_price: Decimal,
    },
    PartiallyClosed {
        trade: TradeRecord,
        profit_delta: Decimal,
        remaining_size: Decimal,
    },
    Closed {
        trade: TradeRecord,
        /// The removed position, with final realized profit, accumulated
        /// fee, exit date, and any still-outstanding borrows.
        position: Position,
    },
}
