//! Domain types and determinism layer for the position accounting engine.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Timestamp, Market, Currency, Side, Direction
//! - TradeRecord (input) and Transaction (output) as distinct immutable types
//! - Deterministic timestamp tie-breaking for same-instant trades

pub mod decimal;
pub mod ordering;
pub mod primitives;
pub mod trade;
pub mod transaction;

pub use decimal::{Decimal, PRECISION};
pub use ordering::decollide_timestamps;
pub use primitives::{Currency, Direction, Market, Side, Timestamp};
pub use trade::TradeRecord;
pub use transaction::{Leg, Transaction, TxnLabel};
