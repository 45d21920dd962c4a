//! Position accounting engine for perpetual trade fills.
//!
//! Folds a chronological, per-account trade stream into position
//! lifecycle events (open, scale, partial close, full close, reversal)
//! using an average-cost basis, optionally simulates margin borrow/repay
//! pairs, and emits an ordered ledger of atomic transactions with
//! realized gain/loss rows.
//!
//! Ingestion (CSV parsing, API pagination) and output I/O are external
//! collaborators: the engine consumes pre-sorted [`domain::TradeRecord`]s
//! and produces [`domain::Transaction`]s, entirely in memory.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;

pub use config::{Config, ConfigError, LedgerVariant};
pub use domain::{
    decollide_timestamps, Currency, Decimal, Direction, Leg, Market, Side, Timestamp, TradeRecord,
    Transaction, TxnLabel,
};
pub use engine::{
    aggregate_by_day, build_ledger, Applied, Borrow, CashFlow, DayTotal, FlowKind, LedgerBuilder,
    MarginSimulator, Outcome, Position, PositionEvent, PositionTracker,
};
pub use error::TradeError;
pub use export::{write_ledger, ExportError};
