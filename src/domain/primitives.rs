//! Domain primitives: Timestamp, Market, Currency, Side, Direction.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TradeError;

/// Instant of a fill or ledger row, UTC.
///
/// The engine only ever shifts timestamps by whole seconds: one second is
/// the offset unit for reversal splits, borrow/repay rows, and same-instant
/// tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Create a Timestamp from a chrono instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Timestamp(instant)
    }

    /// Create a Timestamp from whole seconds since the Unix epoch.
    pub fn from_unix(secs: i64) -> Self {
        Timestamp(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Parse an RFC 3339 timestamp (the form exchange exports carry).
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| Timestamp(dt.with_timezone(&Utc)))
    }

    /// This instant shifted `secs` seconds into the past.
    pub fn minus_seconds(&self, secs: i64) -> Self {
        Timestamp(self.0 - Duration::seconds(secs))
    }

    /// This instant shifted `secs` seconds into the future.
    pub fn plus_seconds(&self, secs: i64) -> Self {
        Timestamp(self.0 + Duration::seconds(secs))
    }

    /// Calendar day of this instant (UTC).
    pub fn day(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// The day-bucket boundary instant: 23:59:59 of this instant's day.
    pub fn day_end(&self) -> Self {
        let end = self
            .day()
            .and_hms_opt(23, 59, 59)
            .expect("23:59:59 is a valid time of day");
        Timestamp(Utc.from_utc_datetime(&end))
    }

    /// Render as `YYYY-MM-DD HH:MM:SS` UTC, the ledger column format.
    pub fn to_ledger_string(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// The underlying chrono instant.
    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_ledger_string())
    }
}

/// Market symbol (e.g., "ETH-USD", "BTC-USD").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Market(pub String);

impl Market {
    /// Create a Market from a string.
    pub fn new(symbol: impl Into<String>) -> Self {
        Market(symbol.into())
    }

    /// Get the market symbol as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base asset of the market: the part before the first '-', or the
    /// whole symbol when no separator is present.
    pub fn base_currency(&self) -> Currency {
        match self.0.split_once('-') {
            Some((base, _)) => Currency::new(base),
            None => Currency::new(self.0.as_str()),
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency/asset code (e.g., "USDC", "ETH").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    /// Create a Currency from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Currency(code.into())
    }

    /// Get the currency code as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy side.
    Buy,
    /// Sell side.
    Sell,
}

impl Side {
    /// Get the signed multiplier for this side (+1 for Buy, -1 for Sell).
    pub fn sign(&self) -> i32 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    /// Direction of a position opened by a trade on this side.
    pub fn direction(&self) -> Direction {
        match self {
            Side::Buy => Direction::Long,
            Side::Sell => Direction::Short,
        }
    }
}

impl FromStr for Side {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(TradeError::UnknownSide(other.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Signed multiplier: +1 for Long, -1 for Short.
    pub fn sign(&self) -> i32 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }

    /// The side that increases a position in this direction.
    pub fn increasing_side(&self) -> Side {
        match self {
            Direction::Long => Side::Buy,
            Direction::Short => Side::Sell,
        }
    }

    /// The opposite direction.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}
