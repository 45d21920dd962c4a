//! Trade record: one normalized fill as delivered by the ingestion side.

use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, Market, Side, Timestamp};
use crate::error::TradeError;

/// A single normalized trade fill.
///
/// Immutable once constructed; the engine never mutates its input. The
/// ingestion collaborator is responsible for delivering records sorted
/// ascending by timestamp and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Stable unique reference for this trade.
    pub trade_key: String,
    /// Market the fill executed on.
    pub market: Market,
    /// Buy or Sell.
    pub side: Side,
    /// Filled quantity in base units, always positive.
    pub size: Decimal,
    /// Unit price in quote currency, always positive.
    pub price: Decimal,
    /// Quote-currency cost of the fill, never negative.
    pub fee: Decimal,
    /// Instant of the fill.
    pub timestamp: Timestamp,
    /// Exchange-assigned trade ID, if the export carried one.
    pub trade_id: Option<String>,
}

impl TradeRecord {
    /// Create a validated TradeRecord.
    ///
    /// # Errors
    /// Returns a [`TradeError`] when `size <= 0`, `price <= 0`, or
    /// `fee < 0`. Malformed records never reach the fold.
    pub fn new(
        market: Market,
        side: Side,
        size: Decimal,
        price: Decimal,
        fee: Decimal,
        timestamp: Timestamp,
        trade_id: Option<String>,
    ) -> Result<Self, TradeError> {
        if !size.is_positive() {
            return Err(TradeError::NonPositiveSize(size.to_canonical_string()));
        }
        if !price.is_positive() {
            return Err(TradeError::NonPositivePrice(price.to_canonical_string()));
        }
        if fee.is_negative() {
            return Err(TradeError::NegativeFee(fee.to_canonical_string()));
        }

        let trade_key = Self::compute_trade_key(
            &market,
            side,
            &size,
            &price,
            &timestamp,
            trade_id.as_deref(),
        );
        Ok(TradeRecord {
            trade_key,
            market,
            side,
            size,
            price,
            fee,
            timestamp,
            trade_id,
        })
    }

    /// Quote-currency notional of the fill (`size * price`).
    pub fn notional(&self) -> Decimal {
        (self.size * self.price).rounded()
    }

    /// Generate a stable unique key for this trade.
    ///
    /// Priority: exchange `trade_id` (if present) > hash of deterministic fields.
    pub fn compute_trade_key(
        market: &Market,
        side: Side,
        size: &Decimal,
        price: &Decimal,
        timestamp: &Timestamp,
        trade_id: Option<&str>,
    ) -> String {
        if let Some(id) = trade_id {
            return format!("tid:{}", id);
        }

        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(market.as_str());
        hasher.update(if side == Side::Buy { b"B" } else { b"S" });
        hasher.update(size.to_canonical_string());
        hasher.update(price.to_canonical_string());
        hasher.update(timestamp.inner().timestamp_millis().to_le_bytes());
        let hash = hasher.finalize();
        format!("hash:{}", hex::encode(&hash[..16]))
    }

    /// Borrow the precomputed trade key.
    pub fn trade_key(&self) -> &str {
        &self.trade_key
    }

    /// Copy of this trade with a different size, recomputing the key.
    ///
    /// Used by the reversal split; the derived sub-trade skips validation
    /// because its size is a positive remainder of an already-valid trade.
    pub(crate) fn with_size_and_time(&self, size: Decimal, timestamp: Timestamp, fee: Decimal) -> Self {
        let trade_key = Self::compute_trade_key(
            &self.market,
            self.side,
            &size,
            &self.price,
            &timestamp,
            None,
        );
        TradeRecord {
            trade_key,
            market: self.market.clone(),
            side: self.side,
            size,
            price: self.price,
            fee,
            timestamp,
            trade_id: None,
        }
    }
}
