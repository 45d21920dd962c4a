//! Per-market position accumulator.

use serde::{Deserialize, Serialize};

use crate::domain::{Currency, Decimal, Direction, Market, Timestamp, TradeRecord};

/// A margin loan issued while this position was open and not yet repaid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrow {
    pub date: Timestamp,
    pub amount: Decimal,
    pub currency: Currency,
}

/// Live state of one market's position.
///
/// At most one instance per market exists at any time. Created when a
/// trade arrives for a flat market, mutated by every subsequent trade in
/// that market, removed the instant `size` rounds to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub market: Market,
    pub direction: Direction,
    /// Signed size: positive for long, negative for short.
    pub size: Decimal,
    /// Net quote-currency cash flow so far: buys subtract, sells add.
    /// At full close this equals the realized profit of the lifecycle,
    /// within the rounding tolerance.
    pub amount: Decimal,
    /// Size-weighted average of all contributing entry prices.
    pub avg_entry_price: Decimal,
    /// Sum of fees of every trade in this position's lifetime.
    pub accumulated_fee: Decimal,
    pub entry_date: Timestamp,
    /// Set once, at close.
    pub exit_date: Option<Timestamp>,
    /// Margin loans still outstanding (margin variant only).
    pub outstanding_borrows: Vec<Borrow>,
    /// Realized profit accumulated across partial closes.
    pub realized_profit: Decimal,
}

impl Position {
    /// Open a fresh position from a trade on a flat market.
    pub fn open(trade: &TradeRecord) -> Self {
        let direction = trade.side.direction();
        let sign = Decimal::from(direction.sign());
        Position {
            market: trade.market.clone(),
            direction,
            size: (trade.size * sign).rounded(),
            amount: (-(trade.notional() * sign)).rounded(),
            avg_entry_price: trade.price,
            accumulated_fee: trade.fee,
            entry_date: trade.timestamp,
            exit_date: None,
            outstanding_borrows: Vec::new(),
            realized_profit: Decimal::zero(),
        }
    }

    /// Apply a same-direction trade, growing the position.
    ///
    /// Recomputes the average entry price as the size-weighted average of
    /// all contributing entry prices.
    pub fn scale(&mut self, trade: &TradeRecord) {
        let sign = Decimal::from(self.direction.sign());
        let old_abs = self.size.abs();
        let new_abs = old_abs + trade.size;

        self.avg_entry_price =
            ((old_abs * self.avg_entry_price + trade.size * trade.price) / new_abs).rounded();
        self.size = (self.size + trade.size * sign).rounded();
        self.amount = (self.amount - trade.notional() * sign).rounded();
        self.accumulated_fee = (self.accumulated_fee + trade.fee).rounded();
    }

    /// Apply an opposite-direction trade for `closing_size` units,
    /// shrinking the position toward zero.
    ///
    /// Returns the profit delta realized by the closing portion: positive
    /// when the exit price favors the held direction.
    pub fn reduce(&mut self, trade: &TradeRecord, closing_size: Decimal) -> Decimal {
        let sign = Decimal::from(self.direction.sign());
        let profit_delta = ((trade.price - self.avg_entry_price) * closing_size * sign).rounded();

        self.realized_profit = (self.realized_profit + profit_delta).rounded();
        self.size = (self.size - closing_size * sign).rounded();
        self.amount = (self.amount + closing_size * trade.price * sign).rounded();
        self.accumulated_fee = (self.accumulated_fee + trade.fee).rounded();
        profit_delta
    }

    /// True when the remaining size is within the zero tolerance.
    pub fn is_closed(&self) -> bool {
        self.size.is_negligible()
    }

    /// Quantity that an opposite-direction trade can close at most.
    pub fn open_size(&self) -> Decimal {
        self.size.abs()
    }
}
