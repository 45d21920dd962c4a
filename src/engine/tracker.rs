//! Stateful fold of a trade stream into position lifecycle events.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Decimal, Market, TradeRecord};

use super::position::{Borrow, Position};
use super::reversal::split_reversal;
use super::{Applied, Outcome, PositionEvent};

/// Owns the live position per market and applies one trade at a time.
///
/// Callers must feed trades in strictly ascending timestamp order; the
/// fold is a deterministic left-to-right reduction with no hidden state
/// beyond the per-market book held here.
#[derive(Debug, Default)]
pub struct PositionTracker {
    book: HashMap<Market, Position>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self {
            book: HashMap::new(),
        }
    }

    /// The live position for a market, if one is open.
    pub fn open_position(&self, market: &Market) -> Option<&Position> {
        self.book.get(market)
    }

    /// Iterate over all currently open positions.
    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.book.values()
    }

    /// Record a margin loan against the live position of a market.
    ///
    /// No-op when the market is flat; the ledger assembler only calls this
    /// right after a size-increasing event, when a position must exist.
    pub fn push_borrow(&mut self, market: &Market, borrow: Borrow) {
        if let Some(position) = self.book.get_mut(market) {
            position.outstanding_borrows.push(borrow);
        }
    }

    /// Apply one trade, returning the tagged lifecycle outcome and the
    /// ordered events it produced.
    pub fn apply(&mut self, trade: &TradeRecord) -> Applied {
        match self.book.get(&trade.market) {
            None => self.apply_open(trade),
            Some(position) if trade.side == position.direction.increasing_side() => {
                self.apply_scale(trade)
            }
            Some(position) => {
                let open_size = position.open_size();
                let remainder = (trade.size - open_size).rounded();
                if remainder.is_positive() && !remainder.is_negligible() {
                    self.apply_reversal(trade, open_size)
                } else {
                    self.apply_reduce(trade)
                }
            }
        }
    }

    fn apply_open(&mut self, trade: &TradeRecord) -> Applied {
        let position = Position::open(trade);
        debug!(
            market = %trade.market,
            direction = %position.direction,
            size = %position.size,
            "position opened"
        );
        let event = PositionEvent::Opened {
            trade: trade.clone(),
            size: position.size,
            avg_entry_price: position.avg_entry_price,
        };
        self.book.insert(trade.market.clone(), position);
        Applied {
            outcome: Outcome::Opened,
            events: vec![event],
        }
    }

    fn apply_scale(&mut self, trade: &TradeRecord) -> Applied {
        let position = self
            .book
            .get_mut(&trade.market)
            .expect("scale requires a live position");
        position.scale(trade);
        debug!(
            market = %trade.market,
            size = %position.size,
            avg_entry = %position.avg_entry_price,
            "position scaled"
        );
        Applied {
            outcome: Outcome::Scaled,
            events: vec![PositionEvent::Scaled {
                trade: trade.clone(),
                size: position.size,
                avg_entry_price: position.avg_entry_price,
            }],
        }
    }

    fn apply_reduce(&mut self, trade: &TradeRecord) -> Applied {
        let position = self
            .book
            .get_mut(&trade.market)
            .expect("reduce requires a live position");
        let closing_size = trade.size.min(position.open_size());
        let profit_delta = position.reduce(trade, closing_size);

        if position.is_closed() {
            let mut position = self
                .book
                .remove(&trade.market)
                .expect("closed position is in the book");
            position.exit_date = Some(trade.timestamp);
            debug!(
                market = %trade.market,
                realized_profit = %position.realized_profit,
                fee = %position.accumulated_fee,
                "position closed"
            );
            Applied {
                outcome: Outcome::Closed,
                events: vec![PositionEvent::Closed {
                    trade: trade.clone(),
                    position,
                }],
            }
        } else {
            debug!(
                market = %trade.market,
                remaining = %position.size,
                profit_delta = %profit_delta,
                "position partially closed"
            );
            Applied {
                outcome: Outcome::PartiallyClosed,
                events: vec![PositionEvent::PartiallyClosed {
                    trade: trade.clone(),
                    profit_delta,
                    remaining_size: position.size,
                }],
            }
        }
    }

    /// The trade is larger than the open opposite-direction position:
    /// close the old position with the earlier-stamped half, then re-enter
    /// the fold with the remainder, which opens the new direction.
    fn apply_reversal(&mut self, trade: &TradeRecord, open_size: Decimal) -> Applied {
        debug!(
            market = %trade.market,
            trade_size = %trade.size,
            open_size = %open_size,
            "reversal split"
        );
        let (closing, opening) = split_reversal(trade, open_size);

        let mut events = self.apply_reduce(&closing).events;
        events.extend(self.apply_open(&opening).events);
        Applied {
            outcome: Outcome::Reversed,
            events,
        }
    }
}
