//! Assembly of position lifecycle events into the final ledger.

use tracing::debug;

use crate::config::{Config, LedgerVariant};
use crate::domain::{decollide_timestamps, Currency, Side, TradeRecord, Transaction, TxnLabel};

use super::margin::MarginSimulator;
use super::position::Position;
use super::tracker::PositionTracker;
use super::PositionEvent;

/// Folds a time-ascending trade stream into an ordered transaction list.
///
/// Output order is emission order, which follows trade-processing order;
/// no secondary sort is applied. In non-verbose mode the result is
/// filtered down to realized-gain rows, preserving relative order.
pub struct LedgerBuilder {
    config: Config,
    tracker: PositionTracker,
    margin: Option<MarginSimulator>,
    txns: Vec<Transaction>,
}

impl LedgerBuilder {
    pub fn new(config: Config) -> Self {
        let margin = match config.variant {
            LedgerVariant::Margin => Some(MarginSimulator::new(config.quote_currency.clone())),
            LedgerVariant::Spot => None,
        };
        Self {
            config,
            tracker: PositionTracker::new(),
            margin,
            txns: Vec::new(),
        }
    }

    /// Run the fold over the whole trade sequence.
    pub fn build(mut self, mut trades: Vec<TradeRecord>) -> Vec<Transaction> {
        decollide_timestamps(&mut trades);
        for trade in &trades {
            self.fold_trade(trade);
        }
        debug!(
            trades = trades.len(),
            rows = self.txns.len(),
            open_positions = self.tracker.open_positions().count(),
            "ledger assembled"
        );

        if self.config.verbose {
            self.txns
        } else {
            self.txns
                .into_iter()
                .filter(|t| t.label == TxnLabel::RealizedGain)
                .collect()
        }
    }

    fn fold_trade(&mut self, trade: &TradeRecord) {
        let applied = self.tracker.apply(trade);
        for event in applied.events {
            match event {
                PositionEvent::Opened { trade, .. } | PositionEvent::Scaled { trade, .. } => {
                    self.emit_increase(&trade);
                }
                PositionEvent::PartiallyClosed { trade, .. } => {
                    self.txns
                        .push(trade_row(&trade, &self.config.quote_currency));
                }
                PositionEvent::Closed { trade, position } => {
                    self.emit_close(&trade, &position);
                }
            }
        }
    }

    /// A size-increasing fill: in the margin variant, the enabling borrow
    /// precedes the trade row.
    fn emit_increase(&mut self, trade: &TradeRecord) {
        if let Some(sim) = &self.margin {
            let (txn, borrow) = sim.borrow_for(trade, trade.side.direction());
            self.tracker.push_borrow(&trade.market, borrow);
            self.txns.push(txn);
        }
        self.txns
            .push(trade_row(trade, &self.config.quote_currency));
    }

    /// A closing fill: trade row, then (margin) aggregated repayment, then
    /// the realized-gain row and (margin) its quote-side offset.
    fn emit_close(&mut self, trade: &TradeRecord, position: &Position) {
        self.txns
            .push(trade_row(trade, &self.config.quote_currency));

        if let Some(sim) = &self.margin {
            if let Some(repay) = sim.repay_for(position, trade) {
                self.txns.push(repay);
            }
        }

        // The margin variant nets fees out of the reported gain; the plain
        // variant reports it gross. Fee attribution does not reconcile
        // perfectly against account equity either way (see DESIGN.md).
        let profit = match self.config.variant {
            LedgerVariant::Margin if position.accumulated_fee.is_positive() => {
                (position.realized_profit - position.accumulated_fee).rounded()
            }
            _ => position.realized_profit,
        };
        if profit.is_zero() {
            return;
        }

        let quote = self.config.quote_currency.clone();
        let reference = format!("{}:gain", trade.trade_key());
        let gain = if profit.is_positive() {
            Transaction::new(
                trade.timestamp,
                TxnLabel::RealizedGain,
                format!("Realized gain on {}", position.market),
                reference,
            )
            .with_received(profit, quote)
        } else {
            Transaction::new(
                trade.timestamp,
                TxnLabel::RealizedGain,
                format!("Realized loss on {}", position.market),
                reference,
            )
            .with_sent(profit.abs(), quote)
        };
        self.txns.push(gain);

        if let Some(sim) = &self.margin {
            if let Some(offset) =
                sim.profit_offset(profit, position, trade.timestamp, trade.trade_key())
            {
                self.txns.push(offset);
            }
        }
    }
}

/// Convenience entry point: fold `trades` under `config`.
pub fn build_ledger(trades: Vec<TradeRecord>, config: &Config) -> Vec<Transaction> {
    LedgerBuilder::new(config.clone()).build(trades)
}

/// Render one fill as a ledger row.
fn trade_row(trade: &TradeRecord, quote: &Currency) -> Transaction {
    let base = trade.market.base_currency();
    let mut txn = match trade.side {
        Side::Buy => Transaction::new(
            trade.timestamp,
            TxnLabel::TradeBuy,
            format!("Buy {} {} @ {}", trade.size, trade.market, trade.price),
            trade.trade_key(),
        )
        .with_sent(trade.notional(), quote.clone())
        .with_received(trade.size, base),
        Side::Sell => Transaction::new(
            trade.timestamp,
            TxnLabel::TradeSell,
            format!("Sell {} {} @ {}", trade.size, trade.market, trade.price),
            trade.trade_key(),
        )
        .with_sent(trade.size, base)
        .with_received(trade.notional(), quote.clone()),
    };
    if trade.fee.is_positive() {
        txn = txn.with_fee(trade.fee, quote.clone());
    }
    txn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, Market, Timestamp};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn trade(side: Side, size: &str, price: &str, unix: i64, id: &str) -> TradeRecord {
        TradeRecord::new(
            Market::new("ETH-USD"),
            side,
            d(size),
            d(price),
            Decimal::zero(),
            Timestamp::from_unix(unix),
            Some(id.to_string()),
        )
        .unwrap()
    }

    fn verbose_spot() -> Config {
        Config {
            verbose: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_trade_row_buy_legs() {
        let row = trade_row(&trade(Side::Buy, "10", "100", 1000, "a"), &Currency::new("USDC"));
        assert_eq!(row.label, TxnLabel::TradeBuy);
        assert_eq!(row.sent.as_ref().unwrap().amount, d("1000"));
        assert_eq!(row.sent.as_ref().unwrap().currency, Currency::new("USDC"));
        assert_eq!(row.received.as_ref().unwrap().amount, d("10"));
        assert_eq!(row.received.as_ref().unwrap().currency, Currency::new("ETH"));
        assert!(row.fee.is_none());
    }

    #[test]
    fn test_trade_row_sell_legs() {
        let row = trade_row(&trade(Side::Sell, "4", "120", 2000, "b"), &Currency::new("USDC"));
        assert_eq!(row.label, TxnLabel::TradeSell);
        assert_eq!(row.sent.as_ref().unwrap().currency, Currency::new("ETH"));
        assert_eq!(row.received.as_ref().unwrap().amount, d("480"));
    }

    #[test]
    fn test_open_close_emits_gain_row() {
        let trades = vec![
            trade(Side::Buy, "10", "100", 1000, "a"),
            trade(Side::Sell, "10", "120", 2000, "b"),
        ];
        let txns = build_ledger(trades, &verbose_spot());

        let labels: Vec<_> = txns.iter().map(|t| t.label).collect();
        assert_eq!(
            labels,
            vec![TxnLabel::TradeBuy, TxnLabel::TradeSell, TxnLabel::RealizedGain]
        );
        assert_eq!(txns[2].received.as_ref().unwrap().amount, d("200"));
    }

    #[test]
    fn test_non_verbose_returns_gain_subset() {
        let trades = vec![
            trade(Side::Buy, "10", "100", 1000, "a"),
            trade(Side::Sell, "10", "120", 2000, "b"),
        ];
        let config = Config::default();
        assert!(!config.verbose);
        let txns = build_ledger(trades, &config);

        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].label, TxnLabel::RealizedGain);
    }

    #[test]
    fn test_zero_profit_close_emits_no_gain_row() {
        let trades = vec![
            trade(Side::Buy, "10", "100", 1000, "a"),
            trade(Side::Sell, "10", "100", 2000, "b"),
        ];
        let txns = build_ledger(trades, &Config::default());
        assert!(txns.is_empty());
    }

    #[test]
    fn test_loss_emits_sent_gain_row() {
        let trades = vec![
            trade(Side::Buy, "10", "100", 1000, "a"),
            trade(Side::Sell, "10", "90", 2000, "b"),
        ];
        let txns = build_ledger(trades, &Config::default());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].sent.as_ref().unwrap().amount, d("100"));
        assert!(txns[0].received.is_none());
    }
}
