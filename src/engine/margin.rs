//! Synthetic borrow/repay modeling for leveraged positions.

use crate::domain::{Currency, Decimal, Direction, Timestamp, TradeRecord, Transaction, TxnLabel};

use super::position::{Borrow, Position};

/// Models that a leveraged trade borrows the traded notional up front and
/// repays every outstanding loan when the position closes.
#[derive(Debug, Clone)]
pub struct MarginSimulator {
    quote: Currency,
}

impl MarginSimulator {
    pub fn new(quote: Currency) -> Self {
        Self { quote }
    }

    /// Borrow enabling a size-increasing trade.
    ///
    /// Longs borrow the quote notional, shorts borrow the base size. The
    /// loan is timestamped one second before the trade it enables.
    pub fn borrow_for(&self, trade: &TradeRecord, direction: Direction) -> (Transaction, Borrow) {
        let (amount, currency) = match direction {
            Direction::Long => (trade.notional(), self.quote.clone()),
            Direction::Short => (trade.size, trade.market.base_currency()),
        };
        let date = trade.timestamp.minus_seconds(1);
        let txn = Transaction::new(
            date,
            TxnLabel::MarginLoan,
            format!("Borrow {} {} against {}", amount, currency, trade.market),
            format!("{}:loan", trade.trade_key()),
        )
        .with_received(amount, currency.clone());
        let borrow = Borrow {
            date,
            amount,
            currency,
        };
        (txn, borrow)
    }

    /// Single aggregated repayment of all outstanding borrows of a closed
    /// position, timestamped one second after the closing trade.
    ///
    /// Returns None when nothing is outstanding.
    pub fn repay_for(&self, position: &Position, closing: &TradeRecord) -> Option<Transaction> {
        let first = position.outstanding_borrows.first()?;
        let currency = first.currency.clone();
        let total: Decimal = position
            .outstanding_borrows
            .iter()
            .map(|b| b.amount)
            .sum::<Decimal>()
            .rounded();

        Some(
            Transaction::new(
                closing.timestamp.plus_seconds(1),
                TxnLabel::MarginRepayment,
                format!("Repay {} {} for {}", total, currency, position.market),
                format!("{}:repay", closing.trade_key()),
            )
            .with_sent(total, currency),
        )
    }

    /// Complementary row zeroing out the quote side of a realized gain.
    ///
    /// Profit pays down the margin loan balance (margin-repayment); a loss
    /// is added to it (margin-loan). Returns None for zero profit.
    pub fn profit_offset(
        &self,
        profit: Decimal,
        position: &Position,
        date: Timestamp,
        reference: &str,
    ) -> Option<Transaction> {
        if profit.is_positive() {
            Some(
                Transaction::new(
                    date,
                    TxnLabel::MarginRepayment,
                    format!("Profit on {} pays down margin loan", position.market),
                    format!("{}:offset", reference),
                )
                .with_sent(profit, self.quote.clone()),
            )
        } else if profit.is_negative() {
            Some(
                Transaction::new(
                    date,
                    TxnLabel::MarginLoan,
                    format!("Loss on {} added to margin loan", position.market),
                    format!("{}:offset", reference),
                )
                .with_received(profit.abs(), self.quote.clone()),
            )
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Market, Side};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn trade(side: Side, size: &str, price: &str, unix: i64) -> TradeRecord {
        TradeRecord::new(
            Market::new("ETH-USD"),
            side,
            d(size),
            d(price),
            Decimal::zero(),
            Timestamp::from_unix(unix),
            Some(format!("t{}", unix)),
        )
        .unwrap()
    }

    fn simulator() -> MarginSimulator {
        MarginSimulator::new(Currency::new("USDC"))
    }

    #[test]
    fn test_long_borrows_quote_notional() {
        let t = trade(Side::Buy, "10", "100", 2000);
        let (txn, borrow) = simulator().borrow_for(&t, Direction::Long);

        assert_eq!(txn.label, TxnLabel::MarginLoan);
        assert_eq!(txn.date, Timestamp::from_unix(1999));
        let leg = txn.received.unwrap();
        assert_eq!(leg.amount, d("1000"));
        assert_eq!(leg.currency, Currency::new("USDC"));
        assert_eq!(borrow.amount, d("1000"));
    }

    #[test]
    fn test_short_borrows_base_size() {
        let t = trade(Side::Sell, "10", "100", 2000);
        let (txn, borrow) = simulator().borrow_for(&t, Direction::Short);

        let leg = txn.received.unwrap();
        assert_eq!(leg.amount, d("10"));
        assert_eq!(leg.currency, Currency::new("ETH"));
        assert_eq!(borrow.currency, Currency::new("ETH"));
    }

    #[test]
    fn test_repay_aggregates_outstanding_borrows() {
        let open = trade(Side::Buy, "10", "100", 1000);
        let mut position = Position::open(&open);
        let sim = simulator();
        let (_, b1) = sim.borrow_for(&open, Direction::Long);
        position.outstanding_borrows.push(b1);
        let scale = trade(Side::Buy, "5", "110", 2000);
        let (_, b2) = sim.borrow_for(&scale, Direction::Long);
        position.outstanding_borrows.push(b2);

        let closing = trade(Side::Sell, "15", "120", 3000);
        let repay = sim.repay_for(&position, &closing).unwrap();

        assert_eq!(repay.label, TxnLabel::MarginRepayment);
        assert_eq!(repay.date, Timestamp::from_unix(3001));
        let leg = repay.sent.unwrap();
        assert_eq!(leg.amount, d("1550"));
        assert_eq!(leg.currency, Currency::new("USDC"));
    }

    #[test]
    fn test_repay_none_without_borrows() {
        let position = Position::open(&trade(Side::Buy, "1", "100", 1000));
        let closing = trade(Side::Sell, "1", "110", 2000);
        assert!(simulator().repay_for(&position, &closing).is_none());
    }

    #[test]
    fn test_profit_offset_labels_follow_sign() {
        let position = Position::open(&trade(Side::Buy, "1", "100", 1000));
        let sim = simulator();
        let date = Timestamp::from_unix(2000);

        let gain = sim.profit_offset(d("50"), &position, date, "ref").unwrap();
        assert_eq!(gain.label, TxnLabel::MarginRepayment);
        assert_eq!(gain.sent.unwrap().amount, d("50"));

        let loss = sim.profit_offset(d("-50"), &position, date, "ref").unwrap();
        assert_eq!(loss.label, TxnLabel::MarginLoan);
        assert_eq!(loss.received.unwrap().amount, d("50"));

        assert!(sim.profit_offset(Decimal::zero(), &position, date, "ref").is_none());
    }
}
