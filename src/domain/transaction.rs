//! Ledger transaction: one immutable output row of the engine.

use serde::{Deserialize, Serialize};

use crate::domain::{Currency, Decimal, Timestamp};

/// Classification of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxnLabel {
    TradeBuy,
    TradeSell,
    MarginLoan,
    MarginRepayment,
    RealizedGain,
}

impl TxnLabel {
    /// Ledger-column rendering of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnLabel::TradeBuy => "trade-buy",
            TxnLabel::TradeSell => "trade-sell",
            TxnLabel::MarginLoan => "margin-loan",
            TxnLabel::MarginRepayment => "margin-repayment",
            TxnLabel::RealizedGain => "realized-gain",
        }
    }
}

impl std::fmt::Display for TxnLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One side of a transaction: an amount in a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Leg {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Leg { amount, currency }
    }
}

/// An atomic ledger transaction.
///
/// Distinct from [`TradeRecord`](crate::domain::TradeRecord): input and
/// output of the fold are separate immutable types, derived one from the
/// other, never shared accumulators. Output order is emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Timestamp,
    pub sent: Option<Leg>,
    pub received: Option<Leg>,
    pub fee: Option<Leg>,
    pub net_worth: Option<Leg>,
    pub label: TxnLabel,
    pub description: String,
    pub reference: String,
}

impl Transaction {
    /// Create a transaction with no legs attached yet.
    pub fn new(
        date: Timestamp,
        label: TxnLabel,
        description: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Transaction {
            date,
            sent: None,
            received: None,
            fee: None,
            net_worth: None,
            label,
            description: description.into(),
            reference: reference.into(),
        }
    }

    pub fn with_sent(mut self, amount: Decimal, currency: Currency) -> Self {
        self.sent = Some(Leg::new(amount, currency));
        self
    }

    pub fn with_received(mut self, amount: Decimal, currency: Currency) -> Self {
        self.received = Some(Leg::new(amount, currency));
        self
    }

    pub fn with_fee(mut self, amount: Decimal, currency: Currency) -> Self {
        self.fee = Some(Leg::new(amount, currency));
        self
    }
}
