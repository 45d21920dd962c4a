//! Rendering of the transaction sequence into the fixed tabular layout.
//!
//! The collaborator owns file paths and I/O policy; this module only
//! writes rows to any `io::Write`.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Leg, Transaction};

/// Fixed output columns, in order.
pub const HEADERS: [&str; 12] = [
    "Date",
    "Sent Amount",
    "Sent Currency",
    "Received Amount",
    "Received Currency",
    "Fee Amount",
    "Fee Currency",
    "Net Worth Amount",
    "Net Worth Currency",
    "Label",
    "Description",
    "TxHash",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Sent Amount")]
    sent_amount: String,
    #[serde(rename = "Sent Currency")]
    sent_currency: String,
    #[serde(rename = "Received Amount")]
    received_amount: String,
    #[serde(rename = "Received Currency")]
    received_currency: String,
    #[serde(rename = "Fee Amount")]
    fee_amount: String,
    #[serde(rename = "Fee Currency")]
    fee_currency: String,
    #[serde(rename = "Net Worth Amount")]
    net_worth_amount: String,
    #[serde(rename = "Net Worth Currency")]
    net_worth_currency: String,
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "TxHash")]
    tx_hash: &'a str,
}

fn leg_columns(leg: &Option<Leg>) -> (String, String) {
    match leg {
        Some(leg) => (leg.amount.to_canonical_string(), leg.currency.to_string()),
        None => (String::new(), String::new()),
    }
}

impl<'a> Row<'a> {
    fn from_transaction(txn: &'a Transaction) -> Self {
        let (sent_amount, sent_currency) = leg_columns(&txn.sent);
        let (received_amount, received_currency) = leg_columns(&txn.received);
        let (fee_amount, fee_currency) = leg_columns(&txn.fee);
        let (net_worth_amount, net_worth_currency) = leg_columns(&txn.net_worth);
        Row {
            date: txn.date.to_ledger_string(),
            sent_amount,
            sent_currency,
            received_amount,
            received_currency,
            fee_amount,
            fee_currency,
            net_worth_amount,
            net_worth_currency,
            label: txn.label.as_str(),
            description: &txn.description,
            tx_hash: &txn.reference,
        }
    }
}

/// Write the ledger as CSV with the fixed column set, rows in input order.
pub fn write_ledger<W: Write>(writer: W, txns: &[Transaction]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for txn in txns {
        csv_writer.serialize(Row::from_transaction(txn))?;
    }
    csv_writer.flush()?;
    Ok(())
}
