use perpledger::{
    build_ledger, Config, Currency, Decimal, LedgerVariant, Market, Side, Timestamp, TradeRecord,
    TxnLabel,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn trade_with_fee(
    side: Side,
    size: &str,
    price: &str,
    fee: &str,
    unix: i64,
    id: &str,
) -> TradeRecord {
    TradeRecord::new(
        Market::new("ETH-USD"),
        side,
        d(size),
        d(price),
        d(fee),
        Timestamp::from_unix(unix),
        Some(id.to_string()),
    )
    .unwrap()
}

fn trade(side: Side, size: &str, price: &str, unix: i64, id: &str) -> TradeRecord {
    trade_with_fee(side, size, price, "0", unix, id)
}

fn margin_verbose() -> Config {
    Config {
        verbose: true,
        variant: LedgerVariant::Margin,
        ..Config::default()
    }
}

#[test]
fn long_lifecycle_emits_borrow_trade_repay_gain_offset() {
    let trades = vec![
        trade(Side::Buy, "10", "100", 1000, "a"),
        trade(Side::Sell, "10", "120", 2000, "b"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let labels: Vec<_> = txns.iter().map(|t| t.label).collect();
    assert_eq!(
        labels,
        vec![
            TxnLabel::MarginLoan,       // borrow enabling the open
            TxnLabel::TradeBuy,
            TxnLabel::TradeSell,
            TxnLabel::MarginRepayment,  // aggregated loan repayment
            TxnLabel::RealizedGain,
            TxnLabel::MarginRepayment,  // profit pays down the loan
        ]
    );

    // Borrow one second before the trade it enables, repay one second
    // after the close.
    assert_eq!(txns[0].date, Timestamp::from_unix(999));
    assert_eq!(txns[0].received.as_ref().unwrap().amount, d("1000"));
    assert_eq!(txns[0].received.as_ref().unwrap().currency, Currency::new("USDC"));
    assert_eq!(txns[3].date, Timestamp::from_unix(2001));
    assert_eq!(txns[3].sent.as_ref().unwrap().amount, d("1000"));

    assert_eq!(txns[4].received.as_ref().unwrap().amount, d("200"));
    assert_eq!(txns[5].sent.as_ref().unwrap().amount, d("200"));
}

#[test]
fn repayment_covers_every_borrow_issued_while_open() {
    let trades = vec![
        trade(Side::Buy, "10", "100", 1000, "a"),
        trade(Side::Buy, "5", "110", 2000, "b"),
        trade(Side::Sell, "15", "120", 3000, "c"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let borrowed: Decimal = txns
        .iter()
        .filter(|t| t.label == TxnLabel::MarginLoan)
        .map(|t| t.received.as_ref().unwrap().amount)
        .sum();
    assert_eq!(borrowed, d("1550"));

    let repay = txns
        .iter()
        .find(|t| t.label == TxnLabel::MarginRepayment && t.reference.ends_with(":repay"))
        .expect("aggregated repayment row");
    assert_eq!(repay.sent.as_ref().unwrap().amount, borrowed);
}

#[test]
fn short_borrows_base_currency() {
    let trades = vec![
        trade(Side::Sell, "10", "100", 1000, "a"),
        trade(Side::Buy, "10", "80", 2000, "b"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let borrow = &txns[0];
    assert_eq!(borrow.label, TxnLabel::MarginLoan);
    assert_eq!(borrow.received.as_ref().unwrap().amount, d("10"));
    assert_eq!(borrow.received.as_ref().unwrap().currency, Currency::new("ETH"));

    let repay = txns
        .iter()
        .find(|t| t.reference.ends_with(":repay"))
        .unwrap();
    assert_eq!(repay.sent.as_ref().unwrap().amount, d("10"));
    assert_eq!(repay.sent.as_ref().unwrap().currency, Currency::new("ETH"));
}

#[test]
fn loss_is_added_to_the_loan_balance() {
    let trades = vec![
        trade(Side::Buy, "10", "100", 1000, "a"),
        trade(Side::Sell, "10", "90", 2000, "b"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let gain = txns
        .iter()
        .find(|t| t.label == TxnLabel::RealizedGain)
        .unwrap();
    assert_eq!(gain.sent.as_ref().unwrap().amount, d("100"));

    let offset = txns
        .iter()
        .find(|t| t.reference.ends_with(":offset"))
        .unwrap();
    assert_eq!(offset.label, TxnLabel::MarginLoan);
    assert_eq!(offset.received.as_ref().unwrap().amount, d("100"));
}

#[test]
fn margin_gain_is_net_of_accumulated_fees() {
    let trades = vec![
        trade_with_fee(Side::Buy, "10", "100", "0.5", 1000, "a"),
        trade_with_fee(Side::Sell, "10", "120", "0.5", 2000, "b"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let gain = txns
        .iter()
        .find(|t| t.label == TxnLabel::RealizedGain)
        .unwrap();
    assert_eq!(gain.received.as_ref().unwrap().amount, d("199"));
}

#[test]
fn reversal_repays_old_loan_and_borrows_for_new_direction() {
    let trades = vec![
        trade(Side::Buy, "10", "100", 1000, "a"),
        trade(Side::Sell, "15", "120", 2000, "b"),
    ];
    let txns = build_ledger(trades, &margin_verbose());

    let labels: Vec<_> = txns.iter().map(|t| t.label).collect();
    assert_eq!(
        labels,
        vec![
            TxnLabel::MarginLoan,       // 1000 USDC for the long
            TxnLabel::TradeBuy,
            TxnLabel::TradeSell,        // closing half at t-1
            TxnLabel::MarginRepayment,  // repay 1000 USDC
            TxnLabel::RealizedGain,     // 200
            TxnLabel::MarginRepayment,  // profit offset
            TxnLabel::MarginLoan,       // 5 ETH for the new short
            TxnLabel::TradeSell,        // opening half at t
        ]
    );

    let short_borrow = &txns[6];
    assert_eq!(short_borrow.received.as_ref().unwrap().amount, d("5"));
    assert_eq!(
        short_borrow.received.as_ref().unwrap().currency,
        Currency::new("ETH")
    );

    // The close-side rows precede the open-side rows in emitted order
    // and the closing fill precedes the opening fill in time.
    assert_eq!(txns[2].date, Timestamp::from_unix(1999));
    assert_eq!(txns[7].date, Timestamp::from_unix(2000));
}

#[test]
fn non_verbose_margin_ledger_keeps_only_gains() {
    let trades = vec![
        trade(Side::Buy, "10", "100", 1000, "a"),
        trade(Side::Sell, "10", "120", 2000, "b"),
    ];
    let config = Config {
        variant: LedgerVariant::Margin,
        ..Config::default()
    };
    let txns = build_ledger(trades, &config);

    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].label, TxnLabel::RealizedGain);
    assert_eq!(txns[0].received.as_ref().unwrap().amount, d("200"));
}
