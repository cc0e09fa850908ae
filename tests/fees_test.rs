//! Fee quotes for spends

mod common;

use common::{unspent, TestWallet};
use thresh_ledger::{LedgerError, SendFees};

fn funded(size: u64) -> TestWallet {
    let t = TestWallet::new(size);
    let addrs = t.with_addresses(1);
    t.wallet
        .ingest_unspents(
            &addrs[0],
            vec![unspent("a", 5000, true), unspent("b", 3000, false)],
        )
        .unwrap();
    t
}

#[test]
fn test_spend_all_is_clamped() {
    let t = funded(500);

    let quote = t.wallet.estimate_send_fees(8000, 1000).unwrap();
    assert_eq!(
        quote,
        SendFees {
            fees: 500,
            total_value: 8000,
            sendable_value: 7500
        }
    );
}

#[test]
fn test_partial_spend_is_not_clamped() {
    let t = funded(500);

    let quote = t.wallet.estimate_send_fees(4000, 1000).unwrap();
    assert_eq!(quote.fees, 500);
    assert_eq!(quote.sendable_value, 4000);
    assert_eq!(quote.total_value, 8000);
}

#[test]
fn test_estimator_sees_selected_inputs() {
    let t = funded(500);

    t.wallet.estimate_send_fees(4000, 1000).unwrap();
    t.wallet.estimate_send_fees(6000, 1000).unwrap();

    let calls = t.estimator.calls.lock().clone();
    assert_eq!(calls, vec![(1, 2), (2, 2)]);
}

#[test]
fn test_fee_rate_is_per_kilobyte() {
    let t = funded(250);

    let quote = t.wallet.estimate_send_fees(1000, 2000).unwrap();
    assert_eq!(quote.fees, 500);

    // Fractions of a satoshi are dropped
    let quote = t.wallet.estimate_send_fees(1000, 3).unwrap();
    assert_eq!(quote.fees, 0);
}

#[test]
fn test_fees_exceeding_balance() {
    let t = funded(10_000);

    let err = t.wallet.estimate_send_fees(1000, 1000).unwrap_err();
    assert_eq!(
        err,
        LedgerError::FeesExceedBalance {
            fees: 10_000,
            balance: 8000
        }
    );
}

#[test]
fn test_insufficient_funds_propagate() {
    let t = funded(500);

    let err = t.wallet.estimate_send_fees(8001, 1000).unwrap_err();
    assert!(err.is_insufficient());
    assert!(t.estimator.calls.lock().is_empty());
}
