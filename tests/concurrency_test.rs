//! Concurrent address creation, ingestion and reads

mod common;

use std::collections::HashSet;
use std::thread;

use common::{unspent, TestWallet};
use thresh_ledger::AddressKind;

#[test]
fn test_concurrent_creation_hands_out_unique_positions() {
    let t = TestWallet::new(500);
    let threads = 8;
    let per_thread = 25;

    let created: Vec<(u32, String)> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    (0..per_thread)
                        .map(|_| {
                            let snapshot = t.wallet.create_address(AddressKind::P2wsh).unwrap();
                            (snapshot.pos, snapshot.address)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let total = threads * per_thread;
    let positions: HashSet<u32> = created.iter().map(|(pos, _)| *pos).collect();
    let expected: HashSet<u32> = (0..total as u32).collect();
    assert_eq!(positions, expected);

    for (pos, address) in &created {
        assert_eq!(address, &format!("addr-p2wsh-{}", pos));
    }
    assert_eq!(t.wallet.last_pos(), total as u32);
    assert_eq!(t.wallet.list_addresses().len(), total);
}

#[test]
fn test_reads_never_see_torn_balances() {
    let t = TestWallet::new(500);
    let addrs = t.with_addresses(2);

    // Every snapshot written holds 10_000 sats in total, 4_000 unconfirmed
    let snapshot = |round: u64| {
        vec![
            unspent(&format!("c{}", round), 6_000, true),
            unspent(&format!("u{}", round), 4_000, false),
        ]
    };
    t.wallet.ingest_unspents(&addrs[0], snapshot(0)).unwrap();
    t.wallet.ingest_unspents(&addrs[1], snapshot(0)).unwrap();

    thread::scope(|s| {
        for addr in &addrs {
            let wallet = &t.wallet;
            s.spawn(move || {
                for round in 1..200 {
                    wallet.ingest_unspents(addr, snapshot(round)).unwrap();
                }
            });
        }

        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let balance = t.wallet.balance();
                    assert_eq!(balance.total, 20_000);
                    assert_eq!(balance.unconfirmed, 8_000);

                    for view in t.wallet.addresses() {
                        let sum: u64 = view.unspents.iter().map(|u| u.value).sum();
                        assert_eq!(view.balance.total, sum);
                        assert_eq!(view.unspents.len(), 2);
                    }
                }
            });
        }
    });
}

#[test]
fn test_selection_during_creation() {
    let t = TestWallet::new(500);
    let addrs = t.with_addresses(1);
    t.wallet
        .ingest_unspents(&addrs[0], vec![unspent("a", 5000, true)])
        .unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..50 {
                t.wallet.create_default_address().unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                let selected = t.wallet.select_unspents(4000).unwrap();
                assert_eq!(selected.len(), 1);
                let quote = t.wallet.estimate_send_fees(4000, 1000).unwrap();
                assert_eq!(quote.total_value, 5000);
            }
        });
    });

    assert_eq!(t.wallet.last_pos(), 51);
}
