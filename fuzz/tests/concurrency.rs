use fuzz_helpers::*;
use ignis_stablecoin::engine::Holder;
use ignis_stablecoin::error::IgnisError;
use ignis_stablecoin::Asset;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redeems_on_one_payer_never_double_spend() {
    let (ledger, setup) = setup_complete_environment(10, None).unwrap();
    let shared = SharedLedger::new(ledger);

    // 16 redeems of 3 against a balance of 10: exactly 3 can succeed
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let shared = shared.clone();
            let user = setup.user;
            tokio::spawn(async move { shared.redeem(user, Asset::Ignis, 3, user).await })
        })
        .collect();

    let mut succeeded = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(received) => {
                assert_eq!(received, 3);
                succeeded += 1;
            }
            Err(e) => assert_eq!(e, IgnisError::InsufficientBalance.into()),
        }
    }

    let ledger = shared.snapshot().await;
    assert_eq!(succeeded, 3);
    assert_eq!(ledger.balance_of(Asset::Ignis, &setup.user), 1);
    assert_eq!(ledger.balance_of(Asset::Ventura, &setup.user), 9);
    ledger.check_invariants().unwrap();
}

#[tokio::test]
async fn independent_assets_mint_and_burn_in_any_order() {
    let mut ledger = setup_ledger();
    let protocol = setup_protocol(&mut ledger, None).unwrap();
    let shared = SharedLedger::new(ledger);
    let wallet = protocol.reserve_wallet;

    let ignis = {
        let shared = shared.clone();
        tokio::spawn(async move {
            for _ in 0..10 {
                shared.mint_to(wallet, Asset::Ignis, 5, Holder::Custody).await?;
                shared.burn_reserve(wallet, Asset::Ignis, 2).await?;
            }
            anchor_lang::Result::Ok(())
        })
    };
    let ventura = {
        let shared = shared.clone();
        tokio::spawn(async move {
            for _ in 0..10 {
                shared.mint_to(wallet, Asset::Ventura, 7, Holder::Custody).await?;
            }
            shared.burn_reserve(wallet, Asset::Ventura, 70).await
        })
    };

    ignis.await.unwrap().unwrap();
    ventura.await.unwrap().unwrap();

    let ledger = shared.snapshot().await;
    assert_eq!(ledger.mint_ledger(Asset::Ignis).total_supply, 30);
    assert_eq!(ledger.custodial_balance(Asset::Ignis), 30);
    assert_eq!(ledger.mint_ledger(Asset::Ventura).total_supply, 0);
    ledger.check_invariants().unwrap();
}
