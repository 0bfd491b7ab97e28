use std::collections::HashMap;
use std::sync::Arc;

use anchor_lang::prelude::{Pubkey, Result};
use arbitrary::Arbitrary;
use ignis_stablecoin::engine::{
    check_initialize, AssetAccountStore, Holder, IssuanceEngine, MintLedger, ReserveRecord,
    Transition,
};
use ignis_stablecoin::error::IgnisError;
use ignis_stablecoin::{
    Asset, AssetConfig, CoinState, StablecoinState, COIN_STATE_SEED, IGNIS_MINT_SEED, PEG_ONE,
    PROGRAM_AUTHORITY_SEED, RESERVE_SEED, STABLECOIN_STATE_SEED, VENTURA_MINT_SEED,
};
use tokio::sync::Mutex;

pub mod chain;

// Custom error type for fuzzing
pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn fuzz_err(err: anchor_lang::error::Error) -> Box<dyn std::error::Error> {
    format!("{err}").into()
}

/// Records created by a successful initialize
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub stablecoin: StablecoinState,
    pub coin: CoinState,
    pub configs: [AssetConfig; 2],
}

/// In-memory asset-account store driven by the issuance engine.
///
/// Every operation asks the engine for a [`Transition`] first and only
/// touches balances once one comes back, so a rejected call leaves the
/// ledger exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryLedger {
    program_id: Pubkey,
    program_authority: Pubkey,
    deployment: Option<Deployment>,
    supplies: [u64; 2],
    balances: HashMap<(Asset, Holder), u64>,
}

impl AssetAccountStore for MemoryLedger {
    fn supply(&self, asset: Asset) -> u64 {
        self.supplies[asset.index()]
    }

    fn balance(&self, asset: Asset, holder: &Holder) -> u64 {
        self.balances.get(&(asset, *holder)).copied().unwrap_or(0)
    }
}

impl MemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        let (program_authority, _) = derive_program_authority_pda(&program_id);
        Self {
            program_id,
            program_authority,
            deployment: None,
            supplies: [0; 2],
            balances: HashMap::new(),
        }
    }

    pub fn program_authority(&self) -> Pubkey {
        self.program_authority
    }

    pub fn deployment(&self) -> Option<&Deployment> {
        self.deployment.as_ref()
    }

    pub fn peg(&self) -> Option<u64> {
        self.deployment.as_ref().map(|d| d.stablecoin.peg)
    }

    pub fn initialize(
        &mut self,
        caller: &Pubkey,
        reserve_wallet: &Pubkey,
        peg: Option<u64>,
    ) -> Result<()> {
        let peg = peg.unwrap_or(PEG_ONE);
        check_initialize(caller, reserve_wallet, self.deployment.is_some(), peg)?;

        let (ignis_mint, _) = derive_mint_pda(&self.program_id, Asset::Ignis);
        let (ventura_mint, _) = derive_mint_pda(&self.program_id, Asset::Ventura);
        let (_, stablecoin_bump) = derive_stablecoin_state_pda(&self.program_id);
        let (_, coin_bump) = derive_coin_state_pda(&self.program_id);
        let (ignis_reserve, _) = derive_reserve_pda(&self.program_id, &ignis_mint);
        let (ventura_reserve, _) = derive_reserve_pda(&self.program_id, &ventura_mint);

        self.deployment = Some(Deployment {
            stablecoin: StablecoinState {
                peg,
                mint: ignis_mint,
                reserve: ignis_reserve,
                reserve_wallet: *reserve_wallet,
                bump: stablecoin_bump,
            },
            coin: CoinState {
                mint: ventura_mint,
                reserve: ventura_reserve,
                reserve_wallet: *reserve_wallet,
                bump: coin_bump,
            },
            configs: [
                AssetConfig::new(Asset::Ignis, ignis_mint, self.program_authority),
                AssetConfig::new(Asset::Ventura, ventura_mint, self.program_authority),
            ],
        });
        for asset in Asset::ALL {
            self.balances.insert((asset, Holder::Custody), 0);
        }

        Ok(())
    }

    fn engine(&self) -> Result<IssuanceEngine<'_, Self>> {
        let deployment = self
            .deployment
            .as_ref()
            .ok_or(IgnisError::NotInitialized)?;
        IssuanceEngine::new(
            &deployment.stablecoin,
            &deployment.coin,
            self.program_authority,
            self,
        )
    }

    pub fn mint_to(
        &mut self,
        caller: &Pubkey,
        asset: Asset,
        amount: u64,
        destination: Holder,
    ) -> Result<()> {
        let transition = self.engine()?.mint_to(caller, asset, amount, destination)?;
        self.commit(transition);
        Ok(())
    }

    pub fn burn_reserve(&mut self, caller: &Pubkey, asset: Asset, amount: u64) -> Result<()> {
        let transition = self.engine()?.burn_reserve(caller, asset, amount)?;
        self.commit(transition);
        Ok(())
    }

    /// Returns the counter-asset amount paid to `payer`.
    pub fn redeem(
        &mut self,
        signer: &Pubkey,
        source: Asset,
        amount: u64,
        payer: &Pubkey,
    ) -> Result<u64> {
        let transition = self.engine()?.redeem(signer, source, amount, payer)?;
        self.commit(transition);
        Ok(transition.mint.map(|p| p.amount).unwrap_or(0))
    }

    pub fn quote_redeem(&self, source: Asset, amount: u64) -> Result<u64> {
        self.engine()?.quote_redeem(source, amount)
    }

    pub fn mint_ledger(&self, asset: Asset) -> MintLedger {
        MintLedger::observe(self, asset)
    }

    pub fn reserve_record(&self, asset: Asset) -> Result<ReserveRecord> {
        Ok(self.engine()?.reserve_record(asset))
    }

    pub fn balance_of(&self, asset: Asset, owner: &Pubkey) -> u64 {
        self.balance(asset, &Holder::Owner(*owner))
    }

    pub fn custodial_balance(&self, asset: Asset) -> u64 {
        self.balance(asset, &Holder::Custody)
    }

    fn commit(&mut self, transition: Transition) {
        if let Some(burn) = transition.burn {
            *self.balances.entry((burn.asset, burn.holder)).or_insert(0) -= burn.amount;
            self.supplies[burn.asset.index()] -= burn.amount;
        }
        if let Some(mint) = transition.mint {
            *self.balances.entry((mint.asset, mint.holder)).or_insert(0) += mint.amount;
            self.supplies[mint.asset.index()] += mint.amount;
        }
    }

    /// Supply equals the sum of balances, and custody never exceeds supply.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for asset in Asset::ALL {
            let held: u128 = self
                .balances
                .iter()
                .filter(|((a, _), _)| *a == asset)
                .map(|(_, amount)| *amount as u128)
                .sum();
            let supply = self.supply(asset);

            if held != supply as u128 {
                return Err(format!(
                    "{asset}: supply {supply} does not match the {held} held across accounts"
                ));
            }
            if self.custodial_balance(asset) > supply {
                return Err(format!(
                    "{asset}: custody {} exceeds supply {supply}",
                    self.custodial_balance(asset)
                ));
            }
        }
        Ok(())
    }
}

/// [`MemoryLedger`] behind an async mutex. Each operation holds the lock for
/// its whole validate-then-commit cycle, so concurrent callers serialise.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<MemoryLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: MemoryLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub async fn mint_to(
        &self,
        caller: Pubkey,
        asset: Asset,
        amount: u64,
        destination: Holder,
    ) -> Result<()> {
        self.inner
            .lock()
            .await
            .mint_to(&caller, asset, amount, destination)
    }

    pub async fn burn_reserve(&self, caller: Pubkey, asset: Asset, amount: u64) -> Result<()> {
        self.inner.lock().await.burn_reserve(&caller, asset, amount)
    }

    pub async fn redeem(
        &self,
        signer: Pubkey,
        source: Asset,
        amount: u64,
        payer: Pubkey,
    ) -> Result<u64> {
        self.inner
            .lock()
            .await
            .redeem(&signer, source, amount, &payer)
    }

    pub async fn snapshot(&self) -> MemoryLedger {
        self.inner.lock().await.clone()
    }
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Protocol-level identities
#[derive(Debug, Clone)]
pub struct ProtocolAccounts {
    pub program_id: Pubkey,
    pub program_authority: Pubkey,
    pub reserve_wallet: Pubkey,
}

/// Complete setup with all accounts
#[derive(Debug, Clone)]
pub struct CompleteSetup {
    pub protocol: ProtocolAccounts,
    pub user: Pubkey,
}

/// Creates an uninitialized ledger for the program
pub fn setup_ledger() -> MemoryLedger {
    MemoryLedger::new(ignis_stablecoin::id())
}

/// Initializes the protocol with a fresh reserve wallet
pub fn setup_protocol(
    ledger: &mut MemoryLedger,
    peg: Option<u64>,
) -> FuzzResult<ProtocolAccounts> {
    let reserve_wallet = Pubkey::new_unique();
    ledger
        .initialize(&reserve_wallet, &reserve_wallet, peg)
        .map_err(fuzz_err)?;

    Ok(ProtocolAccounts {
        program_id: ignis_stablecoin::id(),
        program_authority: ledger.program_authority(),
        reserve_wallet,
    })
}

/// Mints `amount` of `asset` straight to a user through the reserve wallet
pub fn mint_tokens_to_user(
    ledger: &mut MemoryLedger,
    protocol: &ProtocolAccounts,
    asset: Asset,
    user: &Pubkey,
    amount: u64,
) -> FuzzResult<()> {
    ledger
        .mint_to(&protocol.reserve_wallet, asset, amount, Holder::Owner(*user))
        .map_err(fuzz_err)
}

/// Sets up everything: protocol + one user holding `initial_ignis`
pub fn setup_complete_environment(
    initial_ignis: u64,
    peg: Option<u64>,
) -> FuzzResult<(MemoryLedger, CompleteSetup)> {
    let mut ledger = setup_ledger();
    let protocol = setup_protocol(&mut ledger, peg)?;
    let user = Pubkey::new_unique();

    if initial_ignis > 0 {
        mint_tokens_to_user(&mut ledger, &protocol, Asset::Ignis, &user, initial_ignis)?;
    }

    Ok((ledger, CompleteSetup { protocol, user }))
}

// ============================================================================
// PDA Derivation Helpers
// ============================================================================

/// Derive program authority PDA
pub fn derive_program_authority_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PROGRAM_AUTHORITY_SEED], program_id)
}

/// Derive stablecoin state PDA
pub fn derive_stablecoin_state_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STABLECOIN_STATE_SEED], program_id)
}

/// Derive coin state PDA
pub fn derive_coin_state_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COIN_STATE_SEED], program_id)
}

/// Derive the mint PDA of an asset
pub fn derive_mint_pda(program_id: &Pubkey, asset: Asset) -> (Pubkey, u8) {
    let seed = match asset {
        Asset::Ignis => IGNIS_MINT_SEED,
        Asset::Ventura => VENTURA_MINT_SEED,
    };
    Pubkey::find_program_address(&[seed], program_id)
}

/// Derive custody account PDA
pub fn derive_reserve_pda(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RESERVE_SEED, mint.as_ref()], program_id)
}

// ============================================================================
// Operation Sequences
// ============================================================================

/// One fuzzed call against an initialized ledger
#[derive(Debug, Clone, Arbitrary)]
pub enum FuzzOperation {
    MintTo {
        ignis: bool,
        amount: u64,
        to_custody: bool,
        user: u8,
    },
    BurnReserve {
        ignis: bool,
        amount: u64,
    },
    Redeem {
        ignis: bool,
        amount: u64,
        user: u8,
    },
    /// A stranger signing for the reserve wallet or for a user
    Impersonate {
        ignis: bool,
        amount: u64,
        user: u8,
    },
}

/// Fuzzable input: a peg and a sequence of calls
#[derive(Debug, Clone, Arbitrary)]
pub struct SequenceInput {
    /// Peg in millionths, zero falls back to 1.0
    pub peg: u32,
    pub operations: Vec<FuzzOperation>,
}

/// Outcome counts of one sequence
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceReport {
    pub accepted: usize,
    pub rejected: usize,
}

const USERS: usize = 4;

fn pick_asset(ignis: bool) -> Asset {
    if ignis {
        Asset::Ignis
    } else {
        Asset::Ventura
    }
}

/// Errors an operation may legitimately be rejected with
fn is_acceptable(err: &anchor_lang::error::Error) -> bool {
    [
        IgnisError::Unauthorized,
        IgnisError::InvalidAmount,
        IgnisError::InsufficientBalance,
        IgnisError::InsufficientReserve,
        IgnisError::Overflow,
        IgnisError::RedemptionBelowMinimum,
    ]
    .into_iter()
    .any(|kind| *err == kind.into())
}

/// Replays `input` and panics on the first broken property.
pub fn run_sequence(input: &SequenceInput) -> SequenceReport {
    let peg = match input.peg {
        0 => PEG_ONE,
        peg => peg as u64,
    };
    let mut ledger = setup_ledger();
    let protocol = match setup_protocol(&mut ledger, Some(peg)) {
        Ok(protocol) => protocol,
        Err(e) => panic!("Initialize rejected a valid peg {peg}: {e}"),
    };
    let users: Vec<Pubkey> = (0..USERS).map(|_| Pubkey::new_unique()).collect();
    let stranger = Pubkey::new_unique();
    let mut report = SequenceReport::default();

    for operation in &input.operations {
        let before = ledger.clone();

        let result = match *operation {
            FuzzOperation::MintTo {
                ignis,
                amount,
                to_custody,
                user,
            } => {
                let destination = if to_custody {
                    Holder::Custody
                } else {
                    Holder::Owner(users[user as usize % USERS])
                };
                ledger
                    .mint_to(&protocol.reserve_wallet, pick_asset(ignis), amount, destination)
                    .map(|_| 0)
            }
            FuzzOperation::BurnReserve { ignis, amount } => ledger
                .burn_reserve(&protocol.reserve_wallet, pick_asset(ignis), amount)
                .map(|_| 0),
            FuzzOperation::Redeem {
                ignis,
                amount,
                user,
            } => {
                let payer = users[user as usize % USERS];
                ledger.redeem(&payer, pick_asset(ignis), amount, &payer)
            }
            FuzzOperation::Impersonate {
                ignis,
                amount,
                user,
            } => {
                let payer = users[user as usize % USERS];
                let asset = pick_asset(ignis);
                let result = match user % 3 {
                    0 => ledger.mint_to(&stranger, asset, amount, Holder::Owner(stranger)),
                    1 => ledger.burn_reserve(&stranger, asset, amount),
                    _ => ledger.redeem(&stranger, asset, amount, &payer).map(|_| ()),
                };
                assert!(
                    result.is_err(),
                    "Stranger {stranger} got {operation:?} accepted"
                );
                result.map(|_| 0)
            }
        };

        match result {
            Ok(counter_amount) => {
                report.accepted += 1;
                check_accepted(&before, &ledger, operation, &users, counter_amount, peg);
            }
            Err(e) => {
                report.rejected += 1;
                assert!(
                    is_acceptable(&e),
                    "Unexpected error for {operation:?}: {e:?}"
                );
                assert_eq!(
                    before, ledger,
                    "Rejected {operation:?} ({e:?}) changed ledger state"
                );
            }
        }

        if let Err(violation) = ledger.check_invariants() {
            panic!("CRITICAL: invariant broken after {operation:?}: {violation}");
        }
    }

    report
}

fn check_accepted(
    before: &MemoryLedger,
    after: &MemoryLedger,
    operation: &FuzzOperation,
    users: &[Pubkey],
    counter_amount: u64,
    peg: u64,
) {
    match *operation {
        FuzzOperation::MintTo {
            ignis,
            amount,
            to_custody,
            ..
        } => {
            let asset = pick_asset(ignis);
            assert_eq!(
                after.supply(asset),
                before.supply(asset) + amount,
                "Supply should increase by exactly the minted amount"
            );
            if to_custody {
                assert_eq!(
                    after.custodial_balance(asset),
                    before.custodial_balance(asset) + amount,
                    "Custody should increase by exactly the minted amount"
                );
            }
        }
        FuzzOperation::BurnReserve { ignis, amount } => {
            let asset = pick_asset(ignis);
            assert_eq!(after.supply(asset), before.supply(asset) - amount);
            assert_eq!(
                after.custodial_balance(asset),
                before.custodial_balance(asset) - amount
            );
        }
        FuzzOperation::Redeem {
            ignis,
            amount,
            user,
        } => {
            let source = pick_asset(ignis);
            let counter = source.counter();
            let payer = users[user as usize % USERS];

            // MONOTONICITY: something non-zero always comes back
            assert!(counter_amount > 0, "Redeemed {amount} for nothing");

            assert_eq!(after.supply(source), before.supply(source) - amount);
            assert_eq!(after.supply(counter), before.supply(counter) + counter_amount);
            assert_eq!(
                after.balance_of(source, &payer),
                before.balance_of(source, &payer) - amount
            );
            assert_eq!(
                after.balance_of(counter, &payer),
                before.balance_of(counter, &payer) + counter_amount
            );

            // FAIRNESS: the payout is never worth more than what was burned
            let (paid, burned) = match source {
                Asset::Ignis => (
                    counter_amount as u128 * PEG_ONE as u128,
                    amount as u128 * peg as u128,
                ),
                Asset::Ventura => (
                    counter_amount as u128 * peg as u128,
                    amount as u128 * PEG_ONE as u128,
                ),
            };
            assert!(
                paid <= burned,
                "VULNERABILITY: redeem paid {paid} for {burned} (scaled by peg {peg})"
            );
        }
        FuzzOperation::Impersonate { .. } => {}
    }

    // Custody is untouched by anything but mint-to-custody and burn-reserve
    if let FuzzOperation::Redeem { .. } = operation {
        for asset in Asset::ALL {
            assert_eq!(after.custodial_balance(asset), before.custodial_balance(asset));
        }
    }
}
