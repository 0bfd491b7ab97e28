//! Issuance state machine.
//!
//! Every operation validates against a read-only [`AssetAccountStore`] and
//! returns the [`Transition`] to apply. Nothing is written until every check
//! has passed, so a rejected operation leaves no trace.

pub mod records;
pub mod store;

pub use records::*;
pub use store::*;

use anchor_lang::prelude::*;

use crate::authority::{require_role, Role};
use crate::error::IgnisError;
use crate::math::peg;
use crate::state::{Asset, AssetRefs, CoinState, StablecoinState};

/// Checks that run before any issuance record is created.
pub fn check_initialize(
    caller: &Pubkey,
    reserve_wallet: &Pubkey,
    already_initialized: bool,
    peg: u64,
) -> Result<()> {
    require!(!already_initialized, IgnisError::AlreadyInitialized);
    require_role(caller, Role::ReserveWallet(reserve_wallet))?;
    check_peg(peg)
}

pub fn check_peg(peg: u64) -> Result<()> {
    require!(peg > 0, IgnisError::InvalidPeg);
    Ok(())
}

pub struct IssuanceEngine<'a, S> {
    stablecoin: &'a StablecoinState,
    coin: &'a CoinState,
    /// Owner of both custody accounts
    program_authority: Pubkey,
    store: &'a S,
}

impl<'a, S: AssetAccountStore> IssuanceEngine<'a, S> {
    pub fn new(
        stablecoin: &'a StablecoinState,
        coin: &'a CoinState,
        program_authority: Pubkey,
        store: &'a S,
    ) -> Result<Self> {
        require!(stablecoin.is_initialized(), IgnisError::NotInitialized);
        Ok(Self {
            stablecoin,
            coin,
            program_authority,
            store,
        })
    }

    pub fn refs(&self, asset: Asset) -> AssetRefs {
        AssetRefs::resolve(self.stablecoin, self.coin, asset)
    }

    pub fn peg(&self) -> u64 {
        self.stablecoin.peg
    }

    pub fn mint_ledger(&self, asset: Asset) -> MintLedger {
        MintLedger::observe(self.store, asset)
    }

    pub fn reserve_record(&self, asset: Asset) -> ReserveRecord {
        ReserveRecord::observe(self.store, &self.refs(asset))
    }

    pub fn mint_to(
        &self,
        caller: &Pubkey,
        asset: Asset,
        amount: u64,
        destination: Holder,
    ) -> Result<Transition> {
        require!(amount > 0, IgnisError::InvalidAmount);
        require_role(caller, Role::ReserveWallet(&self.refs(asset).reserve_wallet))?;
        // The program authority holds value only through the custody account
        if let Holder::Owner(owner) = destination {
            require_keys_neq!(owner, self.program_authority, IgnisError::InvalidCustodyAccount);
        }

        self.settle(Transition {
            burn: None,
            mint: Some(Posting {
                asset,
                holder: destination,
                amount,
            }),
        })
    }

    /// Burns from custody only. User balances are never touched here.
    pub fn burn_reserve(&self, caller: &Pubkey, asset: Asset, amount: u64) -> Result<Transition> {
        require!(amount > 0, IgnisError::InvalidAmount);
        require_role(caller, Role::ReserveWallet(&self.refs(asset).reserve_wallet))?;
        require!(
            self.reserve_record(asset).custodial_balance >= amount,
            IgnisError::InsufficientReserve
        );

        self.settle(Transition {
            burn: Some(Posting {
                asset,
                holder: Holder::Custody,
                amount,
            }),
            mint: None,
        })
    }

    /// Counter-asset amount paid for redeeming `amount` of `source`.
    pub fn quote_redeem(&self, source: Asset, amount: u64) -> Result<u64> {
        require!(amount > 0, IgnisError::InvalidAmount);
        let counter_amount = peg::convert(source, amount, self.peg())?;
        require!(counter_amount > 0, IgnisError::RedemptionBelowMinimum);
        Ok(counter_amount)
    }

    pub fn redeem(
        &self,
        signer: &Pubkey,
        source: Asset,
        amount: u64,
        payer: &Pubkey,
    ) -> Result<Transition> {
        require!(amount > 0, IgnisError::InvalidAmount);
        require_role(signer, Role::BalanceOwner(payer))?;

        let holder = Holder::Owner(*payer);
        require!(
            self.store.balance(source, &holder) >= amount,
            IgnisError::InsufficientBalance
        );
        let counter_amount = self.quote_redeem(source, amount)?;

        self.settle(Transition {
            burn: Some(Posting {
                asset: source,
                holder,
                amount,
            }),
            mint: Some(Posting {
                asset: source.counter(),
                holder,
                amount: counter_amount,
            }),
        })
    }

    /// Replays `transition` against the store and checks the post-state.
    fn settle(&self, transition: Transition) -> Result<Transition> {
        for asset in Asset::ALL {
            let mut ledger = self.mint_ledger(asset);
            let mut reserve = self.reserve_record(asset);

            if let Some(burn) = transition.burn.filter(|p| p.asset == asset) {
                let shortfall = match burn.holder {
                    Holder::Custody => IgnisError::InsufficientReserve,
                    Holder::Owner(_) => IgnisError::InsufficientBalance,
                };
                self.store
                    .balance(asset, &burn.holder)
                    .checked_sub(burn.amount)
                    .ok_or(shortfall)?;
                ledger = ledger.decreased(burn.amount)?;
                if burn.holder == Holder::Custody {
                    reserve.custodial_balance -= burn.amount;
                }
            }

            if let Some(mint) = transition.mint.filter(|p| p.asset == asset) {
                let balance = self
                    .store
                    .balance(asset, &mint.holder)
                    .checked_add(mint.amount)
                    .ok_or(IgnisError::Overflow)?;
                ledger = ledger.increased(mint.amount)?;
                if mint.holder == Holder::Custody {
                    reserve.custodial_balance = balance;
                }
            }

            reserve.check_against(&ledger)?;
        }

        Ok(transition)
    }
}
