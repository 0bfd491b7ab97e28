use anchor_lang::prelude::*;

use crate::state::Asset;

/// Whose balance a posting touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Holder {
    /// The custody account owned by the program authority
    Custody,
    /// The account of an external owner
    Owner(Pubkey),
}

/// Read side of the per-owner balance store.
///
/// Writes never go through this trait: the engine hands back a
/// [`Transition`] and the caller applies its postings.
pub trait AssetAccountStore {
    fn supply(&self, asset: Asset) -> u64;

    /// Balance of `holder`, zero for an account the store has never seen
    fn balance(&self, asset: Asset, holder: &Holder) -> u64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
    pub asset: Asset,
    pub holder: Holder,
    pub amount: u64,
}

/// Validated effect of one operation.
///
/// `burn` removes `amount` from both the holder and the supply, `mint` adds
/// it to both. Apply the burn first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub burn: Option<Posting>,
    pub mint: Option<Posting>,
}

/// Supplies and balances loaded from an instruction's accounts.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    supplies: [u64; 2],
    balances: Vec<(Asset, Holder, u64)>,
}

impl Snapshot {
    pub fn with_supply(mut self, asset: Asset, supply: u64) -> Self {
        self.supplies[asset.index()] = supply;
        self
    }

    pub fn with_balance(mut self, asset: Asset, holder: Holder, amount: u64) -> Self {
        self.balances.retain(|(a, h, _)| !(*a == asset && *h == holder));
        self.balances.push((asset, holder, amount));
        self
    }
}

impl AssetAccountStore for Snapshot {
    fn supply(&self, asset: Asset) -> u64 {
        self.supplies[asset.index()]
    }

    fn balance(&self, asset: Asset, holder: &Holder) -> u64 {
        self.balances
            .iter()
            .find(|(a, h, _)| *a == asset && h == holder)
            .map(|(_, _, amount)| *amount)
            .unwrap_or(0)
    }
}
