use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::ASSET_DECIMALS;
use crate::state::{CoinState, StablecoinState};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Primary asset, carries the peg
    Ignis,
    /// Redemption counter-asset
    Ventura,
}

impl Asset {
    pub const ALL: [Asset; 2] = [Asset::Ignis, Asset::Ventura];

    /// The asset a redemption of `self` pays out in
    pub fn counter(self) -> Asset {
        match self {
            Asset::Ignis => Asset::Ventura,
            Asset::Ventura => Asset::Ignis,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Asset::Ignis => 0,
            Asset::Ventura => 1,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Ignis => f.write_str("Ignis"),
            Asset::Ventura => f.write_str("Ventura"),
        }
    }
}

/// Mint parameters fixed at initialization. On chain these live in the SPL
/// mint account itself; only the supply changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetConfig {
    pub asset: Asset,
    pub mint: Pubkey,
    pub decimals: u8,
    pub mint_authority: Pubkey,
    pub freeze_authority: Pubkey,
}

impl AssetConfig {
    pub fn new(asset: Asset, mint: Pubkey, signing_identity: Pubkey) -> Self {
        Self {
            asset,
            mint,
            decimals: ASSET_DECIMALS,
            mint_authority: signing_identity,
            freeze_authority: signing_identity,
        }
    }
}

/// Accounts recorded for one asset, read from whichever state record owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetRefs {
    pub asset: Asset,
    pub mint: Pubkey,
    pub reserve: Pubkey,
    pub reserve_wallet: Pubkey,
}

impl AssetRefs {
    pub fn resolve(stablecoin: &StablecoinState, coin: &CoinState, asset: Asset) -> Self {
        match asset {
            Asset::Ignis => Self {
                asset,
                mint: stablecoin.mint,
                reserve: stablecoin.reserve,
                reserve_wallet: stablecoin.reserve_wallet,
            },
            Asset::Ventura => Self {
                asset,
                mint: coin.mint,
                reserve: coin.reserve,
                reserve_wallet: coin.reserve_wallet,
            },
        }
    }
}
