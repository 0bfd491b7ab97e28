pub mod authority;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("Bou8TKf8G9iJQoZMptYtFHrpgvEjG4DTTXo8sxShLsht");

#[program]
pub mod ignis_stablecoin {
    use super::*;

    /// Creates both mints, both custody accounts and the state records.
    /// `peg` defaults to 1.0.
    pub fn initialize(ctx: Context<Initialize>, peg: Option<u64>) -> Result<()> {
        initialize::handler(ctx, peg)
    }

    pub fn mint_to(ctx: Context<MintToAsset>, asset: Asset, amount: u64) -> Result<()> {
        mint_to::handler(ctx, asset, amount)
    }

    pub fn burn_reserve(ctx: Context<BurnReserve>, asset: Asset, amount: u64) -> Result<()> {
        burn_reserve::handler(ctx, asset, amount)
    }

    pub fn redeem(ctx: Context<Redeem>, source: Asset, amount: u64) -> Result<()> {
        redeem::handler(ctx, source, amount)
    }
}
