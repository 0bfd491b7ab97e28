use anchor_lang::prelude::*;

#[constant]
pub const PROGRAM_AUTHORITY_SEED: &[u8] = b"program_authority";
#[constant]
pub const STABLECOIN_STATE_SEED: &[u8] = b"stablecoin_state";
#[constant]
pub const COIN_STATE_SEED: &[u8] = b"coin_state";
#[constant]
pub const IGNIS_MINT_SEED: &[u8] = b"ignis_mint";
#[constant]
pub const VENTURA_MINT_SEED: &[u8] = b"ventura_mint";
#[constant]
pub const RESERVE_SEED: &[u8] = b"reserve";

/// Decimal places of both the Ignis and Ventura mints
#[constant]
pub const ASSET_DECIMALS: u8 = 6;

/// Fixed-point precision of the stored peg
pub const PEG_DECIMALS: u32 = 6;
/// A peg of exactly 1.0
pub const PEG_ONE: u64 = 10u64.pow(PEG_DECIMALS);
