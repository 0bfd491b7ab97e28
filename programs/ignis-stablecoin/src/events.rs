use anchor_lang::prelude::*;

use crate::state::Asset;

#[event]
pub struct Initialized {
    pub reserve_wallet: Pubkey,
    pub program_authority: Pubkey,
    pub ignis_mint: Pubkey,
    pub ventura_mint: Pubkey,
    pub peg: u64,
}

#[event]
pub struct Minted {
    pub asset: Asset,
    pub destination: Pubkey,
    pub to_custody: bool,
    pub amount: u64,
    pub total_supply: u64,
}

#[event]
pub struct ReserveBurned {
    pub asset: Asset,
    pub amount: u64,
    pub custodial_balance: u64,
    pub total_supply: u64,
}

#[event]
pub struct Redeemed {
    pub payer: Pubkey,
    pub source: Asset,
    pub amount: u64,
    pub counter_amount: u64,
    pub peg: u64,
}
