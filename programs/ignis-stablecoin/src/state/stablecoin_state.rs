use anchor_lang::prelude::*;

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct StablecoinState {
    /// Ignis -> Ventura conversion ratio, fixed point with `PEG_DECIMALS`
    pub peg: u64,
    /// The Ignis mint
    pub mint: Pubkey,
    /// Custody account holding the program's own Ignis
    pub reserve: Pubkey,
    /// Operator allowed to mint and burn from custody
    pub reserve_wallet: Pubkey,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl StablecoinState {
    pub const LEN: usize = 8 + // discriminator
        8 + // peg
        32 + // mint
        32 + // reserve
        32 + // reserve_wallet
        1; // bump

    pub fn is_initialized(&self) -> bool {
        self.reserve_wallet != Pubkey::default()
    }
}
