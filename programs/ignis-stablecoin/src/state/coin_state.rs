use anchor_lang::prelude::*;

/// Ventura side of the pair. Carries no peg of its own; Ventura is valued
/// through the peg stored in [`crate::StablecoinState`].
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct CoinState {
    /// The Ventura mint
    pub mint: Pubkey,
    /// Custody account holding the program's own Ventura
    pub reserve: Pubkey,
    /// Operator allowed to mint and burn from custody
    pub reserve_wallet: Pubkey,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl CoinState {
    pub const LEN: usize = 8 + // discriminator
        32 + // mint
        32 + // reserve
        32 + // reserve_wallet
        1; // bump
}
