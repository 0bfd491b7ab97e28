use anchor_lang::prelude::*;

use crate::constants::PROGRAM_AUTHORITY_SEED;

/// Program-controlled signing identity.
///
/// Mint and freeze authority of both assets and owner of both custody
/// accounts. It has no private key; the program signs for it with
/// [`ProgramAuthority::signer_seeds`].
#[account]
pub struct ProgramAuthority {
    pub bump: u8,
}

impl ProgramAuthority {
    pub const LEN: usize = 8 + // discriminator
        1; // bump

    /// `[PROGRAM_AUTHORITY_SEED, bump]`, for `CpiContext::new_with_signer`
    pub fn signer_seeds(&self) -> [&[u8]; 2] {
        [PROGRAM_AUTHORITY_SEED, std::slice::from_ref(&self.bump)]
    }
}
