use anchor_lang::prelude::*;

use crate::error::IgnisError;

/// Capability a caller must hold for an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role<'a> {
    /// The privileged operator recorded for an asset
    ReserveWallet(&'a Pubkey),
    /// The owner of the balance being spent
    BalanceOwner(&'a Pubkey),
}

/// Rejects `caller` unless it holds `role`.
///
/// On chain `caller` is always a transaction signer, so a key match here is
/// proof of control.
pub fn require_role(caller: &Pubkey, role: Role<'_>) -> Result<()> {
    let expected = match role {
        Role::ReserveWallet(wallet) => wallet,
        Role::BalanceOwner(owner) => owner,
    };

    require!(
        *expected != Pubkey::default() && caller == expected,
        IgnisError::Unauthorized
    );

    Ok(())
}
