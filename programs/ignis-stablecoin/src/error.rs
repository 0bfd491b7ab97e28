use anchor_lang::prelude::*;

#[error_code]
pub enum IgnisError {
    #[msg("Issuance records already exist")]
    AlreadyInitialized,
    #[msg("Issuance records have not been created")]
    NotInitialized,
    #[msg("Caller does not hold the required authority")]
    Unauthorized,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Payer balance is lower than the requested amount")]
    InsufficientBalance,
    #[msg("Custodial balance is lower than the requested amount")]
    InsufficientReserve,
    #[msg("Supply or balance would exceed the representable range")]
    Overflow,
    #[msg("Redeemed amount converts to zero units of the counter asset")]
    RedemptionBelowMinimum,
    #[msg("Peg must be greater than zero")]
    InvalidPeg,
    #[msg("Account does not belong to the selected asset")]
    AssetMismatch,
    #[msg("Account is owned by the program authority but is not the recorded custody account")]
    InvalidCustodyAccount,
    #[msg("Ledger invariant violated")]
    InvariantViolation,
}
