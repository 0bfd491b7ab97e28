use anchor_lang::prelude::*;
use anchor_spl::token_interface::{burn, Burn, Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::engine::{Holder, IssuanceEngine, Snapshot};
use crate::error::IgnisError;
use crate::events::ReserveBurned;
use crate::state::{Asset, AssetRefs, CoinState, ProgramAuthority, StablecoinState};

#[derive(Accounts)]
pub struct BurnReserve<'info> {
    pub reserve_wallet: Signer<'info>,

    #[account(
        seeds = [STABLECOIN_STATE_SEED],
        bump = stablecoin_state.bump,
    )]
    pub stablecoin_state: Account<'info, StablecoinState>,

    #[account(
        seeds = [COIN_STATE_SEED],
        bump = coin_state.bump,
    )]
    pub coin_state: Account<'info, CoinState>,

    /// Mint of the selected asset
    #[account(mut)]
    pub mint: InterfaceAccount<'info, Mint>,

    /// The program's custody account for the selected asset
    #[account(
        mut,
        token::mint = mint,
        token::authority = program_authority,
        token::token_program = token_program,
    )]
    pub reserve: InterfaceAccount<'info, TokenAccount>,

    #[account(
        seeds = [PROGRAM_AUTHORITY_SEED],
        bump = program_authority.bump
    )]
    pub program_authority: Account<'info, ProgramAuthority>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<BurnReserve>, asset: Asset, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let refs = AssetRefs::resolve(&accounts.stablecoin_state, &accounts.coin_state, asset);

    require_keys_eq!(accounts.mint.key(), refs.mint, IgnisError::AssetMismatch);
    require_keys_eq!(accounts.reserve.key(), refs.reserve, IgnisError::AssetMismatch);

    let store = Snapshot::default()
        .with_supply(asset, accounts.mint.supply)
        .with_balance(asset, Holder::Custody, accounts.reserve.amount);
    let engine = IssuanceEngine::new(
        &accounts.stablecoin_state,
        &accounts.coin_state,
        accounts.program_authority.key(),
        &store,
    )?;
    let transition = engine.burn_reserve(&accounts.reserve_wallet.key(), asset, amount)?;
    let posting = transition.burn.ok_or(IgnisError::InvariantViolation)?;

    let authority_seeds = accounts.program_authority.signer_seeds();
    let signer_seeds = &[&authority_seeds[..]];

    let burn_accounts = Burn {
        mint: accounts.mint.to_account_info(),
        from: accounts.reserve.to_account_info(),
        authority: accounts.program_authority.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        burn_accounts,
        signer_seeds,
    );

    burn(cpi_ctx, posting.amount)?;

    let custodial_balance = accounts.reserve.amount - posting.amount;
    let total_supply = accounts.mint.supply - posting.amount;

    msg!("Reserve burn successful!");
    msg!("Asset: {}", asset);
    msg!("Burned: {}", posting.amount);
    msg!("Custodial balance: {}", custodial_balance);
    msg!("Total supply: {}", total_supply);

    emit!(ReserveBurned {
        asset,
        amount: posting.amount,
        custodial_balance,
        total_supply,
    });

    Ok(())
}
