use anchor_lang::prelude::*;
use anchor_spl::token_interface::{mint_to, Mint, MintTo, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::engine::{Holder, IssuanceEngine, Snapshot};
use crate::error::IgnisError;
use crate::events::Minted;
use crate::state::{Asset, AssetRefs, CoinState, ProgramAuthority, StablecoinState};

#[derive(Accounts)]
pub struct MintToAsset<'info> {
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
        token::mint = mint,
        token::authority = program_authority,
        token::token_program = token_program,
    )]
    pub reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody account or any user account of the selected asset
    #[account(
        mut,
        token::mint = mint,
        token::token_program = token_program,
    )]
    pub destination: InterfaceAccount<'info, TokenAccount>,

    #[account(
        seeds = [PROGRAM_AUTHORITY_SEED],
        bump = program_authority.bump
    )]
    pub program_authority: Account<'info, ProgramAuthority>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<MintToAsset>, asset: Asset, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let refs = AssetRefs::resolve(&accounts.stablecoin_state, &accounts.coin_state, asset);

    require_keys_eq!(accounts.mint.key(), refs.mint, IgnisError::AssetMismatch);
    require_keys_eq!(accounts.reserve.key(), refs.reserve, IgnisError::AssetMismatch);

    let destination = if accounts.destination.key() == accounts.reserve.key() {
        Holder::Custody
    } else {
        Holder::Owner(accounts.destination.owner)
    };

    let store = Snapshot::default()
        .with_supply(asset, accounts.mint.supply)
        .with_balance(asset, Holder::Custody, accounts.reserve.amount)
        .with_balance(asset, destination, accounts.destination.amount);
    let engine = IssuanceEngine::new(
        &accounts.stablecoin_state,
        &accounts.coin_state,
        accounts.program_authority.key(),
        &store,
    )?;
    let transition = engine.mint_to(&accounts.reserve_wallet.key(), asset, amount, destination)?;
    let posting = transition.mint.ok_or(IgnisError::InvariantViolation)?;

    let authority_seeds = accounts.program_authority.signer_seeds();
    let signer_seeds = &[&authority_seeds[..]];

    let mint_accounts = MintTo {
        mint: accounts.mint.to_account_info(),
        to: accounts.destination.to_account_info(),
        authority: accounts.program_authority.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        mint_accounts,
        signer_seeds,
    );

    mint_to(cpi_ctx, posting.amount)?;

    let total_supply = accounts.mint.supply + posting.amount;

    msg!("Mint successful!");
    msg!("Asset: {}", asset);
    msg!("Minted: {} to {}", posting.amount, accounts.destination.key());
    msg!("Total supply: {}", total_supply);
    if destination == Holder::Custody {
        msg!("Custodial balance: {}", accounts.destination.amount + posting.amount);
    }

    emit!(Minted {
        asset,
        destination: accounts.destination.key(),
        to_custody: destination == Holder::Custody,
        amount: posting.amount,
        total_supply,
    });

    Ok(())
}
