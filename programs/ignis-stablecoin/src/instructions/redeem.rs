use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, mint_to, Burn, Mint, MintTo, TokenAccount, TokenInterface,
};

use crate::constants::*;
use crate::engine::{Holder, IssuanceEngine, Snapshot};
use crate::error::IgnisError;
use crate::events::Redeemed;
use crate::state::{Asset, AssetRefs, CoinState, ProgramAuthority, StablecoinState};

#[derive(Accounts)]
pub struct Redeem<'info> {
    pub payer: Signer<'info>,

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

    /// Mint of the asset being redeemed
    #[account(mut)]
    pub source_mint: InterfaceAccount<'info, Mint>,

    /// Mint of the asset paid out
    #[account(mut)]
    pub counter_mint: InterfaceAccount<'info, Mint>,

    /// Custody account of the asset being redeemed
    #[account(
        token::mint = source_mint,
        token::authority = program_authority,
        token::token_program = token_program,
    )]
    pub source_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody account of the asset paid out
    #[account(
        token::mint = counter_mint,
        token::authority = program_authority,
        token::token_program = token_program,
    )]
    pub counter_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The payer's account being burned from
    #[account(
        mut,
        token::mint = source_mint,
        token::authority = payer,
        token::token_program = token_program,
    )]
    pub payer_source_account: InterfaceAccount<'info, TokenAccount>,

    /// The payer's account receiving the counter asset
    #[account(
        mut,
        token::mint = counter_mint,
        token::authority = payer,
        token::token_program = token_program,
    )]
    pub payer_counter_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        seeds = [PROGRAM_AUTHORITY_SEED],
        bump = program_authority.bump
    )]
    pub program_authority: Account<'info, ProgramAuthority>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Redeem>, source: Asset, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let counter = source.counter();
    let source_refs = AssetRefs::resolve(&accounts.stablecoin_state, &accounts.coin_state, source);
    let counter_refs =
        AssetRefs::resolve(&accounts.stablecoin_state, &accounts.coin_state, counter);

    require_keys_eq!(accounts.source_mint.key(), source_refs.mint, IgnisError::AssetMismatch);
    require_keys_eq!(accounts.counter_mint.key(), counter_refs.mint, IgnisError::AssetMismatch);
    require_keys_eq!(
        accounts.source_reserve.key(),
        source_refs.reserve,
        IgnisError::AssetMismatch
    );
    require_keys_eq!(
        accounts.counter_reserve.key(),
        counter_refs.reserve,
        IgnisError::AssetMismatch
    );

    let payer = accounts.payer_source_account.owner;
    let holder = Holder::Owner(payer);
    let store = Snapshot::default()
        .with_supply(source, accounts.source_mint.supply)
        .with_supply(counter, accounts.counter_mint.supply)
        .with_balance(source, Holder::Custody, accounts.source_reserve.amount)
        .with_balance(counter, Holder::Custody, accounts.counter_reserve.amount)
        .with_balance(source, holder, accounts.payer_source_account.amount)
        .with_balance(counter, holder, accounts.payer_counter_account.amount);
    let engine = IssuanceEngine::new(
        &accounts.stablecoin_state,
        &accounts.coin_state,
        accounts.program_authority.key(),
        &store,
    )?;
    let transition = engine.redeem(&accounts.payer.key(), source, amount, &payer)?;
    let burned = transition.burn.ok_or(IgnisError::InvariantViolation)?;
    let minted = transition.mint.ok_or(IgnisError::InvariantViolation)?;

    // Burn the redeemed asset from the payer
    let burn_accounts = Burn {
        mint: accounts.source_mint.to_account_info(),
        from: accounts.payer_source_account.to_account_info(),
        authority: accounts.payer.to_account_info(),
    };

    let cpi_ctx = CpiContext::new(accounts.token_program.to_account_info(), burn_accounts);

    burn(cpi_ctx, burned.amount)?;

    // Pay out the counter asset at the peg
    let authority_seeds = accounts.program_authority.signer_seeds();
    let signer_seeds = &[&authority_seeds[..]];

    let mint_accounts = MintTo {
        mint: accounts.counter_mint.to_account_info(),
        to: accounts.payer_counter_account.to_account_info(),
        authority: accounts.program_authority.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        mint_accounts,
        signer_seeds,
    );

    mint_to(cpi_ctx, minted.amount)?;

    msg!("Redeem successful!");
    msg!("Redeemed: {} {}", burned.amount, source);
    msg!("Received: {} {}", minted.amount, counter);
    msg!("{} supply: {}", source, accounts.source_mint.supply - burned.amount);
    msg!("{} supply: {}", counter, accounts.counter_mint.supply + minted.amount);

    emit!(Redeemed {
        payer,
        source,
        amount: burned.amount,
        counter_amount: minted.amount,
        peg: engine.peg(),
    });

    Ok(())
}
