use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::engine::check_peg;
use crate::error::IgnisError;
use crate::events::Initialized;
use crate::state::{Asset, AssetConfig, CoinState, ProgramAuthority, StablecoinState};

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The privileged operator; pays for every record created here
    #[account(mut)]
    pub reserve_wallet: Signer<'info>,

    /// The signing identity used as mint, freeze and custody authority
    #[account(
        init,
        payer = reserve_wallet,
        space = ProgramAuthority::LEN,
        seeds = [PROGRAM_AUTHORITY_SEED],
        bump
    )]
    pub program_authority: Account<'info, ProgramAuthority>,

    #[account(
        init,
        payer = reserve_wallet,
        space = StablecoinState::LEN,
        seeds = [STABLECOIN_STATE_SEED],
        bump
    )]
    pub stablecoin_state: Account<'info, StablecoinState>,

    #[account(
        init,
        payer = reserve_wallet,
        space = CoinState::LEN,
        seeds = [COIN_STATE_SEED],
        bump
    )]
    pub coin_state: Account<'info, CoinState>,

    #[account(
        init,
        payer = reserve_wallet,
        mint::decimals = ASSET_DECIMALS,
        mint::authority = program_authority,
        mint::freeze_authority = program_authority,
        mint::token_program = token_program,
        seeds = [IGNIS_MINT_SEED],
        bump
    )]
    pub ignis_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = reserve_wallet,
        mint::decimals = ASSET_DECIMALS,
        mint::authority = program_authority,
        mint::freeze_authority = program_authority,
        mint::token_program = token_program,
        seeds = [VENTURA_MINT_SEED],
        bump
    )]
    pub ventura_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Custody account for Ignis held by the program itself
    #[account(
        init,
        payer = reserve_wallet,
        token::mint = ignis_mint,
        token::authority = program_authority,
        token::token_program = token_program,
        seeds = [RESERVE_SEED, ignis_mint.key().as_ref()],
        bump
    )]
    pub ignis_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody account for Ventura held by the program itself
    #[account(
        init,
        payer = reserve_wallet,
        token::mint = ventura_mint,
        token::authority = program_authority,
        token::token_program = token_program,
        seeds = [RESERVE_SEED, ventura_mint.key().as_ref()],
        bump
    )]
    pub ventura_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Initialize>, peg: Option<u64>) -> Result<()> {
    let peg = peg.unwrap_or(PEG_ONE);
    let reserve_wallet = ctx.accounts.reserve_wallet.key();

    // `init` rejects a second run; the signer becomes the recorded wallet
    check_peg(peg)?;

    let program_authority = ctx.accounts.program_authority.key();
    let ignis = AssetConfig::new(Asset::Ignis, ctx.accounts.ignis_mint.key(), program_authority);
    let ventura = AssetConfig::new(
        Asset::Ventura,
        ctx.accounts.ventura_mint.key(),
        program_authority,
    );
    ensure_mint_matches(&ctx.accounts.ignis_mint, &ignis)?;
    ensure_mint_matches(&ctx.accounts.ventura_mint, &ventura)?;

    ctx.accounts.program_authority.bump = ctx.bumps.program_authority;

    let stablecoin_state = &mut ctx.accounts.stablecoin_state;
    stablecoin_state.peg = peg;
    stablecoin_state.mint = ignis.mint;
    stablecoin_state.reserve = ctx.accounts.ignis_reserve.key();
    stablecoin_state.reserve_wallet = reserve_wallet;
    stablecoin_state.bump = ctx.bumps.stablecoin_state;

    let coin_state = &mut ctx.accounts.coin_state;
    coin_state.mint = ventura.mint;
    coin_state.reserve = ctx.accounts.ventura_reserve.key();
    coin_state.reserve_wallet = reserve_wallet;
    coin_state.bump = ctx.bumps.coin_state;

    msg!("Issuance initialized!");
    msg!("Reserve wallet: {}", reserve_wallet);
    msg!("Program authority: {}", program_authority);
    msg!("Ignis mint: {} (reserve {})", ignis.mint, ctx.accounts.ignis_reserve.key());
    msg!("Ventura mint: {} (reserve {})", ventura.mint, ctx.accounts.ventura_reserve.key());
    msg!("Peg: {}/{}", peg, PEG_ONE);

    emit!(Initialized {
        reserve_wallet,
        program_authority,
        ignis_mint: ignis.mint,
        ventura_mint: ventura.mint,
        peg,
    });

    Ok(())
}

fn ensure_mint_matches(mint: &Mint, config: &AssetConfig) -> Result<()> {
    require!(
        mint.decimals == config.decimals
            && mint.supply == 0
            && mint.mint_authority == COption::Some(config.mint_authority)
            && mint.freeze_authority == COption::Some(config.freeze_authority),
        IgnisError::InvariantViolation
    );
    Ok(())
}
