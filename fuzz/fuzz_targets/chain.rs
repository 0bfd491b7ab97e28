//! Program-test harness: the real instructions, account constraints and
//! token CPIs, run in-process against the SPL token program.

use anchor_lang::prelude::AccountInfo;
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use ignis_stablecoin::{Asset, CoinState, StablecoinState};
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::{Transaction, TransactionError},
};
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::{Account as TokenAccount, Mint};

use crate::{
    derive_coin_state_pda, derive_mint_pda, derive_program_authority_pda, derive_reserve_pda,
    derive_stablecoin_state_pda, fuzz_err, FuzzResult,
};

pub use solana_program_test::{BanksClientError, ProgramTestContext};

/// Test environment with the issuance program loaded
pub struct ChainTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// Every account `initialize` creates, plus the wallet that created them
#[derive(Debug)]
pub struct ChainProtocol {
    pub reserve_wallet: Keypair,
    pub program_authority: Pubkey,
    pub stablecoin_state: Pubkey,
    pub coin_state: Pubkey,
    pub ignis_mint: Pubkey,
    pub ventura_mint: Pubkey,
    pub ignis_reserve: Pubkey,
    pub ventura_reserve: Pubkey,
}

impl ChainProtocol {
    /// Derives the addresses `initialize` will create for `reserve_wallet`
    pub fn derive(program_id: &Pubkey, reserve_wallet: Keypair) -> Self {
        let (ignis_mint, _) = derive_mint_pda(program_id, Asset::Ignis);
        let (ventura_mint, _) = derive_mint_pda(program_id, Asset::Ventura);

        Self {
            reserve_wallet,
            program_authority: derive_program_authority_pda(program_id).0,
            stablecoin_state: derive_stablecoin_state_pda(program_id).0,
            coin_state: derive_coin_state_pda(program_id).0,
            ignis_mint,
            ventura_mint,
            ignis_reserve: derive_reserve_pda(program_id, &ignis_mint).0,
            ventura_reserve: derive_reserve_pda(program_id, &ventura_mint).0,
        }
    }

    pub fn mint(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::Ignis => self.ignis_mint,
            Asset::Ventura => self.ventura_mint,
        }
    }

    pub fn reserve(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::Ignis => self.ignis_reserve,
            Asset::Ventura => self.ventura_reserve,
        }
    }
}

/// A funded user holding one token account per asset
#[derive(Debug)]
pub struct ChainUser {
    pub owner: Keypair,
    pub ignis_account: Pubkey,
    pub ventura_account: Pubkey,
}

impl ChainUser {
    pub fn account(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::Ignis => self.ignis_account,
            Asset::Ventura => self.ventura_account,
        }
    }
}

// ============================================================================
// Core Setup Functions
// ============================================================================

fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    // `entry` wants the slice to live as long as the accounts it holds
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    ignis_stablecoin::entry(program_id, accounts, data)
}

/// Creates the program test environment with the issuance program loaded
pub async fn setup_program_test() -> ChainTestEnv {
    let program_id = ignis_stablecoin::id();
    let mut program_test = ProgramTest::new(
        "ignis_stablecoin",
        program_id,
        processor!(process_instruction),
    );
    program_test.prefer_bpf(false);

    let context = program_test.start_with_context().await;

    ChainTestEnv {
        program_id,
        context,
    }
}

/// Signs with the context payer plus `signers` on a fresh blockhash, so
/// repeating an identical instruction is never deduplicated.
pub async fn send_transaction(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.get_new_latest_blockhash().await?;

    let mut all_signers = vec![&context.payer];
    all_signers.extend_from_slice(signers);

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );

    context.banks_client.process_transaction(tx).await
}

/// Moves lamports from the context payer to `to`
pub async fn fund_account(
    context: &mut ProgramTestContext,
    to: &Pubkey,
    lamports: u64,
) -> FuzzResult<()> {
    let ix = system_instruction::transfer(&context.payer.pubkey(), to, lamports);
    send_transaction(context, &[ix], &[]).await?;
    Ok(())
}

/// Funds a fresh reserve wallet and runs `initialize`
pub async fn setup_protocol(
    env: &mut ChainTestEnv,
    peg: Option<u64>,
) -> FuzzResult<ChainProtocol> {
    let protocol = ChainProtocol::derive(&env.program_id, Keypair::new());

    // 1 SOL covers rent for every record initialize creates
    let reserve_wallet = protocol.reserve_wallet.pubkey();
    fund_account(&mut env.context, &reserve_wallet, 1_000_000_000).await?;

    let ix = initialize_instruction(&env.program_id, &protocol, peg);
    send_transaction(&mut env.context, &[ix], &[&protocol.reserve_wallet]).await?;

    Ok(protocol)
}

/// Creates an SPL token account for `mint` owned by `owner`
pub async fn create_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
) -> FuzzResult<Pubkey> {
    let account = Keypair::new();
    let rent = context.banks_client.get_rent().await?;

    let create_ix = system_instruction::create_account(
        &context.payer.pubkey(),
        &account.pubkey(),
        rent.minimum_balance(TokenAccount::LEN),
        TokenAccount::LEN as u64,
        &spl_token::id(),
    );
    let init_ix = spl_token::instruction::initialize_account(
        &spl_token::id(),
        &account.pubkey(),
        mint,
        owner,
    )?;

    send_transaction(context, &[create_ix, init_ix], &[&account]).await?;

    Ok(account.pubkey())
}

/// Funds a new user and opens an Ignis and a Ventura account for them
pub async fn setup_user(
    env: &mut ChainTestEnv,
    protocol: &ChainProtocol,
) -> FuzzResult<ChainUser> {
    let owner = Keypair::new();
    fund_account(&mut env.context, &owner.pubkey(), 100_000_000).await?;

    let ignis_account =
        create_token_account(&mut env.context, &protocol.ignis_mint, &owner.pubkey()).await?;
    let ventura_account =
        create_token_account(&mut env.context, &protocol.ventura_mint, &owner.pubkey()).await?;

    Ok(ChainUser {
        owner,
        ignis_account,
        ventura_account,
    })
}

/// Sets up everything: program + protocol + one user holding `initial_ignis`
pub async fn setup_complete_environment(
    initial_ignis: u64,
    peg: Option<u64>,
) -> FuzzResult<(ChainTestEnv, ChainProtocol, ChainUser)> {
    let mut env = setup_program_test().await;
    let protocol = setup_protocol(&mut env, peg).await?;
    let user = setup_user(&mut env, &protocol).await?;

    if initial_ignis > 0 {
        let ix = mint_to_instruction(
            &env.program_id,
            &protocol,
            &protocol.reserve_wallet.pubkey(),
            Asset::Ignis,
            initial_ignis,
            &protocol.ignis_mint,
            &user.ignis_account,
        );
        send_transaction(&mut env.context, &[ix], &[&protocol.reserve_wallet]).await?;
    }

    Ok((env, protocol, user))
}

// ============================================================================
// Instruction Builders
// ============================================================================

pub fn initialize_instruction(
    program_id: &Pubkey,
    protocol: &ChainProtocol,
    peg: Option<u64>,
) -> Instruction {
    let accounts = ignis_stablecoin::accounts::Initialize {
        reserve_wallet: protocol.reserve_wallet.pubkey(),
        program_authority: protocol.program_authority,
        stablecoin_state: protocol.stablecoin_state,
        coin_state: protocol.coin_state,
        ignis_mint: protocol.ignis_mint,
        ventura_mint: protocol.ventura_mint,
        ignis_reserve: protocol.ignis_reserve,
        ventura_reserve: protocol.ventura_reserve,
        system_program: solana_sdk::system_program::ID,
        token_program: spl_token::id(),
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: ignis_stablecoin::instruction::Initialize { peg }.data(),
    }
}

/// `mint` is passed explicitly so callers can pair an asset with the wrong
/// mint; the custody account is the one derived from that mint.
pub fn mint_to_instruction(
    program_id: &Pubkey,
    protocol: &ChainProtocol,
    signer: &Pubkey,
    asset: Asset,
    amount: u64,
    mint: &Pubkey,
    destination: &Pubkey,
) -> Instruction {
    let accounts = ignis_stablecoin::accounts::MintToAsset {
        reserve_wallet: *signer,
        stablecoin_state: protocol.stablecoin_state,
        coin_state: protocol.coin_state,
        mint: *mint,
        reserve: derive_reserve_pda(program_id, mint).0,
        destination: *destination,
        program_authority: protocol.program_authority,
        token_program: spl_token::id(),
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: ignis_stablecoin::instruction::MintTo { asset, amount }.data(),
    }
}

pub fn burn_reserve_instruction(
    program_id: &Pubkey,
    protocol: &ChainProtocol,
    signer: &Pubkey,
    asset: Asset,
    amount: u64,
    mint: &Pubkey,
) -> Instruction {
    let accounts = ignis_stablecoin::accounts::BurnReserve {
        reserve_wallet: *signer,
        stablecoin_state: protocol.stablecoin_state,
        coin_state: protocol.coin_state,
        mint: *mint,
        reserve: derive_reserve_pda(program_id, mint).0,
        program_authority: protocol.program_authority,
        token_program: spl_token::id(),
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: ignis_stablecoin::instruction::BurnReserve { asset, amount }.data(),
    }
}

pub fn redeem_instruction(
    program_id: &Pubkey,
    protocol: &ChainProtocol,
    user: &ChainUser,
    source: Asset,
    amount: u64,
) -> Instruction {
    let counter = source.counter();
    let accounts = ignis_stablecoin::accounts::Redeem {
        payer: user.owner.pubkey(),
        stablecoin_state: protocol.stablecoin_state,
        coin_state: protocol.coin_state,
        source_mint: protocol.mint(source),
        counter_mint: protocol.mint(counter),
        source_reserve: protocol.reserve(source),
        counter_reserve: protocol.reserve(counter),
        payer_source_account: user.account(source),
        payer_counter_account: user.account(counter),
        program_authority: protocol.program_authority,
        token_program: spl_token::id(),
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: ignis_stablecoin::instruction::Redeem { source, amount }.data(),
    }
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Get token account balance
pub async fn get_token_balance(
    context: &mut ProgramTestContext,
    account: &Pubkey,
) -> FuzzResult<u64> {
    let account = context
        .banks_client
        .get_account(*account)
        .await?
        .ok_or("Token account not found")?;

    Ok(TokenAccount::unpack(&account.data)?.amount)
}

/// Get a full mint account
pub async fn get_mint(context: &mut ProgramTestContext, mint: &Pubkey) -> FuzzResult<Mint> {
    let account = context
        .banks_client
        .get_account(*mint)
        .await?
        .ok_or("Mint account not found")?;

    Ok(Mint::unpack(&account.data)?)
}

/// Get mint supply
pub async fn get_mint_supply(context: &mut ProgramTestContext, mint: &Pubkey) -> FuzzResult<u64> {
    Ok(get_mint(context, mint).await?.supply)
}

pub async fn get_stablecoin_state(
    context: &mut ProgramTestContext,
    stablecoin_state: &Pubkey,
) -> FuzzResult<StablecoinState> {
    let account = context
        .banks_client
        .get_account(*stablecoin_state)
        .await?
        .ok_or("Stablecoin state account not found")?;

    StablecoinState::try_deserialize(&mut account.data.as_ref()).map_err(fuzz_err)
}

pub async fn get_coin_state(
    context: &mut ProgramTestContext,
    coin_state: &Pubkey,
) -> FuzzResult<CoinState> {
    let account = context
        .banks_client
        .get_account(*coin_state)
        .await?
        .ok_or("Coin state account not found")?;

    CoinState::try_deserialize(&mut account.data.as_ref()).map_err(fuzz_err)
}

/// Custom error code a failed instruction returned, if any
pub fn program_error_code(err: &BanksClientError) -> Option<u32> {
    let tx_err = match err {
        BanksClientError::TransactionError(e) => e,
        BanksClientError::SimulationError { err, .. } => err,
        _ => return None,
    };

    match tx_err {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(*code),
        _ => None,
    }
}
