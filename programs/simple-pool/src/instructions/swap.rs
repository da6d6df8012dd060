use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{constants::*, error::PoolError, math, state::Pool};

/// Constant-product swap: x * y = k on the post-fee input.
///
/// The fee (pool.fee_bps of amount_in) never joins the tradable reserve: it
/// is credited to the input asset's reward accumulator and sits in the vault
/// until providers claim it. Only amount_in − fee moves the price, so k
/// strictly increases on every nonzero-fee trade.
///
/// Effective flow:
///   1. user → vault_in   : amount_in tokens (fee included)
///   2. vault_out → user  : amount_out tokens (PDA-signed)
pub fn handler(ctx: Context<Swap>, amount_in: u64, a_to_b: bool) -> Result<()> {
    require!(amount_in > 0, PoolError::InvalidAmount);

    let total_shares = ctx.accounts.pool.total_shares;
    require!(total_shares > 0, PoolError::PoolNotSeeded);

    let reserve_a = ctx.accounts.pool.reserve_a;
    let reserve_b = ctx.accounts.pool.reserve_b;
    let (reserve_in, reserve_out) = if a_to_b {
        (reserve_a, reserve_b)
    } else {
        (reserve_b, reserve_a)
    };

    let amounts = math::compute_swap(
        amount_in,
        ctx.accounts.pool.fee_bps,
        reserve_in,
        reserve_out,
        total_shares,
    )?;

    let new_reserve_in = reserve_in
        .checked_add(amounts.net_in)
        .ok_or(PoolError::MathOverflow)?;
    let new_reserve_out = reserve_out
        .checked_sub(amounts.amount_out)
        .ok_or(PoolError::InvariantViolation)?;
    math::verify_product(reserve_in, reserve_out, new_reserve_in, new_reserve_out)?;

    // ── Commit reserves and route the fee to the input-asset accumulator ────
    {
        let pool = &mut ctx.accounts.pool;
        if a_to_b {
            pool.reserve_a = new_reserve_in;
            pool.reserve_b = new_reserve_out;
            pool.acc_reward_per_share_a = pool
                .acc_reward_per_share_a
                .checked_add(amounts.acc_delta)
                .ok_or(PoolError::MathOverflow)?;
        } else {
            pool.reserve_b = new_reserve_in;
            pool.reserve_a = new_reserve_out;
            pool.acc_reward_per_share_b = pool
                .acc_reward_per_share_b
                .checked_add(amounts.acc_delta)
                .ok_or(PoolError::MathOverflow)?;
        }
    }

    // ── Transfers ───────────────────────────────────────────────────────────
    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    let (vault_in, vault_out) = if a_to_b {
        (&ctx.accounts.token_a_vault, &ctx.accounts.token_b_vault)
    } else {
        (&ctx.accounts.token_b_vault, &ctx.accounts.token_a_vault)
    };

    // 1. Full input (fee included): user_token_in → vault_in
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_in.to_account_info(),
                to: vault_in.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount_in,
    )?;
    // 2. Output: vault_out → user_token_out
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: vault_out.to_account_info(),
                to: ctx.accounts.user_token_out.to_account_info(),
                authority: ctx.accounts.pool_authority.to_account_info(),
            },
            signer,
        ),
        amounts.amount_out,
    )?;

    msg!(
        "Swap: in={} fee={} out={} a_to_b={}",
        amount_in, amounts.fee, amounts.amount_out, a_to_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, Pool>,

    /// CHECK: PDA vault authority
    #[account(
        seeds = [POOL_AUTHORITY_SEED, pool.key().as_ref()],
        bump = pool.authority_bump,
    )]
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = token_a_vault.key() == pool.token_a_vault @ PoolError::MintMismatch,
    )]
    pub token_a_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = token_b_vault.key() == pool.token_b_vault @ PoolError::MintMismatch,
    )]
    pub token_b_vault: Box<Account<'info, TokenAccount>>,

    /// Token account the user is selling from
    #[account(
        mut,
        constraint = user_token_in.owner == user.key(),
    )]
    pub user_token_in: Box<Account<'info, TokenAccount>>,

    /// Token account the user is receiving into
    #[account(
        mut,
        constraint = user_token_out.owner == user.key(),
    )]
    pub user_token_out: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
