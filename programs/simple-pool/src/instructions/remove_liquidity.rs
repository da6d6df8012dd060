use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{constants::*, error::PoolError, math, state::{Pool, Position}};

/// Burn liquidity shares and withdraw the proportional reserves.
///
/// Pending rewards are paid out on the pre-burn balance first. Withdrawal
/// amounts round down; the remainders stay in the reserve. A full burn by
/// the last holder drives both reserves and total_shares to exactly zero.
pub fn handler(ctx: Context<RemoveLiquidity>, shares: u64) -> Result<()> {
    require!(shares > 0, PoolError::InvalidAmount);
    require!(
        ctx.accounts.position.shares >= shares,
        PoolError::InsufficientShares
    );

    // Read pool state into locals before any mutable borrows
    let total_shares = ctx.accounts.pool.total_shares;
    let reserve_a = ctx.accounts.pool.reserve_a;
    let reserve_b = ctx.accounts.pool.reserve_b;
    let acc_a = ctx.accounts.pool.acc_reward_per_share_a;
    let acc_b = ctx.accounts.pool.acc_reward_per_share_b;
    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;

    let (amount_a, amount_b) = math::compute_burn(shares, reserve_a, reserve_b, total_shares)?;

    // ── Settle pending rewards on the pre-burn share balance ────────────────
    let old_shares = ctx.accounts.position.shares;
    let pending_a =
        math::pending_reward(old_shares, acc_a, ctx.accounts.position.reward_debt_a)?;
    let pending_b =
        math::pending_reward(old_shares, acc_b, ctx.accounts.position.reward_debt_b)?;

    // ── Burn shares, shrink reserves ────────────────────────────────────────
    {
        let pos = &mut ctx.accounts.position;
        pos.shares = old_shares - shares;
        pos.reward_debt_a = math::reward_debt(pos.shares, acc_a)?;
        pos.reward_debt_b = math::reward_debt(pos.shares, acc_b)?;
    }

    let pool = &mut ctx.accounts.pool;
    pool.total_shares = total_shares
        .checked_sub(shares)
        .ok_or(PoolError::InvariantViolation)?;
    pool.reserve_a = reserve_a
        .checked_sub(amount_a)
        .ok_or(PoolError::InvariantViolation)?;
    pool.reserve_b = reserve_b
        .checked_sub(amount_b)
        .ok_or(PoolError::InvariantViolation)?;

    // ── Transfers out of the vaults (PDA-signed) ────────────────────────────
    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    let out_a = amount_a
        .checked_add(pending_a)
        .ok_or(PoolError::MathOverflow)?;
    let out_b = amount_b
        .checked_add(pending_b)
        .ok_or(PoolError::MathOverflow)?;

    if out_a > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_a_vault.to_account_info(),
                    to: ctx.accounts.user_token_a.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            out_a,
        )?;
    }
    if out_b > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_b_vault.to_account_info(),
                    to: ctx.accounts.user_token_b.to_account_info(),
                    authority: ctx.accounts.pool_authority.to_account_info(),
                },
                signer,
            ),
            out_b,
        )?;
    }

    msg!(
        "Liquidity removed: shares={} a={} b={} settled_a={} settled_b={}",
        shares, amount_a, amount_b, pending_a, pending_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
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
        seeds = [POSITION_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == user.key(),
        constraint = position.pool == pool.key(),
    )]
    pub position: Account<'info, Position>,

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

    #[account(
        mut,
        constraint = user_token_a.mint == pool.token_a_mint @ PoolError::MintMismatch,
        constraint = user_token_a.owner == user.key(),
    )]
    pub user_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_token_b.mint == pool.token_b_mint @ PoolError::MintMismatch,
        constraint = user_token_b.owner == user.key(),
    )]
    pub user_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
