use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{constants::*, error::PoolError, math, state::{Pool, Position}};

/// Pay out accrued fee rewards for both assets and reset the debt snapshots.
/// Claiming with nothing pending is a no-op, not an error.
pub fn handler(ctx: Context<ClaimRewards>) -> Result<()> {
    let acc_a = ctx.accounts.pool.acc_reward_per_share_a;
    let acc_b = ctx.accounts.pool.acc_reward_per_share_b;
    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;

    let shares = ctx.accounts.position.shares;
    let pending_a =
        math::pending_reward(shares, acc_a, ctx.accounts.position.reward_debt_a)?;
    let pending_b =
        math::pending_reward(shares, acc_b, ctx.accounts.position.reward_debt_b)?;

    if pending_a == 0 && pending_b == 0 {
        msg!("No rewards to claim");
        return Ok(());
    }

    // Snapshot the accumulators at the unchanged share balance
    {
        let pos = &mut ctx.accounts.position;
        pos.reward_debt_a = math::reward_debt(shares, acc_a)?;
        pos.reward_debt_b = math::reward_debt(shares, acc_b)?;
    }

    let seeds: &[&[u8]] = &[POOL_AUTHORITY_SEED, pool_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    if pending_a > 0 {
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
            pending_a,
        )?;
    }
    if pending_b > 0 {
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
            pending_b,
        )?;
    }

    msg!("Rewards claimed: a={} b={}", pending_a, pending_b);
    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRewards<'info> {
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
