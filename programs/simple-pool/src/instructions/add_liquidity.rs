use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::{constants::*, error::PoolError, math, state::{Pool, Position}};

/// Deposit both assets and receive liquidity shares.
///
/// First depositor sets the initial price; shares = isqrt(amount_a * amount_b).
/// Later deposits are clipped to the current reserve ratio: only the pro-rata
/// backing for the minted shares is pulled, the off-ratio excess never leaves
/// the caller's account. Pending rewards are paid out on the pre-mint balance
/// before any share change.
pub fn handler(ctx: Context<AddLiquidity>, amount_a: u64, amount_b: u64) -> Result<()> {
    require!(amount_a > 0 && amount_b > 0, PoolError::InvalidAmount);

    // Read pool state into locals before any mutable borrows
    let total_shares = ctx.accounts.pool.total_shares;
    let reserve_a = ctx.accounts.pool.reserve_a;
    let reserve_b = ctx.accounts.pool.reserve_b;
    let acc_a = ctx.accounts.pool.acc_reward_per_share_a;
    let acc_b = ctx.accounts.pool.acc_reward_per_share_b;
    let pool_key = ctx.accounts.pool.key();
    let authority_bump = ctx.accounts.pool.authority_bump;

    let minted = math::compute_mint(amount_a, amount_b, reserve_a, reserve_b, total_shares)?;

    // ── Settle pending rewards on the pre-mint share balance ────────────────
    let old_shares = ctx.accounts.position.shares;
    let (pending_a, pending_b) = if old_shares > 0 {
        (
            math::pending_reward(old_shares, acc_a, ctx.accounts.position.reward_debt_a)?,
            math::pending_reward(old_shares, acc_b, ctx.accounts.position.reward_debt_b)?,
        )
    } else {
        // New position — initialise fields
        let pos = &mut ctx.accounts.position;
        pos.owner = ctx.accounts.user.key();
        pos.pool = pool_key;
        pos.bump = ctx.bumps.position;
        (0, 0)
    };

    // ── Credit shares and reserves ──────────────────────────────────────────
    {
        let pos = &mut ctx.accounts.position;
        pos.shares = old_shares
            .checked_add(minted.shares)
            .ok_or(PoolError::MathOverflow)?;
        pos.reward_debt_a = math::reward_debt(pos.shares, acc_a)?;
        pos.reward_debt_b = math::reward_debt(pos.shares, acc_b)?;
    }

    let pool = &mut ctx.accounts.pool;
    pool.total_shares = total_shares
        .checked_add(minted.shares)
        .ok_or(PoolError::MathOverflow)?;
    pool.reserve_a = reserve_a
        .checked_add(minted.used_a)
        .ok_or(PoolError::MathOverflow)?;
    pool.reserve_b = reserve_b
        .checked_add(minted.used_b)
        .ok_or(PoolError::MathOverflow)?;

    // ── Transfers ───────────────────────────────────────────────────────────
    // Pull only the consumed amounts from the user into the vaults.
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_a.to_account_info(),
                to: ctx.accounts.token_a_vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        minted.used_a,
    )?;
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_b.to_account_info(),
                to: ctx.accounts.token_b_vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        minted.used_b,
    )?;

    // Pay out any settled rewards from the vaults (PDA-signed)
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

    msg!(
        "Liquidity added: shares={} a={} b={} settled_a={} settled_b={}",
        minted.shares, minted.used_a, minted.used_b, pending_a, pending_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
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
        init_if_needed,
        payer = user,
        space = Position::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump,
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
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
