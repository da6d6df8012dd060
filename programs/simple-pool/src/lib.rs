//! Simple-Pool — two-asset constant-product AMM with per-share fee rewards.
//!
//! 5 instructions:
//!   initialize_pool   — create a pool for a mint pair with PDA authority
//!   add_liquidity     — deposit both assets, receive liquidity shares
//!   remove_liquidity  — burn shares, withdraw proportional reserves
//!   swap              — atomic x*y=k swap; fee funds the reward accumulator
//!   claim_rewards     — pay out accrued fee rewards for both assets

// ─── Security contact ─────────────────────────────────────────────────────────

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name:             "Simple-Pool",
    project_url:      "https://github.com/simple-pool/simple-pool",
    contacts:         "email:security@simple-pool.dev",
    policy:           "Please report security vulnerabilities by email. \
                       We aim to respond within 48 hours.",
    source_code:      "https://github.com/simple-pool/simple-pool",
    preferred_languages: "en"
}

pub mod constants;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("C7dn4fvUif9MMs4JC3EtzstAj7gkAae9bpnuWb8Q44k4");

#[program]
pub mod simple_pool {
    use super::*;

    /// Create a constant-product pool. The fee rate is immutable afterwards.
    pub fn initialize_pool(ctx: Context<InitializePool>, fee_bps: u16) -> Result<()> {
        initialize_pool::handler(ctx, fee_bps)
    }

    /// Deposit both assets and receive liquidity shares. Off-ratio deposits
    /// are clipped to the reserve ratio; the excess is never pulled.
    pub fn add_liquidity(
        ctx: Context<AddLiquidity>,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<()> {
        add_liquidity::handler(ctx, amount_a, amount_b)
    }

    /// Burn liquidity shares and withdraw proportional reserves.
    pub fn remove_liquidity(ctx: Context<RemoveLiquidity>, shares: u64) -> Result<()> {
        remove_liquidity::handler(ctx, shares)
    }

    /// Swap a fixed input amount of one asset for the other.
    /// `a_to_b` selects the direction.
    pub fn swap(ctx: Context<Swap>, amount_in: u64, a_to_b: bool) -> Result<()> {
        swap::handler(ctx, amount_in, a_to_b)
    }

    /// Pay out accrued fee rewards. A claim with nothing pending is a no-op.
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        claim_rewards::handler(ctx)
    }
}
