//! Public parameter and result types for [`crate::SimplePoolClient`].
//!
//! Result types derive `Serialize` so callers (and the CLI) can emit them as
//! JSON directly.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

// ─── Parameters ───────────────────────────────────────────────────────────────

/// Parameters for [`crate::SimplePoolClient::create_pool`].
#[derive(Debug, Clone)]
pub struct CreatePoolParams {
    pub mint_a:  Pubkey,
    pub mint_b:  Pubkey,
    /// Swap fee in basis points (must be below 10 000).
    pub fee_bps: u16,
}

/// Parameters for [`crate::SimplePoolClient::add_liquidity`].
///
/// Amounts are upper bounds: the program clips the deposit to the live
/// reserve ratio and pulls only what it uses.
#[derive(Debug, Clone)]
pub struct AddLiquidityParams {
    pub mint_a:   Pubkey,
    pub mint_b:   Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Parameters for [`crate::SimplePoolClient::remove_liquidity`].
#[derive(Debug, Clone)]
pub struct RemoveLiquidityParams {
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Number of liquidity shares to burn.
    pub shares: u64,
}

/// Parameters for [`crate::SimplePoolClient::swap`].
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub mint_in:   Pubkey,
    pub mint_out:  Pubkey,
    pub amount_in: u64,
}

/// Parameters for [`crate::SimplePoolClient::simulate`].
#[derive(Debug, Clone)]
pub struct SimulateParams {
    pub mint_in:   Pubkey,
    pub mint_out:  Pubkey,
    pub amount_in: u64,
}

// ─── Results ──────────────────────────────────────────────────────────────────

/// Snapshot of a pool's on-chain state plus derived figures.
#[derive(Debug, Clone, Serialize)]
pub struct PoolInfo {
    pub address:                Pubkey,
    pub token_a_mint:           Pubkey,
    pub token_b_mint:           Pubkey,
    pub token_a_vault:          Pubkey,
    pub token_b_vault:          Pubkey,
    pub reserve_a:              u64,
    pub reserve_b:              u64,
    pub total_shares:           u64,
    pub fee_bps:                u16,
    /// Spot price of token A denominated in token B (reserve_b / reserve_a).
    pub spot_price_a_in_b:      f64,
    pub acc_reward_per_share_a: u128,
    pub acc_reward_per_share_b: u128,
    /// Actual vault balances; exceed the reserves by unclaimed fees and dust.
    pub vault_balance_a:        u64,
    pub vault_balance_b:        u64,
}

/// A liquidity provider's position in one pool.
#[derive(Debug, Clone, Serialize)]
pub struct PositionInfo {
    pub address:        Pubkey,
    pub owner:          Pubkey,
    pub pool:           Pubkey,
    pub shares:         u64,
    /// Fraction of the pool owned, in percent.
    pub share_pct:      f64,
    /// Fee rewards claimable right now, in token A raw units.
    pub pending_reward_a: u64,
    /// Fee rewards claimable right now, in token B raw units.
    pub pending_reward_b: u64,
}

/// Output of an off-chain swap simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulateResult {
    pub pool:             Pubkey,
    pub a_to_b:           bool,
    pub amount_in:        u64,
    /// Fee withheld from the input, in input-asset raw units.
    pub fee:              u64,
    /// Input amount after the fee, the part that trades against the curve.
    pub net_in:           u64,
    pub estimated_out:    u64,
    /// Output per input unit (after fee and price impact).
    pub effective_rate:   f64,
    /// Price impact of this trade, in percent.
    pub price_impact_pct: f64,
    pub fee_bps:          u16,
    pub reserve_in:       u64,
    pub reserve_out:      u64,
}

/// Confirmed-transaction receipt returned by every state-changing client call.
#[derive(Debug, Clone, Serialize)]
pub struct TxOutcome {
    pub signature: String,
    pub pool:      Pubkey,
}
