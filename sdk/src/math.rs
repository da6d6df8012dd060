//! Fee constants and simulation math.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain estimates match
//! on-chain results.

use crate::error::{Error, Result};
use crate::state::{PoolState, PositionState};
use crate::types::SimulateResult;
use solana_sdk::pubkey::Pubkey;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Basis-point denominator for the pool fee.
pub const BPS_DENOMINATOR: u128 = 10_000;
/// Fixed-point scale of the reward-per-share accumulators (1e12).
pub const ACC_SCALE: u128 = 1_000_000_000_000;

// ─── Simulation ───────────────────────────────────────────────────────────────

/// Full fee and output breakdown for a hypothetical swap.
///
/// All inputs are pre-fetched on-chain values; no RPC calls are made here.
pub fn simulate_detailed(
    pool_addr:   Pubkey,
    pool:        &PoolState,
    reserve_in:  u64,
    reserve_out: u64,
    amount_in:   u64,
    a_to_b:      bool,
) -> Result<SimulateResult> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(Error::NoLiquidity);
    }

    let in_u128 = amount_in as u128;
    let fee = in_u128
        .checked_mul(pool.fee_bps as u128)
        .ok_or(Error::MathOverflow)?
        / BPS_DENOMINATOR;
    let net_in = in_u128 - fee;

    let r_in  = reserve_in  as u128;
    let r_out = reserve_out as u128;

    let estimated_out = r_out
        .checked_mul(net_in)
        .ok_or(Error::MathOverflow)?
        .checked_div(r_in.checked_add(net_in).ok_or(Error::MathOverflow)?)
        .ok_or(Error::MathOverflow)? as u64;

    if estimated_out == 0 {
        return Err(Error::ZeroOutput { amount_in });
    }

    let effective_rate = if amount_in == 0 {
        0.0
    } else {
        estimated_out as f64 / amount_in as f64
    };

    let price_impact_pct = net_in as f64 / (r_in as f64 + net_in as f64) * 100.0;

    Ok(SimulateResult {
        pool: pool_addr,
        a_to_b,
        amount_in,
        fee:              fee as u64,
        net_in:           net_in as u64,
        estimated_out,
        effective_rate,
        price_impact_pct,
        fee_bps:          pool.fee_bps,
        reserve_in,
        reserve_out,
    })
}

// ─── Pending rewards ──────────────────────────────────────────────────────────

/// Compute `(pending_a, pending_b)` accrued since the position was last settled.
///
/// Mirrors the on-chain computation:
/// `pending = shares × acc_reward_per_share / ACC_SCALE − reward_debt`
pub fn pending_rewards_for_position(pos: &PositionState, pool: &PoolState) -> (u64, u64) {
    let pending_a = mul_acc(pos.shares, pool.acc_reward_per_share_a)
        .saturating_sub(pos.reward_debt_a);
    let pending_b = mul_acc(pos.shares, pool.acc_reward_per_share_b)
        .saturating_sub(pos.reward_debt_b);
    (pending_a as u64, pending_b as u64)
}

// Divide-first, matching the program: shares * acc can exceed u128.
fn mul_acc(shares: u64, acc: u128) -> u128 {
    let q = acc / ACC_SCALE;
    let r = acc % ACC_SCALE;
    (shares as u128).saturating_mul(q) + shares as u128 * r / ACC_SCALE
}

// ─── Deposit quoting ──────────────────────────────────────────────────────────

/// Counter-amount of token B that matches `amount_a` at the live reserve
/// ratio. Deposits above this are clipped by the program; below it, token A
/// becomes the clipped side instead.
pub fn quote_counter_amount(amount_a: u64, reserve_a: u64, reserve_b: u64) -> Result<u64> {
    if reserve_a == 0 || reserve_b == 0 {
        return Err(Error::NoLiquidity);
    }
    let quoted = (amount_a as u128)
        .checked_mul(reserve_b as u128)
        .ok_or(Error::MathOverflow)?
        / reserve_a as u128;
    Ok(quoted as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PoolState;

    fn pool_100_100() -> PoolState {
        PoolState {
            token_a_mint:           Pubkey::new_unique(),
            token_b_mint:           Pubkey::new_unique(),
            token_a_vault:          Pubkey::new_unique(),
            token_b_vault:          Pubkey::new_unique(),
            reserve_a:              100_000_000_000,
            reserve_b:              100_000_000_000,
            total_shares:           100_000_000_000,
            fee_bps:                30,
            acc_reward_per_share_a: 0,
            acc_reward_per_share_b: 0,
        }
    }

    #[test]
    fn simulate_matches_reference_scenario() {
        let pool = pool_100_100();
        let sim = simulate_detailed(
            Pubkey::new_unique(),
            &pool,
            pool.reserve_a,
            pool.reserve_b,
            10_000_000_000,
            true,
        )
        .unwrap();
        assert_eq!(sim.fee, 30_000_000);
        assert_eq!(sim.net_in, 9_970_000_000);
        // 100 * 9.97 / 109.97 ≈ 9.066
        let expected = 100_000_000_000u128 * 9_970_000_000 / 109_970_000_000;
        assert_eq!(sim.estimated_out as u128, expected);
    }

    #[test]
    fn simulate_empty_pool_rejected() {
        let mut pool = pool_100_100();
        pool.reserve_a = 0;
        pool.reserve_b = 0;
        assert!(matches!(
            simulate_detailed(Pubkey::new_unique(), &pool, 0, 0, 1_000, true),
            Err(Error::NoLiquidity)
        ));
    }

    #[test]
    fn pending_rewards_mirror_debt_snapshot() {
        let mut pool = pool_100_100();
        pool.acc_reward_per_share_a = 300_000_000; // 0.0003 per share
        let pos = PositionState {
            owner:         Pubkey::new_unique(),
            pool:          Pubkey::new_unique(),
            shares:        100_000_000_000,
            reward_debt_a: 0,
            reward_debt_b: 0,
        };
        assert_eq!(pending_rewards_for_position(&pos, &pool), (30_000_000, 0));
    }

    #[test]
    fn counter_amount_follows_reserve_ratio() {
        assert_eq!(quote_counter_amount(10, 100, 200).unwrap(), 20);
        assert!(quote_counter_amount(10, 0, 200).is_err());
    }
}
