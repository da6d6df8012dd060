use anchor_lang::prelude::*;
use crate::{constants::*, error::PoolError};

/// Result of swap fee and output calculations.
pub struct SwapAmounts {
    /// Fee taken from amount_in, routed to the reward accumulator.
    pub fee: u64,
    /// Net amount entering the tradable reserve (amount_in − fee).
    pub net_in: u64,
    /// Tokens sent to the caller from the output vault.
    pub amount_out: u64,
    /// Delta to add to acc_reward_per_share for the input token.
    pub acc_delta: u128,
}

/// Result of liquidity-deposit calculations.
pub struct MintAmounts {
    /// Shares credited to the depositor.
    pub shares: u64,
    /// Token A actually pulled (≤ the offered amount).
    pub used_a: u64,
    /// Token B actually pulled (≤ the offered amount).
    pub used_b: u64,
}

// ─── Integer square root (Babylonian method) ──────────────────────────────
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) >> 1;
    while y < x {
        x = y;
        y = (y + n / y) >> 1;
    }
    x
}

/// Compute fee, constant-product output, and the accumulator delta for a swap.
///
/// * `amount_in`    – raw token amount the caller is selling
/// * `fee_bps`      – pool fee rate in basis points
/// * `reserve_in`   – tradable reserve of the input token
/// * `reserve_out`  – tradable reserve of the output token
/// * `total_shares` – shares outstanding; must be > 0 (checked by the handler)
///
/// The fee never joins the reserves: it funds `acc_reward_per_share` for the
/// input token, so `reserve_in` grows by `net_in` only.
pub fn compute_swap(
    amount_in: u64,
    fee_bps: u16,
    reserve_in: u64,
    reserve_out: u64,
    total_shares: u64,
) -> Result<SwapAmounts> {
    let in_u128 = amount_in as u128;

    // fee = amount_in * fee_bps / 10_000; fee < amount_in since fee_bps < 10_000
    let fee = in_u128
        .checked_mul(fee_bps as u128)
        .ok_or(PoolError::MathOverflow)?
        / BPS_DENOMINATOR;
    let net_in = in_u128 - fee;

    // ── Constant-product output: dy = y * dx_net / (x + dx_net) ─────────────
    // Strictly less than reserve_out, so the pool can never be drained.
    let amount_out = (reserve_out as u128)
        .checked_mul(net_in)
        .ok_or(PoolError::MathOverflow)?
        / (reserve_in as u128)
            .checked_add(net_in)
            .ok_or(PoolError::MathOverflow)?;

    require!(amount_out > 0, PoolError::ZeroOutput);

    let acc_delta = acc_delta(fee, total_shares)?;

    Ok(SwapAmounts {
        fee: fee as u64,
        net_in: net_in as u64,
        amount_out: amount_out as u64,
        acc_delta,
    })
}

/// Accumulator delta: fee * ACC_SCALE / total_shares.
///
/// Divide-first to avoid u128 overflow: q * SCALE + r * SCALE / total_shares.
pub fn acc_delta(fee: u128, total_shares: u64) -> Result<u128> {
    if fee == 0 || total_shares == 0 {
        return Ok(0);
    }
    let q = fee / total_shares as u128;
    let r = fee % total_shares as u128;
    let delta = q
        .checked_mul(ACC_SCALE)
        .ok_or(PoolError::MathOverflow)?
        .checked_add(r * ACC_SCALE / total_shares as u128)
        .ok_or(PoolError::MathOverflow)?;
    Ok(delta)
}

/// Shares to mint for a deposit, and the amounts actually consumed.
///
/// First deposit: shares = isqrt(a * b); both amounts consumed in full and
/// their ratio defines the initial price. Later deposits clip to the current
/// reserve ratio: shares = min(a·T/Ra, b·T/Rb) and only the pro-rata backing
/// for those shares is consumed (rounded up, so rounding favors the pool);
/// the caller keeps the off-ratio excess.
pub fn compute_mint(
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<MintAmounts> {
    if total_shares == 0 {
        let product = (amount_a as u128)
            .checked_mul(amount_b as u128)
            .ok_or(PoolError::MathOverflow)?;
        let shares = isqrt(product);
        require!(shares > 0, PoolError::InvalidAmount);
        require!(shares <= u64::MAX as u128, PoolError::MathOverflow);
        return Ok(MintAmounts {
            shares: shares as u64,
            used_a: amount_a,
            used_b: amount_b,
        });
    }

    require!(reserve_a > 0 && reserve_b > 0, PoolError::InvariantViolation);

    let shares_from_a = (amount_a as u128)
        .checked_mul(total_shares as u128)
        .ok_or(PoolError::MathOverflow)?
        / reserve_a as u128;
    let shares_from_b = (amount_b as u128)
        .checked_mul(total_shares as u128)
        .ok_or(PoolError::MathOverflow)?
        / reserve_b as u128;
    let shares = shares_from_a.min(shares_from_b);
    require!(shares > 0, PoolError::InvalidAmount);

    // shares ≤ amount_x·T/Rx guarantees used_x ≤ amount_x even after ceil
    let used_a = div_ceil(
        shares
            .checked_mul(reserve_a as u128)
            .ok_or(PoolError::MathOverflow)?,
        total_shares as u128,
    );
    let used_b = div_ceil(
        shares
            .checked_mul(reserve_b as u128)
            .ok_or(PoolError::MathOverflow)?,
        total_shares as u128,
    );

    Ok(MintAmounts {
        shares: shares as u64,
        used_a: used_a as u64,
        used_b: used_b as u64,
    })
}

/// Proportional withdrawal amounts for a share burn.
///
/// Floor division; remainders stay in the reserve as unattributed value.
/// A full burn (shares == total_shares) returns the reserves exactly.
pub fn compute_burn(
    shares: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<(u64, u64)> {
    require!(total_shares > 0, PoolError::PoolNotSeeded);
    require!(shares <= total_shares, PoolError::InsufficientShares);

    let amount_a = (shares as u128)
        .checked_mul(reserve_a as u128)
        .ok_or(PoolError::MathOverflow)?
        / total_shares as u128;
    let amount_b = (shares as u128)
        .checked_mul(reserve_b as u128)
        .ok_or(PoolError::MathOverflow)?
        / total_shares as u128;

    Ok((amount_a as u64, amount_b as u64))
}

/// Post-swap sanity check: the reserve product must never decrease.
/// Failing here means an accounting bug, not a bad input.
pub fn verify_product(
    old_reserve_in: u64,
    old_reserve_out: u64,
    new_reserve_in: u64,
    new_reserve_out: u64,
) -> Result<()> {
    let k_old = (old_reserve_in as u128)
        .checked_mul(old_reserve_out as u128)
        .ok_or(PoolError::MathOverflow)?;
    let k_new = (new_reserve_in as u128)
        .checked_mul(new_reserve_out as u128)
        .ok_or(PoolError::MathOverflow)?;
    require!(k_new >= k_old, PoolError::InvariantViolation);
    Ok(())
}

/// Reward debt snapshot: ceil(shares * acc / ACC_SCALE).
///
/// Rounded up, while pending rounds down: the truncated fraction is forfeited
/// by the holder instead of borrowed from the fee pot, so the vault surplus
/// always covers the sum of all pending rewards.
pub fn reward_debt(shares: u64, acc: u128) -> Result<u128> {
    mul_acc(shares, acc, true)
}

/// Pending reward: shares * acc / ACC_SCALE − debt, floored at zero.
pub fn pending_reward(shares: u64, acc: u128, debt: u128) -> Result<u64> {
    let pending = mul_acc(shares, acc, false)?.saturating_sub(debt);
    require!(pending <= u64::MAX as u128, PoolError::MathOverflow);
    Ok(pending as u64)
}

fn mul_acc(shares: u64, acc: u128, round_up: bool) -> Result<u128> {
    // Divide-first: shares * acc can exceed u128 once acc grows large.
    // shares * r cannot overflow: r < ACC_SCALE (1e12) and shares < 2^64.
    let q = acc / ACC_SCALE;
    let r = acc % ACC_SCALE;
    let frac = shares as u128 * r;
    let frac = if round_up {
        div_ceil(frac, ACC_SCALE)
    } else {
        frac / ACC_SCALE
    };
    let out = (shares as u128)
        .checked_mul(q)
        .ok_or(PoolError::MathOverflow)?
        .checked_add(frac)
        .ok_or(PoolError::MathOverflow)?;
    Ok(out)
}

fn div_ceil(n: u128, d: u128) -> u128 {
    (n + d - 1) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    // Amounts below use 9-decimal units: 100 tokens = 100_000_000_000.
    const UNIT: u64 = 1_000_000_000;

    #[test]
    fn isqrt_exact_and_floor() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(10_000), 100);
        assert_eq!(isqrt(10_001), 100);
        assert_eq!(isqrt(u128::from(u64::MAX)) as u64, 4_294_967_295);
    }

    #[test]
    fn first_deposit_mints_sqrt_of_product() {
        let m = compute_mint(100 * UNIT, 100 * UNIT, 0, 0, 0).unwrap();
        assert_eq!(m.shares, 100 * UNIT);
        assert_eq!(m.used_a, 100 * UNIT);
        assert_eq!(m.used_b, 100 * UNIT);
    }

    #[test]
    fn dust_first_deposit_rejected() {
        // 0 * anything has isqrt 0
        assert!(compute_mint(0, 100, 0, 0, 0).is_err());
    }

    #[test]
    fn proportional_deposit_mints_pro_rata() {
        let m = compute_mint(50 * UNIT, 50 * UNIT, 100 * UNIT, 100 * UNIT, 100 * UNIT).unwrap();
        assert_eq!(m.shares, 50 * UNIT);
        assert_eq!(m.used_a, 50 * UNIT);
        assert_eq!(m.used_b, 50 * UNIT);
    }

    #[test]
    fn off_ratio_deposit_clips_to_binding_side() {
        // Pool at 1:1, caller offers 10 A / 40 B — B side is clipped.
        let m = compute_mint(10 * UNIT, 40 * UNIT, 100 * UNIT, 100 * UNIT, 100 * UNIT).unwrap();
        assert_eq!(m.shares, 10 * UNIT);
        assert_eq!(m.used_a, 10 * UNIT);
        assert_eq!(m.used_b, 10 * UNIT);
    }

    #[test]
    fn clipped_amounts_never_exceed_offer() {
        let m = compute_mint(7, 13, 1_000_003, 999_999, 1_000_000).unwrap();
        assert!(m.used_a <= 7);
        assert!(m.used_b <= 13);
        assert!(m.shares > 0);
    }

    #[test]
    fn burn_full_supply_returns_reserves_exactly() {
        let (a, b) = compute_burn(100 * UNIT, 109 * UNIT, 91 * UNIT, 100 * UNIT).unwrap();
        assert_eq!(a, 109 * UNIT);
        assert_eq!(b, 91 * UNIT);
    }

    #[test]
    fn burn_rounds_down_leaving_dust() {
        let (a, b) = compute_burn(1, 10, 10, 3).unwrap();
        assert_eq!(a, 3); // 10/3 floored
        assert_eq!(b, 3);
    }

    #[test]
    fn swap_matches_reference_scenario() {
        // 100 A / 100 B pool, 30 bps, sell 10 A:
        // fee = 0.03, net = 9.97, out = 100 * 9.97 / 109.97
        let s = compute_swap(10 * UNIT, 30, 100 * UNIT, 100 * UNIT, 100 * UNIT).unwrap();
        assert_eq!(s.fee, 30_000_000); // 0.03 in 9-dec units
        assert_eq!(s.net_in, 9_970_000_000);
        let expected_out = 100u128 * UNIT as u128 * 9_970_000_000 / 109_970_000_000;
        assert_eq!(s.amount_out as u128, expected_out); // ≈ 9.0645 B
        // sole provider holds all shares → delta * shares / SCALE == fee
        let pending =
            pending_reward(100 * UNIT, s.acc_delta, 0).unwrap();
        assert_eq!(pending, s.fee);
    }

    #[test]
    fn swap_output_strictly_below_reserve() {
        // Sell an enormous amount into a small pool — output must stay < reserve.
        let s = compute_swap(u64::MAX / 2, 30, 1_000, 1_000, 1_000).unwrap();
        assert!(s.amount_out < 1_000);
    }

    #[test]
    fn swap_product_never_decreases() {
        let (ra, rb) = (123_456_789u64, 987_654_321u64);
        let s = compute_swap(5 * UNIT, 30, ra, rb, UNIT).unwrap();
        let k0 = ra as u128 * rb as u128;
        let k1 = (ra as u128 + s.net_in as u128) * (rb as u128 - s.amount_out as u128);
        assert!(k1 >= k0);
    }

    #[test]
    fn tiny_swap_rejected_as_zero_output() {
        // 1 unit against huge reserves floors to zero output
        assert!(compute_swap(1, 30, u64::MAX / 4, 10, 1_000).is_err());
    }

    #[test]
    fn zero_fee_pool_accrues_nothing() {
        let s = compute_swap(10 * UNIT, 0, 100 * UNIT, 100 * UNIT, 100 * UNIT).unwrap();
        assert_eq!(s.fee, 0);
        assert_eq!(s.acc_delta, 0);
        assert_eq!(s.net_in, 10 * UNIT);
    }

    #[test]
    fn acc_delta_divide_first_matches_naive() {
        // Small values where the naive fee*SCALE/shares cannot overflow
        let fee = 30_000_000u128;
        let shares = 100 * UNIT;
        assert_eq!(
            acc_delta(fee, shares).unwrap(),
            fee * ACC_SCALE / shares as u128
        );
    }

    #[test]
    fn pending_is_zero_right_after_debt_snapshot() {
        let acc = 300_000_000u128;
        let shares = 100 * UNIT;
        let debt = reward_debt(shares, acc).unwrap();
        assert_eq!(pending_reward(shares, acc, debt).unwrap(), 0);
    }
}
