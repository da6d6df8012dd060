/// PDA seeds
pub const POOL_SEED: &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_authority";

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Fixed-point scale for the reward-per-share accumulators (1e12)
pub const ACC_SCALE: u128 = 1_000_000_000_000;
