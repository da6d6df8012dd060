//! Pool Model — pure constant-product pool accounting with per-share rewards
//!
//! This crate mirrors the accounting core of `programs/simple-pool` with no
//! chain runtime attached: a fake token ledger stands in for the SPL token
//! program, and each operation is a single atomic state transition that
//! either fully applies or leaves everything untouched.
//!
//! It exists so the pool's invariants can be exercised directly from Rust —
//! unit scenarios here, randomized operation sequences under proptest in
//! `tests/properties.rs`.

pub mod ledger;
pub mod pool;

pub use ledger::{Addr, Asset, TokenLedger};
pub use pool::{PoolModel, Position};

/// Basis-point denominator (10,000 bps = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Fixed-point scale for the reward-per-share accumulators (1e12).
/// Must match `simple_pool::constants::ACC_SCALE`.
pub const ACC_SCALE: u128 = 1_000_000_000_000;

/// Error taxonomy for pool operations.
///
/// Every error is detected before any state mutation; a returned error means
/// the operation had no effect at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Zero input amount or a deposit too small to mint any share
    InvalidAmount,
    /// The caller cannot fund the token pull
    InsufficientBalance,
    /// Burn exceeds the caller's share balance
    InsufficientShares,
    /// Swap or removal against a pool that holds no liquidity
    PoolNotSeeded,
    /// Swap too small to produce a nonzero output at current reserves
    ZeroOutput,
    /// Arithmetic overflow
    Overflow,
    /// Internal consistency check failed — unreachable in a correct build
    InvariantViolation,
}

pub type Result<T> = core::result::Result<T, PoolError>;
