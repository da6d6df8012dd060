use anchor_lang::prelude::*;

#[error_code]
pub enum PoolError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Burn or claim exceeds the caller's share balance")]
    InsufficientShares,
    #[msg("Pool holds no liquidity yet")]
    PoolNotSeeded,
    #[msg("Swap too small to produce any output at current reserves")]
    ZeroOutput,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Fee rate must be below 10000 bps")]
    InvalidFeeRate,
    #[msg("Token mint does not match pool")]
    MintMismatch,
    #[msg("Internal accounting invariant violated")]
    InvariantViolation,
}
