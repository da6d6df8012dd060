//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the Simple-Pool SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Pool discovery ───────────────────────────────────────────────────────
    /// No pool exists for the given mint pair in either PDA ordering.
    #[error("Pool not found for mints {0} / {1}")]
    PoolNotFound(Pubkey, Pubkey),

    /// The pool exists but holds no liquidity (total_shares == 0).
    #[error("Pool has no liquidity — seed it with add_liquidity first")]
    NoLiquidity,

    // ── Quoting ──────────────────────────────────────────────────────────────
    /// The requested swap is too small to produce any output.
    #[error("Swap of {amount_in} would produce zero output at current reserves")]
    ZeroOutput { amount_in: u64 },

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in fee / swap math")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
