use anchor_lang::prelude::*;

// ─── Pool ──────────────────────────────────────────────────────────────────
// Constant-product pool (x * y = k) with per-share fee rewards.
// Authority is a PDA that owns both token vaults — no human key required.
//
// Reserves are tracked here rather than read from the vaults: the vault
// balance also holds unclaimed fee tokens and withdrawal dust, neither of
// which is tradable reserve. Invariant: vault.amount >= reserve at all times.
#[account]
pub struct Pool {
    /// PDA that owns token_a_vault and token_b_vault
    pub authority: Pubkey,              // 32
    pub authority_bump: u8,             // 1
    pub token_a_mint: Pubkey,           // 32
    pub token_b_mint: Pubkey,           // 32
    pub token_a_vault: Pubkey,          // 32
    pub token_b_vault: Pubkey,          // 32
    /// Tradable reserve of token A (excludes accrued fees and dust)
    pub reserve_a: u64,                 // 8
    /// Tradable reserve of token B (excludes accrued fees and dust)
    pub reserve_b: u64,                 // 8
    /// Total liquidity shares outstanding (tracked in Pool, not via a mint)
    pub total_shares: u64,              // 8
    /// Trading fee rate in basis points (e.g. 30 = 0.30 %), immutable
    pub fee_bps: u16,                   // 2
    /// Cumulative fee income per share, scaled by ACC_SCALE; never decreases
    pub acc_reward_per_share_a: u128,   // 16
    pub acc_reward_per_share_b: u128,   // 16
    pub bump: u8,                       // 1
}

impl Pool {
    // 8 discriminator + 32+1+32+32+32+32+8+8+8+2+16+16+1 = 228
    pub const LEN: usize = 228;
}

// ─── Position ──────────────────────────────────────────────────────────────
// One provider's share balance in a single pool. Created lazily on first
// deposit and never closed; zero shares is equivalent to no position.
#[account]
pub struct Position {
    pub owner: Pubkey,        // 32
    pub pool: Pubkey,         // 32
    /// Liquidity shares this position holds
    pub shares: u64,          // 8
    /// shares * acc_reward_per_share / ACC_SCALE, snapshotted at last settle
    pub reward_debt_a: u128,  // 16
    pub reward_debt_b: u128,  // 16
    pub bump: u8,             // 1
}

impl Position {
    // 8 + 32+32+8+16+16+1 = 113
    pub const LEN: usize = 113;
}
