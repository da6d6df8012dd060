//! On-chain account deserialization.
//!
//! Parses raw account bytes for `Pool` (228 bytes) and `Position` (113 bytes).
//! Byte offsets mirror the Anchor `#[account]` layout exactly.

use solana_sdk::pubkey::Pubkey;
use crate::error::{Error, Result};

// ─── Pool ─────────────────────────────────────────────────────────────────────

/// Deserialized `Pool` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// authority(32)  authority_bump(1)  token_a_mint(32)  token_b_mint(32)
/// token_a_vault(32)  token_b_vault(32)  reserve_a(8)  reserve_b(8)
/// total_shares(8)  fee_bps(2)
/// acc_reward_per_share_a(16)  acc_reward_per_share_b(16)  bump(1)  = 228 bytes
/// ```
#[derive(Debug, Clone)]
pub struct PoolState {
    pub token_a_mint:           Pubkey,
    pub token_b_mint:           Pubkey,
    pub token_a_vault:          Pubkey,
    pub token_b_vault:          Pubkey,
    /// Tradable reserve of token A (excludes unclaimed fees and dust).
    pub reserve_a:              u64,
    /// Tradable reserve of token B (excludes unclaimed fees and dust).
    pub reserve_b:              u64,
    pub total_shares:           u64,
    pub fee_bps:                u16,
    /// Cumulative fee-per-share for token A, scaled by 1e12.
    pub acc_reward_per_share_a: u128,
    /// Cumulative fee-per-share for token B, scaled by 1e12.
    pub acc_reward_per_share_b: u128,
}

/// Deserialize a `Pool` account from raw bytes.
pub fn parse_pool(data: &[u8]) -> Result<PoolState> {
    const EXPECTED: usize = 228;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Pool account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(PoolState {
        token_a_mint:           read_pubkey(data, 41)?,
        token_b_mint:           read_pubkey(data, 73)?,
        token_a_vault:          read_pubkey(data, 105)?,
        token_b_vault:          read_pubkey(data, 137)?,
        reserve_a:              read_u64(data, 169)?,
        reserve_b:              read_u64(data, 177)?,
        total_shares:           read_u64(data, 185)?,
        fee_bps:                read_u16(data, 193)?,
        acc_reward_per_share_a: read_u128(data, 195)?,
        acc_reward_per_share_b: read_u128(data, 211)?,
    })
}

// ─── Position ─────────────────────────────────────────────────────────────────

/// Deserialized `Position` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  pool(32)  shares(8)
/// reward_debt_a(16)  reward_debt_b(16)  bump(1)  = 113 bytes
/// ```
#[derive(Debug, Clone)]
pub struct PositionState {
    pub owner:         Pubkey,
    pub pool:          Pubkey,
    pub shares:        u64,
    /// Accumulator snapshot (scaled by shares) at last settle.
    pub reward_debt_a: u128,
    /// Accumulator snapshot (scaled by shares) at last settle.
    pub reward_debt_b: u128,
}

/// Deserialize a `Position` account from raw bytes.
pub fn parse_position(data: &[u8]) -> Result<PositionState> {
    const EXPECTED: usize = 113;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Position account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(PositionState {
        owner:         read_pubkey(data, 8)?,
        pool:          read_pubkey(data, 40)?,
        shares:        read_u64(data, 72)?,
        reward_debt_a: read_u128(data, 80)?,
        reward_debt_b: read_u128(data, 96)?,
    })
}

// ─── SPL token account ────────────────────────────────────────────────────────

/// Read the `amount` field from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_amount(data: &[u8]) -> Result<u64> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    read_u64(data, 64)
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let b: [u8; 32] = data[offset..offset + 32]
        .try_into()
        .map_err(|_| Error::ParseError {
            offset,
            reason: "slice too short for Pubkey (32 bytes)".into(),
        })?;
    Ok(Pubkey::from(b))
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let b: [u8; 2] = data[offset..offset + 2]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u16".into() })?;
    Ok(u16::from_le_bytes(b))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u64".into() })?;
    Ok(u64::from_le_bytes(b))
}

pub(crate) fn read_u128(data: &[u8], offset: usize) -> Result<u128> {
    let b: [u8; 16] = data[offset..offset + 16]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u128".into() })?;
    Ok(u128::from_le_bytes(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool_bytes() -> Vec<u8> {
        let mut data = vec![0u8; 228];
        data[..8].copy_from_slice(&[1; 8]); // discriminator, ignored
        data[41..73].copy_from_slice(&[2; 32]); // token_a_mint
        data[73..105].copy_from_slice(&[3; 32]); // token_b_mint
        data[169..177].copy_from_slice(&100_000_000_000u64.to_le_bytes()); // reserve_a
        data[177..185].copy_from_slice(&90_935_000_000u64.to_le_bytes()); // reserve_b
        data[185..193].copy_from_slice(&100_000_000_000u64.to_le_bytes()); // total_shares
        data[193..195].copy_from_slice(&30u16.to_le_bytes()); // fee_bps
        data[195..211].copy_from_slice(&300_000_000u128.to_le_bytes()); // acc_a
        data
    }

    #[test]
    fn parses_pool_fields_at_documented_offsets() {
        let pool = parse_pool(&sample_pool_bytes()).unwrap();
        assert_eq!(pool.token_a_mint, Pubkey::from([2; 32]));
        assert_eq!(pool.token_b_mint, Pubkey::from([3; 32]));
        assert_eq!(pool.reserve_a, 100_000_000_000);
        assert_eq!(pool.reserve_b, 90_935_000_000);
        assert_eq!(pool.total_shares, 100_000_000_000);
        assert_eq!(pool.fee_bps, 30);
        assert_eq!(pool.acc_reward_per_share_a, 300_000_000);
        assert_eq!(pool.acc_reward_per_share_b, 0);
    }

    #[test]
    fn short_pool_account_rejected() {
        assert!(parse_pool(&[0u8; 100]).is_err());
    }

    #[test]
    fn parses_position_fields() {
        let mut data = vec![0u8; 113];
        data[8..40].copy_from_slice(&[7; 32]); // owner
        data[72..80].copy_from_slice(&42u64.to_le_bytes()); // shares
        data[80..96].copy_from_slice(&5u128.to_le_bytes()); // reward_debt_a
        let pos = parse_position(&data).unwrap();
        assert_eq!(pos.owner, Pubkey::from([7; 32]));
        assert_eq!(pos.shares, 42);
        assert_eq!(pos.reward_debt_a, 5);
        assert_eq!(pos.reward_debt_b, 0);
    }

    #[test]
    fn token_amount_at_offset_64() {
        let mut data = vec![0u8; 165];
        data[64..72].copy_from_slice(&123u64.to_le_bytes());
        assert_eq!(parse_token_amount(&data).unwrap(), 123);
    }
}
