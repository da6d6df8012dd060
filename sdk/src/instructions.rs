//! PDA derivation and raw instruction builders.
//!
//! Builders mirror the on-chain account ordering exactly; data is the 8-byte
//! Anchor discriminator followed by little-endian arguments.

use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    pubkey,
    pubkey::Pubkey,
    system_program,
    sysvar,
};

/// Deployed program id.
pub const PROGRAM_ID: Pubkey = pubkey!("C7dn4fvUif9MMs4JC3EtzstAj7gkAae9bpnuWb8Q44k4");

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

// ─── PDA derivation ───────────────────────────────────────────────────────────

/// Derive the pool PDA for an ordered mint pair.
pub fn derive_pool(program_id: &Pubkey, mint_a: &Pubkey, mint_b: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"pool", mint_a.as_ref(), mint_b.as_ref()], program_id)
}

/// Derive the vault-authority PDA for a pool.
pub fn derive_pool_authority(program_id: &Pubkey, pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"pool_authority", pool.as_ref()], program_id)
}

/// Derive a user's position PDA in a pool.
pub fn derive_position(program_id: &Pubkey, pool: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"position", pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the associated token account for `(owner, mint)`.
pub fn derive_ata(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Build a `CreateIdempotent` instruction for the associated-token program.
/// Safe to include even when the account already exists.
pub fn create_ata_idempotent(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    let ata = derive_ata(owner, mint);
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: vec![1], // CreateIdempotent
    }
}

/// Anchor global-instruction discriminator: `sha256("global:{name}")[..8]`.
fn disc(name: &str) -> [u8; 8] {
    let h = hash(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&h.to_bytes()[..8]);
    out
}

// ─── Builders ─────────────────────────────────────────────────────────────────

/// `initialize_pool(fee_bps)` — the vault accounts are fresh keypairs that
/// must co-sign the transaction.
#[allow(clippy::too_many_arguments)]
pub fn initialize_pool(
    program_id: &Pubkey,
    creator: &Pubkey,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
    token_a_vault: &Pubkey,
    token_b_vault: &Pubkey,
    fee_bps: u16,
) -> Instruction {
    let (pool, _) = derive_pool(program_id, mint_a, mint_b);
    let (pool_authority, _) = derive_pool_authority(program_id, &pool);

    let mut data = disc("initialize_pool").to_vec();
    data.extend_from_slice(&fee_bps.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new_readonly(*mint_b, false),
            AccountMeta::new(pool, false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(*token_a_vault, true),
            AccountMeta::new(*token_b_vault, true),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

/// `add_liquidity(amount_a, amount_b)`
#[allow(clippy::too_many_arguments)]
pub fn add_liquidity(
    program_id: &Pubkey,
    user: &Pubkey,
    pool: &Pubkey,
    token_a_vault: &Pubkey,
    token_b_vault: &Pubkey,
    user_token_a: &Pubkey,
    user_token_b: &Pubkey,
    amount_a: u64,
    amount_b: u64,
) -> Instruction {
    let (pool_authority, _) = derive_pool_authority(program_id, pool);
    let (position, _) = derive_position(program_id, pool, user);

    let mut data = disc("add_liquidity").to_vec();
    data.extend_from_slice(&amount_a.to_le_bytes());
    data.extend_from_slice(&amount_b.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(*pool, false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position, false),
            AccountMeta::new(*token_a_vault, false),
            AccountMeta::new(*token_b_vault, false),
            AccountMeta::new(*user_token_a, false),
            AccountMeta::new(*user_token_b, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

/// `remove_liquidity(shares)`
#[allow(clippy::too_many_arguments)]
pub fn remove_liquidity(
    program_id: &Pubkey,
    user: &Pubkey,
    pool: &Pubkey,
    token_a_vault: &Pubkey,
    token_b_vault: &Pubkey,
    user_token_a: &Pubkey,
    user_token_b: &Pubkey,
    shares: u64,
) -> Instruction {
    let (pool_authority, _) = derive_pool_authority(program_id, pool);
    let (position, _) = derive_position(program_id, pool, user);

    let mut data = disc("remove_liquidity").to_vec();
    data.extend_from_slice(&shares.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(*pool, false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position, false),
            AccountMeta::new(*token_a_vault, false),
            AccountMeta::new(*token_b_vault, false),
            AccountMeta::new(*user_token_a, false),
            AccountMeta::new(*user_token_b, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data,
    }
}

/// `swap(amount_in, a_to_b)` — `user_token_in`/`user_token_out` must match
/// the trade direction.
#[allow(clippy::too_many_arguments)]
pub fn swap(
    program_id: &Pubkey,
    user: &Pubkey,
    pool: &Pubkey,
    token_a_vault: &Pubkey,
    token_b_vault: &Pubkey,
    user_token_in: &Pubkey,
    user_token_out: &Pubkey,
    amount_in: u64,
    a_to_b: bool,
) -> Instruction {
    let (pool_authority, _) = derive_pool_authority(program_id, pool);

    let mut data = disc("swap").to_vec();
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.push(a_to_b as u8);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(*pool, false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(*token_a_vault, false),
            AccountMeta::new(*token_b_vault, false),
            AccountMeta::new(*user_token_in, false),
            AccountMeta::new(*user_token_out, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data,
    }
}

/// `claim_rewards()`
pub fn claim_rewards(
    program_id: &Pubkey,
    user: &Pubkey,
    pool: &Pubkey,
    token_a_vault: &Pubkey,
    token_b_vault: &Pubkey,
    user_token_a: &Pubkey,
    user_token_b: &Pubkey,
) -> Instruction {
    let (pool_authority, _) = derive_pool_authority(program_id, pool);
    let (position, _) = derive_position(program_id, pool, user);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*user, true),
            AccountMeta::new(*pool, false),
            AccountMeta::new_readonly(pool_authority, false),
            AccountMeta::new(position, false),
            AccountMeta::new(*token_a_vault, false),
            AccountMeta::new(*token_b_vault, false),
            AccountMeta::new(*user_token_a, false),
            AccountMeta::new(*user_token_b, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: disc("claim_rewards").to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_pda_is_order_sensitive() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_ne!(
            derive_pool(&PROGRAM_ID, &a, &b).0,
            derive_pool(&PROGRAM_ID, &b, &a).0
        );
    }

    #[test]
    fn swap_data_encodes_direction_flag() {
        let ix = swap(
            &PROGRAM_ID,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            42,
            true,
        );
        assert_eq!(ix.data.len(), 8 + 8 + 1);
        assert_eq!(&ix.data[8..16], &42u64.to_le_bytes());
        assert_eq!(ix.data[16], 1);
    }

    #[test]
    fn add_liquidity_marks_user_as_signer() {
        let user = Pubkey::new_unique();
        let ix = add_liquidity(
            &PROGRAM_ID,
            &user,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            1,
            1,
        );
        assert_eq!(ix.accounts[0].pubkey, user);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
    }
}
