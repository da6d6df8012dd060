//! Async RPC client for the simple-pool program.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

use crate::error::{Error, Result};
use crate::instructions::{self, PROGRAM_ID};
use crate::math;
use crate::state::{self, PoolState, PositionState};
use crate::types::*;

/// High-level client: pool discovery, account parsing, transaction assembly.
///
/// All state-changing methods build, sign, and confirm a single transaction
/// and return its signature. Read methods never send transactions.
pub struct SimplePoolClient {
    rpc:        RpcClient,
    program_id: Pubkey,
}

impl SimplePoolClient {
    /// Connect to a custom RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), CommitmentConfig::confirmed()),
            program_id: PROGRAM_ID,
        }
    }

    /// Connect to the public devnet endpoint.
    pub fn devnet() -> Self {
        Self::new("https://api.devnet.solana.com")
    }

    /// Connect to the public mainnet-beta endpoint.
    pub fn mainnet() -> Self {
        Self::new("https://api.mainnet-beta.solana.com")
    }

    /// Override the program id (for local validators or forks).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    // ── Pool discovery ───────────────────────────────────────────────────────

    /// Find the pool for a mint pair, trying both PDA orderings.
    ///
    /// Returns the pool address, its parsed state, and whether `mint_x` is
    /// the pool's token A.
    pub async fn find_pool(
        &self,
        mint_x: &Pubkey,
        mint_y: &Pubkey,
    ) -> Result<(Pubkey, PoolState, bool)> {
        // An unparsable account at a candidate address is "not this pool",
        // not a hard error — keep probing the reverse ordering.
        let (addr_xy, _) = instructions::derive_pool(&self.program_id, mint_x, mint_y);
        if let Ok(acc) = self.rpc.get_account(&addr_xy).await {
            if let Ok(pool) = state::parse_pool(&acc.data) {
                return Ok((addr_xy, pool, true));
            }
        }
        let (addr_yx, _) = instructions::derive_pool(&self.program_id, mint_y, mint_x);
        if let Ok(acc) = self.rpc.get_account(&addr_yx).await {
            if let Ok(pool) = state::parse_pool(&acc.data) {
                return Ok((addr_yx, pool, false));
            }
        }
        Err(Error::PoolNotFound(*mint_x, *mint_y))
    }

    // ── State-changing calls ─────────────────────────────────────────────────

    /// Create a pool for a mint pair with a fixed fee rate.
    ///
    /// Generates the two vault keypairs internally; the payer funds the pool
    /// account and both vaults.
    pub async fn create_pool(&self, payer: &Keypair, params: CreatePoolParams) -> Result<TxOutcome> {
        if params.fee_bps >= 10_000 {
            return Err(Error::InvalidArgument(format!(
                "fee_bps must be below 10000, got {}",
                params.fee_bps
            )));
        }
        let vault_a = Keypair::new();
        let vault_b = Keypair::new();
        let (pool, _) = instructions::derive_pool(&self.program_id, &params.mint_a, &params.mint_b);

        let ix = instructions::initialize_pool(
            &self.program_id,
            &payer.pubkey(),
            &params.mint_a,
            &params.mint_b,
            &vault_a.pubkey(),
            &vault_b.pubkey(),
            params.fee_bps,
        );
        let sig = self
            .send(&[ix], payer, &[payer, &vault_a, &vault_b])
            .await?;
        Ok(TxOutcome { signature: sig, pool })
    }

    /// Deposit up to `amount_a` / `amount_b`; the program clips to the reserve
    /// ratio and pulls only what it uses.
    pub async fn add_liquidity(
        &self,
        payer: &Keypair,
        params: AddLiquidityParams,
    ) -> Result<TxOutcome> {
        let (pool, pool_state, a_is_pool_a) =
            self.find_pool(&params.mint_a, &params.mint_b).await?;
        // The pool may have been created with the opposite mint order; the
        // instruction's slots are pool-ordered, so remap the amounts.
        let (amount_a, amount_b) = to_pool_order(a_is_pool_a, params.amount_a, params.amount_b);
        let user = payer.pubkey();
        let ix = instructions::add_liquidity(
            &self.program_id,
            &user,
            &pool,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &instructions::derive_ata(&user, &pool_state.token_a_mint),
            &instructions::derive_ata(&user, &pool_state.token_b_mint),
            amount_a,
            amount_b,
        );
        let sig = self.send(&[ix], payer, &[payer]).await?;
        Ok(TxOutcome { signature: sig, pool })
    }

    /// Burn shares and withdraw the proportional reserves plus any pending
    /// rewards.
    pub async fn remove_liquidity(
        &self,
        payer: &Keypair,
        params: RemoveLiquidityParams,
    ) -> Result<TxOutcome> {
        let (pool, pool_state, _) = self.find_pool(&params.mint_a, &params.mint_b).await?;
        let user = payer.pubkey();
        let ix = instructions::remove_liquidity(
            &self.program_id,
            &user,
            &pool,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &instructions::derive_ata(&user, &pool_state.token_a_mint),
            &instructions::derive_ata(&user, &pool_state.token_b_mint),
            params.shares,
        );
        let sig = self.send(&[ix], payer, &[payer]).await?;
        Ok(TxOutcome { signature: sig, pool })
    }

    /// Swap `amount_in` of `mint_in` for `mint_out`.
    ///
    /// Creates the output token account idempotently in the same transaction.
    pub async fn swap(&self, payer: &Keypair, params: SwapParams) -> Result<TxOutcome> {
        let (pool, pool_state, in_is_a) = self.find_pool(&params.mint_in, &params.mint_out).await?;
        let user = payer.pubkey();
        let user_in  = instructions::derive_ata(&user, &params.mint_in);
        let user_out = instructions::derive_ata(&user, &params.mint_out);

        let create_out = instructions::create_ata_idempotent(&user, &user, &params.mint_out);
        let swap_ix = instructions::swap(
            &self.program_id,
            &user,
            &pool,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &user_in,
            &user_out,
            params.amount_in,
            in_is_a,
        );
        let sig = self.send(&[create_out, swap_ix], payer, &[payer]).await?;
        Ok(TxOutcome { signature: sig, pool })
    }

    /// Pay out all pending fee rewards for the payer's position.
    pub async fn claim_rewards(
        &self,
        payer: &Keypair,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
    ) -> Result<TxOutcome> {
        let (pool, pool_state, _) = self.find_pool(mint_a, mint_b).await?;
        let user = payer.pubkey();
        let ix = instructions::claim_rewards(
            &self.program_id,
            &user,
            &pool,
            &pool_state.token_a_vault,
            &pool_state.token_b_vault,
            &instructions::derive_ata(&user, &pool_state.token_a_mint),
            &instructions::derive_ata(&user, &pool_state.token_b_mint),
        );
        let sig = self.send(&[ix], payer, &[payer]).await?;
        Ok(TxOutcome { signature: sig, pool })
    }

    // ── Read surface ─────────────────────────────────────────────────────────

    /// Pool snapshot with derived spot price and live vault balances.
    pub async fn pool_info(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Result<PoolInfo> {
        let (addr, pool, _) = self.find_pool(mint_a, mint_b).await?;
        let vault_a = self.rpc.get_account(&pool.token_a_vault).await?;
        let vault_b = self.rpc.get_account(&pool.token_b_vault).await?;
        let spot = if pool.reserve_a == 0 {
            0.0
        } else {
            pool.reserve_b as f64 / pool.reserve_a as f64
        };
        Ok(PoolInfo {
            address:                addr,
            token_a_mint:           pool.token_a_mint,
            token_b_mint:           pool.token_b_mint,
            token_a_vault:          pool.token_a_vault,
            token_b_vault:          pool.token_b_vault,
            reserve_a:              pool.reserve_a,
            reserve_b:              pool.reserve_b,
            total_shares:           pool.total_shares,
            fee_bps:                pool.fee_bps,
            spot_price_a_in_b:      spot,
            acc_reward_per_share_a: pool.acc_reward_per_share_a,
            acc_reward_per_share_b: pool.acc_reward_per_share_b,
            vault_balance_a:        state::parse_token_amount(&vault_a.data)?,
            vault_balance_b:        state::parse_token_amount(&vault_b.data)?,
        })
    }

    /// An owner's position: share balance, pool fraction, pending rewards.
    pub async fn position_info(
        &self,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        owner: &Pubkey,
    ) -> Result<PositionInfo> {
        let (pool_addr, pool, _) = self.find_pool(mint_a, mint_b).await?;
        let (pos_addr, pos) = self.fetch_position(&pool_addr, owner).await?;
        let (pending_a, pending_b) = math::pending_rewards_for_position(&pos, &pool);
        let share_pct = if pool.total_shares == 0 {
            0.0
        } else {
            pos.shares as f64 / pool.total_shares as f64 * 100.0
        };
        Ok(PositionInfo {
            address: pos_addr,
            owner: pos.owner,
            pool: pos.pool,
            shares: pos.shares,
            share_pct,
            pending_reward_a: pending_a,
            pending_reward_b: pending_b,
        })
    }

    /// Pending `(reward_a, reward_b)` without the rest of the position data.
    pub async fn pending_rewards(
        &self,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        owner: &Pubkey,
    ) -> Result<(u64, u64)> {
        let (pool_addr, pool, _) = self.find_pool(mint_a, mint_b).await?;
        let (_, pos) = self.fetch_position(&pool_addr, owner).await?;
        Ok(math::pending_rewards_for_position(&pos, &pool))
    }

    /// Off-chain swap preview against current reserves. No transaction sent.
    pub async fn simulate(&self, params: SimulateParams) -> Result<SimulateResult> {
        let (addr, pool, in_is_a) = self.find_pool(&params.mint_in, &params.mint_out).await?;
        let (reserve_in, reserve_out) = if in_is_a {
            (pool.reserve_a, pool.reserve_b)
        } else {
            (pool.reserve_b, pool.reserve_a)
        };
        math::simulate_detailed(addr, &pool, reserve_in, reserve_out, params.amount_in, in_is_a)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    async fn fetch_position(
        &self,
        pool: &Pubkey,
        owner: &Pubkey,
    ) -> Result<(Pubkey, PositionState)> {
        let (addr, _) = instructions::derive_position(&self.program_id, pool, owner);
        let acc = self.rpc.get_account(&addr).await?;
        Ok((addr, state::parse_position(&acc.data)?))
    }

    async fn send(
        &self,
        ixs: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> Result<String> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            ixs,
            Some(&payer.pubkey()),
            signers,
            blockhash,
        );
        let sig = self.rpc.send_and_confirm_transaction(&tx).await?;
        Ok(sig.to_string())
    }
}

/// Map caller-ordered deposit amounts into the pool's token-A/token-B order.
///
/// `caller_a_is_pool_a` is the orientation flag from [`SimplePoolClient::find_pool`]:
/// when false, the caller's mint A is the pool's token B and the amounts
/// must cross over.
fn to_pool_order(caller_a_is_pool_a: bool, amount_a: u64, amount_b: u64) -> (u64, u64) {
    if caller_a_is_pool_a {
        (amount_a, amount_b)
    } else {
        (amount_b, amount_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_order_passes_amounts_through() {
        assert_eq!(to_pool_order(true, 5_000_000_000, 900_000_000), (5_000_000_000, 900_000_000));
    }

    #[test]
    fn reversed_order_crosses_amounts_over() {
        // Pool created as (USDC, SOL), caller deposits (SOL, USDC): the SOL
        // quantity must land in the pool's token-B slot and vice versa.
        assert_eq!(to_pool_order(false, 5_000_000_000, 900_000_000), (900_000_000, 5_000_000_000));
    }
}
