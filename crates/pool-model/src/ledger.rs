//! Fake token ledger — the injected Token Capability.
//!
//! Models the boundary the pool actually depends on: balance query and
//! transfer. Supply logic is reduced to a test-only `mint`.

use std::collections::HashMap;

use crate::{PoolError, Result};

/// Account address in the model. 0 is conventionally the pool itself.
pub type Addr = u64;

/// The two pool assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    A,
    B,
}

impl Asset {
    /// The asset on the other side of the pool.
    pub fn other(self) -> Asset {
        match self {
            Asset::A => Asset::B,
            Asset::B => Asset::A,
        }
    }
}

/// In-memory balances for both assets, keyed by address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: HashMap<(Addr, Asset), u64>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, addr: Addr, asset: Asset) -> u64 {
        self.balances.get(&(addr, asset)).copied().unwrap_or(0)
    }

    /// Test-only supply faucet.
    pub fn mint(&mut self, to: Addr, asset: Asset, amount: u64) {
        let entry = self.balances.entry((to, asset)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Move `amount` between addresses; fails without touching anything if
    /// the sender cannot cover it.
    pub fn transfer(&mut self, from: Addr, to: Addr, asset: Asset, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let from_balance = self.balance_of(from, asset);
        if from_balance < amount {
            return Err(PoolError::InsufficientBalance);
        }
        let to_balance = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;
        self.balances.insert((from, asset), from_balance - amount);
        self.balances.insert((to, asset), to_balance);
        Ok(())
    }

    /// Total supply across all holders, per asset. Conserved by `transfer`.
    pub fn total_supply(&self, asset: Asset) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, amt)| *amt as u128)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_moves_balance() {
        let mut ledger = TokenLedger::new();
        ledger.mint(1, Asset::A, 100);
        ledger.transfer(1, 2, Asset::A, 40).unwrap();
        assert_eq!(ledger.balance_of(1, Asset::A), 60);
        assert_eq!(ledger.balance_of(2, Asset::A), 40);
    }

    #[test]
    fn overdraft_rejected_without_effect() {
        let mut ledger = TokenLedger::new();
        ledger.mint(1, Asset::A, 10);
        assert_eq!(
            ledger.transfer(1, 2, Asset::A, 11),
            Err(PoolError::InsufficientBalance)
        );
        assert_eq!(ledger.balance_of(1, Asset::A), 10);
        assert_eq!(ledger.balance_of(2, Asset::A), 0);
    }

    #[test]
    fn assets_are_independent() {
        let mut ledger = TokenLedger::new();
        ledger.mint(1, Asset::A, 5);
        assert_eq!(ledger.balance_of(1, Asset::B), 0);
        assert_eq!(ledger.transfer(1, 2, Asset::B, 1), Err(PoolError::InsufficientBalance));
    }
}
