//! Simple-Pool Rust SDK
//!
//! Client for the simple-pool constant-product AMM on Solana: swaps,
//! liquidity provision, and fee-reward claims with zero boilerplate — no
//! Anchor dependency required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use simple_pool_sdk::{SimplePoolClient, SimulateParams};
//! use solana_sdk::pubkey::Pubkey;
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SimplePoolClient::devnet();
//!
//!     let mint_a = Pubkey::from_str("So11111111111111111111111111111111111111112")?;
//!     let mint_b = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")?;
//!
//!     let sim = client.simulate(SimulateParams {
//!         mint_in: mint_a, mint_out: mint_b, amount_in: 1_000_000_000,
//!     }).await?;
//!     println!("Estimated out: {}  price impact: {:.2}%", sim.estimated_out, sim.price_impact_pct);
//!     Ok(())
//! }
//! ```
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`SimplePoolClient::create_pool`] | Create a pool for a mint pair |
//! | [`SimplePoolClient::add_liquidity`] | Deposit both assets, receive shares |
//! | [`SimplePoolClient::remove_liquidity`] | Burn shares, withdraw reserves |
//! | [`SimplePoolClient::swap`] | Atomic token swap |
//! | [`SimplePoolClient::claim_rewards`] | Pay out accrued fee rewards |
//! | [`SimplePoolClient::simulate`] | Off-chain fee + output preview |
//! | [`SimplePoolClient::pool_info`] | Reserves, shares, fee rate |
//! | [`SimplePoolClient::position_info`] | Shares + pending rewards for an owner |

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;
pub mod types;

pub use client::SimplePoolClient;
pub use error::{Error, Result};
pub use types::*;
