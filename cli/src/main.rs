use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use serde_json::json;
use simple_pool_sdk::{
    instructions::PROGRAM_ID,
    state::parse_position,
    AddLiquidityParams, CreatePoolParams, RemoveLiquidityParams, SimplePoolClient,
    SimulateParams, SwapParams,
};
use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::str::FromStr;

// ─── Token symbol registry (mainnet-beta) ────────────────────────────────────

const KNOWN_TOKENS: &[(&str, &str)] = &[
    ("SOL",  "So11111111111111111111111111111111111111112"),
    ("USDC", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
    ("USDT", "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB"),
];

/// Resolve a symbol (SOL, USDC, USDT) or raw base-58 mint address to a Pubkey.
fn resolve_mint(symbol_or_address: &str) -> Result<Pubkey> {
    let upper = symbol_or_address.to_uppercase();
    for (sym, addr) in KNOWN_TOKENS {
        if upper == *sym {
            return Ok(Pubkey::from_str(addr)?);
        }
    }
    Pubkey::from_str(symbol_or_address).map_err(|_| {
        anyhow!(
            "Unknown token '{}'. Use a built-in symbol ({}) or a base-58 mint address.",
            symbol_or_address,
            KNOWN_TOKENS.iter().map(|(s, _)| *s).collect::<Vec<_>>().join(", ")
        )
    })
}

/// Reverse-lookup: mint address → symbol, or shortened address for unknowns.
fn resolve_symbol(mint: &Pubkey) -> String {
    let addr = mint.to_string();
    for (sym, known) in KNOWN_TOKENS {
        if addr == *known {
            return sym.to_string();
        }
    }
    format!("{}…{}", &addr[..4], &addr[addr.len() - 4..])
}

/// Split a `A-B` pair string into `(sym_a, sym_b, mint_a, mint_b)`.
fn parse_pair(pair: &str) -> Result<(String, String, Pubkey, Pubkey)> {
    let (a, b) = pair.split_once('-').ok_or_else(|| {
        anyhow!("--pair must look like 'SOL-USDC' or '<MINT_A>-<MINT_B>', got '{pair}'")
    })?;
    let mint_a = resolve_mint(a)?;
    let mint_b = resolve_mint(b)?;
    if mint_a == mint_b {
        return Err(anyhow!("--pair must name two different tokens"));
    }
    Ok((resolve_symbol(&mint_a), resolve_symbol(&mint_b), mint_a, mint_b))
}

/// Expand `~/` to `$HOME/` in keypair paths.
fn expand_home(path: &str) -> String {
    if path.starts_with("~/") {
        format!("{}{}", std::env::var("HOME").unwrap_or_default(), &path[1..])
    } else {
        path.to_string()
    }
}

fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded = expand_home(path);
    read_keypair_file(&expanded).map_err(|e| {
        anyhow!(
            "Cannot load keypair from '{}': {}\n  \
             Set POOL_KEYPAIR or pass --keypair to specify a different path.",
            expanded, e
        )
    })
}

// ─── Version banner ───────────────────────────────────────────────────────────

/// Print the Simple-Pool banner to stdout.
fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  Simple-Pool  v{ver}  ·  constant-product AMM on Solana");
    println!("  {}", "─".repeat(62));
    println!("  Program   {PROGRAM_ID}");
    println!("  Fees      0–99.99% per pool, paid to liquidity providers");
    println!("  Docs      https://github.com/simple-pool/simple-pool");
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// Simple-Pool — constant-product AMM with per-share fee rewards.
///
/// Every command supports --json for machine-readable output.
/// Global options can also be set via environment variables:
///   POOL_RPC_URL  — Solana JSON-RPC endpoint
///   POOL_KEYPAIR  — path to Ed25519 keypair JSON
#[derive(Parser)]
#[command(
    name    = "simple-pool",
    version = env!("CARGO_PKG_VERSION"),
    long_version = concat!(
        env!("CARGO_PKG_VERSION"), "\n",
        "Program:  C7dn4fvUif9MMs4JC3EtzstAj7gkAae9bpnuWb8Q44k4\n",
        "Fees:     0-9999 bps, set per pool, paid to liquidity providers\n",
        "License:  MIT",
    ),
    about = "Constant-product AMM on Solana — swaps, liquidity shares, and fee rewards.",
    after_help = "\
ENVIRONMENT:
  POOL_RPC_URL   Solana JSON-RPC endpoint  [default: https://api.devnet.solana.com]
  POOL_KEYPAIR   Path to Ed25519 keypair JSON  [default: ~/.config/solana/id.json]

QUICK START:
  simple-pool init-pool --pair SOL-USDC --fee-bps 30
  simple-pool add       --pair SOL-USDC --amount-a 1000000000 --amount-b 185000000
  simple-pool simulate  --in SOL --out USDC --amount 1000000000
  simple-pool swap      --in SOL --out USDC --amount 1000000000
  simple-pool rewards   --pair SOL-USDC
  simple-pool claim     --pair SOL-USDC

PROGRAM:
  C7dn4fvUif9MMs4JC3EtzstAj7gkAae9bpnuWb8Q44k4"
)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(
        long,
        global = true,
        value_name = "URL",
        default_value = "https://api.devnet.solana.com",
        env = "POOL_RPC_URL"
    )]
    rpc_url: String,

    /// Path to the signing keypair JSON file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "~/.config/solana/id.json",
        env = "POOL_KEYPAIR"
    )]
    keypair: String,

    /// Program id override (local validators, forks)
    #[arg(
        long,
        global = true,
        value_name = "PUBKEY",
        default_value = "C7dn4fvUif9MMs4JC3EtzstAj7gkAae9bpnuWb8Q44k4",
        env = "POOL_PROGRAM_ID"
    )]
    program_id: Pubkey,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new x·y=k pool for a token pair
    ///
    /// The vault authority is a PDA — no human key controls the funds.
    /// The fee rate is fixed at creation and immutable afterwards.
    InitPool {
        /// Token pair, e.g. SOL-USDC or <MINT_A>-<MINT_B>
        #[arg(long)]
        pair: String,
        /// Swap fee in basis points (0–9999)
        #[arg(long, default_value_t = 30)]
        fee_bps: u16,
    },

    /// Deposit both assets and receive liquidity shares
    ///
    /// Deposits above the pool's reserve ratio are clipped: only the
    /// pro-rata part is pulled, the excess never leaves your account.
    /// Pending fee rewards are paid out as part of the deposit.
    Add {
        #[arg(long)]
        pair: String,
        /// Token A to deposit, in raw units (lamports for SOL)
        #[arg(long)]
        amount_a: u64,
        /// Token B to deposit, in raw units. Omit to match the pool ratio.
        #[arg(long)]
        amount_b: Option<u64>,
    },

    /// Burn liquidity shares and withdraw the proportional reserves
    ///
    /// Pending fee rewards are paid out in the same transaction.
    Remove {
        #[arg(long)]
        pair: String,
        /// Number of shares to burn (see `position`)
        #[arg(long)]
        shares: u64,
    },

    /// Swap one token for another through a pool
    ///
    /// The fee is taken from the input and distributed to liquidity
    /// providers; the net amount trades against the curve.
    Swap {
        /// Token to sell (symbol or mint address)
        #[arg(long = "in")]
        token_in: String,
        /// Token to buy (symbol or mint address)
        #[arg(long = "out")]
        token_out: String,
        /// Amount to sell, in raw units
        #[arg(long)]
        amount: u64,
    },

    /// Preview a swap's fee breakdown without sending a transaction
    ///
    /// Safe to call as often as needed — no funds move.
    Simulate {
        #[arg(long = "in")]
        token_in: String,
        #[arg(long = "out")]
        token_out: String,
        #[arg(long)]
        amount: u64,
    },

    /// Show pool reserves, spot price, total shares, and fee rate
    ///
    /// Read-only — no keypair required.
    PoolInfo {
        #[arg(long)]
        pair: String,
    },

    /// Show your position in one pool: shares, pool fraction, pending rewards
    Position {
        #[arg(long)]
        pair: String,
    },

    /// List every position owned by the keypair, across all pools
    Positions,

    /// Show pending fee rewards for one pool position
    ///
    /// No transaction is sent — safe to poll frequently.
    Rewards {
        #[arg(long)]
        pair: String,
    },

    /// Pay out all pending fee rewards for one pool position
    Claim {
        #[arg(long)]
        pair: String,
    },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return Ok(());
    }

    let cli = Cli::parse();
    let client = SimplePoolClient::new(cli.rpc_url.clone()).with_program_id(cli.program_id);

    match &cli.command {
        Commands::InitPool { pair, fee_bps } => {
            cmd_init_pool(&client, &cli.keypair, pair, *fee_bps, cli.json).await?;
        }
        Commands::Add { pair, amount_a, amount_b } => {
            cmd_add(&client, &cli.keypair, pair, *amount_a, *amount_b, cli.json).await?;
        }
        Commands::Remove { pair, shares } => {
            cmd_remove(&client, &cli.keypair, pair, *shares, cli.json).await?;
        }
        Commands::Swap { token_in, token_out, amount } => {
            cmd_swap(&client, &cli.keypair, token_in, token_out, *amount, cli.json).await?;
        }
        Commands::Simulate { token_in, token_out, amount } => {
            cmd_simulate(&client, token_in, token_out, *amount, cli.json).await?;
        }
        Commands::PoolInfo { pair } => {
            cmd_pool_info(&client, pair, cli.json).await?;
        }
        Commands::Position { pair } => {
            cmd_position(&client, &cli.keypair, pair, cli.json).await?;
        }
        Commands::Positions => {
            cmd_positions(&cli.rpc_url, &cli.keypair, &cli.program_id, cli.json).await?;
        }
        Commands::Rewards { pair } => {
            cmd_rewards(&client, &cli.keypair, pair, cli.json).await?;
        }
        Commands::Claim { pair } => {
            cmd_claim(&client, &cli.keypair, pair, cli.json).await?;
        }
    }

    Ok(())
}

// ─── init-pool ───────────────────────────────────────────────────────────────

async fn cmd_init_pool(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    fee_bps: u16,
    json_output: bool,
) -> Result<()> {
    let (sym_a, sym_b, mint_a, mint_b) = parse_pair(pair)?;
    if fee_bps >= 10_000 {
        return Err(anyhow!("--fee-bps {} is out of range. Allowed: 0–9999.", fee_bps));
    }

    let payer = load_keypair(keypair_path)?;
    let outcome = client
        .create_pool(&payer, CreatePoolParams { mint_a, mint_b, fee_bps })
        .await
        .context("initialize_pool transaction failed")?;

    if json_output {
        println!("{}", json!({
            "status":       "ok",
            "command":      "init-pool",
            "pair":         pair,
            "pool":         outcome.pool.to_string(),
            "token_a_mint": mint_a.to_string(),
            "token_b_mint": mint_b.to_string(),
            "fee_bps":      fee_bps,
            "tx":           outcome.signature,
        }));
    } else {
        println!("─── Pool Created ─────────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Token A       {sym_a}  ({mint_a})");
        println!("  Token B       {sym_b}  ({mint_b})");
        println!("  Pool          {}", outcome.pool);
        println!("  Fee rate      {fee_bps} bps  ({:.2}% per swap)", fee_bps as f64 / 100.0);
        println!("  Transaction   {}", outcome.signature);
        println!();
        println!("  Pool is empty — seed it next:");
        println!("    simple-pool add --pair {pair} --amount-a <AMT_A> --amount-b <AMT_B>");
    }
    Ok(())
}

// ─── add ─────────────────────────────────────────────────────────────────────

async fn cmd_add(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    amount_a: u64,
    amount_b_arg: Option<u64>,
    json_output: bool,
) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    if amount_a == 0 {
        return Err(anyhow!("--amount-a must be > 0 (raw units: lamports for SOL)"));
    }

    let payer = load_keypair(keypair_path)?;

    let amount_b: u64 = if let Some(b) = amount_b_arg {
        b
    } else {
        // Match the live reserve ratio so nothing gets clipped.
        let info = client.pool_info(&mint_a, &mint_b).await?;
        if info.total_shares == 0 {
            return Err(anyhow!(
                "Pool '{}' is empty — pass --amount-b to set the initial price.\n  \
                 Example: --amount-b {} (for a 1:1 ratio).",
                pair, amount_a
            ));
        }
        let (ra, rb) = if info.token_a_mint == mint_a {
            (info.reserve_a, info.reserve_b)
        } else {
            (info.reserve_b, info.reserve_a)
        };
        let b = (amount_a as u128) * (rb as u128) / (ra as u128);
        if b == 0 {
            return Err(anyhow!(
                "Computed amount_b = 0 — --amount-a {} is too small for this pool.\n  \
                 Try a larger amount or pass --amount-b explicitly.",
                amount_a
            ));
        }
        b as u64
    };

    let outcome = client
        .add_liquidity(&payer, AddLiquidityParams { mint_a, mint_b, amount_a, amount_b })
        .await
        .context("add_liquidity transaction failed")?;

    let position = client.position_info(&mint_a, &mint_b, &payer.pubkey()).await?;

    if json_output {
        println!("{}", json!({
            "status":    "ok",
            "command":   "add",
            "pair":      pair,
            "pool":      outcome.pool.to_string(),
            "amount_a":  amount_a,
            "amount_b":  amount_b,
            "shares":    position.shares,
            "share_pct": position.share_pct,
            "tx":        outcome.signature,
        }));
    } else {
        println!("─── Liquidity Added ──────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Deposited     up to {amount_a} A / {amount_b} B (clipped to pool ratio)");
        println!("  Shares held   {}  ({:.4}% of pool)", position.shares, position.share_pct);
        println!("  Transaction   {}", outcome.signature);
    }
    Ok(())
}

// ─── remove ──────────────────────────────────────────────────────────────────

async fn cmd_remove(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    shares: u64,
    json_output: bool,
) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    if shares == 0 {
        return Err(anyhow!("--shares must be > 0 (see `simple-pool position --pair {pair}`)"));
    }

    let payer = load_keypair(keypair_path)?;
    let outcome = client
        .remove_liquidity(&payer, RemoveLiquidityParams { mint_a, mint_b, shares })
        .await
        .context("remove_liquidity transaction failed")?;

    if json_output {
        println!("{}", json!({
            "status":  "ok",
            "command": "remove",
            "pair":    pair,
            "pool":    outcome.pool.to_string(),
            "shares":  shares,
            "tx":      outcome.signature,
        }));
    } else {
        println!("─── Liquidity Removed ────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Shares burnt  {shares}");
        println!("  Transaction   {}", outcome.signature);
        println!();
        println!("  Withdrawn reserves and any pending rewards are in your token accounts.");
    }
    Ok(())
}

// ─── swap ────────────────────────────────────────────────────────────────────

async fn cmd_swap(
    client: &SimplePoolClient,
    keypair_path: &str,
    token_in: &str,
    token_out: &str,
    amount: u64,
    json_output: bool,
) -> Result<()> {
    let mint_in = resolve_mint(token_in)?;
    let mint_out = resolve_mint(token_out)?;
    if amount == 0 {
        return Err(anyhow!("--amount must be > 0 (raw units)"));
    }

    // Pre-flight: surface zero-output and no-pool errors before paying fees.
    let sim = client
        .simulate(SimulateParams { mint_in, mint_out, amount_in: amount })
        .await?;

    let payer = load_keypair(keypair_path)?;
    let outcome = client
        .swap(&payer, SwapParams { mint_in, mint_out, amount_in: amount })
        .await
        .context("swap transaction failed")?;

    if json_output {
        println!("{}", json!({
            "status":        "ok",
            "command":       "swap",
            "pool":          outcome.pool.to_string(),
            "token_in":      mint_in.to_string(),
            "token_out":     mint_out.to_string(),
            "amount_in":     amount,
            "fee":           sim.fee,
            "estimated_out": sim.estimated_out,
            "tx":            outcome.signature,
        }));
    } else {
        println!("─── Swap Executed ────────────────────────────────────────────────");
        println!("  Sold          {amount} {}", resolve_symbol(&mint_in));
        println!("  Fee           {} ({} bps)", sim.fee, sim.fee_bps);
        println!("  Est. out      {} {}", sim.estimated_out, resolve_symbol(&mint_out));
        println!("  Price impact  {:.4}%", sim.price_impact_pct);
        println!("  Transaction   {}", outcome.signature);
    }
    Ok(())
}

// ─── simulate ────────────────────────────────────────────────────────────────

async fn cmd_simulate(
    client: &SimplePoolClient,
    token_in: &str,
    token_out: &str,
    amount: u64,
    json_output: bool,
) -> Result<()> {
    let mint_in = resolve_mint(token_in)?;
    let mint_out = resolve_mint(token_out)?;

    let sim = client
        .simulate(SimulateParams { mint_in, mint_out, amount_in: amount })
        .await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&sim)?);
    } else {
        println!("─── Swap Simulation ──────────────────────────────────────────────");
        println!("  Pool          {}", sim.pool);
        println!("  Amount in     {amount} {}", resolve_symbol(&mint_in));
        println!("  Fee           {} ({} bps)", sim.fee, sim.fee_bps);
        println!("  Net input     {}", sim.net_in);
        println!("  Est. out      {} {}", sim.estimated_out, resolve_symbol(&mint_out));
        println!("  Rate          {:.6} out per in", sim.effective_rate);
        println!("  Price impact  {:.4}%", sim.price_impact_pct);
        println!();
        println!("  No transaction was sent.");
    }
    Ok(())
}

// ─── pool-info ───────────────────────────────────────────────────────────────

async fn cmd_pool_info(client: &SimplePoolClient, pair: &str, json_output: bool) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    let info = client.pool_info(&mint_a, &mint_b).await?;
    let sym_a = resolve_symbol(&info.token_a_mint);
    let sym_b = resolve_symbol(&info.token_b_mint);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("─── Pool Info ────────────────────────────────────────────────────");
        println!("  Pool          {}", info.address);
        println!("  Pair          {sym_a}-{sym_b}");
        println!("  Reserve A     {} {sym_a}", info.reserve_a);
        println!("  Reserve B     {} {sym_b}", info.reserve_b);
        println!("  Spot price    {:.6} {sym_b} per {sym_a}", info.spot_price_a_in_b);
        println!("  Total shares  {}", info.total_shares);
        println!("  Fee rate      {} bps", info.fee_bps);
        println!(
            "  Vault A       {}  (+{} unclaimed rewards / dust)",
            info.vault_balance_a,
            info.vault_balance_a.saturating_sub(info.reserve_a)
        );
        println!(
            "  Vault B       {}  (+{} unclaimed rewards / dust)",
            info.vault_balance_b,
            info.vault_balance_b.saturating_sub(info.reserve_b)
        );
    }
    Ok(())
}

// ─── position ────────────────────────────────────────────────────────────────

async fn cmd_position(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    json_output: bool,
) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    let owner = load_keypair(keypair_path)?.pubkey();
    let pos = client
        .position_info(&mint_a, &mint_b, &owner)
        .await
        .with_context(|| format!("No position found for '{pair}' — add liquidity first"))?;
    // Pending rewards come back in the pool's token order, which may be the
    // reverse of the pair string — label them from the pool's own mints.
    let info = client.pool_info(&mint_a, &mint_b).await?;
    let sym_a = resolve_symbol(&info.token_a_mint);
    let sym_b = resolve_symbol(&info.token_b_mint);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&pos)?);
    } else {
        println!("─── Position ─────────────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Owner         {owner}");
        println!("  Shares        {}  ({:.4}% of pool)", pos.shares, pos.share_pct);
        println!("  Pending       {} {sym_a}  /  {} {sym_b}", pos.pending_reward_a, pos.pending_reward_b);
    }
    Ok(())
}

// ─── positions ───────────────────────────────────────────────────────────────

/// Position account size: 8-byte discriminator + fields.
const POSITION_ACCOUNT_LEN: u64 = 113;

async fn cmd_positions(
    rpc_url: &str,
    keypair_path: &str,
    program_id: &Pubkey,
    json_output: bool,
) -> Result<()> {
    let owner = load_keypair(keypair_path)?.pubkey();
    let rpc = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    // Owner sits right after the discriminator in every Position account.
    let config = RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(POSITION_ACCOUNT_LEN),
            RpcFilterType::Memcmp(Memcmp::new_base58_encoded(8, owner.as_ref())),
        ]),
        account_config: RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            ..Default::default()
        },
        ..Default::default()
    };

    let accounts = rpc
        .get_program_accounts_with_config(program_id, config)
        .await
        .context("get_program_accounts failed")?;

    let mut rows = Vec::new();
    for (addr, acct) in &accounts {
        let pos = match parse_position(&acct.data) {
            Ok(p) => p,
            Err(_) => continue,
        };
        rows.push(json!({
            "position": addr.to_string(),
            "pool":     pos.pool.to_string(),
            "shares":   pos.shares,
        }));
    }

    if json_output {
        println!("{}", json!({ "owner": owner.to_string(), "positions": rows }));
    } else {
        println!("─── Positions ────────────────────────────────────────────────────");
        println!("  Owner         {owner}");
        if rows.is_empty() {
            println!("  (none — run `simple-pool add` to open one)");
        }
        for row in &rows {
            println!(
                "  {}  pool={}  shares={}",
                row["position"].as_str().unwrap_or_default(),
                row["pool"].as_str().unwrap_or_default(),
                row["shares"]
            );
        }
        if !rows.is_empty() {
            println!();
            println!("  Run `simple-pool rewards --pair <A>-<B>` for claimable fees per pool.");
        }
    }
    Ok(())
}

// ─── rewards ─────────────────────────────────────────────────────────────────

async fn cmd_rewards(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    json_output: bool,
) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    let owner = load_keypair(keypair_path)?.pubkey();
    let (pending_a, pending_b) = client
        .pending_rewards(&mint_a, &mint_b, &owner)
        .await
        .with_context(|| format!("No position found for '{pair}' — add liquidity first"))?;
    // Pool-ordered values; label them from the pool's own mints.
    let info = client.pool_info(&mint_a, &mint_b).await?;
    let sym_a = resolve_symbol(&info.token_a_mint);
    let sym_b = resolve_symbol(&info.token_b_mint);

    if json_output {
        println!("{}", json!({
            "pair":             pair,
            "owner":            owner.to_string(),
            "pending_reward_a": pending_a,
            "pending_reward_b": pending_b,
        }));
    } else {
        println!("─── Pending Rewards ──────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Token A       {pending_a} {sym_a}");
        println!("  Token B       {pending_b} {sym_b}");
        if pending_a == 0 && pending_b == 0 {
            println!();
            println!("  Nothing to claim yet — rewards accrue as swaps pay fees.");
        } else {
            println!();
            println!("  Run `simple-pool claim --pair {pair}` to collect.");
        }
    }
    Ok(())
}

// ─── claim ───────────────────────────────────────────────────────────────────

async fn cmd_claim(
    client: &SimplePoolClient,
    keypair_path: &str,
    pair: &str,
    json_output: bool,
) -> Result<()> {
    let (_, _, mint_a, mint_b) = parse_pair(pair)?;
    let payer = load_keypair(keypair_path)?;

    let (pending_a, pending_b) = client
        .pending_rewards(&mint_a, &mint_b, &payer.pubkey())
        .await
        .with_context(|| format!("No position found for '{pair}' — add liquidity first"))?;

    let outcome = client
        .claim_rewards(&payer, &mint_a, &mint_b)
        .await
        .context("claim_rewards transaction failed")?;

    if json_output {
        println!("{}", json!({
            "status":    "ok",
            "command":   "claim",
            "pair":      pair,
            "pool":      outcome.pool.to_string(),
            "claimed_a": pending_a,
            "claimed_b": pending_b,
            "tx":        outcome.signature,
        }));
    } else {
        println!("─── Rewards Claimed ──────────────────────────────────────────────");
        println!("  Pair          {pair}");
        println!("  Claimed       {pending_a} A  /  {pending_b} B");
        println!("  Transaction   {}", outcome.signature);
    }
    Ok(())
}
