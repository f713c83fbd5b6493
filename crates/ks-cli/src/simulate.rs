//! Headless batch run on a virtual clock

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;

use ks_slot::{SessionStats, SlotConfig, SlotMachine, SpinRejection, TimingConfig};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of spins to run
    #[arg(long, default_value_t = 10_000)]
    spins: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (.json, .yaml, .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting bet (must be one of the configured denominations)
    #[arg(long)]
    bet: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Result of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub config: String,
    pub seed: Option<u64>,
    pub requested_spins: u64,
    /// Stopped early because the balance no longer covers the bet
    pub out_of_coins: bool,
    pub final_balance: u64,
    pub rtp_percent: f64,
    pub hit_rate_percent: f64,
    pub net: i128,
    pub stats: SessionStats,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = crate::load_config(args.config.as_deref())?;
    if let Some(bet) = args.bet {
        if config.bets.index_of(bet).is_none() {
            bail!("Bet {} is not one of {:?}", bet, config.bets.levels);
        }
        config.bets.default_bet = bet;
    }

    let summary = simulate(config, args.seed, args.spins)?;
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Run up to `spins` spins, taking pending free spins first
pub fn simulate(config: SlotConfig, seed: Option<u64>, spins: u64) -> Result<Summary> {
    // Outcomes do not depend on timing; the studio profile resolves instantly
    let config = config.with_timing(TimingConfig::studio());
    let name = config.name.clone();
    let mut machine = match seed {
        Some(seed) => SlotMachine::seeded(config, seed),
        None => SlotMachine::new(config),
    }
    .context("Invalid configuration")?;

    log::info!("Simulating {spins} spins of '{name}'");

    let mut now = 0u64;
    let mut out_of_coins = false;
    for done in 0..spins {
        let free = machine.state().free_spins > 0;
        match machine.run_spin(free, now) {
            Ok(_) => {}
            Err(SpinRejection::InsufficientBalance { balance, bet }) => {
                log::warn!("Out of coins after {done} spins (balance {balance}, bet {bet})");
                out_of_coins = true;
                break;
            }
            Err(other) => bail!("Spin {} rejected: {}", done + 1, other),
        }
        now += 1;
    }

    let stats = machine.stats().clone();
    Ok(Summary {
        config: name,
        seed,
        requested_spins: spins,
        out_of_coins,
        final_balance: machine.state().balance,
        rtp_percent: stats.rtp(),
        hit_rate_percent: stats.hit_rate(),
        net: stats.net(),
        stats,
    })
}

fn print_summary(summary: &Summary) {
    let stats = &summary.stats;
    println!("═══ {} ═══", summary.config);
    if let Some(seed) = summary.seed {
        println!("Seed:            {seed}");
    }
    println!(
        "Spins:           {} ({} paid, {} free){}",
        stats.total_spins,
        stats.paid_spins,
        stats.free_spins,
        if summary.out_of_coins { "  [out of coins]" } else { "" }
    );
    println!("Final balance:   {}", summary.final_balance);
    println!("Wagered:         {}", stats.total_wagered);
    println!("Credited:        {}", stats.total_credited);
    println!("Net:             {:+}", summary.net);
    println!("RTP:             {:.2}%", summary.rtp_percent);
    println!("Hit rate:        {:.2}%", summary.hit_rate_percent);
    println!(
        "Wins:            {} ({} consolation, {} jackpot)",
        stats.wins, stats.consolation_wins, stats.jackpots
    );
    println!("Super jackpots:  {}", stats.super_jackpots);
    println!(
        "Bonus:           {} entries, {} spins",
        stats.bonus_entries, stats.bonus_spins
    );
    println!("Free spins won:  {}", stats.free_spins_awarded);
    println!("Longest combo:   {}", stats.longest_combo);
    println!("Largest win:     {}", stats.max_credit);
}
