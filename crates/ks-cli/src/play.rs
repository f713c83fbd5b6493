//! Interactive terminal session driven by the wall clock

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use ks_slot::ks_stage::StageTrace;
use ks_slot::{
    Input, LogSink, MultiSink, RecordingSink, SlotMachine, SpinPhase, TimingConfig,
    TimingProfile, Transition,
};

use crate::render;

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Configuration file (.json, .yaml, .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Timing profile (normal, turbo, studio); overrides the config file
    #[arg(long)]
    profile: Option<TimingProfile>,

    /// Write the stage trace of the session to this file on exit
    #[arg(long)]
    trace: Option<PathBuf>,
}

const HELP: &str = "s/enter spin · f free spin · b bet · q quit";

/// Milliseconds since the session started
struct Clock(Instant);

impl Clock {
    fn now(&self) -> u64 {
        u64::try_from(self.0.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

pub fn run(args: PlayArgs) -> Result<()> {
    let mut config = crate::load_config(args.config.as_deref())?;
    if let Some(profile) = args.profile {
        config = config.with_timing(TimingConfig::from_profile(profile));
    }
    let game_id = config.name.clone();

    let machine = match args.seed {
        Some(seed) => SlotMachine::seeded(config, seed),
        None => SlotMachine::new(config),
    }
    .context("Invalid configuration")?;

    let recorder = RecordingSink::new();
    let mut machine = machine.with_sink(MultiSink::new().with(LogSink).with(recorder.clone()));

    let clock = Clock(Instant::now());
    println!("{game_id}  ({HELP})");
    println!("{}", render::grid(machine.grid()));
    prompt(&machine, clock.now())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;
        let input = match line.trim() {
            "" | "s" => Input::Spin,
            "f" => Input::FreeSpin,
            "b" => Input::CycleBet,
            "q" => break,
            other => {
                println!("Unknown command '{other}' ({HELP})");
                prompt(&machine, clock.now())?;
                continue;
            }
        };

        match machine.dispatch(input, clock.now()) {
            Ok(Transition::SpinStarted(_)) => drive(&mut machine, &clock)?,
            Ok(Transition::BetChanged { bet }) => println!("Bet {bet}"),
            Ok(Transition::Advanced(_)) => {}
            Err(rejection) => {
                let reason = rejection.reason();
                if !reason.is_silent() {
                    println!("{}", reason.display_name());
                }
            }
        }
        prompt(&machine, clock.now())?;
    }

    let stats = machine.stats();
    println!(
        "\n{} spins · {} wins · net {:+}",
        stats.total_spins,
        stats.wins,
        stats.net()
    );

    if let Some(path) = args.trace {
        let trace = StageTrace::new("play-session", game_id).with_events(recorder.take());
        let json = trace.to_json().context("Failed to encode stage trace")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write trace to {}", path.display()))?;
        log::info!("Stage trace written to {}", path.display());
    }
    Ok(())
}

/// Run the machine until every frame, auto spin and rollup has played out
fn drive(machine: &mut SlotMachine, clock: &Clock) -> Result<()> {
    let mut out = io::stdout().lock();
    let mut shown_frame = None;

    loop {
        let now = clock.now();
        let reports = machine.advance(now);

        for report in &reports {
            writeln!(out, "\r\x1b[2K{}", render::grid(&report.grid))?;
            for message in render::outcome(report) {
                writeln!(out, "  {message}")?;
            }
            shown_frame = None;
        }

        match machine.phase() {
            SpinPhase::Spinning { frame, .. } if shown_frame != Some(frame) => {
                write!(out, "\r\x1b[2K{}", render::frame(machine.grid()))?;
                shown_frame = Some(frame);
            }
            SpinPhase::Idle => {
                write!(out, "\r\x1b[2K{}", render::status(&machine.snapshot(now)))?;
            }
            _ => {}
        }
        out.flush()?;

        let Some(deadline) = machine.next_deadline() else {
            break;
        };
        let wait = deadline.saturating_sub(clock.now());
        if wait > 0 {
            thread::sleep(Duration::from_millis(wait));
        }
    }
    write!(out, "\r\x1b[2K")?;
    out.flush()?;
    Ok(())
}

fn prompt(machine: &SlotMachine, now: u64) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{} > ", render::status(&machine.snapshot(now)))?;
    out.flush()?;
    Ok(())
}
