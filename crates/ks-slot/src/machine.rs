//! Spin state machine
//!
//! `Idle → Spinning(frame) → Resolving → Idle`, driven by discrete inputs on
//! a caller-supplied millisecond clock. Nothing here sleeps or spawns: the
//! front-end calls [`SlotMachine::advance`] (or dispatches [`Input::Tick`])
//! whenever time passes, and every frame that has come due is processed in
//! order.

use serde::{Deserialize, Serialize};

use ks_stage::{RejectReason, Stage, StageEvent, StagePayload, WinTier};

use crate::bonus::BonusDelta;
use crate::config::{ConfigError, SlotConfig};
use crate::display::BalanceRollup;
use crate::error::{BetRejection, Rejection, SpinRejection};
use crate::grid::Grid;
use crate::ledger::{SessionLedger, SessionState, Settlement, SpinTicket};
use crate::reels::ReelGenerator;
use crate::resolver::{OutcomeResolver, SpinOutcome};
use crate::rng::{RandomSource, RngSource};
use crate::sink::{MachineSnapshot, NullSink, StageSink};
use crate::stats::SessionStats;

/// Offset for the cosmetic frame stream when seeding both streams from one seed
const FRAME_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Spin lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SpinPhase {
    Idle,
    Spinning {
        /// Frames shown so far
        frame: u32,
        free_spin: bool,
        /// When the next frame is due
        next_frame_at_ms: u64,
    },
    Resolving,
}

/// Input to the transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Paid spin
    Spin,
    /// Spin from free-spin credit
    FreeSpin,
    /// Next bet denomination
    CycleBet,
    /// Time passed
    Tick,
}

/// Result of an accepted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SpinStarted(SpinTicket),
    BetChanged { bet: u64 },
    /// Spins that resolved during the tick
    Advanced(Vec<SpinReport>),
}

/// One resolved spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinReport {
    pub spin_id: String,
    /// Settled grid as shown to the player
    pub grid: Grid,
    pub outcome: SpinOutcome,
    pub settlement: Settlement,
    pub started_at_ms: u64,
    pub resolved_at_ms: u64,
}

#[derive(Debug, Clone)]
struct ActiveSpin {
    id: String,
    ticket: SpinTicket,
    started_at_ms: u64,
}

/// The slot machine: generator, resolver and ledger behind one state machine
pub struct SlotMachine {
    config: SlotConfig,
    generator: ReelGenerator,
    resolver: OutcomeResolver,
    ledger: SessionLedger,
    /// Outcome draws (settled grid, forced outcomes)
    rng: Box<dyn RandomSource>,
    /// Cosmetic draws for transient frames
    frame_rng: Box<dyn RandomSource>,
    sink: Box<dyn StageSink>,

    phase: SpinPhase,
    grid: Grid,
    last_outcome: Option<SpinOutcome>,
    active: Option<ActiveSpin>,
    spin_count: u64,

    rollup: BalanceRollup,
    /// Last rollup sample time while a rollup is running
    rollup_sampled_at: Option<u64>,

    auto_spin_at: Option<u64>,
    stats: SessionStats,
}

impl SlotMachine {
    /// Validate the config and build a machine with OS-seeded randomness
    pub fn new(config: SlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Reproducible machine
    pub fn seeded(config: SlotConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::new(config)?.with_seed(seed))
    }

    fn build(config: SlotConfig) -> Self {
        let ledger = SessionLedger::from_config(&config);
        let rollup = BalanceRollup::settled(
            ledger.state().balance,
            config.timing.balance_rollup_ms,
        );
        log::info!(
            "Slot machine '{}' ready (balance: {}, bet: {}, timing: {})",
            config.name,
            ledger.state().balance,
            ledger.state().bet,
            config.timing.profile.name()
        );
        Self {
            generator: ReelGenerator::from_config(&config),
            resolver: OutcomeResolver::from_config(&config),
            grid: Grid::empty(config.grid),
            ledger,
            rng: Box::new(RngSource::from_entropy()),
            frame_rng: Box::new(RngSource::from_entropy()),
            sink: Box::new(NullSink),
            phase: SpinPhase::Idle,
            last_outcome: None,
            active: None,
            spin_count: 0,
            rollup,
            rollup_sampled_at: None,
            auto_spin_at: None,
            stats: SessionStats::default(),
            config,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BUILDERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Builder: outcome randomness
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Builder: randomness for transient frames
    pub fn with_frame_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.frame_rng = Box::new(rng);
        self
    }

    /// Builder: seed both random streams
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(RngSource::seeded(seed))
            .with_frame_rng(RngSource::seeded(seed ^ FRAME_SEED_SALT))
    }

    /// Builder: event sink
    pub fn with_sink(mut self, sink: impl StageSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builder: replace the session state (scenario setup)
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.ledger = self.ledger.with_state(state);
        self.rollup = BalanceRollup::settled(state.balance, self.config.timing.balance_rollup_ms);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Explicit transition function
    pub fn dispatch(&mut self, input: Input, now_ms: u64) -> Result<Transition, Rejection> {
        match input {
            Input::Spin => Ok(Transition::SpinStarted(self.request_spin(now_ms)?)),
            Input::FreeSpin => Ok(Transition::SpinStarted(self.request_free_spin(now_ms)?)),
            Input::CycleBet => Ok(Transition::BetChanged {
                bet: self.cycle_bet(now_ms)?,
            }),
            Input::Tick => Ok(Transition::Advanced(self.advance(now_ms))),
        }
    }

    /// Start a paid spin
    pub fn request_spin(&mut self, now_ms: u64) -> Result<SpinTicket, SpinRejection> {
        self.start_spin(false, now_ms)
    }

    /// Start a spin from free-spin credit
    pub fn request_free_spin(&mut self, now_ms: u64) -> Result<SpinTicket, SpinRejection> {
        self.start_spin(true, now_ms)
    }

    /// Advance the bet to the next denomination
    pub fn cycle_bet(&mut self, now_ms: u64) -> Result<u64, BetRejection> {
        if !self.is_idle() {
            log::debug!("Bet change ignored: spin in progress");
            return Err(BetRejection::AlreadySpinning);
        }
        match self.ledger.cycle_bet() {
            Ok(bet) => {
                self.emit(now_ms, Stage::BetChanged { bet }, StagePayload::new().bet_amount(bet));
                Ok(bet)
            }
            Err(err) => {
                log::debug!("Bet change rejected: {err}");
                self.reject(now_ms, err.reason());
                Err(err)
            }
        }
    }

    /// Process everything due at or before `now_ms`
    ///
    /// Frames are handled in order (a late call catches up), then a pending
    /// automatic free spin, then a display-balance sample.
    pub fn advance(&mut self, now_ms: u64) -> Vec<SpinReport> {
        let mut reports = Vec::new();
        let mut auto_fired = false;

        loop {
            match self.phase {
                SpinPhase::Spinning {
                    frame,
                    free_spin,
                    next_frame_at_ms,
                } if next_frame_at_ms <= now_ms => {
                    let frame = frame + 1;
                    if frame < self.config.timing.spin_frames {
                        self.show_frame(frame, next_frame_at_ms);
                        self.phase = SpinPhase::Spinning {
                            frame,
                            free_spin,
                            next_frame_at_ms: next_frame_at_ms
                                .saturating_add(self.config.timing.frame_interval_ms),
                        };
                    } else {
                        self.phase = SpinPhase::Resolving;
                        if let Some(report) = self.resolve(next_frame_at_ms) {
                            reports.push(report);
                        }
                    }
                }
                SpinPhase::Idle if !auto_fired => match self.auto_spin_at {
                    Some(at) if at <= now_ms => {
                        // Cleared before firing so one schedule starts at most one spin
                        self.auto_spin_at = None;
                        auto_fired = true;
                        if let Err(err) = self.start_spin(true, at) {
                            log::debug!("Automatic free spin skipped: {err}");
                        }
                    }
                    _ => break,
                },
                _ => break,
            }
        }

        self.sample_rollup(now_ms);
        reports
    }

    /// Start a spin and drive it to resolution
    pub fn run_spin(&mut self, free_spin: bool, now_ms: u64) -> Result<SpinReport, SpinRejection> {
        self.start_spin(free_spin, now_ms)?;
        let resolve_at = now_ms.saturating_add(self.config.timing.spin_duration_ms());
        self.advance(resolve_at)
            .into_iter()
            .find(|report| report.started_at_ms == now_ms)
            .ok_or(SpinRejection::AlreadySpinning)
    }

    fn start_spin(&mut self, free_spin: bool, now_ms: u64) -> Result<SpinTicket, SpinRejection> {
        if !self.is_idle() {
            log::debug!("Spin request ignored: spin in progress");
            return Err(SpinRejection::AlreadySpinning);
        }

        let ticket = match self.ledger.begin_spin(free_spin) {
            Ok(ticket) => ticket,
            Err(err) => {
                log::debug!("Spin rejected: {err}");
                self.reject(now_ms, err.reason());
                return Err(err);
            }
        };

        self.auto_spin_at = None;
        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);

        let state = *self.ledger.state();
        self.emit(
            now_ms,
            Stage::SpinStart {
                free_spin,
                bet: ticket.bet,
            },
            StagePayload::new()
                .bet_amount(ticket.bet)
                .balance(state.balance)
                .spin_id(spin_id.clone()),
        );
        if ticket.debit > 0 {
            self.retarget_display(now_ms, state.balance);
        }

        self.active = Some(ActiveSpin {
            id: spin_id,
            ticket,
            started_at_ms: now_ms,
        });
        self.phase = SpinPhase::Spinning {
            frame: 0,
            free_spin,
            next_frame_at_ms: now_ms.saturating_add(self.config.timing.frame_interval_ms),
        };
        Ok(ticket)
    }

    fn show_frame(&mut self, frame: u32, at_ms: u64) {
        self.grid = self.generator.generate(self.frame_rng.as_mut());
        log::trace!("Frame {frame} at {at_ms}ms");
        self.emit(
            at_ms,
            Stage::ReelFrame {
                frame,
                grid: self.grid.to_ids(),
            },
            StagePayload::new(),
        );
    }

    fn resolve(&mut self, at_ms: u64) -> Option<SpinReport> {
        let active = self.active.take()?;

        let settled = self.generator.generate(self.rng.as_mut());
        let bonus = self.ledger.state().bonus;
        let resolution = self.resolver.resolve(settled, bonus, self.rng.as_mut());
        self.grid = resolution.grid.clone();

        let grid_ids = self.grid.to_ids();
        self.emit(at_ms, Stage::ReelStop { grid: grid_ids }, StagePayload::new());
        self.emit(at_ms, Stage::EvaluateWins, StagePayload::new());

        let settlement = self
            .ledger
            .settle(active.ticket, &resolution.outcome, resolution.bonus);
        self.present(at_ms, &resolution.outcome, &settlement);

        if settlement.credit > 0 {
            self.retarget_display(at_ms, settlement.state.balance);
        }

        self.last_outcome = Some(resolution.outcome.clone());
        self.phase = SpinPhase::Idle;
        self.emit(
            at_ms,
            Stage::SpinEnd,
            StagePayload::new()
                .balance(settlement.state.balance)
                .spin_id(active.id.clone()),
        );

        if self.config.free_spins.auto_continue && settlement.state.free_spins > 0 {
            self.auto_spin_at =
                Some(at_ms.saturating_add(self.config.free_spins.auto_continue_delay_ms));
        }

        log::debug!(
            "{} resolved: credit {}, balance {}, combo {}, free spins {}, bonus spins {}",
            active.id,
            settlement.credit,
            settlement.state.balance,
            settlement.state.combo,
            settlement.state.free_spins,
            settlement.state.bonus.spins_left()
        );

        let report = SpinReport {
            spin_id: active.id,
            grid: resolution.grid,
            outcome: resolution.outcome,
            settlement,
            started_at_ms: active.started_at_ms,
            resolved_at_ms: at_ms,
        };
        self.stats.record(&report);
        Some(report)
    }

    /// Outcome, combo, free-spin and bonus stages for one settlement
    fn present(&mut self, at_ms: u64, outcome: &SpinOutcome, settlement: &Settlement) {
        let bet = settlement.ticket.bet;
        match outcome {
            SpinOutcome::NoWin => self.emit(at_ms, Stage::NoWin, StagePayload::new()),
            SpinOutcome::LineWin {
                symbol, line, tier, ..
            } => {
                let mut payload = StagePayload::with_win(settlement.credit, Some(bet))
                    .win_line(line.to_win_line(*symbol));
                if let Some(mult) = settlement.combo_multiplier {
                    payload = payload.multiplier(mult);
                }
                self.emit(
                    at_ms,
                    Stage::WinPresent {
                        tier: *tier,
                        symbol_id: symbol.id(),
                        line_index: Some(line.index),
                        win_amount: settlement.credit,
                    },
                    payload,
                );
            }
            SpinOutcome::SuperJackpot { symbol } => self.emit(
                at_ms,
                Stage::WinPresent {
                    tier: WinTier::SuperJackpot,
                    symbol_id: symbol.id(),
                    line_index: None,
                    win_amount: settlement.credit,
                },
                StagePayload::with_win(settlement.credit, Some(bet)).whole_grid(),
            ),
        }

        self.emit(
            at_ms,
            Stage::ComboUpdate {
                streak: settlement.combo,
                multiplier: settlement.combo_multiplier.unwrap_or(0),
            },
            StagePayload::new(),
        );

        if settlement.free_spin_awarded {
            self.emit(
                at_ms,
                Stage::FreeSpinAwarded {
                    credit: settlement.state.free_spins,
                },
                StagePayload::new(),
            );
        }

        match settlement.bonus {
            BonusDelta::None => {}
            BonusDelta::Enter { spins } => self.emit(
                at_ms,
                Stage::BonusEnter { spins: spins.get() },
                StagePayload::new().spins_remaining(spins.get()),
            ),
            BonusDelta::Continue { spins_left } => self.emit(
                at_ms,
                Stage::BonusStep {
                    spins_remaining: spins_left.get(),
                },
                StagePayload::new().spins_remaining(spins_left.get()),
            ),
            BonusDelta::Exit => {
                self.emit(
                    at_ms,
                    Stage::BonusStep { spins_remaining: 0 },
                    StagePayload::new().spins_remaining(0),
                );
                self.emit(at_ms, Stage::BonusExit, StagePayload::new());
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DISPLAY BALANCE
    // ═══════════════════════════════════════════════════════════════════════

    fn retarget_display(&mut self, now_ms: u64, target: u64) {
        let start = self.rollup.value_at(now_ms);
        self.rollup.retarget(now_ms, target);
        self.rollup_sampled_at = Some(now_ms);
        self.emit(
            now_ms,
            Stage::RollupStart {
                start_amount: start,
                target_amount: target,
            },
            StagePayload::new().balance(target),
        );
    }

    fn sample_rollup(&mut self, now_ms: u64) {
        let Some(last) = self.rollup_sampled_at else {
            return;
        };
        if now_ms >= self.rollup.ends_at_ms() {
            self.rollup_sampled_at = None;
            let final_amount = self.rollup.value_at(now_ms);
            self.emit(
                now_ms,
                Stage::RollupEnd { final_amount },
                StagePayload::new().balance(final_amount),
            );
        } else if now_ms.saturating_sub(last) >= self.config.timing.rollup_tick_ms {
            self.rollup_sampled_at = Some(now_ms);
            self.emit(
                now_ms,
                Stage::RollupTick {
                    current_amount: self.rollup.value_at(now_ms),
                    progress: self.rollup.progress(now_ms),
                },
                StagePayload::new(),
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EVENTS
    // ═══════════════════════════════════════════════════════════════════════

    fn emit(&mut self, at_ms: u64, stage: Stage, payload: StagePayload) {
        self.sink
            .emit(StageEvent::with_payload(stage, at_ms as f64, payload));
    }

    fn reject(&mut self, at_ms: u64, reason: RejectReason) {
        if !reason.is_silent() {
            self.emit(at_ms, Stage::ActionRejected { reason }, StagePayload::new());
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // OBSERVATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, SpinPhase::Idle)
    }

    /// Current grid (transient while spinning)
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Authoritative session state
    pub fn state(&self) -> &SessionState {
        self.ledger.state()
    }

    /// Smoothed balance at `now_ms`
    pub fn display_balance(&self, now_ms: u64) -> u64 {
        self.rollup.value_at(now_ms)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Spins accepted so far
    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    /// Pending automatic free spin
    pub fn auto_spin_at(&self) -> Option<u64> {
        self.auto_spin_at
    }

    /// Earliest time `advance` has work to do
    pub fn next_deadline(&self) -> Option<u64> {
        let frame = match self.phase {
            SpinPhase::Spinning {
                next_frame_at_ms, ..
            } => Some(next_frame_at_ms),
            _ => None,
        };
        let rollup = self.rollup_sampled_at.map(|last| {
            last.saturating_add(self.config.timing.rollup_tick_ms.max(1))
                .min(self.rollup.ends_at_ms())
        });
        [frame, self.auto_spin_at, rollup].into_iter().flatten().min()
    }

    /// Full observable state
    pub fn snapshot(&self, now_ms: u64) -> MachineSnapshot {
        let state = self.ledger.state();
        MachineSnapshot {
            grid: self.grid.clone(),
            phase: self.phase,
            last_outcome: self.last_outcome.clone(),
            balance: state.balance,
            display_balance: self.display_balance(now_ms),
            bet: state.bet,
            combo: state.combo,
            free_spins: state.free_spins,
            bonus_active: state.bonus.is_active(),
            bonus_spins_left: state.bonus.spins_left(),
            bet_cycle_allowed: self.is_idle() && state.bet_cycle_allowed(),
        }
    }
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::build(SlotConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::BonusMode;
    use crate::rng::ScriptedSource;
    use crate::sink::RecordingSink;
    use crate::timing::TimingConfig;

    /// Lemon/orange/grape columns with no matching line
    const LOSING: [[usize; 3]; 3] = [[1, 2, 3], [2, 3, 1], [1, 2, 3]];

    fn losing_draws(spins: usize) -> ScriptedSource {
        let mut src = ScriptedSource::new();
        for _ in 0..spins {
            for column in LOSING {
                for idx in column {
                    src.push_index(idx);
                }
            }
            src.push_chance(false);
        }
        src
    }

    fn machine(rng: ScriptedSource) -> (SlotMachine, RecordingSink) {
        let sink = RecordingSink::new();
        let machine = SlotMachine::new(SlotConfig::default())
            .unwrap()
            .with_rng(rng)
            .with_frame_rng(RngSource::seeded(5))
            .with_sink(sink.clone());
        (machine, sink)
    }

    #[test]
    fn test_phase_transitions() {
        let (mut m, sink) = machine(losing_draws(1));
        assert!(m.is_idle());
        m.request_spin(0).unwrap();
        assert!(matches!(m.phase(), SpinPhase::Spinning { frame: 0, .. }));

        m.advance(50);
        assert!(matches!(m.phase(), SpinPhase::Spinning { frame: 1, .. }));

        let reports = m.advance(1_499);
        assert!(reports.is_empty());
        assert!(matches!(m.phase(), SpinPhase::Spinning { frame: 29, .. }));

        let reports = m.advance(1_500);
        assert_eq!(reports.len(), 1);
        assert!(m.is_idle());
        assert_eq!(reports[0].resolved_at_ms, 1_500);
        assert_eq!(reports[0].outcome, SpinOutcome::NoWin);

        let names = sink.type_names();
        assert_eq!(names.iter().filter(|n| **n == "reel_frame").count(), 29);
        assert_eq!(names.first(), Some(&"spin_start"));
        assert!(names.contains(&"reel_stop"));
        assert!(names.contains(&"no_win"));
    }

    #[test]
    fn test_catch_up_processes_all_frames() {
        let (mut m, sink) = machine(losing_draws(1));
        m.request_spin(0).unwrap();
        let reports = m.advance(10_000);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].resolved_at_ms, 1_500);
        let frames: Vec<f64> = sink
            .events()
            .iter()
            .filter(|e| e.type_name() == "reel_frame")
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(frames.len(), 29);
        assert_eq!(frames[0], 50.0);
        assert_eq!(frames[28], 1_450.0);
    }

    #[test]
    fn test_spin_while_spinning_is_noop() {
        let (mut m, sink) = machine(losing_draws(1));
        m.request_spin(0).unwrap();
        m.advance(500);
        let before = m.snapshot(500);
        let events_before = sink.len();

        assert_eq!(m.request_spin(500), Err(SpinRejection::AlreadySpinning));
        assert_eq!(m.request_free_spin(500), Err(SpinRejection::AlreadySpinning));
        assert_eq!(m.snapshot(500), before);
        assert_eq!(sink.len(), events_before);
        assert_eq!(m.spin_count(), 1);
    }

    #[test]
    fn test_bet_cycle_locked_while_spinning() {
        let (mut m, _) = machine(losing_draws(1));
        m.request_spin(0).unwrap();
        assert_eq!(m.cycle_bet(10), Err(BetRejection::AlreadySpinning));
        assert!(!m.snapshot(10).bet_cycle_allowed);
        m.advance(1_500);
        assert_eq!(m.cycle_bet(1_600), Ok(100));
    }

    #[test]
    fn test_insufficient_balance_rejected_visibly() {
        let (m, sink) = machine(ScriptedSource::new());
        let mut m = m.with_state(SessionState {
            balance: 10,
            bet: 50,
            combo: 0,
            free_spins: 0,
            bonus: BonusMode::Inactive,
        });
        assert!(matches!(
            m.request_spin(0),
            Err(SpinRejection::InsufficientBalance { .. })
        ));
        assert!(m.is_idle());
        assert_eq!(m.state().balance, 10);
        assert_eq!(sink.type_names(), vec!["action_rejected"]);
    }

    #[test]
    fn test_dispatch() {
        let (mut m, _) = machine(losing_draws(1));
        assert!(matches!(
            m.dispatch(Input::CycleBet, 0),
            Ok(Transition::BetChanged { bet: 100 })
        ));
        assert!(matches!(
            m.dispatch(Input::Spin, 0),
            Ok(Transition::SpinStarted(SpinTicket { debit: 100, .. }))
        ));
        assert!(matches!(
            m.dispatch(Input::FreeSpin, 0),
            Err(Rejection::Spin(SpinRejection::AlreadySpinning))
        ));
        match m.dispatch(Input::Tick, 1_500) {
            Ok(Transition::Advanced(reports)) => assert_eq!(reports.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            m.dispatch(Input::FreeSpin, 1_600),
            Err(Rejection::Spin(SpinRejection::NoFreeSpins))
        ));
    }

    #[test]
    fn test_display_balance_converges() {
        let (mut m, sink) = machine(losing_draws(1));
        m.request_spin(0).unwrap();
        assert_eq!(m.state().balance, 950);
        assert_eq!(m.display_balance(0), 1000);
        assert_eq!(m.display_balance(750), 975);
        m.advance(1_500);
        assert_eq!(m.display_balance(1_500), 950);
        assert!(sink.type_names().contains(&"rollup_end"));
    }

    #[test]
    fn test_auto_continue_fires_once() {
        let mut config = SlotConfig::default().with_timing(TimingConfig::studio());
        config.free_spins.auto_continue = true;
        config.free_spins.auto_continue_delay_ms = 100;
        let m = SlotMachine::new(config)
            .unwrap()
            .with_rng(losing_draws(3))
            .with_frame_rng(RngSource::seeded(1));
        let mut m = m.with_state(SessionState {
            balance: 1000,
            bet: 50,
            combo: 0,
            free_spins: 2,
            bonus: BonusMode::Inactive,
        });

        let report = m.run_spin(true, 0).unwrap();
        assert!(report.settlement.ticket.free_spin);
        assert_eq!(m.state().free_spins, 1);
        assert_eq!(m.auto_spin_at(), Some(100));

        // Repeated ticks at the same instant start only one spin
        let reports = m.advance(100);
        assert_eq!(reports.len(), 1);
        assert_eq!(m.state().free_spins, 0);
        assert_eq!(m.advance(100).len(), 0);
        assert_eq!(m.auto_spin_at(), None);
        assert_eq!(m.stats().free_spins, 2);
        assert_eq!(m.state().balance, 1000);
    }

    #[test]
    fn test_manual_spin_cancels_auto_continue() {
        let mut config = SlotConfig::studio();
        config.free_spins.auto_continue = true;
        let m = SlotMachine::new(config)
            .unwrap()
            .with_rng(losing_draws(2))
            .with_frame_rng(RngSource::seeded(1));
        let mut m = m.with_state(SessionState {
            balance: 1000,
            bet: 50,
            combo: 0,
            free_spins: 2,
            bonus: BonusMode::Inactive,
        });
        m.run_spin(true, 0).unwrap();
        assert!(m.auto_spin_at().is_some());
        m.request_free_spin(10).unwrap();
        assert_eq!(m.auto_spin_at(), None);
        m.advance(10_000);
        assert_eq!(m.state().free_spins, 0);
        assert_eq!(m.spin_count(), 2);
    }

    #[test]
    fn test_spin_ids_are_sequential() {
        let mut m = SlotMachine::new(SlotConfig::studio())
            .unwrap()
            .with_rng(losing_draws(2));
        assert_eq!(m.run_spin(false, 0).unwrap().spin_id, "spin-000001");
        assert_eq!(m.run_spin(false, 10).unwrap().spin_id, "spin-000002");
    }

    #[test]
    fn test_next_deadline() {
        let (mut m, _) = machine(losing_draws(1));
        assert_eq!(m.next_deadline(), None);
        m.request_spin(0).unwrap();
        assert_eq!(m.next_deadline(), Some(50));
        m.advance(1_500);
        assert_eq!(m.next_deadline(), None);
    }
}
