//! Session state machine - manages one game from start to game over
//!
//! ```text
//! Idle --start--> Active --solved--> RoundTransition --delay--> Active ...
//!                   |                        |
//!                   +--missed / timeout--> Terminated <--terminate--+
//! ```
//!
//! The session is clock-agnostic: the host calls [`Session::tick`] with the time
//! elapsed since the previous call. The tick drives both the round countdown and
//! the pause after a solved round. Submissions are only accepted while `Active`,
//! and leaving `Active` stops the countdown, so a round resolves exactly once.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::catalogue::{Catalogue, Grid};
use crate::event::SessionEvent;
use crate::riddle::{generate_riddle, Riddle};
use crate::scoring::{calculate_round_score, RoundScore};
use crate::snapshot::SessionSnapshot;
use crate::store::{KeyValueStore, Preferences, ResultRecord, ResultStore};
use crate::types::{DifficultyTier, Specimen, ROUND_ADVANCE_DELAY_MS};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Never started
    Idle,
    /// Riddle on screen, countdown running
    Active,
    /// Round solved, waiting to deal the next grid
    RoundTransition,
    /// Game over (until the next `start`)
    Terminated,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Active => "active",
            SessionPhase::RoundTransition => "round_transition",
            SessionPhase::Terminated => "terminated",
        }
    }
}

/// How a round was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Solved(RoundScore),
    Missed,
    TimedOut,
}

/// One player's game: grid, riddle, score, streak and countdown.
#[derive(Debug)]
pub struct Session<K: KeyValueStore> {
    catalogue: Catalogue,
    rng: StdRng,
    seed: u64,
    results: ResultStore<K>,
    preferences: Preferences<K>,
    tier: DifficultyTier,
    phase: SessionPhase,
    /// Monotonic session id (increments on every start).
    session_id: u32,
    grid: Grid,
    riddle: Option<Riddle>,
    score: u32,
    streak: u32,
    rounds_completed: u32,
    max_combo_streak: u32,
    remaining_ms: u32,
    advance_timer_ms: u32,
    events: Vec<SessionEvent>,
}

impl<K: KeyValueStore> Session<K> {
    /// Session over the standard catalogue, with preferences and results in `kv`.
    pub fn new(seed: u64, kv: Arc<K>) -> Self {
        Self::with_services(
            seed,
            Catalogue::standard(),
            ResultStore::new(Arc::clone(&kv)),
            Preferences::new(kv),
        )
    }

    pub fn with_services(
        seed: u64,
        catalogue: Catalogue,
        results: ResultStore<K>,
        preferences: Preferences<K>,
    ) -> Self {
        Self {
            catalogue,
            rng: StdRng::seed_from_u64(seed),
            seed,
            results,
            preferences,
            tier: DifficultyTier::Novice,
            phase: SessionPhase::Idle,
            session_id: 0,
            grid: Grid::new(),
            riddle: None,
            score: 0,
            streak: 0,
            rounds_completed: 0,
            max_combo_streak: 0,
            remaining_ms: 0,
            advance_timer_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Running: either answering or between rounds
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Active | SessionPhase::RoundTransition
        )
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn max_combo_streak(&self) -> u32 {
        self.max_combo_streak
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn grid(&self) -> &[Specimen] {
        &self.grid
    }

    pub fn riddle(&self) -> Option<&Riddle> {
        self.riddle.as_ref()
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn results(&self) -> &ResultStore<K> {
        &self.results
    }

    pub fn preferences(&self) -> &Preferences<K> {
        &self.preferences
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            tier: self.tier,
            phase: self.phase,
            score: self.score,
            streak: self.streak,
            rounds_completed: self.rounds_completed,
            max_combo_streak: self.max_combo_streak,
            remaining_ms: self.remaining_ms,
            grid: self.grid.to_vec(),
            question: self.riddle.as_ref().map(|r| r.question().to_string()),
            answer_count: self.riddle.as_ref().map(|r| r.len()).unwrap_or(0),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Reset counters and deal the first round.
    ///
    /// A session that is still running is abandoned without being archived.
    pub fn start(&mut self, tier: DifficultyTier) {
        if self.is_active() {
            debug!(session_id = self.session_id, "abandoning running session");
        }

        self.tier = tier;
        self.score = 0;
        self.streak = 0;
        self.rounds_completed = 0;
        self.max_combo_streak = 0;
        self.riddle = None;
        self.grid.clear();
        self.remaining_ms = 0;
        self.advance_timer_ms = 0;
        self.session_id = self.session_id.wrapping_add(1);
        self.phase = SessionPhase::Active;

        info!(session_id = self.session_id, tier = tier.as_str(), "session started");
        self.begin_round();
    }

    /// Deal a fresh grid and riddle and restart the countdown.
    fn begin_round(&mut self) {
        if !self.is_active() {
            return;
        }

        self.phase = SessionPhase::Active;
        self.advance_timer_ms = 0;

        self.grid = self.catalogue.populate_grid(self.tier, &mut self.rng);
        self.emit(SessionEvent::GridRefreshed {
            specimens: self.grid.to_vec(),
        });

        let Some(riddle) = generate_riddle(self.tier, &self.grid, &mut self.rng) else {
            warn!(session_id = self.session_id, "no riddle for an empty grid");
            self.riddle = None;
            self.terminate();
            return;
        };

        debug!(
            session_id = self.session_id,
            round = self.rounds_completed + 1,
            question = riddle.question(),
            answers = riddle.len(),
            "round started"
        );
        self.emit(SessionEvent::RiddleGenerated {
            riddle: riddle.clone(),
        });
        self.riddle = Some(riddle);

        self.remaining_ms = self.tier.countdown_ms();
        self.emit(SessionEvent::TimeRemainingChanged {
            remaining_ms: self.remaining_ms,
        });
    }

    /// Advance the clock by `elapsed_ms`.
    ///
    /// While `Active` this runs the countdown and returns `Some(TimedOut)` when it
    /// expires. While in `RoundTransition` it counts down the pause and deals the
    /// next round when it ends. Otherwise it does nothing.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<RoundOutcome> {
        match self.phase {
            SessionPhase::Active => {
                self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
                self.emit(SessionEvent::TimeRemainingChanged {
                    remaining_ms: self.remaining_ms,
                });

                if self.remaining_ms == 0 {
                    debug!(session_id = self.session_id, "countdown expired");
                    self.resolve_failure();
                    return Some(RoundOutcome::TimedOut);
                }
                None
            }
            SessionPhase::RoundTransition => {
                self.advance_timer_ms = self.advance_timer_ms.saturating_sub(elapsed_ms);
                if self.advance_timer_ms == 0 {
                    self.begin_round();
                }
                None
            }
            SessionPhase::Idle | SessionPhase::Terminated => None,
        }
    }

    /// Answer the current riddle with the selected specimens.
    ///
    /// Names are compared as sets. Returns `None` (and changes nothing) when no
    /// round is awaiting an answer.
    pub fn submit_selections(&mut self, selection: &[Specimen]) -> Option<RoundOutcome> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        let solved = self.riddle.as_ref()?.is_solved_by(selection);

        if solved {
            Some(RoundOutcome::Solved(self.resolve_success()))
        } else {
            self.resolve_failure();
            Some(RoundOutcome::Missed)
        }
    }

    /// Answer with grid positions. Positions outside the grid are ignored.
    pub fn submit_cells(&mut self, cells: &[usize]) -> Option<RoundOutcome> {
        let selection: Vec<Specimen> = cells
            .iter()
            .filter_map(|&i| self.grid.get(i).copied())
            .collect();
        self.submit_selections(&selection)
    }

    fn resolve_success(&mut self) -> RoundScore {
        self.rounds_completed += 1;
        self.streak += 1;

        let round = calculate_round_score(self.tier, self.streak);
        if let Some(multiplier) = round.multiplier {
            self.max_combo_streak = self.max_combo_streak.max(self.streak);
            self.emit(SessionEvent::ComboTriggered { multiplier });
        }
        self.score = self.score.saturating_add(round.total);

        self.emit(SessionEvent::ScoreChanged { score: self.score });
        self.emit(SessionEvent::ComboStreakChanged {
            streak: self.streak,
        });
        self.emit_round_completed(true);

        debug!(
            session_id = self.session_id,
            streak = self.streak,
            points = round.total,
            score = self.score,
            "round solved"
        );

        self.phase = SessionPhase::RoundTransition;
        self.advance_timer_ms = ROUND_ADVANCE_DELAY_MS;
        round
    }

    /// Wrong answer or timeout: the streak is lost and the game ends.
    fn resolve_failure(&mut self) {
        self.streak = 0;
        self.emit(SessionEvent::ComboStreakChanged { streak: 0 });
        self.emit_round_completed(false);
        self.terminate();
    }

    fn emit_round_completed(&mut self, successful: bool) {
        let (correct_cells, correct_specimens) = match &self.riddle {
            Some(r) => (r.cells().to_vec(), r.specimens().to_vec()),
            None => (Vec::new(), Vec::new()),
        };
        self.emit(SessionEvent::RoundCompleted {
            successful,
            correct_cells,
            correct_specimens,
        });
    }

    /// End the session, archive its result and publish the final tally.
    ///
    /// Safe to call at any time; only the first call on a running session has an
    /// effect. Returns whether this call ended the session.
    pub fn terminate(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        self.phase = SessionPhase::Terminated;
        self.advance_timer_ms = 0;

        let best = self.results.best_score_for(self.tier);
        let is_high_score = self.score > best;

        let record = ResultRecord::new(
            self.tier,
            self.score,
            self.preferences.player_name(),
            self.rounds_completed,
            self.max_combo_streak,
        );
        match self.results.archive(record) {
            Ok(rank) => debug!(session_id = self.session_id, ?rank, "result archived"),
            Err(e) => warn!(session_id = self.session_id, error = %e, "failed to archive result"),
        }

        info!(
            session_id = self.session_id,
            score = self.score,
            rounds = self.rounds_completed,
            is_high_score,
            "session terminated"
        );
        self.emit(SessionEvent::SessionTerminated {
            final_score: self.score,
            rounds_completed: self.rounds_completed,
            is_high_score,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::TICK_MS;

    fn session(seed: u64) -> Session<MemoryStore> {
        Session::new(seed, Arc::new(MemoryStore::new()))
    }

    fn answer(s: &Session<MemoryStore>) -> Vec<Specimen> {
        s.riddle().unwrap().specimens().to_vec()
    }

    /// Solve the current round and wait out the pause.
    fn solve_round(s: &mut Session<MemoryStore>) -> RoundScore {
        let outcome = s.submit_selections(&answer(s));
        let Some(RoundOutcome::Solved(score)) = outcome else {
            panic!("expected a solved round, got {:?}", outcome);
        };
        s.tick(ROUND_ADVANCE_DELAY_MS);
        score
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session(1);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(!s.is_active());
        assert!(s.riddle().is_none());
        assert!(s.grid().is_empty());
        assert_eq!(s.score(), 0);
        assert_eq!(s.session_id(), 0);
    }

    #[test]
    fn test_start_deals_first_round() {
        let mut s = session(1);
        s.start(DifficultyTier::Novice);

        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.session_id(), 1);
        assert_eq!(s.grid().len(), 20);
        assert!(s.riddle().is_some());
        assert_eq!(s.remaining_ms(), 15_000);

        let events = s.take_events();
        let kinds: Vec<_> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec!["grid_refreshed", "riddle_generated", "time_remaining_changed"]
        );
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_veteran_grid_size() {
        let mut s = session(2);
        s.start(DifficultyTier::Veteran);
        assert_eq!(s.grid().len(), 36);
        assert_eq!(s.remaining_ms(), 20_000);
    }

    #[test]
    fn test_tick_counts_down() {
        let mut s = session(3);
        s.start(DifficultyTier::Novice);
        s.take_events();

        assert_eq!(s.tick(TICK_MS), None);
        assert_eq!(s.remaining_ms(), 15_000 - TICK_MS);
        assert_eq!(
            s.take_events(),
            vec![SessionEvent::TimeRemainingChanged {
                remaining_ms: 15_000 - TICK_MS
            }]
        );
    }

    #[test]
    fn test_timeout_terminates() {
        let mut s = session(4);
        s.start(DifficultyTier::Novice);
        s.take_events();

        let mut outcome = None;
        for _ in 0..150 {
            outcome = s.tick(TICK_MS);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(RoundOutcome::TimedOut));
        assert_eq!(s.phase(), SessionPhase::Terminated);
        assert_eq!(s.remaining_ms(), 0);
        assert_eq!(s.streak(), 0);

        let events = s.take_events();
        let tail: Vec<_> = events.iter().rev().take(4).map(|e| e.kind()).collect();
        assert_eq!(
            tail,
            vec![
                "session_terminated",
                "round_completed",
                "combo_streak_changed",
                "time_remaining_changed"
            ]
        );

        // Further ticks do nothing.
        assert_eq!(s.tick(TICK_MS), None);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_correct_submission_scores_and_pauses() {
        let mut s = session(5);
        s.start(DifficultyTier::Novice);
        s.take_events();

        let outcome = s.submit_selections(&answer(&s));
        assert!(matches!(outcome, Some(RoundOutcome::Solved(_))));
        assert_eq!(s.phase(), SessionPhase::RoundTransition);
        assert_eq!(s.score(), 10);
        assert_eq!(s.streak(), 1);
        assert_eq!(s.rounds_completed(), 1);

        let kinds: Vec<_> = s.take_events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec!["score_changed", "combo_streak_changed", "round_completed"]
        );

        // Countdown is stopped during the pause and submissions are ignored.
        let remaining = s.remaining_ms();
        assert_eq!(s.tick(TICK_MS), None);
        assert_eq!(s.remaining_ms(), remaining);
        assert_eq!(s.submit_selections(&[]), None);

        // The next round is dealt once the pause has elapsed.
        s.tick(ROUND_ADVANCE_DELAY_MS);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.remaining_ms(), 15_000);
    }

    #[test]
    fn test_wrong_submission_terminates_and_archives() {
        let mut s = session(6);
        s.start(DifficultyTier::Novice);
        solve_round(&mut s);
        s.take_events();

        assert_eq!(s.submit_selections(&[]), Some(RoundOutcome::Missed));
        assert_eq!(s.phase(), SessionPhase::Terminated);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.score(), 10);

        let events = s.take_events();
        assert_eq!(events[0], SessionEvent::ComboStreakChanged { streak: 0 });
        assert!(matches!(
            events[1],
            SessionEvent::RoundCompleted {
                successful: false,
                ..
            }
        ));
        assert_eq!(
            events[2],
            SessionEvent::SessionTerminated {
                final_score: 10,
                rounds_completed: 1,
                is_high_score: true,
            }
        );

        let board = s.results().results_for(DifficultyTier::Novice);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].points, 10);
        assert_eq!(board[0].player_name, "Player");
        assert_eq!(board[0].rounds_completed, 1);
    }

    #[test]
    fn test_submission_ignored_when_idle() {
        let mut s = session(7);
        assert_eq!(s.submit_cells(&[0, 1]), None);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_submit_cells_maps_grid_positions() {
        let mut s = session(8);
        s.start(DifficultyTier::Novice);
        let cells = s.riddle().unwrap().cells().to_vec();

        // Out-of-range positions are dropped.
        let mut with_noise = cells.clone();
        with_noise.push(999);
        with_noise.reverse();

        let outcome = s.submit_cells(&with_noise);
        assert!(matches!(outcome, Some(RoundOutcome::Solved(_))));
    }

    #[test]
    fn test_combo_scoring_sequence() {
        let mut s = session(9);
        s.start(DifficultyTier::Novice);

        let totals: Vec<u32> = (0..6).map(|_| solve_round(&mut s).total).collect();
        assert_eq!(totals, vec![10, 10, 10, 15, 20, 25]);
        assert_eq!(s.score(), 90);
        assert_eq!(s.max_combo_streak(), 6);
    }

    #[test]
    fn test_max_combo_stays_zero_below_threshold() {
        let mut s = session(10);
        s.start(DifficultyTier::Veteran);
        solve_round(&mut s);
        solve_round(&mut s);
        assert_eq!(s.streak(), 2);
        assert_eq!(s.max_combo_streak(), 0);
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let mut s = session(11);
        s.start(DifficultyTier::Novice);
        s.take_events();

        assert!(s.terminate());
        assert!(!s.terminate());

        let terminated = s
            .take_events()
            .iter()
            .filter(|e| e.is_terminal())
            .count();
        assert_eq!(terminated, 1);
        assert_eq!(s.results().results_for(DifficultyTier::Novice).len(), 1);
    }

    #[test]
    fn test_terminate_during_pause_cancels_next_round() {
        let mut s = session(12);
        s.start(DifficultyTier::Novice);
        s.submit_selections(&answer(&s));
        assert_eq!(s.phase(), SessionPhase::RoundTransition);

        s.terminate();
        s.take_events();
        s.tick(ROUND_ADVANCE_DELAY_MS);
        assert_eq!(s.phase(), SessionPhase::Terminated);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_terminate_before_start_is_noop() {
        let mut s = session(13);
        assert!(!s.terminate());
        assert!(s.results().results_for(DifficultyTier::Novice).is_empty());
    }

    #[test]
    fn test_high_score_flag_against_stored_best() {
        let kv = Arc::new(MemoryStore::new());
        let mut s = Session::new(14, Arc::clone(&kv));

        s.start(DifficultyTier::Novice);
        solve_round(&mut s);
        s.terminate();
        assert!(s.take_events().contains(&SessionEvent::SessionTerminated {
            final_score: 10,
            rounds_completed: 1,
            is_high_score: true,
        }));

        // Same score again does not beat the stored best.
        s.start(DifficultyTier::Novice);
        solve_round(&mut s);
        s.terminate();
        assert!(s.take_events().contains(&SessionEvent::SessionTerminated {
            final_score: 10,
            rounds_completed: 1,
            is_high_score: false,
        }));
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut s = session(15);
        s.start(DifficultyTier::Novice);
        solve_round(&mut s);
        solve_round(&mut s);
        s.terminate();

        s.start(DifficultyTier::Veteran);
        assert_eq!(s.session_id(), 2);
        assert_eq!(s.tier(), DifficultyTier::Veteran);
        assert_eq!(s.score(), 0);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.rounds_completed(), 0);
        assert_eq!(s.max_combo_streak(), 0);
        assert!(s.is_active());
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut s = session(16);
        s.start(DifficultyTier::Novice);
        let snap = s.snapshot();

        assert!(snap.playable());
        assert_eq!(snap.grid.len(), 20);
        assert_eq!(snap.answer_count, s.riddle().unwrap().len());
        assert_eq!(snap.question.as_deref(), Some(s.riddle().unwrap().question()));
        assert_eq!(snap.remaining_secs(), 15.0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = session(99);
        let mut b = session(99);
        a.start(DifficultyTier::Veteran);
        b.start(DifficultyTier::Veteran);
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.riddle(), b.riddle());
    }
}
