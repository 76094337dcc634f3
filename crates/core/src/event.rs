//! Notifications published by a session.
//!
//! Events are queued in the order the state changed and drained by the host with
//! [`Session::take_events`](crate::session::Session::take_events).

use crate::riddle::Riddle;
use crate::types::Specimen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ScoreChanged {
        score: u32,
    },
    ComboStreakChanged {
        streak: u32,
    },
    TimeRemainingChanged {
        remaining_ms: u32,
    },
    RiddleGenerated {
        riddle: Riddle,
    },
    GridRefreshed {
        specimens: Vec<Specimen>,
    },
    /// A round resolved. `correct_cells` and `correct_specimens` describe the
    /// answer set so the front end can reveal it.
    RoundCompleted {
        successful: bool,
        correct_cells: Vec<usize>,
        correct_specimens: Vec<Specimen>,
    },
    SessionTerminated {
        final_score: u32,
        rounds_completed: u32,
        is_high_score: bool,
    },
    ComboTriggered {
        multiplier: u32,
    },
}

impl SessionEvent {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::ScoreChanged { .. } => "score_changed",
            SessionEvent::ComboStreakChanged { .. } => "combo_streak_changed",
            SessionEvent::TimeRemainingChanged { .. } => "time_remaining_changed",
            SessionEvent::RiddleGenerated { .. } => "riddle_generated",
            SessionEvent::GridRefreshed { .. } => "grid_refreshed",
            SessionEvent::RoundCompleted { .. } => "round_completed",
            SessionEvent::SessionTerminated { .. } => "session_terminated",
            SessionEvent::ComboTriggered { .. } => "combo_triggered",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::SessionTerminated { .. })
    }
}
