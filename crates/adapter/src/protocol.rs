//! Protocol module - line-delimited JSON view of session events
//!
//! Every line is one JSON object with a `type` tag. Specimens are written by
//! name; tiers and complexities by their lowercase labels.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{SessionEvent, SessionSnapshot};
use crate::types::Specimen;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventLine {
    Score {
        score: u32,
    },
    Streak {
        streak: u32,
    },
    Time {
        remaining_ms: u32,
    },
    Riddle {
        question: String,
        answers: usize,
        complexity: String,
    },
    Grid {
        specimens: Vec<String>,
    },
    Round {
        successful: bool,
        cells: Vec<usize>,
        specimens: Vec<String>,
    },
    Terminated {
        final_score: u32,
        rounds_completed: u32,
        is_high_score: bool,
    },
    Combo {
        multiplier: u32,
    },
}

fn names(specimens: &[Specimen]) -> Vec<String> {
    specimens.iter().map(|s| s.name.to_string()).collect()
}

impl From<&SessionEvent> for EventLine {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::ScoreChanged { score } => EventLine::Score { score: *score },
            SessionEvent::ComboStreakChanged { streak } => EventLine::Streak { streak: *streak },
            SessionEvent::TimeRemainingChanged { remaining_ms } => EventLine::Time {
                remaining_ms: *remaining_ms,
            },
            SessionEvent::RiddleGenerated { riddle } => EventLine::Riddle {
                question: riddle.question().to_string(),
                answers: riddle.len(),
                complexity: riddle.complexity().as_str().to_string(),
            },
            SessionEvent::GridRefreshed { specimens } => EventLine::Grid {
                specimens: names(specimens),
            },
            SessionEvent::RoundCompleted {
                successful,
                correct_cells,
                correct_specimens,
            } => EventLine::Round {
                successful: *successful,
                cells: correct_cells.clone(),
                specimens: names(correct_specimens),
            },
            SessionEvent::SessionTerminated {
                final_score,
                rounds_completed,
                is_high_score,
            } => EventLine::Terminated {
                final_score: *final_score,
                rounds_completed: *rounds_completed,
                is_high_score: *is_high_score,
            },
            SessionEvent::ComboTriggered { multiplier } => EventLine::Combo {
                multiplier: *multiplier,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub session_id: u32,
    pub tier: String,
    pub phase: String,
    pub score: u32,
    pub streak: u32,
    pub rounds_completed: u32,
    pub max_combo_streak: u32,
    pub remaining_ms: u32,
    pub grid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub answer_count: usize,
}

impl From<&SessionSnapshot> for SnapshotLine {
    fn from(snap: &SessionSnapshot) -> Self {
        Self {
            session_id: snap.session_id,
            tier: snap.tier.as_str().to_string(),
            phase: snap.phase.as_str().to_string(),
            score: snap.score,
            streak: snap.streak,
            rounds_completed: snap.rounds_completed,
            max_combo_streak: snap.max_combo_streak,
            remaining_ms: snap.remaining_ms,
            grid: names(&snap.grid),
            question: snap.question.clone(),
            answer_count: snap.answer_count,
        }
    }
}

/// Encode one event as a single JSON line (no trailing newline).
pub fn encode_event(event: &SessionEvent) -> Result<String> {
    Ok(serde_json::to_string(&EventLine::from(event))?)
}

pub fn encode_snapshot(snapshot: &SessionSnapshot) -> Result<String> {
    Ok(serde_json::to_string(&SnapshotLine::from(snapshot))?)
}
