use crate::session::SessionPhase;
use crate::types::{DifficultyTier, Specimen};

/// Point-in-time copy of everything a front end displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: u32,
    pub tier: DifficultyTier,
    pub phase: SessionPhase,
    pub score: u32,
    pub streak: u32,
    pub rounds_completed: u32,
    pub max_combo_streak: u32,
    pub remaining_ms: u32,
    pub grid: Vec<Specimen>,
    pub question: Option<String>,
    /// Number of cells in the current answer set
    pub answer_count: usize,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_ms as f32 / 1000.0
    }
}
