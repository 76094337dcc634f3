//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, persistence, async hosts, terminal front ends).
//!
//! # Difficulty Tiers
//!
//! | Tier | Grid | Cells | Countdown | Points/round | Max answers |
//! |------|------|-------|-----------|--------------|-------------|
//! | `Novice` | 4x5 | 20 | 15s | 10 | 5 |
//! | `Veteran` | 6x6 | 36 | 20s | 20 | 8 |
//!
//! Both tiers start applying combo multipliers once the streak reaches 3.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 100 | Countdown granularity |
//! | `ROUND_ADVANCE_DELAY_MS` | 1000 | Feedback pause after a solved round |
//!
//! # Examples
//!
//! ```
//! use beast_blitz_types::{DifficultyTier, Diet, Habitat};
//!
//! let tier = DifficultyTier::from_str("advanced").unwrap();
//! assert_eq!(tier, DifficultyTier::Veteran);
//! assert_eq!(tier.cell_count(), 36);
//!
//! assert_eq!(Diet::from_str("herbivore"), Some(Diet::Herbivore));
//! assert_eq!(Habitat::Arctic.as_str(), "arctic");
//! ```

use std::hash::{Hash, Hasher};

/// Countdown tick in milliseconds (0.1s)
pub const TICK_MS: u32 = 100;

/// Pause between a solved round and the next grid (1s)
pub const ROUND_ADVANCE_DELAY_MS: u32 = 1000;

/// Largest grid of any tier (6x6)
pub const MAX_GRID_CELLS: usize = 36;

/// Records retained per tier leaderboard
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Ceiling for the combo multiplier (applied as `multiplier / 2`)
pub const MAX_COMBO_MULTIPLIER: u32 = 5;

/// Player name used when none has been stored
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// What a specimen eats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    Herbivore,
    Carnivore,
    Omnivore,
}

impl Diet {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "herbivore" => Some(Diet::Herbivore),
            "carnivore" => Some(Diet::Carnivore),
            "omnivore" => Some(Diet::Omnivore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::Herbivore => "herbivore",
            Diet::Carnivore => "carnivore",
            Diet::Omnivore => "omnivore",
        }
    }
}

/// Where a specimen lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Habitat {
    Forest,
    Savannah,
    Arctic,
    Domestic,
    Mountain,
}

impl Habitat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forest" => Some(Habitat::Forest),
            "savannah" => Some(Habitat::Savannah),
            "arctic" => Some(Habitat::Arctic),
            "domestic" => Some(Habitat::Domestic),
            "mountain" => Some(Habitat::Mountain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Habitat::Forest => "forest",
            Habitat::Savannah => "savannah",
            Habitat::Arctic => "arctic",
            Habitat::Domestic => "domestic",
            Habitat::Mountain => "mountain",
        }
    }
}

/// How a specimen moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locomotion {
    Walks,
    Climbs,
    Slow,
    Fast,
}

impl Locomotion {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walks" => Some(Locomotion::Walks),
            "climbs" => Some(Locomotion::Climbs),
            "slow" => Some(Locomotion::Slow),
            "fast" => Some(Locomotion::Fast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locomotion::Walks => "walks",
            Locomotion::Climbs => "climbs",
            Locomotion::Slow => "slow",
            Locomotion::Fast => "fast",
        }
    }
}

/// Body size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(Size::Small),
            "medium" => Some(Size::Medium),
            "large" => Some(Size::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }
}

/// An animal with fixed attributes.
///
/// Identity is the name: two specimens with the same name compare equal and hash
/// identically regardless of their other fields.
#[derive(Debug, Clone, Copy)]
pub struct Specimen {
    pub name: &'static str,
    pub diet: Diet,
    pub habitat: Habitat,
    pub locomotion: Locomotion,
    pub size: Size,
    pub furred: bool,
    pub striped: bool,
    pub spotted: bool,
    pub tailed: bool,
}

impl PartialEq for Specimen {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Specimen {}

impl Hash for Specimen {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Difficulty configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyTier {
    Novice,
    Veteran,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 2] = [DifficultyTier::Novice, DifficultyTier::Veteran];

    pub fn columns(&self) -> usize {
        match self {
            DifficultyTier::Novice => 4,
            DifficultyTier::Veteran => 6,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            DifficultyTier::Novice => 5,
            DifficultyTier::Veteran => 6,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Countdown per round in milliseconds
    pub fn countdown_ms(&self) -> u32 {
        match self {
            DifficultyTier::Novice => 15_000,
            DifficultyTier::Veteran => 20_000,
        }
    }

    pub fn points_per_round(&self) -> u32 {
        match self {
            DifficultyTier::Novice => 10,
            DifficultyTier::Veteran => 20,
        }
    }

    /// Streak length at which combo multipliers begin
    pub fn combo_threshold(&self) -> u32 {
        3
    }

    /// Largest answer set a riddle may ask for
    pub fn max_selections(&self) -> usize {
        match self {
            DifficultyTier::Novice => 5,
            DifficultyTier::Veteran => 8,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, DifficultyTier::Veteran)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Novice => "Beginner",
            DifficultyTier::Veteran => "Advanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DifficultyTier::Novice => "4x5 grid, 15s timer, 10 pts/round",
            DifficultyTier::Veteran => "6x6 grid, 20s timer, 20 pts/round",
        }
    }

    /// Parse tier from string (case-insensitive, accepts tier and label names)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "novice" | "beginner" => Some(DifficultyTier::Novice),
            "veteran" | "advanced" => Some(DifficultyTier::Veteran),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Novice => "novice",
            DifficultyTier::Veteran => "veteran",
        }
    }
}

/// Sophistication of the template that produced a riddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiddleComplexity {
    Elementary,
    Advanced,
}

impl RiddleComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiddleComplexity::Elementary => "elementary",
            RiddleComplexity::Advanced => "advanced",
        }
    }
}
