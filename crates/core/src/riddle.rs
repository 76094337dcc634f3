//! Riddle generation - picking a fair question for the current grid
//!
//! A riddle is a predicate over specimen attributes plus the grid cells that
//! satisfy it. Templates come in two pools:
//!
//! - **Elementary**: one attribute ("Find forest animals")
//! - **Advanced**: two attributes combined ("Find large herbivores",
//!   "Find slow or climbing animals")
//!
//! # Selection policy
//!
//! The tier's pool is shuffled and the first template whose match count `m`
//! satisfies `1 <= m < grid.len()` and `m <= cap` wins. Shuffling keeps the
//! questions varied; the bounds rule out riddles that match nothing, everything,
//! or more cells than the player may select.
//!
//! Fallbacks, in order:
//!
//! 1. Veteran only: the elementary pool with the veteran cap, tagged advanced.
//! 2. "Find the <name>" for a random grid cell. Every cell holding that animal is
//!    an answer, so this is the only path that may break the bounds above.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{
    DifficultyTier, Diet, Habitat, Locomotion, RiddleComplexity, Size, Specimen,
};

/// A question phrase with the attribute test behind it
#[derive(Clone, Copy)]
pub struct RiddleTemplate {
    pub phrase: &'static str,
    pub predicate: fn(&Specimen) -> bool,
}

impl std::fmt::Debug for RiddleTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiddleTemplate")
            .field("phrase", &self.phrase)
            .finish()
    }
}

const fn template(phrase: &'static str, predicate: fn(&Specimen) -> bool) -> RiddleTemplate {
    RiddleTemplate { phrase, predicate }
}

pub const ELEMENTARY_TEMPLATES: [RiddleTemplate; 15] = [
    template("Find herbivores (plant eaters)", |s| s.diet == Diet::Herbivore),
    template("Find carnivores (meat eaters)", |s| s.diet == Diet::Carnivore),
    template("Find omnivores (eat both)", |s| s.diet == Diet::Omnivore),
    template("Find forest animals", |s| s.habitat == Habitat::Forest),
    template("Find savannah animals", |s| s.habitat == Habitat::Savannah),
    template("Find domestic animals", |s| s.habitat == Habitat::Domestic),
    template("Find large animals", |s| s.size == Size::Large),
    template("Find small animals", |s| s.size == Size::Small),
    template("Find fast animals", |s| s.locomotion == Locomotion::Fast),
    template("Find slow animals", |s| s.locomotion == Locomotion::Slow),
    template("Find climbing animals", |s| s.locomotion == Locomotion::Climbs),
    template("Find spotted animals", |s| s.spotted),
    template("Find striped animals", |s| s.striped),
    template("Find animals with tails", |s| s.tailed),
    template("Find furry animals", |s| s.furred),
];

pub const ADVANCED_TEMPLATES: [RiddleTemplate; 14] = [
    template("Find large herbivores", |s| {
        s.size == Size::Large && s.diet == Diet::Herbivore
    }),
    template("Find small carnivores", |s| {
        s.size == Size::Small && s.diet == Diet::Carnivore
    }),
    template("Find fast forest animals", |s| {
        s.locomotion == Locomotion::Fast && s.habitat == Habitat::Forest
    }),
    template("Find slow or climbing animals", |s| {
        s.locomotion == Locomotion::Slow || s.locomotion == Locomotion::Climbs
    }),
    template("Find domestic omnivores", |s| {
        s.habitat == Habitat::Domestic && s.diet == Diet::Omnivore
    }),
    template("Find wild predators", |s| {
        s.diet == Diet::Carnivore && s.habitat != Habitat::Domestic
    }),
    template("Find medium-sized animals", |s| s.size == Size::Medium),
    template("Find arctic animals", |s| s.habitat == Habitat::Arctic),
    template("Find savannah predators", |s| {
        s.habitat == Habitat::Savannah && s.diet == Diet::Carnivore
    }),
    template("Find animals that climb trees", |s| {
        s.locomotion == Locomotion::Climbs
    }),
    template("Find large wild animals", |s| {
        s.size == Size::Large && s.habitat != Habitat::Domestic
    }),
    template("Find small domestic animals", |s| {
        s.size == Size::Small && s.habitat == Habitat::Domestic
    }),
    template("Find forest herbivores", |s| {
        s.habitat == Habitat::Forest && s.diet == Diet::Herbivore
    }),
    template("Find fast carnivores", |s| {
        s.locomotion == Locomotion::Fast && s.diet == Diet::Carnivore
    }),
];

/// A question and its answer cells for one grid.
///
/// Answers are grid positions, so an animal that appears twice contributes two
/// answer cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Riddle {
    question: String,
    cells: Vec<usize>,
    specimens: Vec<Specimen>,
    complexity: RiddleComplexity,
}

impl Riddle {
    /// Build a riddle from answer cell indices into `grid`.
    /// Out-of-range indices are dropped.
    pub fn new(
        question: impl Into<String>,
        cells: Vec<usize>,
        grid: &[Specimen],
        complexity: RiddleComplexity,
    ) -> Self {
        let cells: Vec<usize> = cells.into_iter().filter(|&i| i < grid.len()).collect();
        let specimens = cells.iter().map(|&i| grid[i]).collect();
        Self {
            question: question.into(),
            cells,
            specimens,
            complexity,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Answer cells, ascending
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Answer specimens, one per answer cell
    pub fn specimens(&self) -> &[Specimen] {
        &self.specimens
    }

    pub fn complexity(&self) -> RiddleComplexity {
        self.complexity
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains_cell(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    /// Distinct answer names
    pub fn answer_names(&self) -> HashSet<&'static str> {
        self.specimens.iter().map(|s| s.name).collect()
    }

    /// Whether `selection` names exactly the answer set.
    ///
    /// Comparison is by name as sets: order and repeats are ignored.
    pub fn is_solved_by(&self, selection: &[Specimen]) -> bool {
        let selected: HashSet<&'static str> = selection.iter().map(|s| s.name).collect();
        selected == self.answer_names()
    }

    fn retagged(mut self, complexity: RiddleComplexity) -> Self {
        self.complexity = complexity;
        self
    }
}

/// A set of templates tagged with the complexity they produce
#[derive(Debug, Clone, Copy)]
pub struct TemplatePool {
    templates: &'static [RiddleTemplate],
    complexity: RiddleComplexity,
}

pub const ELEMENTARY_POOL: TemplatePool = TemplatePool {
    templates: &ELEMENTARY_TEMPLATES,
    complexity: RiddleComplexity::Elementary,
};

pub const ADVANCED_POOL: TemplatePool = TemplatePool {
    templates: &ADVANCED_TEMPLATES,
    complexity: RiddleComplexity::Advanced,
};

impl TemplatePool {
    pub fn templates(&self) -> &'static [RiddleTemplate] {
        self.templates
    }

    pub fn complexity(&self) -> RiddleComplexity {
        self.complexity
    }

    /// First acceptable template in shuffled order, or `None` if none fits.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        grid: &[Specimen],
        cap: usize,
        rng: &mut R,
    ) -> Option<Riddle> {
        let mut order: Vec<&RiddleTemplate> = self.templates.iter().collect();
        order.shuffle(rng);

        order.into_iter().find_map(|t| {
            let cells = matching_cells(grid, t.predicate);
            let m = cells.len();
            if m >= 1 && m < grid.len() && m <= cap {
                Some(Riddle::new(t.phrase, cells, grid, self.complexity))
            } else {
                None
            }
        })
    }
}

/// Grid positions whose specimen satisfies `predicate`
pub fn matching_cells(grid: &[Specimen], predicate: fn(&Specimen) -> bool) -> Vec<usize> {
    grid.iter()
        .enumerate()
        .filter(|(_, s)| predicate(s))
        .map(|(i, _)| i)
        .collect()
}

/// "Find the <name>" for a random cell. `None` only for an empty grid.
pub fn name_riddle<R: Rng + ?Sized>(
    grid: &[Specimen],
    complexity: RiddleComplexity,
    rng: &mut R,
) -> Option<Riddle> {
    let target = *grid.choose(rng)?;
    let cells = grid
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == target)
        .map(|(i, _)| i)
        .collect();
    Some(Riddle::new(
        format!("Find the {}", target.name),
        cells,
        grid,
        complexity,
    ))
}

/// Produce a riddle for `grid` at `tier`'s difficulty.
///
/// Always succeeds for a non-empty grid; returns `None` only when `grid` is empty.
pub fn generate_riddle<R: Rng + ?Sized>(
    tier: DifficultyTier,
    grid: &[Specimen],
    rng: &mut R,
) -> Option<Riddle> {
    let cap = tier.max_selections();

    match tier {
        DifficultyTier::Novice => ELEMENTARY_POOL
            .synthesize(grid, cap, rng)
            .or_else(|| name_riddle(grid, RiddleComplexity::Elementary, rng)),
        DifficultyTier::Veteran => ADVANCED_POOL
            .synthesize(grid, cap, rng)
            .or_else(|| {
                ELEMENTARY_POOL
                    .synthesize(grid, cap, rng)
                    .map(|r| r.retagged(RiddleComplexity::Advanced))
            })
            .or_else(|| name_riddle(grid, RiddleComplexity::Advanced, rng)),
    }
}
