//! Specimen catalogue - the fixed registry of animals
//!
//! The standard catalogue is compiled in and never changes at runtime. Grids are
//! filled by drawing from it uniformly with replacement, so the same animal may
//! occupy several cells.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::types::{
    DifficultyTier, Diet, Habitat, Locomotion, Size, Specimen, MAX_GRID_CELLS,
};

use Diet::*;
use Habitat::*;
use Locomotion::*;
use Size::*;

/// Cells of one round, in display order (row-major)
pub type Grid = ArrayVec<Specimen, MAX_GRID_CELLS>;

#[allow(clippy::too_many_arguments)]
const fn animal(
    name: &'static str,
    diet: Diet,
    habitat: Habitat,
    locomotion: Locomotion,
    size: Size,
    spotted: bool,
    striped: bool,
    tailed: bool,
) -> Specimen {
    Specimen {
        name,
        diet,
        habitat,
        locomotion,
        size,
        furred: true,
        striped,
        spotted,
        tailed,
    }
}

/// The animals shipped with the game.
#[rustfmt::skip]
pub const STANDARD_SPECIMENS: [Specimen; 15] = [
    //     name          diet       habitat   moves   size    spots  stripes tail
    animal("Bear",       Omnivore,  Forest,   Walks,  Large,  false, false, true),
    animal("Cat",        Carnivore, Domestic, Fast,   Small,  false, false, true),
    animal("Cow",        Herbivore, Domestic, Walks,  Large,  true,  false, true),
    animal("Dog",        Omnivore,  Domestic, Fast,   Medium, false, false, true),
    animal("Elk",        Herbivore, Forest,   Fast,   Large,  false, false, true),
    animal("Fox",        Omnivore,  Forest,   Fast,   Small,  false, false, true),
    animal("Giraffe",    Herbivore, Savannah, Walks,  Large,  true,  false, true),
    animal("Koala",      Herbivore, Forest,   Climbs, Small,  false, false, false),
    animal("Lion",       Carnivore, Savannah, Fast,   Large,  false, false, true),
    animal("Monkey",     Omnivore,  Forest,   Climbs, Small,  false, false, true),
    animal("Panda",      Herbivore, Forest,   Slow,   Large,  false, false, true),
    animal("Polar Bear", Carnivore, Arctic,   Walks,  Large,  false, false, true),
    animal("Rabbit",     Herbivore, Domestic, Fast,   Small,  false, false, true),
    animal("Sloth",      Herbivore, Forest,   Slow,   Medium, false, false, true),
    animal("Tiger",      Carnivore, Forest,   Fast,   Large,  false, true,  true),
];

/// Read-only registry of specimens. Never empty.
#[derive(Debug, Clone)]
pub struct Catalogue {
    specimens: Vec<Specimen>,
}

impl Catalogue {
    /// The shipped registry
    pub fn standard() -> Self {
        Self {
            specimens: STANDARD_SPECIMENS.to_vec(),
        }
    }

    /// Build a custom registry. Returns `None` for an empty list.
    pub fn from_specimens(specimens: Vec<Specimen>) -> Option<Self> {
        if specimens.is_empty() {
            return None;
        }
        Some(Self { specimens })
    }

    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specimen> {
        self.specimens.iter()
    }

    pub fn find(&self, name: &str) -> Option<&Specimen> {
        self.specimens.iter().find(|s| s.name == name)
    }

    /// One uniformly random specimen (sampling with replacement)
    pub fn random_specimen<R: Rng + ?Sized>(&self, rng: &mut R) -> Specimen {
        self.specimens[rng.gen_range(0..self.specimens.len())]
    }

    /// All registry entries satisfying `predicate`
    pub fn specimens_matching<F>(&self, predicate: F) -> Vec<Specimen>
    where
        F: Fn(&Specimen) -> bool,
    {
        self.specimens.iter().copied().filter(|s| predicate(s)).collect()
    }

    /// Draw `tier.cell_count()` specimens independently
    pub fn populate_grid<R: Rng + ?Sized>(&self, tier: DifficultyTier, rng: &mut R) -> Grid {
        (0..tier.cell_count())
            .map(|_| self.random_specimen(rng))
            .collect()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}
