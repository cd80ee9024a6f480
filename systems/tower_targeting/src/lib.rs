#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects unit targets from enemy positions.
//!
//! Candidates are visited in the order the caller yields them, which for the
//! world is spawn order. Selection never depends on enemy health, so a unit
//! may still pick an enemy that an earlier unit already brought to zero
//! during the same tick.

use path_defence_core::{EnemyId, Point};

/// Enemy position considered during target selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Current position of the enemy.
    pub position: Point,
}

impl Candidate {
    /// Creates a new candidate.
    #[must_use]
    pub const fn new(id: EnemyId, position: Point) -> Self {
        Self { id, position }
    }
}

/// Selects the candidate nearest to `origin` whose distance is at most `range`.
///
/// Only a strictly smaller distance replaces the current best, so among
/// equidistant candidates the first one encountered wins.
#[must_use]
pub fn nearest_in_range<I>(origin: Point, range: f32, candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best: Option<BestCandidate> = None;

    for candidate in candidates {
        let distance = origin.distance(candidate.position);
        if distance > range {
            continue;
        }

        let current = BestCandidate {
            distance,
            candidate,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|best| best.candidate)
}

/// Yields every candidate whose distance to `center` is at most `radius`.
pub fn within_radius<I>(center: Point, radius: f32, candidates: I) -> impl Iterator<Item = EnemyId>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates
        .into_iter()
        .filter(move |candidate| center.distance(candidate.position) <= radius)
        .map(|candidate| candidate.id)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    candidate: Candidate,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}
