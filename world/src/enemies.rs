//! Enemies travelling along the fixed path.

use std::sync::Arc;

use path_defence_core::{Color, EnemyId, EnemyKind, EnemySnapshot, Point};
use path_defence_system_tower_targeting::Candidate;

/// A hostile entity following the path from its first to its last waypoint.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    path: Arc<[Point]>,
    segment: usize,
    position: Point,
    speed: f32,
    max_health: i32,
    health: i32,
    bounty: u32,
    color: Color,
}

impl Enemy {
    /// Creates an enemy of the given kind standing on the first waypoint.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, path: Arc<[Point]>) -> Self {
        let position = path.first().copied().unwrap_or_default();
        Self {
            id,
            kind,
            path,
            segment: 0,
            position,
            speed: kind.speed(),
            max_health: kind.health(),
            health: kind.health(),
            bounty: kind.bounty(),
            color: kind.color(),
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Kind the enemy was spawned as.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Index of the waypoint the enemy last reached.
    #[must_use]
    pub const fn segment(&self) -> usize {
        self.segment
    }

    /// Remaining health; may be zero or negative until the enemy is removed.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Money paid out when the enemy is killed.
    #[must_use]
    pub const fn bounty(&self) -> u32 {
        self.bounty
    }

    /// Reports whether the enemy still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtracts damage from the enemy's health.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub_unsigned(amount);
    }

    /// Moves toward the next waypoint by at most `speed * allowance`.
    ///
    /// When the waypoint is closer than the step the enemy lands on it and
    /// the segment index advances; the step does not carry over into the
    /// following segment. Returns `true` once the last waypoint is reached.
    pub fn advance(&mut self, allowance: f32) -> bool {
        let Some(next) = self.path.get(self.segment + 1).copied() else {
            return true;
        };

        let step = self.speed * allowance;
        let distance = self.position.distance(next);
        if distance < step || distance == 0.0 {
            self.position = next;
            self.segment += 1;
        } else {
            let dx = next.x() - self.position.x();
            let dy = next.y() - self.position.y();
            self.position = Point::new(
                self.position.x() + dx / distance * step,
                self.position.y() + dy / distance * step,
            );
        }

        self.segment + 1 >= self.path.len()
    }

    pub(crate) fn candidate(&self) -> Candidate {
        Candidate::new(self.id, self.position)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            segment: self.segment,
            color: self.color,
        }
    }
}
