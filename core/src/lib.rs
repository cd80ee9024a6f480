#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters call the world's command
//! API between ticks, the world records [`Event`] values describing every
//! accepted mutation, and exports [`Snapshot`] values that external
//! collaborators (renderers, input layers) read without ever touching
//! simulation state directly.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{ConfigError, SimulationConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Position expressed in continuous screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier assigned to a placed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Unique identifier assigned to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Name under which a unit template is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Creates a template identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Display color handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Kinds of enemies that waves may release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Balanced enemy with moderate speed and health.
    Basic,
    /// Quick, fragile enemy.
    Fast,
    /// Slow enemy with a large health pool.
    Tank,
}

impl EnemyKind {
    /// Tag used for the kind in wave definitions and scenario files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Tank => "tank",
        }
    }

    /// Distance covered per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Basic => 2.0,
            Self::Fast => 3.5,
            Self::Tank => 1.0,
        }
    }

    /// Health the enemy spawns with.
    #[must_use]
    pub const fn health(self) -> i32 {
        match self {
            Self::Basic => 50,
            Self::Fast => 30,
            Self::Tank => 150,
        }
    }

    /// Money credited when the enemy is killed.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Basic => 10,
            Self::Fast => 15,
            Self::Tank => 25,
        }
    }

    /// Appearance assigned to enemies of this kind.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Basic => Color::from_rgb(0, 255, 0),
            Self::Fast => Color::from_rgb(255, 255, 0),
            Self::Tank => Color::from_rgb(255, 0, 0),
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EnemyKind {
    type Err = UnknownEnemyKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basic" => Ok(Self::Basic),
            "fast" => Ok(Self::Fast),
            "tank" => Ok(Self::Tank),
            other => Err(UnknownEnemyKind(other.to_owned())),
        }
    }
}

/// Reports that a wave definition named an enemy kind that does not exist.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown enemy kind `{0}`")]
pub struct UnknownEnemyKind(pub String);

/// The original five-wave campaign, in spawn order.
#[must_use]
pub fn default_campaign() -> Vec<Vec<EnemyKind>> {
    [(10, 0, 0), (8, 7, 0), (10, 7, 3), (10, 10, 5), (10, 12, 8)]
        .into_iter()
        .map(|(basic, fast, tank)| {
            let mut wave = vec![EnemyKind::Basic; basic];
            wave.extend(std::iter::repeat(EnemyKind::Fast).take(fast));
            wave.extend(std::iter::repeat(EnemyKind::Tank).take(tank));
            wave
        })
        .collect()
}

/// How a unit applies its damage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttackMode {
    /// Damages only the nearest enemy in range.
    SingleTarget,
    /// Damages every enemy around the nearest enemy in range.
    AreaOfEffect {
        /// Distance from the primary target within which enemies are hit.
        explosion_radius: f32,
    },
}

/// Immutable configuration record describing a purchasable unit kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Identifier the template is registered under.
    pub id: TemplateId,
    /// Human readable name shown by adapters.
    pub name: String,
    /// Attack range measured from the unit center.
    pub range: f32,
    /// Damage applied per hit.
    pub damage: u32,
    /// Ticks the unit waits after attacking.
    pub cooldown: u32,
    /// Purchase price.
    pub cost: u32,
    /// Attack rule applied when the unit fires.
    pub attack_mode: AttackMode,
    /// Display color.
    pub color: Color,
}

impl UnitTemplate {
    /// Cheap single-target unit.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            id: TemplateId::new("basic"),
            name: "Basic Tower".to_owned(),
            range: 100.0,
            damage: 10,
            cooldown: 30,
            cost: 50,
            attack_mode: AttackMode::SingleTarget,
            color: Color::from_rgb(0, 0, 255),
        }
    }

    /// Long-range, slow-firing single-target unit.
    #[must_use]
    pub fn sniper() -> Self {
        Self {
            id: TemplateId::new("sniper"),
            name: "Sniper Tower".to_owned(),
            range: 200.0,
            damage: 30,
            cooldown: 60,
            cost: 100,
            attack_mode: AttackMode::SingleTarget,
            color: Color::from_rgb(255, 0, 0),
        }
    }

    /// Short-range unit whose hits explode around the target.
    #[must_use]
    pub fn bomber() -> Self {
        Self {
            id: TemplateId::new("bomber"),
            name: "Bomber Tower".to_owned(),
            range: 80.0,
            damage: 15,
            cooldown: 45,
            cost: 75,
            attack_mode: AttackMode::AreaOfEffect {
                explosion_radius: 50.0,
            },
            color: Color::from_rgb(255, 255, 0),
        }
    }
}

/// Price of one upgrade for a unit originally bought for `cost`.
#[must_use]
pub const fn upgrade_cost(cost: u32) -> u32 {
    cost / 2
}

/// Money returned when selling a unit originally bought for `cost`.
#[must_use]
pub const fn sell_refund(cost: u32) -> u32 {
    // floor(cost * 0.7) without a round trip through floating point
    ((cost as u64 * 7) / 10) as u32
}

/// Reason attached to every economy mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundsCause {
    /// Purchase of a new unit.
    Placement,
    /// Upgrade of an existing unit.
    Upgrade,
    /// Refund paid out when a unit is sold.
    SaleRefund,
    /// Bounty paid for a killed enemy.
    KillBounty,
}

/// Overall state of the encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The encounter is in progress.
    #[default]
    Playing,
    /// Lives ran out.
    GameOver,
    /// Every wave was spawned and defeated.
    Victory,
}

impl GameState {
    /// Reports whether the state is absorbing.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Reasons a unit placement may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The snapped position lies outside the screen.
    #[error("position is outside the screen")]
    OutOfBounds,
    /// The snapped position is closer to a path waypoint than the path buffer.
    #[error("position is too close to the path")]
    TooCloseToPath,
    /// The snapped position is closer to another unit than the unit buffer.
    #[error("position is too close to another unit")]
    TooCloseToUnit,
}

/// Raised when a spend exceeds the available balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("insufficient funds: requested {requested}, available {available}")]
pub struct InsufficientFunds {
    /// Amount the caller attempted to spend.
    pub requested: u32,
    /// Balance at the time of the attempt.
    pub available: u32,
}

/// Raised when instantiating a template that was never registered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown unit template `{0}`")]
pub struct UnknownTemplate(pub TemplateId);

/// Raised when registering a template id twice.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unit template `{0}` is already registered")]
pub struct DuplicateTemplate(pub TemplateId);

/// Errors produced by the wave schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum WaveError {
    /// Every wave has already been started.
    #[error("no more waves")]
    NoMoreWaves,
    /// A wave is currently spawning.
    #[error("a wave is already active")]
    WaveAlreadyActive,
}

/// Errors returned by the world's command API.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// The requested template does not exist.
    #[error("unknown unit template `{0}`")]
    UnknownTemplate(TemplateId),
    /// The requested unit does not exist.
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    /// The snapped placement position failed validation.
    #[error("invalid placement at {position}: {reason}")]
    InvalidPlacement {
        /// Grid position that was checked.
        position: Point,
        /// First check that failed.
        reason: PlacementError,
    },
    /// The economy cannot cover the cost.
    #[error(transparent)]
    InsufficientFunds(#[from] InsufficientFunds),
    /// Every wave has already been started.
    #[error("no more waves")]
    NoMoreWaves,
    /// A wave is currently spawning.
    #[error("a wave is already active")]
    WaveAlreadyActive,
    /// The encounter reached a terminal state; only a reset is accepted.
    #[error("the game has ended ({0:?})")]
    GameEnded(GameState),
}

impl From<WaveError> for CommandError {
    fn from(error: WaveError) -> Self {
        match error {
            WaveError::NoMoreWaves => Self::NoMoreWaves,
            WaveError::WaveAlreadyActive => Self::WaveAlreadyActive,
        }
    }
}

impl From<UnknownTemplate> for CommandError {
    fn from(error: UnknownTemplate) -> Self {
        Self::UnknownTemplate(error.0)
    }
}

/// Events recorded by the world after accepting commands or advancing time.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A unit was bought and placed.
    UnitPlaced {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Template the unit was created from.
        template: TemplateId,
        /// Snapped position of the unit center.
        position: Point,
    },
    /// A unit gained a level.
    UnitUpgraded {
        /// Identifier of the upgraded unit.
        unit: UnitId,
        /// Level reached after the upgrade.
        level: u32,
        /// Money charged for the upgrade.
        price: u32,
    },
    /// A unit was sold and removed.
    UnitSold {
        /// Identifier of the sold unit.
        unit: UnitId,
        /// Money refunded for the unit.
        refund: u32,
    },
    /// A unit hit at least one enemy.
    UnitAttacked {
        /// Identifier of the attacking unit.
        unit: UnitId,
        /// Enemy the attack was aimed at.
        target: EnemyId,
        /// Total damage dealt across every enemy hit.
        damage: u32,
    },
    /// The economy balance changed.
    FundsChanged {
        /// Reason for the mutation.
        cause: FundsCause,
        /// Signed change applied to the balance.
        delta: i64,
        /// Balance after the change.
        balance: u32,
    },
    /// A wave started spawning.
    WaveStarted {
        /// Zero-based index of the wave.
        wave: usize,
    },
    /// A wave spawned every entry and was deactivated.
    WaveCompleted {
        /// Zero-based index of the wave.
        wave: usize,
    },
    /// An enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
    },
    /// An enemy died and paid out its bounty.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Bounty credited for the kill.
        bounty: u32,
    },
    /// An enemy reached the end of the path and cost a life.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
    },
    /// The encounter changed state.
    GameStateChanged {
        /// State entered.
        state: GameState,
    },
    /// The world returned to its initial state.
    WorldReset,
}

/// Immutable representation of a single unit used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Identifier allocated to the unit by the world.
    pub id: UnitId,
    /// Template the unit was created from.
    pub template: TemplateId,
    /// Display name copied from the template.
    pub name: String,
    /// Center of the unit.
    pub position: Point,
    /// Current level, starting at one.
    pub level: u32,
    /// Current attack range.
    pub range: f32,
    /// Current damage per hit.
    pub damage: u32,
    /// Current cooldown between attacks in ticks.
    pub cooldown: u32,
    /// Ticks left before the unit may attack again.
    pub cooldown_remaining: u32,
    /// Attack rule of the unit.
    pub attack_mode: AttackMode,
    /// Enemy hit by the most recent attack, if it is still alive.
    pub target: Option<EnemyId>,
    /// Display color.
    pub color: Color,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position along the path.
    pub position: Point,
    /// Remaining health.
    pub health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
    /// Index of the waypoint the enemy last reached.
    pub segment: usize,
    /// Display color.
    pub color: Color,
}

/// Progress of the wave schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveProgress {
    /// Zero-based index of the current (or next) wave.
    pub current: usize,
    /// Number of waves in the schedule.
    pub total: usize,
    /// Entries of the current wave already spawned.
    pub spawned: usize,
    /// Entries in the current wave.
    pub size: usize,
    /// Whether the current wave is spawning.
    pub active: bool,
}

/// Read-only view of the whole simulation after a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of ticks simulated since the last reset.
    pub tick: u64,
    /// Units ordered by identifier.
    pub units: Vec<UnitSnapshot>,
    /// Live enemies in spawn order.
    pub enemies: Vec<EnemySnapshot>,
    /// Economy balance.
    pub money: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Wave schedule progress.
    pub wave: WaveProgress,
    /// State of the encounter.
    pub state: GameState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let origin = Point::new(0.0, 0.0);
        let other = Point::new(3.0, 4.0);
        assert!((origin.distance(other) - 5.0).abs() < f32::EPSILON);
        assert!((other.distance(origin) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fund_policies_round_down() {
        assert_eq!(upgrade_cost(50), 25);
        assert_eq!(upgrade_cost(75), 37);
        assert_eq!(sell_refund(50), 35);
        assert_eq!(sell_refund(75), 52);
        assert_eq!(sell_refund(100), 70);
    }

    #[test]
    fn enemy_kind_tags_parse_back() {
        for kind in [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank] {
            assert_eq!(kind.tag().parse::<EnemyKind>(), Ok(kind));
        }
        assert_eq!(
            "dragon".parse::<EnemyKind>(),
            Err(UnknownEnemyKind("dragon".to_owned()))
        );
    }

    #[test]
    fn default_campaign_matches_wave_sizes() {
        let sizes: Vec<usize> = default_campaign().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 15, 20, 25, 30]);
        let third = &default_campaign()[2];
        assert_eq!(third[0], EnemyKind::Basic);
        assert_eq!(third[10], EnemyKind::Fast);
        assert_eq!(third[19], EnemyKind::Tank);
    }

    #[test]
    fn wave_errors_map_to_command_errors() {
        assert_eq!(
            CommandError::from(WaveError::NoMoreWaves),
            CommandError::NoMoreWaves
        );
        assert_eq!(
            CommandError::from(WaveError::WaveAlreadyActive),
            CommandError::WaveAlreadyActive
        );
    }

    #[test]
    fn insufficient_funds_message_names_amounts() {
        let error = CommandError::from(InsufficientFunds {
            requested: 75,
            available: 20,
        });
        assert_eq!(
            error.to_string(),
            "insufficient funds: requested 75, available 20"
        );
    }

    #[test]
    fn only_playing_is_not_terminal() {
        assert!(!GameState::Playing.is_terminal());
        assert!(GameState::GameOver.is_terminal());
        assert!(GameState::Victory.is_terminal());
    }

    #[test]
    fn snapshot_survives_bincode() {
        let snapshot = Snapshot {
            tick: 7,
            units: vec![UnitSnapshot {
                id: UnitId::new(0),
                template: TemplateId::new("bomber"),
                name: "Bomber Tower".to_owned(),
                position: Point::new(20.0, 60.0),
                level: 2,
                range: 100.0,
                damage: 22,
                cooldown: 36,
                cooldown_remaining: 4,
                attack_mode: AttackMode::AreaOfEffect {
                    explosion_radius: 50.0,
                },
                target: Some(EnemyId::new(3)),
                color: Color::from_rgb(255, 255, 0),
            }],
            enemies: vec![EnemySnapshot {
                id: EnemyId::new(3),
                kind: EnemyKind::Tank,
                position: Point::new(40.5, 300.0),
                health: 120,
                max_health: 150,
                segment: 0,
                color: EnemyKind::Tank.color(),
            }],
            money: 125,
            lives: 19,
            score: 40,
            wave: WaveProgress {
                current: 1,
                total: 5,
                spawned: 4,
                size: 15,
                active: true,
            },
            state: GameState::Playing,
        };

        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: Snapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
