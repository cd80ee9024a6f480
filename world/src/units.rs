//! Placed defensive units and the roster that owns them.

use std::collections::BTreeMap;

use path_defence_core::{
    sell_refund, upgrade_cost, AttackMode, Color, EnemyId, Point, TemplateId, UnitId,
    UnitSnapshot, UnitTemplate,
};
use path_defence_system_tower_targeting::{nearest_in_range, within_radius, Candidate};

use crate::Enemy;

/// Cooldown never drops below this many ticks through upgrades.
const MIN_COOLDOWN: u32 = 10;
/// Range gained per upgrade.
const RANGE_PER_LEVEL: f32 = 20.0;

/// A unit placed in the world.
///
/// Every numeric field is copied from the template at creation, so upgrades
/// change this unit only.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    template: TemplateId,
    name: String,
    position: Point,
    range: f32,
    damage: u32,
    cooldown: u32,
    cost: u32,
    attack_mode: AttackMode,
    color: Color,
    level: u32,
    cooldown_counter: u32,
    target: Option<EnemyId>,
}

impl Unit {
    /// Creates a level-one unit from the template's values.
    #[must_use]
    pub fn from_template(template: &UnitTemplate, position: Point) -> Self {
        Self {
            template: template.id.clone(),
            name: template.name.clone(),
            position,
            range: template.range,
            damage: template.damage,
            cooldown: template.cooldown,
            cost: template.cost,
            attack_mode: template.attack_mode,
            color: template.color,
            level: 1,
            cooldown_counter: 0,
            target: None,
        }
    }

    /// Template the unit was created from.
    #[must_use]
    pub const fn template(&self) -> &TemplateId {
        &self.template
    }

    /// Center of the unit.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Current level, starting at one.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current attack range.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Current damage per hit.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Current cooldown between attacks in ticks.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Ticks left before the unit may attack again.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> u32 {
        self.cooldown_counter
    }

    /// Original purchase price.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Enemy hit by the most recent attack.
    #[must_use]
    pub const fn target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Price of the next upgrade.
    #[must_use]
    pub const fn upgrade_cost(&self) -> u32 {
        upgrade_cost(self.cost)
    }

    /// Money returned when the unit is sold.
    #[must_use]
    pub const fn sell_refund(&self) -> u32 {
        sell_refund(self.cost)
    }

    /// Reports whether the cooldown has run out.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.cooldown_counter == 0
    }

    /// Nearest enemy within range; ties go to the enemy listed first.
    #[must_use]
    pub fn find_target(&self, enemies: &[Enemy]) -> Option<EnemyId> {
        self.primary_target(enemies).map(|candidate| candidate.id)
    }

    /// Attacks according to the unit's attack mode and returns the damage dealt.
    ///
    /// A unit still cooling down only counts its cooldown down. A unit that
    /// finds nothing in range keeps its cooldown at zero and forgets its
    /// previous target.
    pub fn attack(&mut self, enemies: &mut [Enemy]) -> u32 {
        if !self.can_attack() {
            self.cooldown_counter -= 1;
            return 0;
        }

        let Some(primary) = self.primary_target(enemies) else {
            self.target = None;
            return 0;
        };

        let dealt = match self.attack_mode {
            AttackMode::SingleTarget => enemies
                .iter_mut()
                .find(|enemy| enemy.id() == primary.id)
                .map_or(0, |enemy| {
                    enemy.take_damage(self.damage);
                    self.damage
                }),
            AttackMode::AreaOfEffect { explosion_radius } => {
                let hit: Vec<EnemyId> = within_radius(
                    primary.position,
                    explosion_radius,
                    enemies.iter().map(Enemy::candidate),
                )
                .collect();

                let mut total: u32 = 0;
                for enemy in enemies.iter_mut().filter(|enemy| hit.contains(&enemy.id())) {
                    enemy.take_damage(self.damage);
                    total = total.saturating_add(self.damage);
                }
                total
            }
        };

        self.cooldown_counter = self.cooldown;
        self.target = Some(primary.id);
        dealt
    }

    /// Raises the unit one level and returns the upgrade price.
    ///
    /// The caller is responsible for charging the price before upgrading.
    pub fn upgrade(&mut self) -> u32 {
        self.level += 1;
        self.damage = self.damage.saturating_mul(3) / 2;
        self.range += RANGE_PER_LEVEL;
        self.cooldown = (self.cooldown.saturating_mul(4) / 5).max(MIN_COOLDOWN);
        self.upgrade_cost()
    }

    fn primary_target(&self, enemies: &[Enemy]) -> Option<Candidate> {
        nearest_in_range(
            self.position,
            self.range,
            enemies.iter().map(Enemy::candidate),
        )
    }

    pub(crate) fn forget_target_unless(&mut self, alive: impl Fn(EnemyId) -> bool) {
        if self.target.is_some_and(|target| !alive(target)) {
            self.target = None;
        }
    }

    pub(crate) fn snapshot(&self, id: UnitId) -> UnitSnapshot {
        UnitSnapshot {
            id,
            template: self.template.clone(),
            name: self.name.clone(),
            position: self.position,
            level: self.level,
            range: self.range,
            damage: self.damage,
            cooldown: self.cooldown,
            cooldown_remaining: self.cooldown_counter,
            attack_mode: self.attack_mode,
            target: self.target,
            color: self.color,
        }
    }
}

/// Roster that stores units and allocates their identifiers.
#[derive(Clone, Debug, Default)]
pub(crate) struct UnitRoster {
    entries: BTreeMap<UnitId, Unit>,
    next_unit_id: u32,
}

impl UnitRoster {
    pub(crate) fn insert(&mut self, unit: Unit) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        let _ = self.entries.insert(id, unit);
        id
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&Unit> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.entries.iter().map(|(id, unit)| (*id, unit))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (UnitId, &mut Unit)> {
        self.entries.iter_mut().map(|(id, unit)| (*id, unit))
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.entries.values().map(Unit::position)
    }
}
