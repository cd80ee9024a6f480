#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The [`World`] exclusively owns every unit and enemy. Adapters mutate it
//! only through the command methods between ticks and observe it through
//! [`Snapshot`] values and the [`query`] module.

use std::sync::Arc;

use path_defence_core::{
    default_campaign, CommandError, ConfigError, EnemyId, EnemyKind, Event, FundsCause, GameState,
    Point, SimulationConfig, Snapshot, UnitId,
};
use path_defence_system_builder::PlacementGrid;
use path_defence_system_spawning::WaveSchedule;

mod combat;
mod economy;
mod enemies;
mod registry;
mod state;
mod units;

pub use economy::Economy;
pub use enemies::Enemy;
pub use registry::UnitTemplateRegistry;
pub use state::GameStateMachine;
pub use units::Unit;

use units::UnitRoster;

/// Distance an enemy may cover per tick, as a multiple of its speed.
const TICK_ALLOWANCE: f32 = 1.0;

/// Represents the authoritative Path Defence world state.
///
/// Commands are inherent methods rather than variants applied through a
/// single dispatcher because each one reports its own `Result` to the caller.
/// Events from commands and ticks accumulate in an internal buffer in the
/// order they happened; adapters take them with [`World::drain_events`].
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    path: Arc<[Point]>,
    grid: PlacementGrid,
    registry: UnitTemplateRegistry,
    economy: Economy,
    schedule: WaveSchedule,
    units: UnitRoster,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    lives: u32,
    score: u32,
    tick_index: u64,
    state: GameStateMachine,
    events: Vec<Event>,
}

impl World {
    /// Creates the original encounter: default configuration, the three
    /// default unit templates and the five-wave campaign.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self::build(
            SimulationConfig::default(),
            UnitTemplateRegistry::with_defaults(),
        );
        for wave in default_campaign() {
            world.schedule.add_wave(wave).unwrap_or_else(|error| {
                tracing::warn!(%error, "default campaign wave rejected");
            });
        }
        world
    }

    /// Creates a world without waves from an explicit configuration and registry.
    pub fn with_config(
        config: SimulationConfig,
        registry: UnitTemplateRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, registry))
    }

    fn build(config: SimulationConfig, registry: UnitTemplateRegistry) -> Self {
        Self {
            path: Arc::from(config.path.as_slice()),
            grid: PlacementGrid::new(&config),
            economy: Economy::new(config.starting_money),
            schedule: WaveSchedule::new(config.spawn_delay),
            units: UnitRoster::default(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            lives: config.starting_lives,
            score: 0,
            tick_index: 0,
            state: GameStateMachine::new(),
            events: Vec::new(),
            registry,
            config,
        }
    }

    /// Buys a unit from a template and places it on the grid cell containing
    /// `raw`.
    ///
    /// Nothing is charged unless the placement succeeds.
    pub fn place_unit(&mut self, template: &str, raw: Point) -> Result<UnitId, CommandError> {
        self.ensure_playing()?;

        let position = self.grid.snap(raw);
        let unit = self.registry.instantiate(template, position)?;
        self.grid
            .check(position, self.units.positions(), &self.path)
            .map_err(|reason| CommandError::InvalidPlacement { position, reason })?;
        self.charge(unit.cost(), FundsCause::Placement)?;

        let template = unit.template().clone();
        let id = self.units.insert(unit);
        tracing::debug!(unit = %id, %template, %position, "unit placed");
        self.events.push(Event::UnitPlaced {
            unit: id,
            template,
            position,
        });
        Ok(id)
    }

    /// Charges the upgrade price and raises the unit one level.
    pub fn upgrade_unit(&mut self, unit: UnitId) -> Result<(), CommandError> {
        self.ensure_playing()?;

        let cost = self
            .units
            .get(unit)
            .map(Unit::upgrade_cost)
            .ok_or(CommandError::UnknownUnit(unit))?;
        self.charge(cost, FundsCause::Upgrade)?;

        let entry = self
            .units
            .get_mut(unit)
            .ok_or(CommandError::UnknownUnit(unit))?;
        let price = entry.upgrade();
        debug_assert_eq!(price, cost, "upgrade price changed between quote and charge");
        let level = entry.level();
        tracing::debug!(%unit, level, price, "unit upgraded");
        self.events.push(Event::UnitUpgraded { unit, level, price });
        Ok(())
    }

    /// Removes the unit and refunds part of its purchase price.
    pub fn sell_unit(&mut self, unit: UnitId) -> Result<(), CommandError> {
        self.ensure_playing()?;

        let removed = self
            .units
            .remove(unit)
            .ok_or(CommandError::UnknownUnit(unit))?;
        let refund = removed.sell_refund();
        self.pay(refund, FundsCause::SaleRefund);
        tracing::debug!(%unit, refund, "unit sold");
        self.events.push(Event::UnitSold { unit, refund });
        Ok(())
    }

    /// Starts spawning the next wave.
    pub fn start_next_wave(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;

        self.schedule.start_next()?;
        let wave = self.schedule.current_wave();
        tracing::info!(wave, "wave started");
        self.events.push(Event::WaveStarted { wave });
        Ok(())
    }

    /// Appends a wave to the schedule.
    pub fn add_wave(&mut self, kinds: Vec<EnemyKind>) -> Result<(), CommandError> {
        self.ensure_playing()?;
        self.schedule.add_wave(kinds)?;
        Ok(())
    }

    /// Advances the simulation by one tick and returns the resulting snapshot.
    ///
    /// Steps run in a fixed order: spawn, move, attack, remove the killed,
    /// remove the escaped, evaluate the game state. An enemy that reaches the
    /// exit and dies on the same tick counts as a kill. Once the game has
    /// ended the world no longer changes.
    pub fn tick(&mut self) -> Snapshot {
        if self.state.state().is_terminal() {
            return query::snapshot(self);
        }

        self.tick_index += 1;
        self.spawn_enemy();
        let escaped = self.advance_enemies();
        combat::resolve(&mut self.units, &mut self.enemies, &mut self.events);
        self.remove_killed();
        self.remove_escaped(&escaped);
        self.forget_removed_targets();
        self.evaluate_state();

        query::snapshot(self)
    }

    /// Restores money, lives, score, waves and an empty field.
    ///
    /// Accepted in every state, including after the game has ended.
    pub fn reset(&mut self) {
        self.economy = Economy::new(self.config.starting_money);
        self.schedule.rewind();
        self.units = UnitRoster::default();
        self.enemies.clear();
        self.next_enemy_id = 0;
        self.lives = self.config.starting_lives;
        self.score = 0;
        self.tick_index = 0;
        self.state.reset();
        tracing::info!("world reset");
        self.events.push(Event::WorldReset);
    }

    /// Takes every event recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn ensure_playing(&self) -> Result<(), CommandError> {
        match self.state.state() {
            GameState::Playing => Ok(()),
            ended => {
                tracing::debug!(state = ?ended, "command rejected after the game ended");
                Err(CommandError::GameEnded(ended))
            }
        }
    }

    fn charge(&mut self, amount: u32, cause: FundsCause) -> Result<(), CommandError> {
        self.economy.spend(amount).map_err(|error| {
            tracing::debug!(%error, ?cause, "spend rejected");
            error
        })?;
        self.events.push(Event::FundsChanged {
            cause,
            delta: -i64::from(amount),
            balance: self.economy.balance(),
        });
        Ok(())
    }

    fn pay(&mut self, amount: u32, cause: FundsCause) {
        self.economy.credit(amount);
        self.events.push(Event::FundsChanged {
            cause,
            delta: i64::from(amount),
            balance: self.economy.balance(),
        });
    }

    fn spawn_enemy(&mut self) {
        let was_active = self.schedule.is_active();
        let wave = self.schedule.current_wave();

        match self.schedule.tick() {
            Some(kind) => {
                let enemy = EnemyId::new(self.next_enemy_id);
                self.next_enemy_id += 1;
                self.enemies
                    .push(Enemy::spawn(enemy, kind, Arc::clone(&self.path)));
                tracing::debug!(%enemy, %kind, "enemy spawned");
                self.events.push(Event::EnemySpawned { enemy, kind });
            }
            None if was_active && !self.schedule.is_active() => {
                tracing::info!(wave, "wave completed");
                self.events.push(Event::WaveCompleted { wave });
            }
            None => {}
        }
    }

    fn advance_enemies(&mut self) -> Vec<EnemyId> {
        self.enemies
            .iter_mut()
            .filter_map(|enemy| enemy.advance(TICK_ALLOWANCE).then(|| enemy.id()))
            .collect()
    }

    fn remove_killed(&mut self) {
        let mut killed: Vec<(EnemyId, u32)> = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            killed.push((enemy.id(), enemy.bounty()));
            false
        });

        for (enemy, bounty) in killed {
            self.pay(bounty, FundsCause::KillBounty);
            self.score = self.score.saturating_add(bounty);
            tracing::debug!(%enemy, bounty, "enemy killed");
            self.events.push(Event::EnemyKilled { enemy, bounty });
        }
    }

    fn remove_escaped(&mut self, escaped: &[EnemyId]) {
        if escaped.is_empty() {
            return;
        }

        let mut removed: Vec<EnemyId> = Vec::new();
        self.enemies.retain(|enemy| {
            if escaped.contains(&enemy.id()) {
                removed.push(enemy.id());
                return false;
            }
            true
        });

        for enemy in removed {
            self.lives = self.lives.saturating_sub(1);
            tracing::debug!(%enemy, lives = self.lives, "enemy escaped");
            self.events.push(Event::EnemyEscaped { enemy });
        }
    }

    fn forget_removed_targets(&mut self) {
        let enemies = &self.enemies;
        for (_, unit) in self.units.iter_mut() {
            unit.forget_target_unless(|target| enemies.iter().any(|enemy| enemy.id() == target));
        }
    }

    fn evaluate_state(&mut self) {
        let entered = self.state.evaluate(
            self.lives,
            self.schedule.is_finished(),
            self.enemies.len(),
        );
        if let Some(state) = entered {
            tracing::info!(?state, tick = self.tick_index, "game state changed");
            self.events.push(Event::GameStateChanged { state });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{
        GameState, Point, SimulationConfig, Snapshot, UnitId, UnitTemplate, WELCOME_BANNER,
    };
    use path_defence_system_builder::PlacementPreview;

    use super::{Unit, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(_world: &World) -> &'static str {
        WELCOME_BANNER
    }

    /// Captures a read-only view of the whole simulation.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        Snapshot {
            tick: world.tick_index,
            units: world
                .units
                .iter()
                .map(|(id, unit)| unit.snapshot(id))
                .collect(),
            enemies: world.enemies.iter().map(|enemy| enemy.snapshot()).collect(),
            money: world.economy.balance(),
            lives: world.lives,
            score: world.score,
            wave: world.schedule.progress(),
            state: world.state.state(),
        }
    }

    /// Provides read-only access to a placed unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<&Unit> {
        world.units.get(id)
    }

    /// Finds the first unit whose center lies within the pick radius of `position`.
    #[must_use]
    pub fn unit_at(world: &World, position: Point) -> Option<UnitId> {
        world
            .units
            .iter()
            .find(|(_, unit)| unit.position().distance(position) < world.config.pick_radius)
            .map(|(id, _)| id)
    }

    /// Snaps a cursor position and reports whether a unit could be placed there.
    #[must_use]
    pub fn placement_preview(world: &World, raw: Point) -> PlacementPreview {
        world.grid.preview(raw, world.units.positions(), &world.path)
    }

    /// Waypoints enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &[Point] {
        &world.path
    }

    /// Purchasable templates in registration order.
    #[must_use]
    pub fn templates(world: &World) -> &[UnitTemplate] {
        world.registry.templates()
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Current economy balance.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.economy.balance()
    }

    /// Current state of the encounter.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state.state()
    }
}
