//! TOML scenario files describing an encounter to run.

use std::{fs, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use path_defence_core::{default_campaign, EnemyKind, Point, SimulationConfig, UnitTemplate};
use path_defence_world::{UnitTemplateRegistry, World};
use serde::Deserialize;

/// Encounter loaded from a scenario file.
///
/// Every section is optional; a missing section falls back to the original
/// encounter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Overrides applied on top of the default configuration.
    pub(crate) simulation: SimulationConfig,
    /// Waves to run, each listing enemy kinds in spawn order.
    pub(crate) waves: Option<Vec<Vec<EnemyKind>>>,
    /// Templates registered next to the default ones.
    pub(crate) templates: Vec<UnitTemplate>,
    /// Units bought before the first wave starts.
    pub(crate) placements: Vec<Placement>,
}

impl Scenario {
    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scenario {}", path.display()))
    }

    /// Parses a scenario from TOML source.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Builds a world with the scenario's templates, waves and placements.
    pub(crate) fn build_world(&self) -> Result<World> {
        let mut registry = UnitTemplateRegistry::with_defaults();
        for template in &self.templates {
            registry
                .register(template.clone())
                .with_context(|| format!("failed to register template `{}`", template.id))?;
        }

        let mut world = World::with_config(self.simulation.clone(), registry)
            .context("scenario contains invalid simulation settings")?;

        let waves = self.waves.clone().unwrap_or_else(default_campaign);
        for (index, wave) in waves.into_iter().enumerate() {
            world
                .add_wave(wave)
                .with_context(|| format!("failed to add wave {index}"))?;
        }

        for placement in &self.placements {
            placement.apply(&mut world)?;
        }

        Ok(world)
    }
}

/// A unit purchase requested by a scenario or on the command line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Placement {
    /// Template to buy.
    pub(crate) template: String,
    /// Horizontal cursor coordinate before snapping.
    pub(crate) x: f32,
    /// Vertical cursor coordinate before snapping.
    pub(crate) y: f32,
}

impl Placement {
    /// Buys the unit in `world`.
    pub(crate) fn apply(&self, world: &mut World) -> Result<()> {
        let position = Point::new(self.x, self.y);
        let unit = world
            .place_unit(&self.template, position)
            .with_context(|| format!("failed to place `{}` at {position}", self.template))?;
        tracing::debug!(%unit, template = %self.template, "scenario unit placed");
        Ok(())
    }
}

impl FromStr for Placement {
    type Err = anyhow::Error;

    /// Parses `template:x,y`.
    fn from_str(value: &str) -> Result<Self> {
        let Some((template, coordinates)) = value.split_once(':') else {
            bail!("placement `{value}` must look like `template:x,y`");
        };
        let Some((x, y)) = coordinates.split_once(',') else {
            bail!("placement `{value}` is missing the `x,y` coordinates");
        };

        let template = template.trim();
        if template.is_empty() {
            bail!("placement `{value}` does not name a template");
        }

        Ok(Self {
            template: template.to_owned(),
            x: x.trim()
                .parse()
                .with_context(|| format!("invalid x coordinate in `{value}`"))?,
            y: y.trim()
                .parse()
                .with_context(|| format!("invalid y coordinate in `{value}`"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{AttackMode, TemplateId};
    use path_defence_world::query;

    #[test]
    fn empty_scenario_runs_the_original_encounter() {
        let scenario = Scenario::parse("").expect("empty scenario parses");
        assert_eq!(scenario, Scenario::default());

        let world = scenario.build_world().expect("world builds");
        let snapshot = query::snapshot(&world);
        assert_eq!(snapshot.wave.total, 5);
        assert_eq!(snapshot.money, 200);
    }

    #[test]
    fn sections_override_the_defaults() {
        let scenario = Scenario::parse(
            r#"
            waves = [["basic", "fast"], ["tank"]]

            [simulation]
            starting_money = 500
            spawn_delay = 10

            [[placements]]
            template = "sniper"
            x = 100.0
            y = 100.0
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.simulation.starting_money, 500);
        assert_eq!(scenario.simulation.spawn_delay, 10);
        assert_eq!(scenario.simulation.grid_size, 40.0);
        assert_eq!(
            scenario.waves,
            Some(vec![
                vec![EnemyKind::Basic, EnemyKind::Fast],
                vec![EnemyKind::Tank],
            ])
        );

        let world = scenario.build_world().expect("world builds");
        let snapshot = query::snapshot(&world);
        assert_eq!(snapshot.wave.total, 2);
        assert_eq!(snapshot.money, 400);
        assert_eq!(snapshot.units.len(), 1);
    }

    #[test]
    fn custom_templates_become_purchasable() {
        let scenario = Scenario::parse(
            r#"
            [[templates]]
            id = "mortar"
            name = "Mortar"
            range = 250.0
            damage = 40
            cooldown = 90
            cost = 120
            color = { red = 90, green = 90, blue = 90 }
            attack_mode = { AreaOfEffect = { explosion_radius = 60.0 } }

            [[placements]]
            template = "mortar"
            x = 500.0
            y = 100.0
            "#,
        )
        .expect("scenario parses");

        let world = scenario.build_world().expect("world builds");
        let template = query::templates(&world)
            .iter()
            .find(|template| template.id == TemplateId::new("mortar"))
            .expect("mortar registered");
        assert_eq!(
            template.attack_mode,
            AttackMode::AreaOfEffect {
                explosion_radius: 60.0
            }
        );
        assert_eq!(query::money(&world), 80);
    }

    #[test]
    fn unknown_enemy_kinds_are_rejected() {
        assert!(Scenario::parse(r#"waves = [["dragon"]]"#).is_err());
    }

    #[test]
    fn invalid_placements_fail_the_build() {
        let scenario = Scenario::parse(
            r#"
            [[placements]]
            template = "basic"
            x = 0.0
            y = 300.0
            "#,
        )
        .expect("scenario parses");

        let error = scenario.build_world().expect_err("placement on the path");
        assert!(error.to_string().contains("failed to place `basic`"));
    }

    #[test]
    fn nan_placements_are_refused() {
        let mut world = Scenario::default().build_world().expect("world builds");
        let placement: Placement = "basic:NaN,NaN".parse().expect("placement parses");

        assert!(placement.apply(&mut world).is_err());
        assert_eq!(query::money(&world), 200);
    }

    #[test]
    fn empty_path_is_reported() {
        let scenario = Scenario::parse(
            r#"
            [simulation]
            path = []
            "#,
        )
        .expect("scenario parses");

        assert!(scenario.build_world().is_err());
    }

    #[test]
    fn command_line_placements_parse() {
        let placement: Placement = "bomber: 340, 380.5".parse().expect("placement parses");
        assert_eq!(
            placement,
            Placement {
                template: "bomber".to_owned(),
                x: 340.0,
                y: 380.5,
            }
        );

        assert!("bomber".parse::<Placement>().is_err());
        assert!("bomber:340".parse::<Placement>().is_err());
        assert!(":1,2".parse::<Placement>().is_err());
        assert!("basic:a,2".parse::<Placement>().is_err());
    }
}
