//! Catalogue of purchasable unit templates.

use path_defence_core::{DuplicateTemplate, Point, UnitTemplate, UnknownTemplate};

use crate::Unit;

/// Registry that owns every unit template for the lifetime of a world.
///
/// Templates keep their registration order so adapters can bind them to
/// number keys.
#[derive(Clone, Debug, Default)]
pub struct UnitTemplateRegistry {
    templates: Vec<UnitTemplate>,
}

impl UnitTemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the basic, sniper and bomber templates.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            templates: vec![
                UnitTemplate::basic(),
                UnitTemplate::sniper(),
                UnitTemplate::bomber(),
            ],
        }
    }

    /// Adds a template. Registered templates can never be replaced.
    pub fn register(&mut self, template: UnitTemplate) -> Result<(), DuplicateTemplate> {
        if self.get(template.id.as_str()).is_some() {
            return Err(DuplicateTemplate(template.id));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Looks up a template by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UnitTemplate> {
        self.templates
            .iter()
            .find(|template| template.id.as_str() == id)
    }

    /// Templates in registration order.
    #[must_use]
    pub fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    /// Builds a fresh level-one unit from a copy of the template's values.
    pub fn instantiate(&self, id: &str, position: Point) -> Result<Unit, UnknownTemplate> {
        self.get(id)
            .map(|template| Unit::from_template(template, position))
            .ok_or_else(|| UnknownTemplate(id.into()))
    }
}
