#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that snaps cursor positions to the grid and decides
//! whether a unit may be built there.

use path_defence_core::{PlacementError, Point, SimulationConfig};

/// Declarative placement preview describing a potential unit construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Grid-aligned center the unit would occupy.
    pub position: Point,
    /// First placement check that failed, if any.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Indicates whether the preview represents a valid placement location.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Placement grid bound to the screen and spacing rules of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementGrid {
    cell_size: f32,
    width: f32,
    height: f32,
    path_buffer: f32,
    unit_buffer: f32,
}

impl PlacementGrid {
    /// Creates a placement grid from the session configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            cell_size: config.grid_size,
            width: config.screen_width,
            height: config.screen_height,
            path_buffer: config.path_buffer,
            unit_buffer: config.unit_buffer,
        }
    }

    /// Side length of a grid cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Quantizes a raw position to the center of the cell containing it.
    #[must_use]
    pub fn snap(&self, raw: Point) -> Point {
        let half = self.cell_size / 2.0;
        let snap_axis = |value: f32| (value / self.cell_size).floor() * self.cell_size + half;
        Point::new(snap_axis(raw.x()), snap_axis(raw.y()))
    }

    /// Runs every placement check and reports the first one that fails.
    ///
    /// Checks run in a fixed order: screen bounds, path clearance, then unit
    /// spacing. Distances equal to a buffer are accepted. Non-finite
    /// coordinates are out of bounds.
    pub fn check<I>(&self, position: Point, units: I, path: &[Point]) -> Result<(), PlacementError>
    where
        I: IntoIterator<Item = Point>,
    {
        let (x, y) = (position.x(), position.y());
        let inside = x >= 0.0 && x < self.width && y >= 0.0 && y < self.height;
        if !inside {
            return Err(PlacementError::OutOfBounds);
        }

        if path
            .iter()
            .any(|waypoint| !clears(position.distance(*waypoint), self.path_buffer))
        {
            return Err(PlacementError::TooCloseToPath);
        }

        if units
            .into_iter()
            .any(|unit| !clears(position.distance(unit), self.unit_buffer))
        {
            return Err(PlacementError::TooCloseToUnit);
        }

        Ok(())
    }

    /// Reports whether a unit may be built at the grid position.
    #[must_use]
    pub fn validate<I>(&self, position: Point, units: I, path: &[Point]) -> bool
    where
        I: IntoIterator<Item = Point>,
    {
        self.check(position, units, path).is_ok()
    }

    /// Snaps a raw cursor position and evaluates it for adapters drawing a
    /// placement ghost.
    #[must_use]
    pub fn preview<I>(&self, raw: Point, units: I, path: &[Point]) -> PlacementPreview
    where
        I: IntoIterator<Item = Point>,
    {
        let position = self.snap(raw);
        PlacementPreview {
            position,
            rejection: self.check(position, units, path).err(),
        }
    }
}

/// NaN distances never clear a buffer.
fn clears(distance: f32, buffer: f32) -> bool {
    distance >= buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_centers_on_cell() {
        let grid = PlacementGrid::new(&SimulationConfig::default());
        assert_eq!(grid.snap(Point::new(0.0, 0.0)), Point::new(20.0, 20.0));
        assert_eq!(grid.snap(Point::new(39.9, 40.0)), Point::new(20.0, 60.0));
        assert_eq!(grid.snap(Point::new(317.0, 225.5)), Point::new(300.0, 220.0));
    }

    #[test]
    fn snap_below_zero_lands_outside_screen() {
        let grid = PlacementGrid::new(&SimulationConfig::default());
        let snapped = grid.snap(Point::new(-5.0, 10.0));
        assert_eq!(snapped, Point::new(-20.0, 20.0));
        assert_eq!(
            grid.check(snapped, [Point::new(400.0, 400.0)], &[]),
            Err(PlacementError::OutOfBounds)
        );
    }
}
