//! Per-tick combat resolution.

use path_defence_core::Event;

use crate::{units::UnitRoster, Enemy};

/// Lets every unit, in identifier order, attempt its attack.
///
/// Enemies brought to zero health stay targetable until cleanup runs, so a
/// later unit may still spend its attack on them.
pub(crate) fn resolve(units: &mut UnitRoster, enemies: &mut [Enemy], out_events: &mut Vec<Event>) {
    for (id, unit) in units.iter_mut() {
        let damage = unit.attack(enemies);
        if damage == 0 {
            continue;
        }

        if let Some(target) = unit.target() {
            tracing::trace!(unit = %id, %target, damage, "unit attacked");
            out_events.push(Event::UnitAttacked {
                unit: id,
                target,
                damage,
            });
        }
    }
}
