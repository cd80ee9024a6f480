#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave schedule responsible for releasing enemies over time.

use path_defence_core::{EnemyKind, WaveError, WaveProgress};

/// Ordered list of waves together with the progress through them.
///
/// The wave index and the spawn cursor only ever move forward; the cursor
/// returns to zero when the next wave starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveSchedule {
    waves: Vec<Vec<EnemyKind>>,
    spawn_delay: u32,
    current: usize,
    cursor: usize,
    spawn_timer: u32,
    active: bool,
}

impl WaveSchedule {
    /// Creates an empty schedule that spawns one enemy every `spawn_delay` ticks.
    #[must_use]
    pub const fn new(spawn_delay: u32) -> Self {
        Self {
            waves: Vec::new(),
            spawn_delay,
            current: 0,
            cursor: 0,
            spawn_timer: 0,
            active: false,
        }
    }

    /// Appends a wave whose entries spawn in the given order.
    ///
    /// Waves may only be added while no wave is spawning.
    pub fn add_wave(&mut self, kinds: Vec<EnemyKind>) -> Result<(), WaveError> {
        if self.active {
            return Err(WaveError::WaveAlreadyActive);
        }
        self.waves.push(kinds);
        Ok(())
    }

    /// Activates the next wave.
    pub fn start_next(&mut self) -> Result<(), WaveError> {
        if self.active {
            return Err(WaveError::WaveAlreadyActive);
        }
        if self.current >= self.waves.len() {
            return Err(WaveError::NoMoreWaves);
        }

        self.active = true;
        self.cursor = 0;
        self.spawn_timer = 0;
        Ok(())
    }

    /// Advances the spawn timer by one tick.
    ///
    /// Returns the kind to spawn when the timer elapses and the active wave
    /// still has entries. The call that finds the wave exhausted deactivates
    /// it and moves to the next wave without spawning anything.
    pub fn tick(&mut self) -> Option<EnemyKind> {
        if !self.active {
            return None;
        }

        self.spawn_timer = self.spawn_timer.saturating_add(1);
        if self.spawn_timer < self.spawn_delay {
            return None;
        }
        self.spawn_timer = 0;

        let wave = self.waves.get(self.current)?;
        match wave.get(self.cursor).copied() {
            Some(kind) => {
                self.cursor += 1;
                Some(kind)
            }
            None => {
                self.active = false;
                self.current += 1;
                None
            }
        }
    }

    /// Reports whether every wave has been spawned and none is active.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current == self.waves.len() && !self.active
    }

    /// Reports whether a wave is currently spawning.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Zero-based index of the current (or next) wave.
    #[must_use]
    pub const fn current_wave(&self) -> usize {
        self.current
    }

    /// Number of waves in the schedule.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Captures the schedule progress for snapshots.
    ///
    /// Between waves the spawned count reads zero and the size refers to the
    /// wave that starts next.
    #[must_use]
    pub fn progress(&self) -> WaveProgress {
        WaveProgress {
            current: self.current,
            total: self.waves.len(),
            spawned: if self.active { self.cursor } else { 0 },
            size: self.waves.get(self.current).map_or(0, Vec::len),
            active: self.active,
        }
    }

    /// Returns to the first wave while keeping every wave definition.
    pub fn rewind(&mut self) {
        self.current = 0;
        self.cursor = 0;
        self.spawn_timer = 0;
        self.active = false;
    }
}
