//! Per-driver aggregate statistics.
//!
//! Aggregates are updated at event production time, never at drain time, so
//! their correctness does not depend on whether storage I/O succeeds. All
//! updates are pure functions over the current state with no failure mode
//! beyond the driver-slot bounds check.

/// Running statistics for one driver slot.
///
/// `best_lap_ms == 0` and `best_rt_ms == 0` mean "nothing recorded yet" —
/// zero is a sentinel, not a valid duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub lap_count: u32,
    pub best_lap_ms: u32,
    pub best_lap_index: u16,
    pub best_rt_ms: u32,
}

/// Tracks [`DriverStats`] for driver slots `1..=N`.
#[derive(Debug)]
pub struct AggregateTracker {
    drivers: Vec<DriverStats>,
}

impl AggregateTracker {
    pub fn new(max_drivers: u8) -> Self {
        Self { drivers: vec![DriverStats::default(); max_drivers as usize] }
    }

    /// Record a completed lap. Drivers outside `1..=N` are ignored.
    ///
    /// Best lap updates on strict improvement only, so a tie keeps the
    /// earlier lap index.
    pub fn record_lap(&mut self, driver: u8, lap_index: u16, lap_ms: u32) {
        let Some(stats) = self.slot_mut(driver) else { return };
        stats.lap_count += 1;
        if stats.best_lap_ms == 0 || lap_ms < stats.best_lap_ms {
            stats.best_lap_ms = lap_ms;
            stats.best_lap_index = lap_index;
        }
    }

    /// Record a reaction-time capture. Drivers outside `1..=N` are ignored.
    pub fn record_reaction(&mut self, driver: u8, rt_ms: u32) {
        let Some(stats) = self.slot_mut(driver) else { return };
        if stats.best_rt_ms == 0 || rt_ms < stats.best_rt_ms {
            stats.best_rt_ms = rt_ms;
        }
    }

    /// Statistics for driver slot `driver`, or `None` if out of range.
    pub fn get(&self, driver: u8) -> Option<&DriverStats> {
        if driver == 0 {
            return None;
        }
        self.drivers.get(driver as usize - 1)
    }

    /// Iterate `(driver_slot, stats)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &DriverStats)> {
        self.drivers.iter().enumerate().map(|(i, s)| (i as u8 + 1, s))
    }

    /// Zero every slot. Session start only.
    pub fn reset(&mut self) {
        for stats in &mut self.drivers {
            *stats = DriverStats::default();
        }
    }

    fn slot_mut(&mut self, driver: u8) -> Option<&mut DriverStats> {
        if driver == 0 {
            return None;
        }
        self.drivers.get_mut(driver as usize - 1)
    }
}
