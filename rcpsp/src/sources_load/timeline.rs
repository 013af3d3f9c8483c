use log::trace;

/// Occupancy grid of one renewable resource: `usage[t][r]` holds the task bound to unit `r` in
/// time slot `t`, or `None` while the unit is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTimeline {
    capacity: usize,
    usage: Vec<Vec<Option<usize>>>,
}

impl ResourceTimeline {
    pub fn new(horizon: usize, capacity: usize) -> Self {
        Self {
            capacity,
            usage: vec![vec![None; capacity]; horizon],
        }
    }

    pub fn horizon(&self) -> usize {
        self.usage.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Task occupying unit `unit` at time slot `t`.
    pub fn usage(&self, t: usize, unit: usize) -> Option<usize> {
        self.usage
            .get(t)
            .and_then(|slot| slot.get(unit))
            .copied()
            .flatten()
    }

    /// Number of free units in time slot `t`. Slots past the horizon have none.
    pub fn available(&self, t: usize) -> usize {
        self.usage
            .get(t)
            .map(|slot| slot.iter().filter(|unit| unit.is_none()).count())
            .unwrap_or(0)
    }

    /// Number of units used by `task` in time slot `t`.
    pub fn units_of(&self, t: usize, task: usize) -> usize {
        self.usage
            .get(t)
            .map(|slot| slot.iter().filter(|unit| **unit == Some(task)).count())
            .unwrap_or(0)
    }

    /// One past the last time slot holding any task; 0 for an empty timeline.
    pub fn occupied_until(&self) -> usize {
        self.usage
            .iter()
            .rposition(|slot| slot.iter().any(Option::is_some))
            .map(|t| t + 1)
            .unwrap_or(0)
    }

    /// Leftmost `t >= t_start` such that every slot of `[t, t + duration)` has at least
    /// `demand` free units, or `None` if no such window fits inside the horizon.
    pub fn find_window(&self, t_start: usize, demand: usize, duration: usize) -> Option<usize> {
        if demand == 0 || duration == 0 {
            return Some(t_start);
        }

        let mut candidate = t_start;
        let mut run = 0;

        for t in t_start..self.horizon() {
            if self.available(t) >= demand {
                run += 1;
                if run >= duration {
                    return Some(candidate);
                }
            } else {
                run = 0;
                candidate = t + 1;
            }
        }

        None
    }

    /// Binds `demand` free units to `task` in every slot of `[t, t + duration)`, first fit.
    ///
    /// The window must have been confirmed with [`ResourceTimeline::find_window`].
    pub fn assign(&mut self, t: usize, demand: usize, duration: usize, task: usize) {
        if demand == 0 {
            return;
        }

        for slot in self.usage.iter_mut().skip(t).take(duration) {
            let mut charge = 0;

            for unit in slot.iter_mut().filter(|unit| unit.is_none()) {
                *unit = Some(task);
                charge += 1;

                if charge >= demand {
                    break;
                }
            }

            debug_assert_eq!(charge, demand, "task {task} assigned to a full time slot");
        }

        trace!("assigned task {task} to [{t}, {}) with {demand} units", t + duration);
    }

    /// Frees every unit, keeping the grid dimensions.
    pub fn reset(&mut self) {
        for slot in &mut self.usage {
            slot.fill(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timeline_is_free() {
        let timeline = ResourceTimeline::new(5, 3);

        assert_eq!(timeline.horizon(), 5);
        assert_eq!(timeline.capacity(), 3);
        assert_eq!(timeline.available(0), 3);
        assert_eq!(timeline.available(4), 3);
        assert_eq!(timeline.available(5), 0);
        assert_eq!(timeline.occupied_until(), 0);
    }

    #[test]
    fn assign_binds_exact_units() {
        let mut timeline = ResourceTimeline::new(6, 3);

        timeline.assign(1, 2, 3, 7);

        assert_eq!(timeline.available(0), 3);
        for t in 1..4 {
            assert_eq!(timeline.available(t), 1);
            assert_eq!(timeline.units_of(t, 7), 2);
            assert_eq!(timeline.usage(t, 0), Some(7));
            assert_eq!(timeline.usage(t, 2), None);
        }
        assert_eq!(timeline.available(4), 3);
        assert_eq!(timeline.occupied_until(), 4);
    }

    #[test]
    fn assign_fills_remaining_units() {
        let mut timeline = ResourceTimeline::new(2, 3);

        timeline.assign(0, 1, 2, 1);
        timeline.assign(0, 2, 2, 2);

        assert_eq!(timeline.available(0), 0);
        assert_eq!(timeline.usage(0, 0), Some(1));
        assert_eq!(timeline.usage(0, 1), Some(2));
        assert_eq!(timeline.usage(0, 2), Some(2));
    }

    #[test]
    fn find_window_restarts_after_blocked_slot() {
        let mut timeline = ResourceTimeline::new(10, 2);
        // Slot 2 and slot 5 are full
        timeline.assign(2, 2, 1, 1);
        timeline.assign(5, 2, 1, 2);

        assert_eq!(timeline.find_window(0, 1, 2), Some(0));
        assert_eq!(timeline.find_window(0, 1, 3), Some(6));
        assert_eq!(timeline.find_window(1, 2, 2), Some(3));
        assert_eq!(timeline.find_window(2, 1, 1), Some(3));
    }

    #[test]
    fn find_window_respects_partial_load() {
        let mut timeline = ResourceTimeline::new(8, 3);
        timeline.assign(0, 2, 4, 1);

        assert_eq!(timeline.find_window(0, 1, 4), Some(0));
        assert_eq!(timeline.find_window(0, 2, 1), Some(4));
    }

    #[test]
    fn find_window_trivial_for_empty_requests() {
        let mut timeline = ResourceTimeline::new(3, 1);
        timeline.assign(0, 1, 3, 1);

        assert_eq!(timeline.find_window(2, 0, 5), Some(2));
        assert_eq!(timeline.find_window(1, 1, 0), Some(1));
        assert_eq!(timeline.find_window(10, 0, 0), Some(10));
    }

    #[test]
    fn find_window_fails_past_horizon() {
        let mut timeline = ResourceTimeline::new(4, 1);
        timeline.assign(1, 1, 1, 1);

        assert_eq!(timeline.find_window(0, 1, 3), None);
        assert_eq!(timeline.find_window(2, 1, 2), Some(2));
        assert_eq!(timeline.find_window(3, 1, 2), None);
    }

    #[test]
    fn reset_frees_everything() {
        let mut timeline = ResourceTimeline::new(4, 2);
        timeline.assign(0, 2, 4, 3);

        timeline.reset();

        assert_eq!(timeline, ResourceTimeline::new(4, 2));
    }
}
