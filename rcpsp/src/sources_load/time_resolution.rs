use super::{ResourceTimeline, SourcesLoad};

/// Time-indexed load of every resource, one [`ResourceTimeline`] per resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeResolution {
    timelines: Vec<ResourceTimeline>,
}

impl TimeResolution {
    pub fn new(capacity_of_resources: &[usize], makespan_upper_bound: usize) -> Self {
        Self {
            timelines: capacity_of_resources
                .iter()
                .map(|&capacity| ResourceTimeline::new(makespan_upper_bound, capacity))
                .collect(),
        }
    }

    pub fn timelines(&self) -> &[ResourceTimeline] {
        &self.timelines
    }

    pub fn into_timelines(self) -> Vec<ResourceTimeline> {
        self.timelines
    }
}

impl SourcesLoad for TimeResolution {
    fn get_earliest_start_time(
        &self,
        activity_resource_requirements: &[usize],
        earliest_precedence_start_time: usize,
        activity_duration: usize,
    ) -> Result<usize, usize> {
        let mut t = earliest_precedence_start_time;

        // Repeat until every resource accepts the same start
        loop {
            let mut settled = true;

            for (resource_id, timeline) in self.timelines.iter().enumerate() {
                let requirement = activity_resource_requirements
                    .get(resource_id)
                    .copied()
                    .unwrap_or(0);

                let start = timeline
                    .find_window(t, requirement, activity_duration)
                    .ok_or(resource_id)?;

                if start > t {
                    t = start;
                    settled = false;
                }
            }

            if settled {
                return Ok(t);
            }
        }
    }

    fn add_activity(
        &mut self,
        activity_start: usize,
        activity_duration: usize,
        activity_requirements: &[usize],
        activity_id: usize,
    ) {
        for (timeline, &requirement) in self.timelines.iter_mut().zip(activity_requirements) {
            timeline.assign(activity_start, requirement, activity_duration, activity_id);
        }
    }

    fn reset(&mut self) {
        for timeline in &mut self.timelines {
            timeline.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_waits_for_every_resource() {
        let mut load = TimeResolution::new(&[1, 1], 12);
        // Resource 0 is busy in [3, 6), resource 1 in [0, 3)
        load.add_activity(3, 3, &[1, 0], 1);
        load.add_activity(0, 3, &[0, 1], 2);

        // Resource 1 pushes the start to 3 where resource 0 is busy until 6
        assert_eq!(load.get_earliest_start_time(&[1, 1], 0, 2), Ok(6));
        assert_eq!(load.get_earliest_start_time(&[1, 0], 0, 3), Ok(0));
        assert_eq!(load.get_earliest_start_time(&[0, 1], 1, 2), Ok(3));
    }

    #[test]
    fn reports_resource_without_window() {
        let mut load = TimeResolution::new(&[2, 1], 4);
        load.add_activity(0, 4, &[0, 1], 1);

        assert_eq!(load.get_earliest_start_time(&[1, 1], 0, 1), Err(1));
    }

    #[test]
    fn reset_releases_all_resources() {
        let mut load = TimeResolution::new(&[1, 1], 4);
        load.add_activity(0, 4, &[1, 1], 1);

        load.reset();

        assert_eq!(load, TimeResolution::new(&[1, 1], 4));
        assert_eq!(load.timelines().len(), 2);
    }
}
