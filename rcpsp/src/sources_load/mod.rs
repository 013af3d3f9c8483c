pub mod time_resolution;
pub mod timeline;

pub use time_resolution::TimeResolution;
pub use timeline::ResourceTimeline;

pub trait SourcesLoad {
    /// It finds out the earliest possible activity start time without resource overload.
    ///
    /// Returns the offending resource when some resource has no window left before the horizon.
    fn get_earliest_start_time(
        &self,
        activity_resource_requirements: &[usize],
        earliest_precedence_start_time: usize,
        activity_duration: usize,
    ) -> Result<usize, usize>;

    /// It updates state of resources with respect to the added activity.
    fn add_activity(
        &mut self,
        activity_start: usize,
        activity_duration: usize,
        activity_requirements: &[usize],
        activity_id: usize,
    );

    /// It releases every allocation.
    fn reset(&mut self);
}
