mod error;
mod estimate;
mod order;
mod permutation;
mod problem;

pub use error::*;
pub use estimate::*;
pub use order::*;
pub use permutation::*;
pub use problem::*;

use std::time::Duration;

/// Searches for the best dependency-respecting order of the tasks of an instance.
pub trait Searcher {
    /// Returns the valid order of the instance tasks with the lowest finish time
    /// under the given model.
    ///
    /// # Errors
    /// - If the instance is malformed.
    /// - If no valid order exists.
    /// - If the searcher ran out of its time limit.
    fn search(&mut self, instance: &Instance, model: FinishTimeModel) -> Result<Order, SearchError>;

    /// Makes the searcher give up once the search runs longer than the limit.
    /// Searchers that always finish quickly ignore it.
    fn set_time_limit(&mut self, _limit: Duration) {}

    /// Returns the maximum number of tasks the searcher handles in reasonable time.
    fn maximum_tasks(&self) -> usize {
        usize::MAX
    }

    /// Returns the name of the searcher.
    fn name(&self) -> &'static str;
}
