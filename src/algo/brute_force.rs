use super::{preflight, Clock};
use crate::core::{is_valid_order, FinishTimeModel, Instance, Order, Permutations, SearchError, Searcher};
use std::time::Duration;
use tracing::{debug, trace};

/// Exhaustive search over every permutation of the tasks.
/// It evaluates `n!` orders, so it's only usable for a handful of tasks.
/// Among orders with the same finish time the first generated one wins.
#[derive(Clone, Debug, Default)]
pub struct BruteForce {
    time_limit: Option<Duration>,
}

impl BruteForce {
    /// Creates a brute force search that gives up after the given time.
    #[must_use]
    pub const fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }
}

impl Searcher for BruteForce {
    fn search(&mut self, instance: &Instance, model: FinishTimeModel) -> Result<Order, SearchError> {
        if let Some(order) = preflight(instance)? {
            return Ok(order);
        }

        let clock = Clock::start(self.time_limit);
        let order = brute_force(instance, model, &clock)?.ok_or(SearchError::NoSolution)?;
        debug!(time = order.time, model = model.name(), "brute force finished");
        Ok(order)
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = Some(limit);
    }

    fn maximum_tasks(&self) -> usize {
        10
    }

    fn name(&self) -> &'static str {
        "BruteForce"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::SEARCHERS)]
static INSTANCE: fn() -> Box<dyn Searcher> = || Box::new(BruteForce::default());

/// Enumerates, filters and keeps the best order.
/// Returns None if no permutation respects the dependencies.
fn brute_force(
    instance: &Instance,
    model: FinishTimeModel,
    clock: &Clock,
) -> Result<Option<Order>, SearchError> {
    let mut best: Option<Order> = None;
    let mut valid = 0u64;

    for permutation in Permutations::new(instance.tasks.len()) {
        clock.check()?;

        if !is_valid_order(&permutation, &instance.tasks) {
            continue;
        }
        valid += 1;

        let time = model.estimate(&permutation, instance);
        if best.as_ref().map_or(true, |best| time < best.time) {
            trace!(time, ?permutation, "new best order");
            best = Some(Order::new(permutation, time));
        }
    }

    debug!(valid, "valid orders evaluated");
    Ok(best)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{permutations, InstanceError, Task};
    use crate::data::samples;
    use std::num::NonZero;

    fn instance(workers: usize, tasks: Vec<Task>) -> anyhow::Result<Instance> {
        let workers = NonZero::new(workers).ok_or_else(|| anyhow::anyhow!("zero workers"))?;
        Ok(Instance::new(workers, tasks))
    }

    fn sample(workers: usize) -> anyhow::Result<Instance> {
        instance(
            workers,
            vec![
                Task::new(2, vec![]),
                Task::new(3, vec![0]),
                Task::new(4, vec![0]),
                Task::new(1, vec![]),
                Task::new(5, vec![1, 2]),
                Task::new(6, vec![3]),
            ],
        )
    }

    #[test]
    fn test_brute_force() {
        assert!(samples(true, &mut BruteForce::default(), FinishTimeModel::IndexOffset).is_ok());
    }

    #[test]
    fn sample_order_is_optimal() -> anyhow::Result<()> {
        let sample = sample(3)?;
        let order = BruteForce::default().search(&sample, FinishTimeModel::IndexOffset)?;

        assert!(order.verify(&sample.tasks));
        assert_eq!(order.sequence, vec![3, 5, 0, 2, 1, 4]);
        assert_eq!(order.time, 6);

        for candidate in permutations(sample.tasks.len()) {
            if is_valid_order(&candidate, &sample.tasks) {
                assert!(FinishTimeModel::IndexOffset.estimate(&candidate, &sample) >= order.time);
            }
        }
        Ok(())
    }

    #[test]
    fn worker_pool_sample() -> anyhow::Result<()> {
        let order = BruteForce::default().search(&sample(2)?, FinishTimeModel::WorkerPool)?;
        assert_eq!(order.sequence, vec![3, 0, 2, 1, 5, 4]);
        assert_eq!(order.time, 11);
        Ok(())
    }

    #[test]
    fn single_task() -> anyhow::Result<()> {
        for workers in 1..4 {
            let single = instance(workers, vec![Task::new(5, vec![])])?;
            let order = BruteForce::default().search(&single, FinishTimeModel::IndexOffset)?;
            assert_eq!(order, Order::new(vec![0], 5));
        }
        Ok(())
    }

    #[test]
    fn two_dependent_tasks() -> anyhow::Result<()> {
        let tasks = instance(2, vec![Task::new(1, vec![]), Task::new(1, vec![0])])?;
        let order = BruteForce::default().search(&tasks, FinishTimeModel::IndexOffset)?;
        assert_eq!(order.sequence, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn empty_instance() -> anyhow::Result<()> {
        let order = BruteForce::default().search(&instance(3, vec![])?, FinishTimeModel::IndexOffset)?;
        assert_eq!(order, Order::new(vec![], 0));
        Ok(())
    }

    #[test]
    fn cycle_has_no_solution() -> anyhow::Result<()> {
        let cyclic = instance(1, vec![Task::new(1, vec![1]), Task::new(1, vec![0])])?;
        assert_eq!(
            BruteForce::default().search(&cyclic, FinishTimeModel::IndexOffset),
            Err(SearchError::NoSolution)
        );
        // Without the cycle check the enumeration itself finds nothing.
        let clock = Clock::start(None);
        assert_eq!(brute_force(&cyclic, FinishTimeModel::IndexOffset, &clock), Ok(None));
        Ok(())
    }

    #[test]
    fn invalid_dependency_fails_fast() -> anyhow::Result<()> {
        let broken = instance(1, vec![Task::new(1, vec![4])])?;
        assert_eq!(
            BruteForce::default().search(&broken, FinishTimeModel::IndexOffset),
            Err(SearchError::InvalidInstance(InstanceError::DependencyOutOfRange {
                task: 0,
                dependency: 4,
                tasks: 1
            }))
        );
        Ok(())
    }

    #[test]
    fn search_is_deterministic() -> anyhow::Result<()> {
        let sample = sample(2)?;
        for model in [FinishTimeModel::IndexOffset, FinishTimeModel::WorkerPool] {
            let first = BruteForce::default().search(&sample, model)?;
            let second = BruteForce::default().search(&sample, model)?;
            assert_eq!(first, second);
        }
        Ok(())
    }

    #[test]
    fn ties_go_to_first_generated() -> anyhow::Result<()> {
        // Every order of independent tasks finishes at the same time.
        let tasks = instance(3, vec![Task::new(1, vec![]); 3])?;
        let order = BruteForce::default().search(&tasks, FinishTimeModel::IndexOffset)?;
        assert_eq!(order.sequence, vec![2, 1, 0]);
        Ok(())
    }

    #[test]
    fn zero_time_limit_times_out() -> anyhow::Result<()> {
        let mut search = BruteForce::with_time_limit(Duration::ZERO);
        let result = search.search(&sample(3)?, FinishTimeModel::IndexOffset);
        assert!(matches!(result, Err(SearchError::TimedOut { .. })));
        Ok(())
    }
}
