use super::Instance;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Formula used to estimate the finish time of an order.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FinishTimeModel {
    /// A task starts at the earliest finish among the tasks whose indices are
    /// 1 to `workers` below its own. The result is the finish of the last task index.
    #[default]
    IndexOffset,
    /// Tasks are dispatched in order to the earliest free worker and wait for
    /// their dependencies. The result is the latest finish.
    WorkerPool,
}

impl FinishTimeModel {
    /// Estimates the finish time of a valid order.
    #[must_use]
    pub fn estimate(self, order: &[usize], instance: &Instance) -> u64 {
        match self {
            Self::IndexOffset => estimate_index_offset(order, instance),
            Self::WorkerPool => estimate_worker_pool(order, instance),
        }
    }

    /// Returns the name of the model.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IndexOffset => "index-offset",
            Self::WorkerPool => "worker-pool",
        }
    }
}

/// Estimates the finish time of an order treating the `workers` preceding task
/// indices as the slots a task may follow.
///
/// Slots below index 0 count as free at time 0. Tasks not yet placed also count
/// as finishing at 0.
#[must_use]
pub fn estimate_index_offset(order: &[usize], instance: &Instance) -> u64 {
    let Some(last) = instance.tasks.len().checked_sub(1) else {
        return 0;
    };

    let mut finish = vec![0u64; instance.tasks.len()];

    for &index in order {
        let start = (1..=instance.workers.get())
            .map(|offset| index.checked_sub(offset).map_or(0, |slot| finish[slot]))
            .min()
            .unwrap_or_default();
        finish[index] = start.saturating_add(instance.tasks[index].duration);
    }

    finish[last]
}

/// Worker ordered by the time it becomes free, then by id.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct Worker {
    free: u64,
    id: usize,
}

impl PartialOrd<Self> for Worker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Worker {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.free.cmp(&other.free) {
            Ordering::Equal => self.id.cmp(&other.id),
            order => order,
        }
    }
}

/// Simulates dispatching the order on a pool of workers.
/// Every task goes to the worker that frees up earliest and starts once that
/// worker is free and all its dependencies have finished.
#[must_use]
pub fn estimate_worker_pool(order: &[usize], instance: &Instance) -> u64 {
    let mut workers: BTreeSet<_> = (0..instance.workers.get())
        .map(|id| Worker { free: 0, id })
        .collect();
    let mut finish = vec![0u64; instance.tasks.len()];
    let mut makespan = 0;

    for &index in order {
        let task = &instance.tasks[index];
        let ready = task.depends.iter().map(|&d| finish[d]).max().unwrap_or_default();

        let Some(mut worker) = workers.pop_first() else {
            unreachable!("Worker number is always greater than 0")
        };

        finish[index] = worker.free.max(ready).saturating_add(task.duration);
        worker.free = finish[index];
        makespan = makespan.max(finish[index]);

        workers.insert(worker);
    }

    makespan
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Task;
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
    fn test_index_offset() -> anyhow::Result<()> {
        let three = sample(3)?;
        assert_eq!(estimate_index_offset(&[0, 1, 2, 3, 4, 5], &three), 9);
        assert_eq!(estimate_index_offset(&[3, 5, 0, 2, 1, 4], &three), 6);

        let single = sample(1)?;
        assert_eq!(estimate_index_offset(&[0, 1, 2, 3, 4, 5], &single), 21);
        Ok(())
    }

    #[test]
    fn index_offset_reports_highest_index() -> anyhow::Result<()> {
        // Task 1 placed before task 0 starts at 0.
        let tasks = instance(1, vec![Task::new(10, vec![]), Task::new(1, vec![])])?;
        assert_eq!(estimate_index_offset(&[1, 0], &tasks), 1);
        assert_eq!(estimate_index_offset(&[0, 1], &tasks), 11);
        Ok(())
    }

    #[test]
    fn single_task_takes_its_duration() -> anyhow::Result<()> {
        for workers in 1..4 {
            let single = instance(workers, vec![Task::new(7, vec![])])?;
            assert_eq!(estimate_index_offset(&[0], &single), 7);
            assert_eq!(estimate_worker_pool(&[0], &single), 7);
        }
        Ok(())
    }

    #[test]
    fn empty_instance_takes_no_time() -> anyhow::Result<()> {
        let empty = instance(2, vec![])?;
        assert_eq!(FinishTimeModel::IndexOffset.estimate(&[], &empty), 0);
        assert_eq!(FinishTimeModel::WorkerPool.estimate(&[], &empty), 0);
        Ok(())
    }

    #[test]
    fn test_worker_pool() -> anyhow::Result<()> {
        assert_eq!(estimate_worker_pool(&[3, 5, 0, 2, 1, 4], &sample(3)?), 11);
        assert_eq!(estimate_worker_pool(&[3, 0, 2, 1, 5, 4], &sample(2)?), 11);
        assert_eq!(estimate_worker_pool(&[0, 1, 2, 3, 4, 5], &sample(1)?), 21);
        Ok(())
    }

    #[test]
    fn durations_saturate() -> anyhow::Result<()> {
        let tasks = instance(1, vec![Task::new(u64::MAX, vec![]), Task::new(1, vec![0])])?;
        assert_eq!(estimate_index_offset(&[0, 1], &tasks), u64::MAX);
        assert_eq!(estimate_worker_pool(&[0, 1], &tasks), u64::MAX);
        Ok(())
    }

    #[test]
    fn model_names() {
        assert_eq!(FinishTimeModel::default(), FinishTimeModel::IndexOffset);
        assert_eq!(FinishTimeModel::IndexOffset.name(), "index-offset");
        assert_eq!(FinishTimeModel::WorkerPool.name(), "worker-pool");
    }
}
