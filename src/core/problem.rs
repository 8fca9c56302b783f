use super::InstanceError;
use serde::{Deserialize, Serialize};
use std::num::NonZero;

/// A task. Contains the duration of the task and the indices of the tasks it depends on.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Task {
    pub duration: u64,
    #[serde(default)]
    pub depends: Vec<usize>,
}

impl Task {
    /// Creates a new task.
    #[must_use]
    pub const fn new(duration: u64, depends: Vec<usize>) -> Self {
        Self { duration, depends }
    }
}

/// An instance of the ordering problem.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Eq, Serialize, PartialEq)]
pub struct Instance {
    pub workers: NonZero<usize>,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl Instance {
    /// Creates a new instance of the ordering problem.
    #[must_use]
    pub const fn new(workers: NonZero<usize>, tasks: Vec<Task>) -> Self {
        Self { workers, tasks }
    }

    /// Checks that every dependency points at another existing task.
    ///
    /// # Errors
    /// - If a dependency index is out of range.
    /// - If a task depends on itself.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let tasks = self.tasks.len();
        for (task, entry) in self.tasks.iter().enumerate() {
            for &dependency in &entry.depends {
                if dependency >= tasks {
                    return Err(InstanceError::DependencyOutOfRange {
                        task,
                        dependency,
                        tasks,
                    });
                }
                if dependency == task {
                    return Err(InstanceError::SelfDependency { task });
                }
            }
        }
        Ok(())
    }

    /// Finds a dependency cycle using depth-first search.
    /// Returns the tasks on the cycle in dependency order, or None if the graph is acyclic.
    /// The instance must be valid.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut marks = vec![Mark::Unvisited; self.tasks.len()];
        let mut path = Vec::new();

        for root in 0..self.tasks.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // Stack of (task, next dependency position).
            let mut stack = vec![(root, 0)];
            marks[root] = Mark::OnStack;
            path.push(root);

            while let Some((task, next)) = stack.last_mut() {
                let task = *task;
                if let Some(&dependency) = self.tasks[task].depends.get(*next) {
                    *next += 1;
                    match marks[dependency] {
                        Mark::Unvisited => {
                            marks[dependency] = Mark::OnStack;
                            path.push(dependency);
                            stack.push((dependency, 0));
                        }
                        Mark::OnStack => {
                            let start = path.iter().position(|&t| t == dependency)?;
                            return Some(path[start..].to_vec());
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[task] = Mark::Done;
                    path.pop();
                    stack.pop();
                }
            }
        }

        None
    }
}
