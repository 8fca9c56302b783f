use super::Task;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An order of the instance tasks together with its estimated finish time.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Order {
    pub sequence: Vec<usize>,
    pub time: u64,
}

impl Order {
    /// Creates a new order.
    #[must_use]
    pub const fn new(sequence: Vec<usize>, time: u64) -> Self {
        Self { sequence, time }
    }

    /// Checks if the order respects all the dependencies of the tasks.
    #[must_use]
    pub fn verify(&self, tasks: &[Task]) -> bool {
        is_valid_order(&self.sequence, tasks)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, task) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{task}")?;
        }
        write!(f, "]")
    }
}

/// Checks that every task appears after all the tasks it depends on.
/// Sequences that are not a permutation of the task indices are invalid.
#[must_use]
pub fn is_valid_order(order: &[usize], tasks: &[Task]) -> bool {
    if order.len() != tasks.len() {
        return false;
    }

    let mut completed = vec![false; tasks.len()];

    for &index in order {
        let Some(task) = tasks.get(index) else {
            return false;
        };

        if completed[index] || task.depends.iter().any(|&d| !completed.get(d).copied().unwrap_or(false)) {
            return false;
        }

        completed[index] = true;
    }

    true
}
