mod brute_force;
mod topological;

pub use brute_force::BruteForce;
pub use topological::Topological;

use crate::core::{Instance, Order, SearchError, Searcher};
use std::time::{Duration, Instant};
use tracing::debug;

/// Constructors of all the available searchers.
#[allow(unsafe_code)]
#[linkme::distributed_slice]
pub static SEARCHERS: [fn() -> Box<dyn Searcher>];

/// Checks shared by every searcher before enumerating any order.
/// Returns the answer directly when the instance does not need a search.
fn preflight(instance: &Instance) -> Result<Option<Order>, SearchError> {
    instance.validate()?;

    if instance.tasks.is_empty() {
        return Ok(Some(Order::default()));
    }

    if let Some(cycle) = instance.find_cycle() {
        debug!(?cycle, "dependency cycle found, skipping search");
        return Err(SearchError::NoSolution);
    }

    Ok(None)
}

/// Time budget of a single search.
#[derive(Clone, Copy, Debug)]
struct Clock {
    start: Instant,
    limit: Option<Duration>,
}

impl Clock {
    fn start(limit: Option<Duration>) -> Self {
        let start = Instant::now();
        Self { start, limit }
    }

    fn check(&self) -> Result<(), SearchError> {
        match self.limit {
            Some(limit) if self.start.elapsed() > limit => Err(SearchError::TimedOut {
                elapsed: self.start.elapsed(),
            }),
            _ => Ok(()),
        }
    }
}
