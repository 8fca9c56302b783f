use super::{preflight, Clock};
use crate::core::{insertion_key, FinishTimeModel, Instance, Order, SearchError, Searcher};
use std::cmp::Ordering;
use std::time::Duration;
use tracing::{debug, trace};

/// Search enumerating only the orders that respect the dependencies.
/// It backtracks over the set of tasks whose dependencies are already placed,
/// so invalid permutations are never built.
///
/// Ties are broken by generation order of the full permutation enumeration, so
/// it returns exactly the same order as [`super::BruteForce`].
#[derive(Clone, Debug, Default)]
pub struct Topological {
    time_limit: Option<Duration>,
}

impl Topological {
    /// Creates a topological search that gives up after the given time.
    #[must_use]
    pub const fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }
}

impl Searcher for Topological {
    fn search(&mut self, instance: &Instance, model: FinishTimeModel) -> Result<Order, SearchError> {
        if let Some(order) = preflight(instance)? {
            return Ok(order);
        }

        let mut state = State::new(instance, model, Clock::start(self.time_limit));
        state.extend()?;
        debug!(orders = state.orders, model = model.name(), "topological search finished");

        state.best.map(|(order, _)| order).ok_or(SearchError::NoSolution)
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = Some(limit);
    }

    fn maximum_tasks(&self) -> usize {
        12
    }

    fn name(&self) -> &'static str {
        "Topological"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::SEARCHERS)]
static INSTANCE: fn() -> Box<dyn Searcher> = || Box::new(Topological::default());

struct State<'a> {
    instance: &'a Instance,
    model: FinishTimeModel,
    clock: Clock,
    /// Number of unplaced dependencies of every task.
    waiting: Vec<usize>,
    dependents: Vec<Vec<usize>>,
    placed: Vec<bool>,
    sequence: Vec<usize>,
    best: Option<(Order, Vec<usize>)>,
    orders: u64,
}

impl<'a> State<'a> {
    fn new(instance: &'a Instance, model: FinishTimeModel, clock: Clock) -> Self {
        let n = instance.tasks.len();
        let mut dependents = vec![Vec::new(); n];
        for (task, entry) in instance.tasks.iter().enumerate() {
            for &dependency in &entry.depends {
                dependents[dependency].push(task);
            }
        }

        Self {
            instance,
            model,
            clock,
            waiting: instance.tasks.iter().map(|task| task.depends.len()).collect(),
            dependents,
            placed: vec![false; n],
            sequence: Vec::with_capacity(n),
            best: None,
            orders: 0,
        }
    }

    fn extend(&mut self) -> Result<(), SearchError> {
        if self.sequence.len() == self.instance.tasks.len() {
            self.evaluate();
            return self.clock.check();
        }

        for task in 0..self.instance.tasks.len() {
            if self.placed[task] || self.waiting[task] > 0 {
                continue;
            }

            self.place(task);
            let result = self.extend();
            self.unplace(task);
            result?;
        }

        Ok(())
    }

    fn place(&mut self, task: usize) {
        self.placed[task] = true;
        self.sequence.push(task);
        for &dependent in &self.dependents[task] {
            self.waiting[dependent] -= 1;
        }
    }

    fn unplace(&mut self, task: usize) {
        for &dependent in &self.dependents[task] {
            self.waiting[dependent] += 1;
        }
        self.sequence.pop();
        self.placed[task] = false;
    }

    fn evaluate(&mut self) {
        self.orders += 1;
        let time = self.model.estimate(&self.sequence, self.instance);

        let better = match &self.best {
            None => true,
            Some((best, key)) => match time.cmp(&best.time) {
                Ordering::Less => true,
                Ordering::Equal => insertion_key(&self.sequence) < *key,
                Ordering::Greater => false,
            },
        };

        if better {
            trace!(time, sequence = ?self.sequence, "new best order");
            let key = insertion_key(&self.sequence);
            self.best = Some((Order::new(self.sequence.clone(), time), key));
        }
    }
}
