use clap::{Parser, Subcommand, ValueEnum};
use optimal_task_order::core::{FinishTimeModel, Instance, Searcher, Task};
use optimal_task_order::logging::{init_logging, LogLevel};
use optimal_task_order::{algo, data, run_reader};
use rand::prelude::*;
use std::io::Write;
use std::num::NonZero;
use std::time::Duration;

#[derive(Copy, Clone, Debug)]
struct Algorithm(usize, &'static str);

impl From<Algorithm> for Box<dyn Searcher> {
    fn from(value: Algorithm) -> Box<dyn Searcher> {
        algo::SEARCHERS[value.0]()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl ValueEnum for Algorithm {
    fn value_variants<'a>() -> &'a [Self] {
        static ALGORITHMS: std::sync::LazyLock<Vec<Algorithm>> = std::sync::LazyLock::new(|| {
            let iter = algo::SEARCHERS.iter().enumerate();
            iter.map(|(i, init)| Algorithm(i, init().name())).collect()
        });

        ALGORITHMS.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.1))
    }
}

/// Application searching the task order with the lowest finish time.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Application {
    /// Log verbosity. Overrides the `TASK_ORDER_LOG` environment variable.
    #[clap(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one of the implemented searchers on an instance read from stdin.
    Run {
        algorithm: Algorithm,
        /// The finish time model to minimize.
        #[clap(short, long, value_enum, default_value_t)]
        model: FinishTimeModel,
        /// Give up after this many seconds.
        #[clap(short, long)]
        time_limit: Option<f64>,
    },
    /// Run benchmarks on a set of instances.
    Bench {
        /// The input directory.
        input: String,
        /// Exclude searchers.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<Algorithm>,
        /// The finish time model to minimize.
        #[clap(short, long, value_enum, default_value_t)]
        model: FinishTimeModel,
    },
    /// Generate random acyclic instances.
    Gen {
        /// The number of workers.
        workers: NonZero<usize>,
        /// The number of tasks.
        tasks: usize,
        /// The maximum duration of a task.
        max_duration: NonZero<u64>,
        /// Probability that a task depends on a given task with a lower index.
        #[clap(short, long, default_value = "0.3")]
        dependency_ratio: f64,
        /// Number of instances to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
    },
    /// Search the reference six task instance with three workers.
    Demo {
        /// The finish time model to minimize.
        #[clap(short, long, value_enum, default_value_t)]
        model: FinishTimeModel,
    },
}

fn searchers(exclude: &[Algorithm]) -> impl Iterator<Item = Box<dyn Searcher>> + '_ {
    let iter = algo::SEARCHERS.iter().map(|init| init());
    iter.filter(|searcher| !exclude.iter().any(|name| name.1 == searcher.name()))
}

fn gen_tasks(tasks_number: usize, max_duration: u64, ratio: f64) -> Vec<Task> {
    let mut rng = thread_rng();
    let mut tasks = Vec::with_capacity(tasks_number);
    for i in 0..tasks_number {
        let duration = rng.gen_range(1..=max_duration);
        let depends = (0..i).filter(|_| rng.gen_bool(ratio)).collect();
        tasks.push(Task::new(duration, depends));
    }
    tasks
}

const DEMO_WORKERS: NonZero<usize> = match NonZero::new(3) {
    Some(workers) => workers,
    None => unreachable!(),
};

fn demo_instance() -> Instance {
    let tasks = vec![
        Task::new(2, vec![]),
        Task::new(3, vec![0]),
        Task::new(4, vec![0]),
        Task::new(1, vec![]),
        Task::new(5, vec![1, 2]),
        Task::new(6, vec![3]),
    ];
    Instance::new(DEMO_WORKERS, tasks)
}

fn main() -> anyhow::Result<()> {
    let application = Application::parse();
    init_logging(application.log_level)?;

    match application.command {
        Command::Run {
            algorithm,
            model,
            time_limit,
        } => {
            let mut searcher = Box::<dyn Searcher>::from(algorithm);
            if let Some(seconds) = time_limit {
                searcher.set_time_limit(Duration::try_from_secs_f64(seconds)?);
            }
            run_reader(searcher.as_mut(), model, &mut std::io::stdin().lock())
        }
        Command::Bench {
            input,
            exclude,
            model,
        } => {
            for mut searcher in searchers(&exclude) {
                println!("{}", data::run(&input, false, searcher.as_mut(), model)?);
            }
            Ok(())
        }
        Command::Gen {
            workers,
            tasks,
            max_duration,
            dependency_ratio,
            amount,
            output,
        } => {
            anyhow::ensure!(
                (0.0..=1.0).contains(&dependency_ratio),
                "Dependency ratio must be within 0 and 1"
            );

            let output = std::path::Path::new(&output);
            if !output.try_exists()? {
                std::fs::create_dir_all(output)?;
            }

            for i in 0..amount.get() {
                let instance = Instance::new(
                    workers,
                    gen_tasks(tasks, max_duration.get(), dependency_ratio),
                );
                let filename = format!("{workers}_0_{i}.json");
                std::fs::File::create(output.join(filename))?
                    .write_all(data::to_string(&instance)?.as_bytes())?;
            }
            Ok(())
        }
        Command::Demo { model } => {
            let instance = demo_instance();
            let order = algo::BruteForce::default().search(&instance, model)?;
            println!("Optimal order: {order}");
            Ok(())
        }
    }
}
