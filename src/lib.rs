#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::Result;
use std::io::BufRead;

pub mod algo;
pub mod core;
pub mod data;
pub mod logging;

/// Runs the given searcher on the instance read from reader and writes the order to stdout.
/// Also writes the finish time of the order to stdout.
/// Returns an error if the instance could not be read or no order was found.
///
/// # Errors
/// - If the instance could not be read from the reader.
/// - If the instance is malformed or has no valid order.
///
/// # Panics
///  - If the order is invalid in debug mode.
pub fn run_reader(
    searcher: &mut dyn core::Searcher,
    model: core::FinishTimeModel,
    reader: &mut impl BufRead,
) -> Result<()> {
    let instance: core::Instance = data::deserialize(reader)?;
    let order = searcher.search(&instance, model)?;

    debug_assert!(order.verify(&instance.tasks), "Order is invalid: {order:?}");

    println!("{order}");
    println!("{}", order.time);

    Ok(())
}
