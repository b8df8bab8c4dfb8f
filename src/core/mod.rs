use rand::distr::{Alphanumeric, SampleString};

pub mod item;

pub mod job;

pub mod step;

/// Generates a random name for steps and jobs that were built without one.
fn build_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}
