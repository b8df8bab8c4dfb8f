/// CSV item reader and writer built on the `csv` crate.
pub mod csv;
