//! Data format types.
//!
//! Vector entities (datapoints) and the collections that own them. The
//! engine only ever borrows these.

mod datapoint;
mod dataset;

pub use datapoint::{Datapoint, DatapointPtr};
pub use dataset::DenseDataset;
