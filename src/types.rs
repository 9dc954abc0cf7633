//! Core type definitions.
//!
//! Index aliases and the numeric trait shared by datasets, distance functions
//! and the search engine.

use num_traits::Num;
use std::fmt::Debug;

/// Index of a datapoint within its dataset.
///
/// This is the stable identity/order of a vector: the engine refers to
/// datums and queries only through their position.
pub type DatapointIndex = u32;

/// Index type for dimensions within a datapoint.
pub type DimensionIndex = u64;

/// Trait for numeric types that can be stored as datapoint coordinates.
pub trait DatapointValue: Num + Copy + Default + PartialOrd + Debug + Send + Sync + 'static {
    /// Convert to f32 for distance computations.
    fn to_f32(self) -> f32;
}

macro_rules! impl_datapoint_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DatapointValue for $ty {
                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }
            }
        )*
    };
}

impl_datapoint_value!(f32, f64, i8, u8, i16, u16, i32, u32);

/// Cache line size used to align dataset rows.
pub const CACHE_LINE_BYTES: usize = 64;

/// Round up to the nearest multiple of alignment (a power of two).
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}
