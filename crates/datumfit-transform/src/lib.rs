#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Six-parameter plane transformation and its least-squares estimation.
pub mod affine;

/// Plane point records and column-order detection.
pub mod point;

/// Synthetic end-to-end estimation scenario.
pub mod scenario;
