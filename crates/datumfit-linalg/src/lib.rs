#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Dense row-major matrix type and elimination kernels.
pub mod matrix;
