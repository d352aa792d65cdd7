#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use datumfit_linalg as linalg;

#[doc(inline)]
pub use datumfit_transform as transform;
