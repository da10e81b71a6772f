/// Numerical analysis of selected raw data.
pub mod svd;

pub use svd::{analyze, SvdResult};
