pub mod indicators;
pub mod study;

#[cfg(test)]
mod indicators_tests;

pub use indicators::*;
pub use study::*;
