//! Tools for checking determinization results in tests.

pub mod random;
pub mod same_language;
