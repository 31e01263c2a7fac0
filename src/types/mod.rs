//! Type definitions for worklens

mod error;
mod report;

pub use error::*;
pub use report::*;
