//! Input validation and pre-export review.

mod validate;

pub use validate::*;
