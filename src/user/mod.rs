//! Identity repository facade.

mod repository;

pub use repository::*;
