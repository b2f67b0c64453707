//! Derive macros shared by the date types.

pub use derive_more::{Deref, Display, From};
