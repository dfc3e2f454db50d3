//! Hidden polynomial with integer roots.

pub mod root_function;

pub use root_function::{RootFunction, Roots};
