#![forbid(unsafe_code)]

//! Reactive primitives the settings layer is built on.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
