//! Adapter implementations of the application's ports.

pub mod memory;
