
#![deny(unsafe_op_in_unsafe_fn)]

/// Emulated CPU state and common operations.
pub mod cpu;
/// Implementation of emulated memories.
pub mod mem;
/// Implementation of system devices.
pub mod dev;

/// Implementation of an abstract system bus.
pub mod bus;

/// The top-level machine aggregate.
pub mod machine;
/// Saving and restoring complete machine state.
pub mod snapshot;
