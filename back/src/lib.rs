#![deny(unsafe_op_in_unsafe_fn)]

pub mod back;
pub mod bits;
pub mod decode;

pub mod interp;

pub mod host;
pub mod syscall;
