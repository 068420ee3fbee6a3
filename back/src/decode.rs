//! Instruction decoders.

pub mod ppc;
