//! The full implementation of the chip8 machine, from the instruction table to an option to
//! pretty print its state.
mod chipset;
mod opcodes;
mod print;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
