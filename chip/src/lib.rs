//! A CHIP-8 virtual machine core.
//!
//! The [`ChipSet`](chip8::ChipSet) holds the whole machine state and is driven
//! by wall clock time through [`advance`](chip8::ChipSet::advance). The
//! [`Runner`](runner::Runner) connects it to a display and a keyboard.
pub mod chip8;
pub mod definitions;
pub mod devices;
pub mod display;
pub mod opcode;
pub mod runner;
pub mod timer;
mod error;

// reexporting for convinience
pub use error::*;
