use thiserror::Error;

use crate::opcode::Opcode;

/// Everything that can go wrong while executing a single instruction.
///
/// None of these stop the machine, the faulting instruction is skipped.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("There can not be an opcode at {pointer}, the data is only {len} bytes long.")]
    MemoryInvalid { pointer: usize, len: usize },
}

/// The call stack holds at most sixteen return addresses.
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full, the call was rejected!")]
    Full,
    #[error("Stack is empty, there is nothing to return to!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum RomError {
    /// The rom was truncated to fit, the machine is still runnable.
    #[error("The rom is {len} bytes long, only the first {max} bytes were loaded.")]
    TooLarge { len: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ProcessError::from(OpcodeError::InvalidOpcode(0x5121));
        assert_eq!(
            err.to_string(),
            "Invalid opcode state 'An unsupported opcode was used 0x5121.'."
        );

        let err = RomError::TooLarge { len: 4000, max: 3584 };
        assert_eq!(
            err.to_string(),
            "The rom is 4000 bytes long, only the first 3584 bytes were loaded."
        );
    }
}
