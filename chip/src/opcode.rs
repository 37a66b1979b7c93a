//! Opcode abstractions, field extraction and the decoded instruction set.
use std::convert::TryFrom;

use crate::{definitions::memory, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the upper twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the upper eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the upper four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the lowest four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the lowest eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the lowest twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble in bits
const NIBBLE: u16 = 4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::OpcodeError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # let err = OpcodeError::MemoryInvalid {pointer, len: SPLIT_OPCODE.len() };
/// # assert_eq!(Err(err), build_opcode(&SPLIT_OPCODE, pointer));
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// Will read the instruction at `address` from the machine memory.
///
/// Both bytes are masked into the address space, so an instruction at
/// `0xFFF` takes its low byte from `0x000`.
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// let mut memory = [0u8; 0x1000];
/// memory[0xFFF] = 0x12;
/// memory[0x000] = 0x34;
/// assert_eq!(fetch(&memory, 0xFFF), 0x1234);
/// ```
pub fn fetch(memory: &[u8; memory::SIZE], address: u16) -> Opcode {
    let high = memory[mask_address(address)];
    let low = memory[mask_address(address.wrapping_add(1))];
    Opcode::from_be_bytes([high, low])
}

/// Masks any computed address into the valid `0x000..=0xFFF` range.
#[inline]
pub fn mask_address(address: u16) -> usize {
    usize::from(address & memory::ADDRESS_MASK)
}

/// Field extractors for the four nibble instruction word.
pub trait OpcodeTrait {
    /// the instruction class, the highest nibble
    fn t(&self) -> u8;

    /// the lowest twelve bits, an address
    fn nnn(&self) -> u16;

    /// the lowest byte, a constant
    fn nn(&self) -> u8;

    /// the lowest nibble, a constant or sub opcode
    fn n(&self) -> usize;

    /// the second nibble, a register index
    fn x(&self) -> usize;

    /// the third nibble, a register index
    fn y(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.nnn(), 0xEDA);
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.nn(), 0xDA);
    /// ```
    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.n(), 0xA);
    /// ```
    fn n(&self) -> usize {
        (self & OPCODE_MASK_000F) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE)) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.y(), 0xD);
    /// ```
    fn y(&self) -> usize {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        ((self & MASK) >> NIBBLE) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents where the program counter goes after an instruction ran.
///
/// The fetch has already moved the counter past the executed instruction.
pub enum ProgramCounterStep {
    /// Continue with the instruction following the executed one
    Next,
    /// Skip over the following instruction
    Skip,
    /// Move the program counter to the given address, masked to twelve bits
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Maps the step onto the program counter that follows `pc`.
    #[inline]
    pub fn apply(&self, pc: u16) -> u16 {
        let next = match *self {
            ProgramCounterStep::Next => pc,
            ProgramCounterStep::Skip => pc.wrapping_add(memory::opcodes::SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        };
        next & memory::ADDRESS_MASK
    }
}

/// Decodes a value out of a single opcode field.
trait FromField<T>: Sized {
    fn from_field(value: T) -> Option<Self>;
}

#[inline]
fn decode<T: FromField<Opcode>>(value: Opcode) -> Result<T, OpcodeError> {
    T::from_field(value).ok_or(OpcodeError::InvalidOpcode(value))
}

/// Creates the lookup for a sub opcode enum out of the raw field.
macro_rules! implFromFieldEnum {
    ($type_name:ty : $type_from:ty : $( $key:literal => $val:expr ),+ $(,)? ) => {
        impl FromField<$type_from> for $type_name {
            fn from_field(value: $type_from) -> Option<Self> {
                match value {
                    $(
                        $key => Some($val),
                    )+
                    _ => None,
                }
            }
        }
    };
}

macro_rules! implFromFieldNNN {
    ($type_name:ident) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                Some($type_name { nnn: value.nnn() })
            }
        }
    };
}

macro_rules! implFromFieldXNN {
    ($type_name:ident) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                Some($type_name {
                    x: value.x(),
                    nn: value.nn(),
                })
            }
        }
    };
}

macro_rules! implFromFieldXY0 {
    ($type_name:ident) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                match value.n() {
                    0 => Some($type_name {
                        x: value.x(),
                        y: value.y(),
                    }),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! implFromFieldXYN {
    ($type_name:ident) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                Some($type_name {
                    x: value.x(),
                    y: value.y(),
                    n: value.n(),
                })
            }
        }
    };
}

macro_rules! implFromFieldXYNE {
    ($type_name:ident : $ops_name:ty) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                let ops = <$ops_name as FromField<usize>>::from_field(value.n())?;
                Some($type_name {
                    ops,
                    x: value.x(),
                    y: value.y(),
                })
            }
        }
    };
}

macro_rules! implFromFieldXNNE {
    ($type_name:ident : $ops_name:ty) => {
        impl FromField<Opcode> for $type_name {
            fn from_field(value: Opcode) -> Option<Self> {
                let ops = <$ops_name as FromField<u8>>::from_field(value.nn())?;
                Some($type_name { ops, x: value.x() })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum System {
    /// Clears the display
    Clear,
    /// Returns from the subroutine
    Return,
}

implFromFieldEnum!(System : Opcode :
    // 00E0
    0x00E0 => System::Clear,
    // 00EE
    0x00EE => System::Return,
);

/// Operand of the `TNNN` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub nnn: u16,
}

implFromFieldNNN!(Address);

/// Operand of the `TXNN` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterConst {
    pub x: usize,
    pub nn: u8,
}

implFromFieldXNN!(RegisterConst);

/// Operand of the `TXY0` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPair {
    pub x: usize,
    pub y: usize,
}

implFromFieldXY0!(RegisterPair);

/// Operand of `DXYN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub x: usize,
    pub y: usize,
    pub n: usize,
}

implFromFieldXYN!(Sprite);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Assign,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReverse,
    ShiftLeft,
}

implFromFieldEnum!(ArithmeticOp : usize :
    // 8XY0
    0x0 => ArithmeticOp::Assign,
    // 8XY1
    0x1 => ArithmeticOp::Or,
    // 8XY2
    0x2 => ArithmeticOp::And,
    // 8XY3
    0x3 => ArithmeticOp::Xor,
    // 8XY4
    0x4 => ArithmeticOp::Add,
    // 8XY5
    0x5 => ArithmeticOp::Sub,
    // 8XY6
    0x6 => ArithmeticOp::ShiftRight,
    // 8XY7
    0x7 => ArithmeticOp::SubReverse,
    // 8XYE
    0xE => ArithmeticOp::ShiftLeft,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arithmetic {
    pub ops: ArithmeticOp,
    pub x: usize,
    pub y: usize,
}

implFromFieldXYNE!(Arithmetic : ArithmeticOp);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Pressed,
    NotPressed,
}

implFromFieldEnum!(KeyOp : u8 :
    // EX9E
    0x9E => KeyOp::Pressed,
    // EXA1
    0xA1 => KeyOp::NotPressed,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub ops: KeyOp,
    pub x: usize,
}

implFromFieldXNNE!(Key : KeyOp);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    GetDelayTimer,
    AwaitKeyPress,
    SetDelayTimer,
    SetSoundTimer,
    AddToIndex,
    FontSprite,
    StoreBcd,
    StoreRegisters,
    LoadRegisters,
}

implFromFieldEnum!(MiscOp : u8 :
    // FX07
    0x07 => MiscOp::GetDelayTimer,
    // FX0A
    0x0A => MiscOp::AwaitKeyPress,
    // FX15
    0x15 => MiscOp::SetDelayTimer,
    // FX18
    0x18 => MiscOp::SetSoundTimer,
    // FX1E
    0x1E => MiscOp::AddToIndex,
    // FX29
    0x29 => MiscOp::FontSprite,
    // FX33
    0x33 => MiscOp::StoreBcd,
    // FX55
    0x55 => MiscOp::StoreRegisters,
    // FX65
    0x65 => MiscOp::LoadRegisters,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Misc {
    pub ops: MiscOp,
    pub x: usize,
}

implFromFieldXNNE!(Misc : MiscOp);

/// A fully decoded instruction, one variant per instruction class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    System(System),
    Jump(Address),
    Call(Address),
    SkipEqualConst(RegisterConst),
    SkipNotEqualConst(RegisterConst),
    SkipEqualRegister(RegisterPair),
    LoadConst(RegisterConst),
    AddConst(RegisterConst),
    Arithmetic(Arithmetic),
    SkipNotEqualRegister(RegisterPair),
    LoadIndex(Address),
    JumpOffset(Address),
    Random(RegisterConst),
    Draw(Sprite),
    Key(Key),
    Misc(Misc),
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let res = match value.t() {
            0x0 => Instruction::System(decode(value)?),
            0x1 => Instruction::Jump(decode(value)?),
            0x2 => Instruction::Call(decode(value)?),
            0x3 => Instruction::SkipEqualConst(decode(value)?),
            0x4 => Instruction::SkipNotEqualConst(decode(value)?),
            0x5 => Instruction::SkipEqualRegister(decode(value)?),
            0x6 => Instruction::LoadConst(decode(value)?),
            0x7 => Instruction::AddConst(decode(value)?),
            0x8 => Instruction::Arithmetic(decode(value)?),
            0x9 => Instruction::SkipNotEqualRegister(decode(value)?),
            0xA => Instruction::LoadIndex(decode(value)?),
            0xB => Instruction::JumpOffset(decode(value)?),
            0xC => Instruction::Random(decode(value)?),
            0xD => Instruction::Draw(decode(value)?),
            0xE => Instruction::Key(decode(value)?),
            0xF => Instruction::Misc(decode(value)?),
            _ => return Err(OpcodeError::InvalidOpcode(value)),
        };
        Ok(res)
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter according to the step.
    fn step(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The machine is now suspended until a key gets pressed.
    Wait,
    /// The framebuffer changed and should be redrawn.
    Draw,
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// This trait requires the implementation of the [`ProgramCounter`](ProgramCounter)
/// trait, as every instruction reports how the counter moves on.
pub trait ChipOpcodes: ProgramCounter {
    /// will execute a single decoded instruction
    fn calc(&mut self, instruction: &Instruction) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op)| {
            operation = op;
            step
        };

        let step = match instruction {
            Instruction::System(op) => self.system(op).map(step_op),
            Instruction::Jump(op) => self.jump(op),
            Instruction::Call(op) => self.call(op),
            Instruction::SkipEqualConst(op) => self.skip_equal_const(op),
            Instruction::SkipNotEqualConst(op) => self.skip_not_equal_const(op),
            Instruction::SkipEqualRegister(op) => self.skip_equal_register(op),
            Instruction::LoadConst(op) => self.load_const(op),
            Instruction::AddConst(op) => self.add_const(op),
            Instruction::Arithmetic(op) => self.arithmetic(op),
            Instruction::SkipNotEqualRegister(op) => self.skip_not_equal_register(op),
            Instruction::LoadIndex(op) => self.load_index(op),
            Instruction::JumpOffset(op) => self.jump_offset(op),
            Instruction::Random(op) => self.random(op),
            Instruction::Draw(op) => self.draw(op).map(step_op),
            Instruction::Key(op) => self.key(op),
            Instruction::Misc(op) => self.misc(op).map(step_op),
        }?;

        self.step(step);
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn system(&mut self, opcode: &System) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn jump(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn call(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    fn skip_equal_const(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    fn skip_not_equal_const(
        &self,
        opcode: &RegisterConst,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn skip_equal_register(&self, opcode: &RegisterPair)
        -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    fn load_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`. (Carry flag is not changed)
    fn add_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    /// - `8XY4` - Math     - `Vx += Vy`            - `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VF` is set to `1` when `VX >= VY`, and to `0` otherwise.
    /// - `8XY6` - BitOp    - `Vx>>=1`              - Stores the least significant bit of `VX` in `VF`, then shifts right.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - `VF` is set to `1` when `VY >= VX`, and to `0` otherwise.
    /// - `8XYE` - BitOp    - `Vx<<=1`              - Stores the most significant bit of `VX` in `VF`, then shifts left.
    fn arithmetic(&mut self, opcode: &Arithmetic) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn skip_not_equal_register(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn load_index(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn jump_offset(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to a random byte masked with `NN`.
    fn random(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws an `8xN` sprite from memory at `I` to `(VX, VY)`, `VF` is set on collision.
    fn draw(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn key(&self, opcode: &Key) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - Suspends the machine until a key is pressed, then stores it in `VX`.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`, `VF` is set on overflow past `0xFFF`.
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the font glyph for the digit in `VX`.
    /// - `FX33` - BCD      - `set_BCD(Vx)`         - Stores hundreds, tens and ones of `VX` at `I..=I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` in memory starting at `I`.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` from memory starting at `I`.
    fn misc(&mut self, opcode: &Misc) -> Result<(ProgramCounterStep, Operation), ProcessError>;
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv = value.try_into();
        assert_eq!(conv, Ok(Instruction::System(System::Clear)));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x00E1;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(value)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let arith = |ops| -> Result<Instruction, ()> {
            Ok(Instruction::Arithmetic(Arithmetic { ops, x: 0x1, y: 0x2 }))
        };
        let misc = |ops| -> Result<Instruction, ()> { Ok(Instruction::Misc(Misc { ops, x: 0x3 })) };

        let tests = [
            (0x00E0, Ok(Instruction::System(System::Clear))),
            (0x00EE, Ok(Instruction::System(System::Return))),
            (0x0123, Err(())),
            (0x1919, Ok(Instruction::Jump(Address { nnn: 0x919 }))),
            (0x2222, Ok(Instruction::Call(Address { nnn: 0x222 }))),
            (
                0x3123,
                Ok(Instruction::SkipEqualConst(RegisterConst { x: 0x1, nn: 0x23 })),
            ),
            (
                0x4123,
                Ok(Instruction::SkipNotEqualConst(RegisterConst { x: 0x1, nn: 0x23 })),
            ),
            (
                0x5120,
                Ok(Instruction::SkipEqualRegister(RegisterPair { x: 0x1, y: 0x2 })),
            ),
            (0x5121, Err(())),
            (0x6123, Ok(Instruction::LoadConst(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x7123, Ok(Instruction::AddConst(RegisterConst { x: 0x1, nn: 0x23 }))),
            (0x8120, arith(ArithmeticOp::Assign)),
            (0x8121, arith(ArithmeticOp::Or)),
            (0x8122, arith(ArithmeticOp::And)),
            (0x8123, arith(ArithmeticOp::Xor)),
            (0x8124, arith(ArithmeticOp::Add)),
            (0x8125, arith(ArithmeticOp::Sub)),
            (0x8126, arith(ArithmeticOp::ShiftRight)),
            (0x8127, arith(ArithmeticOp::SubReverse)),
            (0x812E, arith(ArithmeticOp::ShiftLeft)),
            (0x8128, Err(())),
            (
                0x9120,
                Ok(Instruction::SkipNotEqualRegister(RegisterPair { x: 0x1, y: 0x2 })),
            ),
            (0x9121, Err(())),
            (0xA222, Ok(Instruction::LoadIndex(Address { nnn: 0x222 }))),
            (0xB222, Ok(Instruction::JumpOffset(Address { nnn: 0x222 }))),
            (0xC123, Ok(Instruction::Random(RegisterConst { x: 0x1, nn: 0x23 }))),
            (
                0xD123,
                Ok(Instruction::Draw(Sprite {
                    x: 0x1,
                    y: 0x2,
                    n: 0x3,
                })),
            ),
            (
                0xE19E,
                Ok(Instruction::Key(Key {
                    ops: KeyOp::Pressed,
                    x: 0x1,
                })),
            ),
            (
                0xE1A1,
                Ok(Instruction::Key(Key {
                    ops: KeyOp::NotPressed,
                    x: 0x1,
                })),
            ),
            (0xE111, Err(())),
            (0xF307, misc(MiscOp::GetDelayTimer)),
            (0xF30A, misc(MiscOp::AwaitKeyPress)),
            (0xF315, misc(MiscOp::SetDelayTimer)),
            (0xF318, misc(MiscOp::SetSoundTimer)),
            (0xF31E, misc(MiscOp::AddToIndex)),
            (0xF329, misc(MiscOp::FontSprite)),
            (0xF333, misc(MiscOp::StoreBcd)),
            (0xF355, misc(MiscOp::StoreRegisters)),
            (0xF365, misc(MiscOp::LoadRegisters)),
            (0xF0AA, Err(())),
        ];
        for (value, res) in tests {
            let conv: Result<Instruction, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }

    #[test]
    fn test_step_wraps_into_address_space() {
        assert_eq!(ProgramCounterStep::Next.apply(0x0202), 0x0202);
        assert_eq!(ProgramCounterStep::Skip.apply(0x0202), 0x0204);
        assert_eq!(ProgramCounterStep::Skip.apply(0x0FFF), 0x0001);
        assert_eq!(ProgramCounterStep::Jump(0x1234).apply(0x0202), 0x0234);
    }
}
