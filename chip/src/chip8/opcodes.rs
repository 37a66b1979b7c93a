use crate::{
    definitions::{cpu, display, memory},
    opcode::{
        mask_address, Address, Arithmetic, ArithmeticOp, ChipOpcodes, Key, KeyOp, Misc, MiscOp,
        Operation, ProgramCounterStep, RegisterConst, RegisterPair, Sprite, System,
    },
    timer::Timed,
    ProcessError,
};

use super::ChipSet;

/// The longest sprite `DXYN` can draw.
const MAX_SPRITE_HEIGHT: usize = 0xF;

impl ChipSet {
    /// The address `I + offset`, wrapped into the address space.
    fn indexed(&self, offset: usize) -> usize {
        mask_address(self.index_register.wrapping_add(offset as u16))
    }
}

impl ChipOpcodes for ChipSet {
    fn system(&mut self, opcode: &System) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        match opcode {
            System::Clear => {
                self.display.clear();
                Ok((ProgramCounterStep::Next, Operation::Draw))
            }
            System::Return => {
                let pc = self.pop_stack()?;
                log::debug!("return to {:#05X}", pc);
                Ok((ProgramCounterStep::Jump(pc), Operation::None))
            }
        }
    }

    fn jump(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn call(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        // the counter already points at the instruction after the call
        self.push_stack(self.program_counter)?;
        log::debug!("call {:#05X}, depth {}", opcode.nnn, self.stack.len());
        Ok(ProgramCounterStep::Jump(opcode.nnn))
    }

    fn skip_equal_const(&self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(self.registers[opcode.x] == opcode.nn))
    }

    fn skip_not_equal_const(
        &self,
        opcode: &RegisterConst,
    ) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(self.registers[opcode.x] != opcode.nn))
    }

    fn skip_equal_register(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(
            self.registers[opcode.x] == self.registers[opcode.y],
        ))
    }

    fn load_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        self.registers[opcode.x] = opcode.nn;
        Ok(ProgramCounterStep::Next)
    }

    fn add_const(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // let VX overflow, but ignore carry
        self.registers[opcode.x] = self.registers[opcode.x].wrapping_add(opcode.nn);
        Ok(ProgramCounterStep::Next)
    }

    fn arithmetic(&mut self, opcode: &Arithmetic) -> Result<ProgramCounterStep, ProcessError> {
        let Arithmetic { ops, x, y } = *opcode;
        let vx = self.registers[x];
        let vy = self.registers[y];

        // VF is written last, so it wins over the result if X is F
        let (result, flag) = match ops {
            ArithmeticOp::Assign => (vy, None),
            ArithmeticOp::Or => (vx | vy, None),
            ArithmeticOp::And => (vx & vy, None),
            ArithmeticOp::Xor => (vx ^ vy, None),
            ArithmeticOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            ArithmeticOp::Sub => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
            ArithmeticOp::ShiftRight => (vx >> 1, Some(vx & 0x01)),
            ArithmeticOp::SubReverse => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
            ArithmeticOp::ShiftLeft => (vx << 1, Some(vx >> 7)),
        };

        self.registers[x] = result;
        if let Some(flag) = flag {
            self.registers[cpu::register::LAST] = flag;
        }
        Ok(ProgramCounterStep::Next)
    }

    fn skip_not_equal_register(
        &self,
        opcode: &RegisterPair,
    ) -> Result<ProgramCounterStep, ProcessError> {
        Ok(ProgramCounterStep::cond(
            self.registers[opcode.x] != self.registers[opcode.y],
        ))
    }

    fn load_index(&mut self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        self.index_register = opcode.nnn;
        Ok(ProgramCounterStep::Next)
    }

    fn jump_offset(&self, opcode: &Address) -> Result<ProgramCounterStep, ProcessError> {
        let v0 = u16::from(self.registers[0]);
        Ok(ProgramCounterStep::Jump(opcode.nnn.wrapping_add(v0)))
    }

    fn random(&mut self, opcode: &RegisterConst) -> Result<ProgramCounterStep, ProcessError> {
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand = [0u8; 1];
        self.rng.fill_bytes(&mut rand);
        self.registers[opcode.x] = opcode.nn & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn draw(&mut self, opcode: &Sprite) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let x = usize::from(self.registers[opcode.x]);
        let y = usize::from(self.registers[opcode.y]);
        let height = opcode.n.min(MAX_SPRITE_HEIGHT);

        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        for (row, line) in sprite.iter_mut().take(height).enumerate() {
            *line = self.memory[self.indexed(row)];
        }

        let collision = self.display.draw(x, y, &sprite[..height]);
        self.registers[cpu::register::LAST] = collision as u8;

        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn key(&self, opcode: &Key) -> Result<ProgramCounterStep, ProcessError> {
        let pressed = self.keyboard.is_pressed(self.registers[opcode.x]);
        let step = match opcode.ops {
            KeyOp::Pressed => ProgramCounterStep::cond(pressed),
            KeyOp::NotPressed => ProgramCounterStep::cond(!pressed),
        };
        Ok(step)
    }

    fn misc(&mut self, opcode: &Misc) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let x = opcode.x;
        let mut op = Operation::None;

        match opcode.ops {
            MiscOp::GetDelayTimer => {
                self.registers[x] = self.delay_timer.get_value();
            }
            MiscOp::AwaitKeyPress => {
                // the counter already moved on, the key press only fills VX
                self.keyboard.await_key(x);
                op = Operation::Wait;
            }
            MiscOp::SetDelayTimer => {
                self.delay_timer.set_value(self.registers[x]);
            }
            MiscOp::SetSoundTimer => {
                self.sound_timer.set_value(self.registers[x]);
            }
            MiscOp::AddToIndex => {
                let sum = self.index_register + u16::from(self.registers[x]);
                self.index_register = sum & memory::ADDRESS_MASK;
                self.registers[cpu::register::LAST] = (sum > memory::ADDRESS_MASK) as u8;
            }
            MiscOp::FontSprite => {
                let digit = u16::from(self.registers[x] & 0x0F);
                self.index_register =
                    display::fontset::LOCATION + display::fontset::GLYPH_SIZE * digit;
            }
            MiscOp::StoreBcd => {
                let value = self.registers[x];
                let digits = [value / 100, value / 10 % 10, value % 10];
                for (offset, digit) in digits.iter().enumerate() {
                    let address = self.indexed(offset);
                    self.memory[address] = *digit;
                }
            }
            MiscOp::StoreRegisters => {
                for offset in 0..=x {
                    let address = self.indexed(offset);
                    self.memory[address] = self.registers[offset];
                }
            }
            MiscOp::LoadRegisters => {
                for offset in 0..=x {
                    let address = self.indexed(offset);
                    self.registers[offset] = self.memory[address];
                }
            }
        }
        Ok((ProgramCounterStep::Next, op))
    }
}
