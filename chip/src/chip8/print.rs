//! The pretty print implementation for the [`ChipSet`](super::ChipSet), a debug dump of the
//! whole machine state. Split up into this file for smaller file sizes and higher cohesion.

use super::ChipSet;
use crate::{
    definitions::{cpu, keyboard},
    timer::Timed,
};
use std::fmt::{self, Write};

/// The amount of values printed per line, for the memory
/// these are 16-bit words.
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

/// Will add an indent to the line
fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

/// Removes the trailing line break, if any.
fn trim_line_end(text: &mut String) {
    if text.ends_with(END_OF_LINE) {
        text.pop();
    }
}

/// Handles all the printing of the pointer values.
mod pointer_print {
    use std::fmt::{self, Write};

    pub(super) fn formatter(line: &mut String, from: usize, to: usize) -> fmt::Result {
        write!(line, "{:#06X} - {:#06X} :", from, to)
    }
}

/// handles printting of any and all of intergers.
mod integer_print {
    use super::{indent_helper, pointer_print, trim_line_end, END_OF_LINE, HEX_PRINT_STEP};
    use num_traits::Unsigned;
    use std::fmt::{self, Write};

    /// will format a single integer
    pub(super) fn formatter<T>(line: &mut String, data: T) -> fmt::Result
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        write!(line, "{:#06X}", data)
    }

    /// will pretty print all the integer data given, eight values a line
    pub(super) fn printer<T>(data: &[T], indent: usize) -> Result<String, fmt::Error>
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        let mut res = String::new();
        for (chunk_index, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = chunk_index * HEX_PRINT_STEP;
            indent_helper(&mut res, indent);
            pointer_print::formatter(&mut res, from, from + chunk.len() - 1)?;

            for entry in chunk {
                res.push(' ');
                formatter(&mut res, *entry)?;
            }
            res.push(END_OF_LINE);
        }
        trim_line_end(&mut res);
        Ok(res)
    }
}

/// Handles the memory print, where long runs of zeros get folded into one line.
mod memory_print {
    use super::{
        indent_helper, integer_print, pointer_print, trim_line_end, END_OF_LINE, HEX_PRINT_STEP,
    };
    use crate::{definitions::memory, opcode};
    use once_cell::sync::Lazy;
    use std::fmt;

    /// The amount of bytes a single line covers
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE as usize;
    /// The values that are used when there are at least two rows of zeros.
    const FILLER_BASE: &str = "...";

    /// Prepares the line that will be used for rows of only zeros, it is as
    /// long as a full row of values.
    static ZERO_FILLER: Lazy<String> = Lazy::new(|| {
        let mut formatted = String::new();
        // writing into a string can not fail
        let _ = integer_print::formatter(&mut formatted, 0u16);

        let length =
            formatted.len() * (HEX_PRINT_STEP - 2) + (HEX_PRINT_STEP - 1) - FILLER_BASE.len();
        let filler = " ".repeat(length / 2);
        format!(
            "{}{}{}{}{}",
            formatted, filler, FILLER_BASE, filler, formatted
        )
    });

    /// A single row of words (only in this context)
    struct Row {
        from: usize,
        to: usize,
        data: Vec<u16>,
        only_null: bool,
    }

    impl Row {
        fn write(&self, res: &mut String) -> fmt::Result {
            pointer_print::formatter(res, self.from, self.to)?;
            res.push(' ');

            if self.only_null {
                res.push_str(&ZERO_FILLER);
                return Ok(());
            }

            for (index, entry) in self.data.iter().enumerate() {
                if index > 0 {
                    res.push(' ');
                }
                integer_print::formatter(res, *entry)?;
            }
            Ok(())
        }
    }

    /// will pretty print the content of the raw memory
    /// the offset is calculated from the beginning of the
    /// memory block
    pub(super) fn printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
        let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / POINTER_INCREMENT);

        for (chunk_index, chunk) in memory.chunks(POINTER_INCREMENT).enumerate() {
            let from = chunk_index * POINTER_INCREMENT;
            let to = from + chunk.len() - 1;

            let data: Vec<u16> = (0..chunk.len())
                .step_by(memory::opcodes::SIZE as usize)
                .map(|index| {
                    // an odd trailing byte is shown as the high byte
                    opcode::build_opcode(chunk, index).unwrap_or(u16::from(chunk[index]) << 8)
                })
                .collect();
            let only_null = data.iter().all(|word| *word == 0);

            match rows.last_mut() {
                Some(last) if only_null && last.only_null => last.to = to,
                _ => rows.push(Row {
                    from,
                    to,
                    data,
                    only_null,
                }),
            }
        }

        let mut res = String::new();
        for row in rows {
            indent_helper(&mut res, indent);
            row.write(&mut res)?;
            res.push(END_OF_LINE);
        }
        trim_line_end(&mut res);
        Ok(res)
    }
}

/// Handles the keyboard print, laid out like the hex keypad.
mod keyboard_print {
    use super::{indent_helper, keyboard, trim_line_end, END_OF_LINE};
    use std::fmt::{self, Write};

    /// Pressed keys show their hex digit, released ones a dot.
    pub(super) fn printer(keys: &[bool], indent: usize) -> Result<String, fmt::Error> {
        let mut res = String::new();
        for row in keyboard::LAYOUT.iter() {
            indent_helper(&mut res, indent);
            for (index, key) in row.iter().enumerate() {
                if index > 0 {
                    res.push(' ');
                }
                if keys[*key] {
                    write!(res, "{:X}", key)?;
                } else {
                    res.push('.');
                }
            }
            res.push(END_OF_LINE);
        }
        trim_line_end(&mut res);
        Ok(res)
    }
}

/// Formats a single value on its own indented line.
fn single<T>(value: T) -> Result<String, fmt::Error>
where
    T: fmt::UpperHex + num_traits::Unsigned + Copy,
{
    let mut res = String::new();
    indent_helper(&mut res, INDENT_SIZE);
    integer_print::formatter(&mut res, value)?;
    Ok(res)
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lod = String::new();
        indent_helper(&mut lod, INDENT_SIZE);
        write!(lod, "{}", self.loaded)?;

        let opc = single(self.opcode)?;
        let prc = single(self.program_counter)?;
        let idx = single(self.index_register)?;

        let mut tim = String::new();
        indent_helper(&mut tim, INDENT_SIZE);
        integer_print::formatter(&mut tim, self.delay_timer.get_value())?;
        tim.push(' ');
        integer_print::formatter(&mut tim, self.sound_timer.get_value())?;

        let mem = memory_print::printer(&self.memory, INDENT_SIZE)?;
        let key = keyboard_print::printer(self.keyboard.get_keys(), INDENT_SIZE)?;

        // handle stack specially as it needes to be filled up if empty
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..self.stack.len()].copy_from_slice(&self.stack);
        let sta = integer_print::printer(&stack, INDENT_SIZE)?;

        let reg = integer_print::printer(&self.registers, INDENT_SIZE)?;

        write!(
            f,
            "ChipSet {{\n\
                \tLoaded :\n{}\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex Register :\n{}\n\
                \tTimers :\n{}\n\
                \tMemory :\n{}\n\
                \tKeyboard :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                }}",
            lod, opc, prc, idx, tim, mem, key, sta, reg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests;

    const OUTPUT_PRINT: &str = "\
        ChipSet {\n\
            \tLoaded :\n\
                \t\ttrue\n\
            \tOpcode :\n\
                \t\t0x0000\n\
            \tProgram Counter :\n\
                \t\t0x0200\n\
            \tIndex Register :\n\
                \t\t0x0000\n\
            \tTimers :\n\
                \t\t0x0000 0x0000\n\
            \tMemory :\n\
                \t\t0x0000 - 0x000F : 0xF090 0x9090 0xF020 0x6020 0x2070 0xF010 0xF080 0xF0F0\n\
                \t\t0x0010 - 0x001F : 0x10F0 0x10F0 0x9090 0xF010 0x10F0 0x80F0 0x10F0 0xF080\n\
                \t\t0x0020 - 0x002F : 0xF090 0xF0F0 0x1020 0x4040 0xF090 0xF090 0xF0F0 0x90F0\n\
                \t\t0x0030 - 0x003F : 0x10F0 0xF090 0xF090 0x90E0 0x90E0 0x90E0 0xF080 0x8080\n\
                \t\t0x0040 - 0x004F : 0xF0E0 0x9090 0x90E0 0xF080 0xF080 0xF0F0 0x80F0 0x8080\n\
                \t\t0x0050 - 0x01FF : 0x0000                    ...                    0x0000\n\
                \t\t0x0200 - 0x020F : 0x00E0 0x6A05 0xA000 0xDAB5 0x1208 0x0000 0x0000 0x0000\n\
                \t\t0x0210 - 0x0FFF : 0x0000                    ...                    0x0000\n\
            \tKeyboard :\n\
                \t\t1 . 3 .\n\
                \t\t. 5 . D\n\
                \t\t7 . 9 .\n\
                \t\t. . B F\n\
            \tStack :\n\
                \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
                \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
            \tRegister :\n\
                \t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
                \t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000\n\
        }";

    #[test]
    /// tests if the pretty print output is as expected
    fn test_full_print() {
        let mut chip = tests::setup_chip(&[
            0x00, 0xE0, 0x6A, 0x05, 0xA0, 0x00, 0xDA, 0xB5, 0x12, 0x08,
        ]);

        for key in 0..16 {
            chip.set_key_state(key, key % 2 != 0);
        }

        let actual_full = format!("{}", chip);
        let actual = actual_full.split('\n');
        let expected = OUTPUT_PRINT.split('\n');

        for (exp, act) in expected.zip(actual) {
            assert_eq!(exp, act);
        }
        assert_eq!(OUTPUT_PRINT.lines().count(), actual_full.lines().count());
    }
}
