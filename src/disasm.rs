use std::fmt::Write;

use crate::instruction::{Instruction, Mode};
use crate::table::OperationTable;
use crate::tape::{Tape, Word};

/// Pretty-print a linear-sweep disassembly of `tape`.
///
/// Each word is decoded as an instruction if its opcode is registered in
/// `table` and all of its parameters fit on the tape; anything else is
/// printed as data and the sweep moves on by one word. Since code and data
/// share the tape, data that happens to look like an instruction is shown
/// as one.
pub fn disassemble(tape: &Tape, table: &OperationTable) -> String {
    let mut out = String::new();
    let mut pc = 0;
    while pc < tape.len() {
        let (line, width) = render(tape.as_slice(), pc, table);
        let _ = writeln!(out, "{pc:04}: {line}");
        pc += width;
    }
    out
}

/// Render the single instruction at `address`, as used for execution traces.
pub fn describe(tape: &Tape, address: usize, table: &OperationTable) -> String {
    if address >= tape.len() {
        return "(past end of tape)".to_string();
    }
    render(tape.as_slice(), address, table).0
}

fn render(words: &[Word], pc: usize, table: &OperationTable) -> (String, usize) {
    match decode_at(words, pc, table) {
        Some(decoded) => decoded,
        None => (format!("{:<24}(data)", format!("[{}]", words[pc])), 1),
    }
}

fn decode_at(words: &[Word], pc: usize, table: &OperationTable) -> Option<(String, usize)> {
    let instr = Instruction::decode(words[pc]);
    let op = table.lookup(instr.opcode()?).ok()?;
    let arity = op.arity();
    let raw = words.get(pc..=pc + arity)?;

    let operands = raw[1..]
        .iter()
        .enumerate()
        .map(|(p, &value)| match instr.mode(p).ok()? {
            Mode::Position => Some(format!("*{value}")),
            Mode::Immediate => Some(format!("#{value}")),
        })
        .collect::<Option<Vec<_>>>()?;

    let bytes = raw
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let line = format!(
        "{:<24}{} {}",
        format!("[{bytes}]"),
        op.mnemonic(),
        operands.join(", ")
    );
    Some((line.trim_end().to_string(), arity + 1))
}
