use crate::channel::{InputChannel, OutputChannel};
use crate::error::{Error, Result};
use crate::instruction::{Mode, Param};
use crate::tape::{Tape, Word};

/// What the interpreter should do once an operation has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSignal {
    /// Move the counter past the opcode and this many parameters.
    Advance(usize),
    /// Continue at an explicit address.
    Jump(usize),
    /// Stop for good.
    Halt,
    /// Stop without moving the counter; a later run resumes here.
    Suspend,
}

/// The slice of interpreter state an operation may touch during one dispatch.
pub struct Context<'a> {
    tape: &'a mut Tape,
    counter: usize,
    input: &'a mut dyn InputChannel,
    output: &'a mut dyn OutputChannel,
}

impl<'a> Context<'a> {
    pub fn new(
        tape: &'a mut Tape,
        counter: usize,
        input: &'a mut dyn InputChannel,
        output: &'a mut dyn OutputChannel,
    ) -> Self {
        Self {
            tape,
            counter,
            input,
            output,
        }
    }

    /// Address of the instruction being executed.
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn tape(&self) -> &Tape {
        self.tape
    }

    /// Resolve a parameter through its addressing mode.
    pub fn value(&self, param: Param) -> Result<Word> {
        match param.mode {
            Mode::Position => self.tape.read(param.raw),
            Mode::Immediate => Ok(param.raw),
        }
    }

    /// Store `value` at the address named by a position-mode parameter.
    pub fn write(&mut self, param: Param, value: Word) -> Result<()> {
        match param.mode {
            Mode::Position => self.tape.write(param.raw, value),
            Mode::Immediate => Err(Error::InvalidWriteTarget(param.raw)),
        }
    }

    /// Validate a jump target.
    pub fn address(&self, target: Word) -> Result<usize> {
        self.tape.index(target)
    }

    pub fn input(&mut self) -> &mut dyn InputChannel {
        &mut *self.input
    }

    pub fn output(&mut self) -> &mut dyn OutputChannel {
        &mut *self.output
    }
}

/// Behaviour bound to an opcode.
///
/// The interpreter reads exactly `arity()` parameters after the opcode and
/// passes them, with their decoded modes, to `execute`.
pub trait Operation {
    fn arity(&self) -> usize;

    fn execute(&mut self, params: &[Param], ctx: &mut Context<'_>) -> Result<ControlSignal>;

    /// Short name used by the disassembler.
    fn mnemonic(&self) -> &str {
        "op"
    }
}

/// The default instruction set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Multiply,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    Halt,
}

impl Builtin {
    pub const ALL: [Builtin; 9] = [
        Builtin::Add,
        Builtin::Multiply,
        Builtin::Input,
        Builtin::Output,
        Builtin::JumpIfTrue,
        Builtin::JumpIfFalse,
        Builtin::LessThan,
        Builtin::Equals,
        Builtin::Halt,
    ];

    pub fn opcode(self) -> Word {
        match self {
            Builtin::Add => 1,
            Builtin::Multiply => 2,
            Builtin::Input => 3,
            Builtin::Output => 4,
            Builtin::JumpIfTrue => 5,
            Builtin::JumpIfFalse => 6,
            Builtin::LessThan => 7,
            Builtin::Equals => 8,
            Builtin::Halt => 99,
        }
    }

    pub fn from_opcode(opcode: Word) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.opcode() == opcode)
    }
}

impl Operation for Builtin {
    fn arity(&self) -> usize {
        match self {
            Builtin::Add | Builtin::Multiply | Builtin::LessThan | Builtin::Equals => 3,
            Builtin::JumpIfTrue | Builtin::JumpIfFalse => 2,
            Builtin::Input | Builtin::Output => 1,
            Builtin::Halt => 0,
        }
    }

    fn execute(&mut self, params: &[Param], ctx: &mut Context<'_>) -> Result<ControlSignal> {
        let advance = ControlSignal::Advance(params.len());
        match self {
            Builtin::Add => {
                let a = ctx.value(params[0])?;
                let b = ctx.value(params[1])?;
                let sum = a.checked_add(b).ok_or(Error::ArithmeticOverflow("add"))?;
                ctx.write(params[2], sum)?;
                Ok(advance)
            }
            Builtin::Multiply => {
                let a = ctx.value(params[0])?;
                let b = ctx.value(params[1])?;
                let product = a
                    .checked_mul(b)
                    .ok_or(Error::ArithmeticOverflow("multiply"))?;
                ctx.write(params[2], product)?;
                Ok(advance)
            }
            Builtin::Input => {
                let value = ctx.input().read()?;
                ctx.write(params[0], value)?;
                Ok(advance)
            }
            Builtin::Output => {
                let value = ctx.value(params[0])?;
                ctx.output().write(value)?;
                Ok(advance)
            }
            Builtin::JumpIfTrue | Builtin::JumpIfFalse => {
                let cond = ctx.value(params[0])? != 0;
                if cond == (*self == Builtin::JumpIfTrue) {
                    let target = ctx.value(params[1])?;
                    Ok(ControlSignal::Jump(ctx.address(target)?))
                } else {
                    Ok(advance)
                }
            }
            Builtin::LessThan => {
                let a = ctx.value(params[0])?;
                let b = ctx.value(params[1])?;
                ctx.write(params[2], Word::from(a < b))?;
                Ok(advance)
            }
            Builtin::Equals => {
                let a = ctx.value(params[0])?;
                let b = ctx.value(params[1])?;
                ctx.write(params[2], Word::from(a == b))?;
                Ok(advance)
            }
            Builtin::Halt => Ok(ControlSignal::Halt),
        }
    }

    fn mnemonic(&self) -> &str {
        match self {
            Builtin::Add => "add",
            Builtin::Multiply => "mul",
            Builtin::Input => "in",
            Builtin::Output => "out",
            Builtin::JumpIfTrue => "jnz",
            Builtin::JumpIfFalse => "jz",
            Builtin::LessThan => "lt",
            Builtin::Equals => "eq",
            Builtin::Halt => "halt",
        }
    }
}

/// Non-blocking input for opcode 3.
///
/// Takes a value from the input channel if one is ready; otherwise asks the
/// interpreter to suspend on this instruction so the host can supply more
/// input and run again.
#[derive(Clone, Copy, Debug, Default)]
pub struct AwaitInput;

impl Operation for AwaitInput {
    fn arity(&self) -> usize {
        1
    }

    fn execute(&mut self, params: &[Param], ctx: &mut Context<'_>) -> Result<ControlSignal> {
        match ctx.input().try_read()? {
            Some(value) => {
                ctx.write(params[0], value)?;
                Ok(ControlSignal::Advance(1))
            }
            None => Ok(ControlSignal::Suspend),
        }
    }

    fn mnemonic(&self) -> &str {
        "in?"
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::channel::Scripted;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arithmetic_only_touches_write_target(
            words in prop::collection::vec(-1000i64..1000, 4..32),
            a in 0usize..4,
            b in 0usize..4,
            c in 0usize..4,
            which in 0usize..4,
        ) {
            let op = [Builtin::Add, Builtin::Multiply, Builtin::LessThan, Builtin::Equals][which];
            let mut tape = Tape::new(words.clone());
            let params = [
                Param::position(a as Word),
                Param::position(b as Word),
                Param::position(c as Word),
            ];
            let mut input = Scripted::default();
            let mut output: Vec<Word> = Vec::new();
            let mut ctx = Context::new(&mut tape, 0, &mut input, &mut output);
            let mut op = op;
            op.execute(&params, &mut ctx).unwrap();
            for (i, (&before, &after)) in words.iter().zip(tape.as_slice()).enumerate() {
                if i != c {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }
}
