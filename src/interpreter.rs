use crate::channel::{Console, InputChannel, OutputChannel};
use crate::error::{Error, Result};
use crate::instruction::{Instruction, Param};
use crate::operation::{Context, ControlSignal};
use crate::table::OperationTable;
use crate::tape::{Tape, Word};

/// Where the interpreter is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Running,
    /// Terminal. Further runs do nothing.
    Halted,
    /// Paused by an operation. The next run resumes at the same counter.
    Suspended,
}

/// Knobs for a single interpreter.
#[derive(Clone, Debug, Default)]
pub struct InterpreterConfig {
    /// Maximum instructions executed over the interpreter's lifetime,
    /// resumed runs included. `None` for no limit.
    pub step_limit: Option<usize>,
}

/// Fetch-decode-dispatch loop over one tape.
///
/// The interpreter owns the tape, the counter and both I/O channels.
/// Operations only see them through a [`Context`] for the length of one
/// dispatch. If an instruction fails, the counter is left on it and the
/// error is returned.
pub struct Interpreter<I = Console, O = Console> {
    tape: Tape,
    counter: usize,
    state: State,
    table: OperationTable,
    input: I,
    output: O,
    config: InterpreterConfig,
    steps: usize,
}

impl Interpreter {
    /// Parse `program` and set it up with the default table and console I/O.
    pub fn new(program: &str) -> Result<Self> {
        Ok(Self::from_tape(Tape::parse(program)?))
    }

    pub fn from_tape(tape: Tape) -> Self {
        Self::with_channels(tape, OperationTable::default(), Console, Console)
    }

    pub fn with_table(program: &str, table: OperationTable) -> Result<Self> {
        Ok(Self::with_channels(
            Tape::parse(program)?,
            table,
            Console,
            Console,
        ))
    }
}

impl<I: InputChannel, O: OutputChannel> Interpreter<I, O> {
    pub fn with_channels(tape: Tape, table: OperationTable, input: I, output: O) -> Self {
        Self {
            tape,
            counter: 0,
            state: State::Uninitialized,
            table,
            input,
            output,
            config: InterpreterConfig::default(),
            steps: 0,
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until the program halts or an operation suspends it.
    ///
    /// Calling this on a halted interpreter is a no-op; on a suspended one it
    /// picks up where the last run stopped.
    pub fn run(&mut self) -> Result<&mut Self> {
        if self.state == State::Halted {
            return Ok(self);
        }
        self.state = State::Running;
        while self.state == State::Running {
            self.step()?;
        }
        Ok(self)
    }

    /// Execute a single instruction and return the resulting state.
    pub fn step(&mut self) -> Result<State> {
        match self.state {
            State::Halted => return Ok(State::Halted),
            State::Uninitialized | State::Suspended => self.state = State::Running,
            State::Running => {}
        }
        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(Error::StepLimitExceeded(limit));
            }
        }

        let counter = self.counter;
        let instr = Instruction::decode(self.tape.fetch(counter)?);
        let opcode = instr.opcode().ok_or(Error::UnknownOpcode(instr.word()))?;
        let arity = self.table.lookup(opcode)?.arity();
        let params = fetch_params(&self.tape, counter, instr, arity)?;

        let op = self.table.lookup_mut(opcode)?;
        let mut ctx = Context::new(&mut self.tape, counter, &mut self.input, &mut self.output);
        let signal = op.execute(&params, &mut ctx)?;
        self.steps += 1;

        match signal {
            ControlSignal::Advance(n) => self.counter = counter + 1 + n,
            ControlSignal::Jump(address) => self.counter = address,
            ControlSignal::Halt => self.state = State::Halted,
            ControlSignal::Suspend => self.state = State::Suspended,
        }
        Ok(self.state)
    }

    /// The word at address 0, where finished programs leave their answer.
    pub fn result(&self) -> Result<Word> {
        self.tape.read(0)
    }

    /// The word at the last address.
    pub fn read_last(&self) -> Result<Word> {
        let last = self
            .tape
            .len()
            .checked_sub(1)
            .ok_or(Error::OutOfBounds { address: 0, len: 0 })?;
        self.tape.fetch(last)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn is_uninitialized(&self) -> bool {
        self.state == State::Uninitialized
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    pub fn is_suspended(&self) -> bool {
        self.state == State::Suspended
    }
}

/// Read the `arity` words after `counter` and pair each with its mode.
fn fetch_params(tape: &Tape, counter: usize, instr: Instruction, arity: usize) -> Result<Vec<Param>> {
    (0..arity)
        .map(|p| {
            Ok(Param {
                raw: tape.fetch(counter + 1 + p)?,
                mode: instr.mode(p)?,
            })
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::channel::Scripted;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics(
            words in prop::collection::vec(-200i64..2000, 0..64),
            inputs in prop::collection::vec(any::<i32>(), 0..8),
        ) {
            let mut vm = Interpreter::with_channels(
                Tape::new(words.clone()),
                OperationTable::default(),
                Scripted::new(inputs.into_iter().map(Word::from)),
                Vec::new(),
            )
            .with_config(InterpreterConfig { step_limit: Some(1000) });
            let _ = vm.run();
            prop_assert_eq!(vm.tape().len(), words.len());
            prop_assert!(vm.steps() <= 1000);
        }

        #[test]
        fn halted_runs_are_idempotent(a in -1000i64..1000, b in -1000i64..1000) {
            let program = format!("1101,{a},{b},0,99");
            let mut vm = Interpreter::new(&program).unwrap();
            vm.run().unwrap();
            prop_assert_eq!(vm.result().unwrap(), a + b);
            let before = vm.tape().clone();
            vm.run().unwrap();
            prop_assert_eq!(vm.tape(), &before);
            prop_assert!(vm.is_halted());
        }

        #[test]
        fn jumps_leave_tape_alone(cond in -3i64..3, target in 0i64..6, jump_if_true in any::<bool>()) {
            let opcode = if jump_if_true { 1105 } else { 1106 };
            let words = vec![opcode, cond, target, 99, 99, 99];
            let mut vm = Interpreter::from_tape(Tape::new(words.clone()));
            vm.step().unwrap();
            let taken = (cond != 0) == jump_if_true;
            let expected = if taken { target as usize } else { 3 };
            prop_assert_eq!(vm.counter(), expected);
            prop_assert_eq!(vm.tape().as_slice(), &words[..]);
        }
    }
}
