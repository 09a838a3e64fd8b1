use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::tape::Word;

/// Where opcode 3 gets its values from.
pub trait InputChannel {
    /// Produce the next value, blocking if the source needs to.
    fn read(&mut self) -> Result<Word>;

    /// Produce the next value if one is available right now.
    ///
    /// Used by operations that prefer to suspend the interpreter over
    /// blocking. Sources that always block just defer to `read`.
    fn try_read(&mut self) -> Result<Option<Word>> {
        self.read().map(Some)
    }
}

/// Where opcode 4 sends its values.
pub trait OutputChannel {
    fn write(&mut self, value: Word) -> Result<()>;
}

/// Interactive terminal I/O: prompts on stderr and reads one line from stdin
/// per input, prints one line per output on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl InputChannel for Console {
    fn read(&mut self) -> Result<Word> {
        let mut stderr = io::stderr();
        write!(stderr, "> ")?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(Error::InputExhausted);
        }
        let token = line.trim();
        token
            .parse()
            .map_err(|_| Error::MalformedInput(token.to_string()))
    }
}

impl OutputChannel for Console {
    fn write(&mut self, value: Word) -> Result<()> {
        writeln!(io::stdout(), "{value}")?;
        Ok(())
    }
}

/// A fixed queue of inputs, consumed front to back.
///
/// More values may be pushed at any time, e.g. while the interpreter is
/// suspended waiting for them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scripted {
    queue: VecDeque<Word>,
}

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = Word>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: Word) {
        self.queue.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl<const N: usize> From<[Word; N]> for Scripted {
    fn from(values: [Word; N]) -> Self {
        Self::new(values)
    }
}

impl InputChannel for Scripted {
    fn read(&mut self) -> Result<Word> {
        self.queue.pop_front().ok_or(Error::InputExhausted)
    }

    fn try_read(&mut self) -> Result<Option<Word>> {
        Ok(self.queue.pop_front())
    }
}

/// Collects every output in order.
impl OutputChannel for Vec<Word> {
    fn write(&mut self, value: Word) -> Result<()> {
        self.push(value);
        Ok(())
    }
}
