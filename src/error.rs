use thiserror::Error;

use crate::tape::Word;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a program from loading or running.
///
/// None of these are retried internally: the run loop stops at the
/// faulting instruction and hands the error to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown opcode {0}")]
    UnknownOpcode(Word),
    #[error("unknown parameter mode {mode} in instruction {word}")]
    UnknownMode { mode: Word, word: Word },
    #[error("address {address} is outside the tape (length {len})")]
    OutOfBounds { address: Word, len: usize },
    #[error("cannot write through immediate-mode parameter {0}")]
    InvalidWriteTarget(Word),
    #[error("malformed program: token {index} ({token:?}) is not an integer")]
    MalformedProgram { index: usize, token: String },
    #[error("malformed input {0:?}")]
    MalformedInput(String),
    #[error("input channel exhausted")]
    InputExhausted,
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
