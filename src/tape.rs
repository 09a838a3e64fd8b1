use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single tape cell. Instructions, operands and channel values all share it.
pub type Word = i64;

/// Default separator between words in program text.
pub const DELIMITER: char = ',';

/// The intcode memory: program and data in one flat, mutable address space.
///
/// Every access is bounds-checked. Addresses are `Word`s because operands
/// are read straight off the tape, so a negative operand is an ordinary
/// out-of-bounds address rather than a conversion bug.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tape {
    words: Vec<Word>,
}

impl Tape {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Parse comma-separated program text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, DELIMITER)
    }

    /// Parse program text split on `delimiter`.
    ///
    /// Whitespace around each token is ignored so that files with a
    /// trailing newline load cleanly. Blank text is an empty tape.
    pub fn parse_with(text: &str, delimiter: char) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let words = text
            .split(delimiter)
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token.parse::<Word>().map_err(|_| Error::MalformedProgram {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    pub fn into_inner(self) -> Vec<Word> {
        self.words
    }

    /// Convert a word into a valid index, or report it as out of bounds.
    pub fn index(&self, address: Word) -> Result<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.words.len())
            .ok_or(Error::OutOfBounds {
                address,
                len: self.words.len(),
            })
    }

    pub fn read(&self, address: Word) -> Result<Word> {
        let i = self.index(address)?;
        Ok(self.words[i])
    }

    pub fn write(&mut self, address: Word, value: Word) -> Result<()> {
        let i = self.index(address)?;
        self.words[i] = value;
        Ok(())
    }

    /// Read the word at an already-known index (the counter, or a slot after it).
    pub fn fetch(&self, index: usize) -> Result<Word> {
        self.words.get(index).copied().ok_or(Error::OutOfBounds {
            address: Word::try_from(index).unwrap_or(Word::MAX),
            len: self.words.len(),
        })
    }
}

impl From<Vec<Word>> for Tape {
    fn from(words: Vec<Word>) -> Self {
        Self::new(words)
    }
}

impl FromStr for Tape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, "{DELIMITER}")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}
