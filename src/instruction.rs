use crate::error::{Error, Result};
use crate::tape::Word;

/// How an operand is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The operand is an address; its value lives on the tape.
    Position,
    /// The operand is the value itself.
    Immediate,
}

impl Mode {
    fn from_digit(digit: Word) -> Option<Self> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            _ => None,
        }
    }
}

/// A raw parameter as it sits on the tape, paired with its decoded mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    pub raw: Word,
    pub mode: Mode,
}

impl Param {
    pub fn position(raw: Word) -> Self {
        Self {
            raw,
            mode: Mode::Position,
        }
    }

    pub fn immediate(raw: Word) -> Self {
        Self {
            raw,
            mode: Mode::Immediate,
        }
    }
}

/// Decoded view of an instruction word.
///
/// The low two decimal digits are the opcode; every digit above them is
/// the mode of one parameter, least significant first. Digits that are not
/// written default to position mode, so `2` and `0002` decode the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    word: Word,
}

impl Instruction {
    pub fn decode(word: Word) -> Self {
        Self { word }
    }

    pub fn word(&self) -> Word {
        self.word
    }

    /// `None` for negative words, which never name an operation.
    pub fn opcode(&self) -> Option<Word> {
        (self.word >= 0).then_some(self.word % 100)
    }

    /// Raw mode digit for the parameter at `position` (0-based).
    pub fn mode_digit(&self, position: usize) -> Word {
        let mut rest = self.word / 100;
        for _ in 0..position {
            if rest == 0 {
                break;
            }
            rest /= 10;
        }
        rest % 10
    }

    /// Mode for the parameter at `position`.
    pub fn mode(&self, position: usize) -> Result<Mode> {
        let digit = self.mode_digit(position);
        Mode::from_digit(digit).ok_or(Error::UnknownMode {
            mode: digit,
            word: self.word,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn opcode_is_word_mod_100(word in 0i64..1_000_000_000) {
            prop_assert_eq!(Instruction::decode(word).opcode(), Some(word % 100));
        }

        #[test]
        fn mode_is_digit_p_plus_2(word in 0i64..1_000_000_000, p in 0usize..8) {
            let digits = word.to_string();
            let expected = digits
                .chars()
                .rev()
                .nth(p + 2)
                .map(|c| c.to_digit(10).unwrap() as Word)
                .unwrap_or(0);
            prop_assert_eq!(Instruction::decode(word).mode_digit(p), expected);
        }
    }
}
