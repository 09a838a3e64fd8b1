use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::operation::{Builtin, Operation};
use crate::tape::Word;

/// Opcode to operation mapping.
///
/// Starts from the nine built-in operations; any entry can be replaced and
/// new opcodes added. There is no fallback: an opcode that is not in the
/// table does not execute.
pub struct OperationTable {
    ops: BTreeMap<Word, Box<dyn Operation>>,
}

impl OperationTable {
    /// The default set with `overrides` applied on top, in order.
    pub fn new(overrides: impl IntoIterator<Item = (Word, Box<dyn Operation>)>) -> Self {
        let mut table = Self::default();
        for (opcode, op) in overrides {
            table.override_with(opcode, op);
        }
        table
    }

    /// A table with nothing registered.
    pub fn empty() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Replace (or add) the operation for `opcode`. Returns the previous one.
    pub fn override_with(
        &mut self,
        opcode: Word,
        op: Box<dyn Operation>,
    ) -> Option<Box<dyn Operation>> {
        self.ops.insert(opcode, op)
    }

    /// Builder form of [`override_with`](Self::override_with).
    pub fn with(mut self, opcode: Word, op: impl Operation + 'static) -> Self {
        self.override_with(opcode, Box::new(op));
        self
    }

    pub fn lookup(&self, opcode: Word) -> Result<&dyn Operation> {
        self.ops
            .get(&opcode)
            .map(|op| &**op)
            .ok_or(Error::UnknownOpcode(opcode))
    }

    pub fn lookup_mut(&mut self, opcode: Word) -> Result<&mut (dyn Operation + 'static)> {
        self.ops
            .get_mut(&opcode)
            .map(|op| &mut **op)
            .ok_or(Error::UnknownOpcode(opcode))
    }

    pub fn contains(&self, opcode: Word) -> bool {
        self.ops.contains_key(&opcode)
    }

    /// Registered opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = Word> + '_ {
        self.ops.keys().copied()
    }
}

impl Default for OperationTable {
    fn default() -> Self {
        let ops = Builtin::ALL
            .into_iter()
            .map(|b| (b.opcode(), Box::new(b) as Box<dyn Operation>))
            .collect();
        Self { ops }
    }
}

impl std::fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.ops.iter().map(|(opcode, op)| (opcode, op.mnemonic())))
            .finish()
    }
}
