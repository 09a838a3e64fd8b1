pub mod error;
pub mod tape;
pub mod instruction;
pub mod channel;
pub mod operation;
pub mod table;
pub mod interpreter;
pub mod disasm;

pub use error::{Error, Result};
pub use interpreter::{Interpreter, InterpreterConfig, State};
pub use table::OperationTable;
pub use tape::{Tape, Word};
