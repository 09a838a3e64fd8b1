use std::path::PathBuf;

use clap::Parser;
use intcode::channel::{Console, InputChannel, OutputChannel, Scripted};
use intcode::disasm;
use intcode::{Interpreter, InterpreterConfig, OperationTable, State, Tape, Word};

#[derive(Parser)]
#[command(name = "intcode", about = "Intcode interpreter")]
struct Cli {
    /// Program file to run.
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    program: Option<PathBuf>,

    /// Program text given inline instead of a file.
    #[arg(long)]
    text: Option<String>,

    /// Separator between words in the program text.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Scripted input value (repeatable). Without any, input is read from the terminal.
    #[arg(long = "input", allow_negative_numbers = true)]
    inputs: Vec<Word>,

    /// Max instructions to execute before giving up.
    #[arg(long)]
    step_limit: Option<usize>,

    /// Print a disassembly of the program and exit.
    #[arg(long)]
    disassemble: bool,

    /// Print each instruction to stderr as it executes.
    #[arg(long)]
    trace: bool,

    /// Print the final tape after the run.
    #[arg(long)]
    dump: bool,
}

fn load(cli: &Cli) -> Result<String, String> {
    match (&cli.text, &cli.program) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {e}", path.display())),
        (None, None) => Err("No program given".to_string()),
    }
}

fn main() {
    let cli = Cli::parse();

    let text = match load(&cli) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let tape = match Tape::parse_with(&text, cli.delimiter) {
        Ok(tape) => tape,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if cli.disassemble {
        print!("{}", disasm::disassemble(&tape, &OperationTable::default()));
        return;
    }

    let config = InterpreterConfig {
        step_limit: cli.step_limit,
    };
    if cli.inputs.is_empty() {
        let vm = Interpreter::with_channels(tape, OperationTable::default(), Console, Console);
        execute(vm.with_config(config), &cli);
    } else {
        let input = Scripted::new(cli.inputs.iter().copied());
        let vm = Interpreter::with_channels(tape, OperationTable::default(), input, Console);
        execute(vm.with_config(config), &cli);
    }
}

fn execute<I: InputChannel, O: OutputChannel>(mut vm: Interpreter<I, O>, cli: &Cli) {
    let start = std::time::Instant::now();
    let outcome = if cli.trace {
        trace(&mut vm)
    } else {
        vm.run().map(|_| ())
    };
    let elapsed = start.elapsed();

    if let Err(e) = outcome {
        eprintln!("Error at address {}: {e}", vm.counter());
        std::process::exit(1);
    }

    match vm.state() {
        State::Halted => {
            eprintln!("Halted after {} steps in {elapsed:.2?}", vm.steps());
            match vm.result() {
                Ok(result) => println!("{result}"),
                Err(e) => eprintln!("No result: {e}"),
            }
        }
        State::Suspended => {
            eprintln!("Suspended at address {} after {} steps", vm.counter(), vm.steps());
        }
        State::Uninitialized | State::Running => {}
    }

    if cli.dump {
        println!("{}", vm.tape());
    }
}

fn trace<I: InputChannel, O: OutputChannel>(vm: &mut Interpreter<I, O>) -> intcode::Result<()> {
    loop {
        eprintln!(
            "{:04}: {}",
            vm.counter(),
            disasm::describe(vm.tape(), vm.counter(), vm.table())
        );
        match vm.step()? {
            State::Halted | State::Suspended => return Ok(()),
            State::Uninitialized | State::Running => {}
        }
    }
}
