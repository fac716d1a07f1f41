use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use minijs::{
    ast::ast::{Program, Stmt},
    config::{InterpreterConfig, DEFAULT_MAX_CALL_DEPTH},
    errors::errors::{Error, ErrorKind},
    evaluator::evaluator::Interpreter,
    format_error, init_tracing,
    lexer::lexer::tokenize,
    parser::parser::parse,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;

const EXIT_SYNTAX: u8 = 65;
const EXIT_RUNTIME: u8 = 70;

/// Run a minijs script, inline source, or an interactive shell.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run. Starts the REPL when omitted.
    path: Option<PathBuf>,

    /// Run this source instead of a file
    #[arg(short, long, conflicts_with = "path")]
    eval: Option<String>,

    /// Print the token stream before running
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program before running
    #[arg(long)]
    ast: bool,

    /// Maximum depth of nested function calls
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Stop after this many executed statements
    #[arg(long)]
    step_limit: Option<u64>,
}

impl Args {
    fn config(&self, file_name: &str) -> InterpreterConfig {
        InterpreterConfig::default()
            .with_max_call_depth(self.max_call_depth)
            .with_step_limit(self.step_limit)
            .with_file_name(file_name)
    }
}

fn exit_code(error: &Error) -> u8 {
    match error.kind() {
        ErrorKind::Lex | ErrorKind::Parse => EXIT_SYNTAX,
        ErrorKind::Runtime => EXIT_RUNTIME,
    }
}

/// Lexes and parses `source`, dumping tokens or the tree when asked.
fn front_end(source: &str, file: Rc<String>, args: &Args) -> Result<Program, Error> {
    let start = Instant::now();
    let tokens = tokenize(source, Rc::clone(&file))?;
    debug!(elapsed = ?start.elapsed(), "tokenized");

    if args.tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let parse_start = Instant::now();
    let program = parse(tokens, file)?;
    debug!(elapsed = ?parse_start.elapsed(), "parsed");

    if args.ast {
        println!("{:#?}", program.body);
    }

    Ok(program)
}

fn run_script(source: &str, file_name: &str, args: &Args) -> ExitCode {
    let mut interpreter = Interpreter::with_config(args.config(file_name));
    let file = Rc::clone(&interpreter.config().file_name);

    let start = Instant::now();
    let result = front_end(source, file, args).and_then(|program| interpreter.run(&program));
    debug!(elapsed = ?start.elapsed(), "total");

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprint!("{}", format_error(&error, source));
            ExitCode::from(exit_code(&error))
        }
    }
}

/// Runs one REPL line. A lone expression statement has its value echoed.
fn eval_line(interpreter: &mut Interpreter, line: &str, args: &Args) -> Result<(), Error> {
    let file = Rc::clone(&interpreter.config().file_name);
    let program = front_end(line, file, args)?;

    if let [Stmt::Expression(statement)] = program.body.as_slice() {
        let value = interpreter.eval_expression(&statement.expression)?;
        println!("{}", value.to_display());
        return Ok(());
    }

    interpreter.run(&program)?;
    Ok(())
}

fn repl(args: &Args) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::with_config(args.config("shell"));
    let mut interrupted_once = false;

    println!("Welcome to minijs {}", env!("CARGO_PKG_VERSION"));

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                interrupted_once = false;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ".exit" {
                    break;
                }
                let _ = editor.add_history_entry(trimmed);

                let line = if trimmed.ends_with(';') {
                    trimmed.to_string()
                } else {
                    format!("{};", trimmed)
                };

                if let Err(error) = eval_line(&mut interpreter, &line, args) {
                    eprint!("{}", format_error(&error, &line));
                }
            }
            Err(ReadlineError::Interrupted) => {
                if interrupted_once {
                    break;
                }
                println!("(To exit, press Ctrl+C again or Ctrl+D or type .exit)");
                interrupted_once = true;
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {:?}", error);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if let Some(source) = &args.eval {
        return run_script(source, "eval", &args);
    }

    let Some(path) = &args.path else {
        return repl(&args);
    };

    let source = match read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", path.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    run_script(&source, &file_name, &args)
}
