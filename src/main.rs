//! CLI tool to tokenize, parse, and evaluate SupplyScript sources.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser as ClapParser, Subcommand, ValueEnum};
use supplyscript::{Mode, RunConfig, RunResult, format_tokens, run, run_file};

#[derive(ClapParser, Debug)]
#[command(name = "supp", version, about = "SupplyScript lexer and expression parser")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the token table of each input
    Lex(Inputs),
    /// Print the expression tree of each input
    Parse(Inputs),
    /// Evaluate each input as an arithmetic expression
    Eval(Inputs),
    /// Read lines from standard input and run each one
    Repl {
        /// Pipeline stage to run on every line
        #[arg(short, long, value_enum, default_value_t = ReplMode::Lex)]
        mode: ReplMode,
    },
}

#[derive(ClapArgs, Debug)]
struct Inputs {
    /// `.supp` files to process
    files: Vec<String>,
    /// Inline source code instead of files
    #[arg(short, long)]
    expr: Option<String>,
    /// Accept files without the `.supp` extension
    #[arg(long)]
    no_ext_check: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ReplMode {
    Lex,
    Parse,
    Eval,
}

impl From<ReplMode> for Mode {
    fn from(mode: ReplMode) -> Self {
        match mode {
            ReplMode::Lex => Self::Lex,
            ReplMode::Parse => Self::Parse,
            ReplMode::Eval => Self::Eval,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Lex(inputs) => process(&inputs, Mode::Lex),
        Commands::Parse(inputs) => process(&inputs, Mode::Parse),
        Commands::Eval(inputs) => process(&inputs, Mode::Eval),
        Commands::Repl { mode } => repl(mode.into()),
    }
}

fn process(inputs: &Inputs, mode: Mode) -> ExitCode {
    if inputs.files.is_empty() && inputs.expr.is_none() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    if let Some(code) = &inputs.expr {
        had_error |= !report(&run(code, mode), mode);
    }

    let config = RunConfig {
        mode,
        check_extension: !inputs.no_ext_check,
    };

    for path in &inputs.files {
        match run_file(path, &config) {
            Ok(result) => {
                if inputs.files.len() > 1 {
                    println!("==> {path}");
                }
                had_error |= !report(&result, mode);
            }
            Err(e) => {
                eprintln!("{e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print a run's output or its error. Returns `false` on error.
fn report(result: &RunResult, mode: Mode) -> bool {
    if let Some(err) = &result.error {
        eprintln!("Error: {err}");
        if let Some(context) = err.context() {
            eprintln!("{context}");
        }
        return false;
    }

    match mode {
        Mode::Lex => print!("{}", format_tokens(&result.tokens)),
        Mode::Parse => {
            if let Some(ast) = &result.ast {
                println!("{ast}");
            }
        }
        Mode::Eval => {
            if let Some(value) = result.value {
                println!("{value}");
            }
        }
    }
    true
}

fn repl(mode: Mode) -> ExitCode {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("supp > ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        match lines.next() {
            Some(Ok(line)) => {
                report(&run(&line, mode), mode);
            }
            Some(Err(e)) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
            None => {
                println!();
                return ExitCode::SUCCESS;
            }
        }
    }
}
