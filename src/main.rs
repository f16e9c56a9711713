use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use rustyline::error::ReadlineError;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{Completer, Editor, Helper, Highlighter, Hinter, Validator};

use rox::ast_printer::AstPrinter;
use rox::error::Diagnostics;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::{scan_tokens, Outcome, Session, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

/// Exit code for a malformed command line.
const EXIT_USAGE: i32 = 64;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints each statement's AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Rox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
struct PromptHelper {
    #[rustyline(Completer)]
    completer: (),
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Print every diagnostic and the runtime error (if any) to stderr.
fn report(outcome: &Outcome) {
    eprint!("{}", outcome.diagnostics);

    if let Some(e) = &outcome.runtime_error {
        eprintln!("{}", e);
    }
}

fn exit_on_static_errors(diagnostics: &Diagnostics) {
    if diagnostics.has_errors() {
        eprint!("{}", diagnostics);
        debug!("Static errors found, exiting with code {}", EXIT_STATIC_ERROR);
        std::process::exit(EXIT_STATIC_ERROR);
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);

    // Errors go to stderr as they are found; the tokens still print.
    eprint!("{}", diagnostics);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if diagnostics.has_errors() {
        std::process::exit(EXIT_STATIC_ERROR);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: PathBuf) -> Result<()> {
    info!("Running Parse subcommand");
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);
    let statements = Parser::new(&tokens).parse(&mut diagnostics);

    exit_on_static_errors(&diagnostics);

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    info!("Parse subcommand completed");
    Ok(())
}

fn evaluate(filename: PathBuf) -> Result<()> {
    info!("Running Evaluate subcommand");
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);
    let expr = Parser::new(&tokens).parse_expression(&mut diagnostics);

    exit_on_static_errors(&diagnostics);

    let Some(expr) = expr else {
        return Ok(());
    };

    match Interpreter::new().evaluate(&expr) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    }

    info!("Evaluate subcommand completed");
    Ok(())
}

fn run_file(filename: PathBuf) -> Result<()> {
    info!("Running Run subcommand");
    let source = read_file(filename)?;

    let outcome = Session::new().run(&source);
    report(&outcome);

    match outcome.exit_code() {
        0 => {
            info!("Program executed successfully");
            Ok(())
        }
        code => {
            debug!("Run failed, exiting with code {}", code);
            std::process::exit(code);
        }
    }
}

fn repl() -> Result<()> {
    info!("Starting REPL");
    let mut session = Session::new();

    let mut rl: Editor<PromptHelper, _> = Editor::new()?;
    rl.set_helper(Some(PromptHelper {
        completer: (),
        validator: MatchingBracketValidator::new(),
    }));

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    debug!("Failed to record history entry: {}", e);
                }

                // Each line starts with a clean error state; globals persist.
                let outcome = session.run(&line);
                report(&outcome);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                info!("REPL closed");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprint!("{}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(filename, json),
        Some(Commands::Parse { filename }) => parse(filename),
        Some(Commands::Evaluate { filename }) => evaluate(filename),
        Some(Commands::Run { filename }) => run_file(filename),
        Some(Commands::Repl) | None => repl(),
    }
}
