//! ecmalite CLI
//!
//! Main entry point for the `ecmalite` command.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ecmalite::{Config, Interpreter, Program, Value};

#[derive(Parser)]
#[command(name = "ecmalite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Execution core of a small ECMAScript-flavoured interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Interpreter configuration (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program stored as JSON
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print every frame after execution
        #[arg(long)]
        dump_stack: bool,

        /// Keep executing after a faulting top-level statement
        #[arg(long)]
        keep_going: bool,
    },

    /// Print the structural dump of a program stored as JSON
    Dump {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Build, print and execute the built-in sample program
    Demo {
        /// Print the program as JSON instead of the structural dump
        #[arg(long)]
        json: bool,
    },

    /// Show version and configuration defaults
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("ecmalite=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Run {
            input,
            dump_stack,
            keep_going,
        } => run(&input, config, dump_stack, keep_going),

        Commands::Dump { input } => dump(&input),

        Commands::Demo { json } => demo(config, json),

        Commands::Info => info(&config),
    }
}

fn load_program(input: &Path) -> Result<Program> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    let program: Program = serde_json::from_str(&source)
        .map_err(|e| miette::miette!("Invalid program in {}: {}", input.display(), e))?;
    tracing::debug!("Loaded {} top-level statements", program.body.body.len());
    Ok(program)
}

fn run(input: &Path, config: Config, dump_stack: bool, keep_going: bool) -> Result<()> {
    tracing::info!("Running {:?}", input);

    let program = load_program(input)?;
    let mut interpreter = Interpreter::with_config(config);

    if keep_going {
        let reporter = interpreter.execute_recovering(&program);
        if dump_stack {
            print!("{}", interpreter.dump_stack());
        }
        if reporter.has_errors() {
            reporter.emit_all();
            return Err(miette::miette!(
                "{} statements failed",
                reporter.error_count()
            ));
        }
        return Ok(());
    }

    let result = interpreter.execute(&program);
    if dump_stack {
        print!("{}", interpreter.dump_stack());
    }
    match result? {
        Value::Undefined => {}
        value => println!("{}", value),
    }
    Ok(())
}

fn dump(input: &Path) -> Result<()> {
    let program = load_program(input)?;
    print!("{}", program);
    Ok(())
}

fn demo(config: Config, json: bool) -> Result<()> {
    let program = ecmalite::demo::sample_program();

    if json {
        let json = serde_json::to_string_pretty(&program).into_diagnostic()?;
        println!("{}", json);
    } else {
        print!("{}", program);
    }

    let mut interpreter = Interpreter::with_config(config);
    interpreter.execute(&program)?;
    print!("{}", interpreter.dump_stack());
    Ok(())
}

fn info(config: &Config) -> Result<()> {
    println!("ecmalite");
    println!("Version: {}", ecmalite::VERSION);
    println!();
    println!("Configuration:");
    println!("  max_call_depth: {}", config.max_call_depth);
    println!("  arity: {:?}", config.arity);
    println!();
    println!("Values:");
    println!("  undefined, null, boolean, number, int, string, bigint, object, function");
    Ok(())
}
