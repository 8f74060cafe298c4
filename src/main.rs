use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;
use udf_registry::{
    Session,
    cli::{self, CallOptions, CliError},
};

#[derive(ClapParser)]
#[command(name = "udf")]
#[command(about = "Inspect and call functions from the UDF registry")]
#[command(version)]
struct Cli {
    /// Log registry activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered functions with their arity
    List,

    /// Call a function and print its JSON result
    Call {
        /// Function name (case-insensitive)
        name: String,

        /// Arguments as JSON (reads a JSON array from stdin if none given)
        args: Vec<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("udf_registry=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = udf_registry::install_builtins()
        .map_err(CliError::from)
        .and_then(|()| {
            udf_registry::freeze_global();
            match cli.command {
                Commands::List => run_list(),
                Commands::Call { name, args, pretty } => run_call(name, args, pretty),
            }
        });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_list() -> Result<(), CliError> {
    let session = Session::new("cli");
    for line in cli::list_functions(session.functions()) {
        println!("{}", line);
    }
    Ok(())
}

fn run_call(name: String, args: Vec<String>, pretty: bool) -> Result<(), CliError> {
    let stdin = if args.is_empty() && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    let session = Session::new("cli");
    let options = CallOptions { name, args, stdin };
    let output = cli::execute_call(&session, &options)?;

    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
