use clap::{Parser as ClapParser, Subcommand};
use rql::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "rql")]
#[command(about = "rql - parse and validate Resource Query Language filters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print it as JSON
    Check {
        /// The query to check (reads from stdin if not provided)
        query: Option<String>,

        /// JSON resource description to validate fields against
        #[arg(short, long)]
        schema: Option<String>,

        /// Treat the query as a URL query string
        #[arg(short, long)]
        url: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't check fields
        #[arg(long)]
        syntax_only: bool,

        /// Largest limit a query may ask for
        #[arg(long)]
        max_limit: Option<u64>,
    },

    /// List the queryable fields of a resource
    Fields {
        /// JSON resource description
        schema: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            schema,
            url,
            pretty,
            syntax_only,
            max_limit,
        } => read_query(query).and_then(|query| {
            run_check(
                CheckOptions {
                    query,
                    schema,
                    url,
                    syntax_only,
                    max_limit,
                },
                pretty,
            )
        }),
        Commands::Fields { schema } => run_fields(&schema),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) => Ok(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(options: CheckOptions, pretty: bool) -> Result<(), CliError> {
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => print_json(&output, pretty)?,
    }
    Ok(())
}

fn run_fields(schema: &str) -> Result<(), CliError> {
    let resource = cli::load_resource(schema)?;
    print_json(&cli::describe_fields(&resource)?, true)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}
