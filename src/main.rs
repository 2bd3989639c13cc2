use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use url_query_tools::{params_from_json, Overrides, QueryTools, Result};

/// Parse, inspect and build URL query strings.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Option override as `name=value`, e.g. `-o paramSeparator=;` (repeatable)
    #[arg(short = 'o', long = "set", global = true)]
    set: Vec<String>,
    /// Option overrides as a JSON object; `--set` entries win over it
    #[arg(long, global = true)]
    options: Option<String>,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Value of a parameter; extra names are tried in order as alternatives
    Get {
        url: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// All parameters of a URL
    List {
        url: String,
        /// Show every view (keys, values, pairs, objects)
        #[arg(long)]
        extended: bool,
    },
    /// Query content of a URL (between `?` and `#`)
    Content { url: String },
    /// Parse bare query content
    Parse {
        content: String,
        #[arg(long)]
        extended: bool,
    },
    /// Build a query from a JSON object or an array of [name, value] pairs
    Build { params: String },
    /// Print the effective options
    Options,
}

fn overrides(args: &Args) -> Result<Overrides> {
    // JSON overrides first, then `--set` assignments on top.
    let base = match args.options.as_deref() {
        Some(json) => Overrides::from_json_str(json)?,
        None => Overrides::default(),
    };
    let mut assigned = Overrides::default();
    for assignment in &args.set {
        assigned.parse_assignment(assignment)?;
    }
    Ok(base.merge(assigned))
}

fn run(args: Args) -> Result<()> {
    let mut tools = QueryTools::new();
    tools.set_options(&overrides(&args)?);
    let none = Overrides::default();

    match args.command {
        Command::Get { url, names } => {
            // Extra names act as alternatives, first present one wins.
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let value = tools.get_query_param(names, Some(url.as_str()), &none);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::List { url, extended } => {
            let view = tools.list_query_params(Some(url.as_str()), &none, extended);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Content { url } => {
            println!("{}", tools.get_query_content(Some(url.as_str()), &none));
        }
        Command::Parse { content, extended } => {
            let view = tools.parse_query_content(&content, &none, extended);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Build { params } => {
            // Parse input JSON.
            let json: serde_json::Value = serde_json::from_str(&params)?;
            println!("{}", tools.build_query(params_from_json(&json)?, &none));
        }
        Command::Options => {
            println!("{}", serde_json::to_string_pretty(tools.list_options())?);
        }
    }
    Ok(())
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Run the command; errors go to stderr.

    if let Err(e) = run(args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
