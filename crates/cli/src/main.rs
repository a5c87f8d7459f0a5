use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fntrack::commands::{
    check_command, extract_command, history_command, list_command, track_command, ScanOverrides,
};
use fntrack::init_tracing;

/// Named-function inventory and change-history tracker for JavaScript and
/// TypeScript codebases.
///
/// Without a subcommand, runs a tracking pass over ROOT: writes the current
/// function list, appends to the change history, and links tagged functions
/// into the functionality tracker.
#[derive(Parser, Debug)]
#[command(
    name = "fntrack",
    version,
    about = "Track named functions in a JS/TS codebase and record how they change",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Codebase root. Defaults to the current working directory.
    root: Option<String>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Config file (YAML, or JSON by extension). Defaults to ROOT/.fntrack.yaml.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Additional directory name to skip (repeatable).
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// Do not synthesize names for inline route handlers.
    #[arg(long, global = true)]
    no_routes: bool,

    /// Fail a whole file on any syntax error instead of skipping bad nodes.
    #[arg(long, global = true)]
    strict: bool,

    /// Write the current list as bare names instead of objects.
    #[arg(long, global = true)]
    names_only: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> ScanOverrides {
        ScanOverrides {
            config: self.config.as_ref().map(Into::into),
            exclude: self.exclude.clone(),
            no_routes: self.no_routes,
            strict: self.strict,
            names_only: self.names_only,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan ROOT, update the function list and append changes to the history.
    Track {
        #[arg(default_value = ".")]
        root: String,

        /// Print the run summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the named functions found under ROOT without writing anything.
    List {
        #[arg(default_value = ".")]
        root: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the recorded change history.
    History {
        #[arg(default_value = ".")]
        root: String,

        /// Show only the most recent N records.
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Extract named functions from a single file.
    Extract {
        file: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Check that every function has a functionality ID and tests.
    Check {
        #[arg(default_value = ".")]
        root: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose, cli.global.quiet);
    let overrides = cli.global.overrides();

    let command = cli.command.unwrap_or(Command::Track {
        root: cli.root.unwrap_or_else(|| ".".to_string()),
        json: false,
    });
    match command {
        Command::Track { root, json } => track_command(&root, &overrides, json)?,
        Command::List { root, json } => list_command(&root, &overrides, json)?,
        Command::History { root, limit, json } => {
            history_command(&root, &overrides, limit, json)?
        }
        Command::Extract { file, json } => extract_command(&file, &overrides, json)?,
        Command::Check { root, json } => check_command(&root, &overrides, json)?,
    }

    Ok(())
}
