mod calc;
mod cmd;
mod data;
mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "miqaat", about = "hijri miqaat calendar")]
struct Cli {
    /// Path to the data directory containing config.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Miqaat store to load: a JSON file path or an http(s) URL.
    /// Overrides the source configured in config.yaml.
    #[arg(long)]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with a sample store and config
    Init,
    /// Print a Hijri month grid to stdout
    Show {
        /// Hijri year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Hijri month, 1..=12 (default: current)
        #[arg(long)]
        month: Option<u32>,
    },
    /// List miqaats for a Hijri month or a single day
    Miqaats {
        /// Hijri year
        year: i32,
        /// Hijri month, 1..=12
        month: u32,
        /// Hijri day of month
        #[arg(long)]
        day: Option<u32>,
    },
    /// Convert between Gregorian and Hijri dates
    Convert {
        /// Gregorian date, YYYY-MM-DD
        #[arg(long)]
        gregorian: Option<String>,
        /// Hijri date, YYYY-MM-DD with a 1-based month
        #[arg(long)]
        hijri: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did
    // not explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty — running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let source = cli.source.as_deref();
    match cli.command {
        None => cmd::root::run(source),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Show { year, month }) => cmd::show::run(source, year, month),
        Some(Commands::Miqaats { year, month, day }) => {
            cmd::miqaats::run(source, year, month, day)
        }
        Some(Commands::Convert { gregorian, hijri }) => {
            cmd::convert::run(gregorian.as_deref(), hijri.as_deref())
        }
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
