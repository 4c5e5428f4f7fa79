use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "tiller",
    about = "Tiller — balance test files across parallel CI builds",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Build-matrix document holding the assignment
    #[arg(short, long, global = true, default_value = "tiller.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the assignment from measured durations.
    ///
    /// Reads profiler output (one `(N seconds ...) ./spec/path:line` line
    /// per file), spreads the files across buckets longest first, and
    /// writes the buckets into the document's TEST_SUITE slots.
    Distribute {
        /// Profiler output file, or `-` for stdin
        #[arg(short, long)]
        profile: String,
        /// Override the bucket count from `num_builds`
        #[arg(short, long, allow_negative_numbers = true)]
        builds: Option<i64>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Patch the assignment for added and removed test files.
    ///
    /// Files that still exist keep their bucket; new files land in a
    /// random bucket.
    Sync {
        /// Project root containing the test directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Override the bucket count from `num_builds`
        #[arg(short, long, allow_negative_numbers = true)]
        builds: Option<i64>,
        /// Skip `git add` of the rewritten document
        #[arg(long)]
        no_git_add: bool,
    },
    /// Write a shell file exporting one bucket's TEST_SUITE.
    ///
    /// The bucket comes from --bucket, then $TILLER_BUCKET; when neither
    /// names a valid bucket one is picked at random.
    Export {
        /// Bucket index to export
        #[arg(long)]
        bucket: Option<String>,
        /// Output path (default: [tiller].export_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG replaces the default filter entirely when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tiller=info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Distribute { profile, builds, format } => {
            commands::distribute::distribute(&cli.config, &profile, builds, &format)
        }
        Commands::Sync { root, builds, no_git_add } => {
            commands::sync::sync(&cli.config, &root, builds, !no_git_add)
        }
        Commands::Export { bucket, output } => {
            commands::export::export(&cli.config, bucket, output.as_deref())
        }
    }
}
