use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "builder-bumper")]
#[command(
    author,
    version,
    about = "Bump the Go versions pinned in a golang-builder style repository",
    long_about = "Bump the Go versions pinned in a golang-builder style repository.\n\n\
        Detects the two supported Go lines, checks go.dev for newer releases and rewrites \
        the Makefiles, Dockerfiles, CI config and README. Either both lines move forward \
        when a new Go line ships, or each line moves to its latest patch release."
)]
pub struct Cli {
    /// Repository root (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Path to config file (default: auto-discover .bumperrc.toml or bumper.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn root(&self) -> PathBuf {
        self.chdir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
