pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod planner;
pub mod registry;
pub mod rewrite;
pub mod version;

pub use catalog::ReleaseCatalog;
pub use cli::Cli;
pub use config::{BumperConfig, Discovery};
pub use error::{BumpError, Result};
pub use planner::{BumpReport, Planner};
pub use registry::{GoDevReleaseSource, ReleaseSource};
pub use version::GoVersion;
