//! folder-organizer - sort a folder's subdirectories into alphabetical buckets
//!
//! Every immediate subdirectory of a root is moved into one of `A-E`, `F-J`,
//! `K-O`, `P-T` or `U-Z` by the first letter of its name, or into `Other`
//! when the name starts with anything else. Runs are idempotent: bucket
//! directories are never reorganized themselves.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod grouping;
pub mod organizer;
pub mod output;

pub use config::{ConfigError, FilterConfig, FolderFilter};
pub use confirm::{AssumeYes, Confirmation, PromptConfirmation};
pub use grouping::{
    Grouping, GroupingCatalog, GroupingError, OTHER_DIR_NAME, classify, default_groupings,
};
pub use organizer::{
    FolderMover, FolderOutcome, FsMover, MoveError, OrganizeError, OrganizeReport, Organizer,
    organize,
};

pub use cli::{Args, RunOptions, run_cli};
