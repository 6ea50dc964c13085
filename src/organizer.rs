/// Folder organization into alphabetical bucket directories.
///
/// The organizer lists the immediate subdirectories of a root, creates one
/// bucket directory per grouping, and moves every candidate folder into the
/// bucket its name belongs to. Names matching no grouping go to a lazily
/// created `Other` directory. A failure on one folder is recorded in the
/// report and never stops the run; failures while preparing the buckets do.
use crate::config::FolderFilter;
use crate::grouping::{GroupingCatalog, OTHER_DIR_NAME};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal errors: the run cannot continue.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root does not exist or cannot be resolved to an absolute path.
    #[error("Invalid root directory {}: {source}", .path.display())]
    InvalidRoot { path: PathBuf, source: io::Error },
    /// The root exists but its entries cannot be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ListingFailed { path: PathBuf, source: io::Error },
    /// A bucket directory could not be created.
    #[error("Failed to create bucket directory {}: {source}", .path.display())]
    BucketCreationFailed { path: PathBuf, source: io::Error },
}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a single folder could not be placed.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("destination {} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error(
        "could not create {} directory {}: {source}",
        OTHER_DIR_NAME,
        .path.display()
    )]
    OtherDirUnavailable { path: PathBuf, source: io::Error },
    #[error("move to {} failed: {source}", .destination.display())]
    Io {
        destination: PathBuf,
        source: io::Error,
    },
}

/// Relocates a whole directory subtree.
///
/// Implementations must block until the move has completed or failed.
pub trait FolderMover {
    fn move_folder(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Moves folders with a filesystem rename.
///
/// Renames do not cross filesystems; such moves surface as per-folder errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FolderMover for FsMover {
    fn move_folder(&self, source: &Path, destination: &Path) -> io::Result<()> {
        fs::rename(source, destination)
    }
}

/// Where a folder went, or why it did not.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderOutcome {
    Moved {
        source: PathBuf,
        destination: PathBuf,
        bucket: String,
    },
    /// Dry-run result: the move that would have happened.
    Planned {
        source: PathBuf,
        destination: PathBuf,
        bucket: String,
    },
    /// The entry's name could not be used for classification.
    Skipped { path: PathBuf, reason: String },
    Failed {
        source: PathBuf,
        bucket: String,
        error: String,
    },
}

impl FolderOutcome {
    /// The folder this outcome is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Moved { source, .. }
            | Self::Planned { source, .. }
            | Self::Failed { source, .. } => source.as_path(),
            Self::Skipped { path, .. } => path.as_path(),
        }
    }

    /// Bucket label the folder was classified into; `None` when skipped.
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Moved { bucket, .. }
            | Self::Planned { bucket, .. }
            | Self::Failed { bucket, .. } => Some(bucket.as_str()),
            Self::Skipped { .. } => None,
        }
    }

    /// True for completed and planned moves.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Planned { .. })
    }
}

/// Summary of one organizer run.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub elapsed: Duration,
    pub outcomes: Vec<FolderOutcome>,
}

impl OrganizeReport {
    /// Number of candidate folders handled, skipped ones included.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of folders moved, or planned in a dry run.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// `(folder, error)` pairs for every failed move.
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FolderOutcome::Failed { source, error, .. } => {
                    Some((source.as_path(), error.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// `(entry, reason)` pairs for entries whose name was unusable.
    pub fn skipped(&self) -> Vec<(&Path, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FolderOutcome::Skipped { path, reason } => Some((path.as_path(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// True when nothing failed and nothing was skipped.
    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(FolderOutcome::is_success)
    }

    /// Successful placements per bucket, in first-seen order.
    pub fn bucket_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for bucket in self
            .outcomes
            .iter()
            .filter(|o| o.is_success())
            .filter_map(FolderOutcome::bucket)
        {
            match counts.iter_mut().find(|(name, _)| *name == bucket) {
                Some((_, count)) => *count += 1,
                None => counts.push((bucket, 1)),
            }
        }
        counts
    }
}

/// Sorts the subdirectories of a root into alphabetical buckets.
///
/// # Examples
///
/// ```no_run
/// use folder_organizer::organizer::Organizer;
///
/// let report = Organizer::new().dry_run(true).run("/path/to/root".as_ref())?;
/// for outcome in &report.outcomes {
///     println!("{:?}", outcome);
/// }
/// # Ok::<(), folder_organizer::organizer::OrganizeError>(())
/// ```
pub struct Organizer<M = FsMover> {
    catalog: GroupingCatalog,
    filter: FolderFilter,
    mover: M,
    dry_run: bool,
}

impl Organizer<FsMover> {
    /// Default groupings, no filtering, filesystem moves.
    pub fn new() -> Self {
        Self {
            catalog: GroupingCatalog::default(),
            filter: FolderFilter::accept_all(),
            mover: FsMover,
            dry_run: false,
        }
    }
}

impl Default for Organizer<FsMover> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FolderMover> Organizer<M> {
    /// Restricts which folders are organized.
    ///
    /// # Arguments
    ///
    /// * `filter` - Compiled rules from [`crate::config::FilterConfig::compile`]
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use folder_organizer::config::FilterConfig;
    /// use folder_organizer::organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let root = Path::new("/path/to/root");
    /// let filter = FilterConfig::load(None, root).unwrap().compile().unwrap();
    /// let report = Organizer::new().with_filter(filter).run(root).unwrap();
    /// println!("{} folders organized", report.succeeded());
    /// ```
    pub fn with_filter(mut self, filter: FolderFilter) -> Self {
        self.filter = filter;
        self
    }

    /// When set, nothing is created or moved; outcomes are `Planned`.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replaces the move capability.
    pub fn with_mover<N: FolderMover>(self, mover: N) -> Organizer<N> {
        Organizer {
            catalog: self.catalog,
            filter: self.filter,
            mover,
            dry_run: self.dry_run,
        }
    }

    /// Runs the organizer over `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory whose immediate subdirectories are organized
    ///
    /// # Returns
    ///
    /// A report with one outcome per candidate folder. Only setup problems
    /// (unreadable root, bucket creation) are returned as errors.
    pub fn run(&self, root: &Path) -> OrganizeResult<OrganizeReport> {
        self.run_with_progress(root, |_| {})
    }

    /// Runs the organizer, handing every outcome to `on_outcome` as soon as
    /// the folder has been dealt with.
    pub fn run_with_progress<F>(
        &self,
        root: &Path,
        mut on_outcome: F,
    ) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(&FolderOutcome),
    {
        let started_at = Utc::now();
        let timer = Instant::now();

        let root = fs::canonicalize(root).map_err(|e| OrganizeError::InvalidRoot {
            path: root.to_path_buf(),
            source: e,
        })?;
        info!(root = %root.display(), dry_run = self.dry_run, "organizing");

        let candidates = self.list_candidates(&root)?;
        debug!(count = candidates.len(), "candidate folders found");

        let buckets = self.prepare_buckets(&root)?;
        let mut other = OtherDir::new(root.join(OTHER_DIR_NAME), self.dry_run);

        let mut outcomes = Vec::with_capacity(candidates.len());
        for folder in candidates {
            let outcome = self.place_folder(&folder, &buckets, &mut other);
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        let report = OrganizeReport {
            root,
            started_at,
            dry_run: self.dry_run,
            elapsed: timer.elapsed(),
            outcomes,
        };
        info!(
            processed = report.processed(),
            succeeded = report.succeeded(),
            failed = report.failures().len(),
            "organizing finished"
        );
        Ok(report)
    }

    /// Immediate subdirectories of `root`, minus bucket directories and
    /// filtered names, sorted by name.
    fn list_candidates(&self, root: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let entries = fs::read_dir(root).map_err(|e| OrganizeError::ListingFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            // Names that are not valid UTF-8 stay in the list and are
            // reported as skipped when processed.
            if let Some(name) = entry.file_name().to_str() {
                if self.catalog.is_reserved_name(name) {
                    debug!(name, "ignoring bucket directory");
                    continue;
                }
                if !self.filter.should_include(name) {
                    debug!(name, "excluded by filter");
                    continue;
                }
            }

            candidates.push(path);
        }

        candidates.sort();
        Ok(candidates)
    }

    /// Creates every bucket directory and returns `(label, path)` pairs in
    /// grouping order. Nothing is created in dry-run mode.
    fn prepare_buckets(&self, root: &Path) -> OrganizeResult<Vec<(String, PathBuf)>> {
        let mut buckets = Vec::with_capacity(self.catalog.groupings().len());
        for grouping in self.catalog.iter() {
            let path = root.join(grouping.label());
            if !self.dry_run {
                fs::create_dir_all(&path).map_err(|e| OrganizeError::BucketCreationFailed {
                    path: path.clone(),
                    source: e,
                })?;
            }
            buckets.push((grouping.label().to_string(), path));
        }
        Ok(buckets)
    }

    fn place_folder(
        &self,
        folder: &Path,
        buckets: &[(String, PathBuf)],
        other: &mut OtherDir,
    ) -> FolderOutcome {
        let Some(name) = usable_name(folder) else {
            warn!(path = %folder.display(), "folder name is unusable, skipping");
            return FolderOutcome::Skipped {
                path: folder.to_path_buf(),
                reason: "folder name is empty or not valid UTF-8".to_string(),
            };
        };

        let target = self
            .catalog
            .classify(name)
            .and_then(|grouping| buckets.iter().find(|(label, _)| label == grouping.label()));

        let (bucket, bucket_dir) = match target {
            Some((label, path)) => (label.clone(), Ok(path.clone())),
            None => (OTHER_DIR_NAME.to_string(), other.ensure()),
        };
        debug!(name, bucket = %bucket, "classified");

        match bucket_dir.and_then(|dir| self.move_into(folder, name, &dir)) {
            Ok(destination) if self.dry_run => FolderOutcome::Planned {
                source: folder.to_path_buf(),
                destination,
                bucket,
            },
            Ok(destination) => {
                info!(from = %folder.display(), to = %destination.display(), "moved");
                FolderOutcome::Moved {
                    source: folder.to_path_buf(),
                    destination,
                    bucket,
                }
            }
            Err(e) => {
                warn!(path = %folder.display(), error = %e, "move failed");
                FolderOutcome::Failed {
                    source: folder.to_path_buf(),
                    bucket,
                    error: e.to_string(),
                }
            }
        }
    }

    fn move_into(
        &self,
        folder: &Path,
        name: &str,
        bucket_dir: &Path,
    ) -> Result<PathBuf, MoveError> {
        let destination = bucket_dir.join(name);
        if destination.exists() {
            return Err(MoveError::DestinationExists(destination));
        }
        if !self.dry_run {
            self.mover
                .move_folder(folder, &destination)
                .map_err(|e| MoveError::Io {
                    destination: destination.clone(),
                    source: e,
                })?;
        }
        Ok(destination)
    }
}

/// The catch-all directory, created on first use.
struct OtherDir {
    path: PathBuf,
    ready: bool,
}

impl OtherDir {
    fn new(path: PathBuf, dry_run: bool) -> Self {
        Self {
            path,
            ready: dry_run,
        }
    }

    fn ensure(&mut self) -> Result<PathBuf, MoveError> {
        if !self.ready {
            fs::create_dir_all(&self.path).map_err(|e| MoveError::OtherDirUnavailable {
                path: self.path.clone(),
                source: e,
            })?;
            self.ready = true;
        }
        Ok(self.path.clone())
    }
}

fn usable_name(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
}

/// Organizes `root` with the default groupings and filesystem moves.
pub fn organize(root: &Path) -> OrganizeResult<OrganizeReport> {
    Organizer::new().run(root)
}
