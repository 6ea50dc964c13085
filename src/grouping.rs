/// Alphabetical grouping catalog used to classify folder names.
///
/// A grouping is an inclusive letter range such as `A-E`. Its label doubles as
/// the name of the bucket directory that folders in that range are moved into.
///
/// # Examples
///
/// ```
/// use folder_organizer::grouping::{classify, default_groupings};
///
/// let groupings = default_groupings();
/// assert_eq!(classify("Apple", &groupings).map(|g| g.label()), Some("A-E"));
/// assert_eq!(classify("zebra", &groupings).map(|g| g.label()), Some("U-Z"));
/// assert!(classify("7-Eleven", &groupings).is_none());
/// ```
use thiserror::Error;

/// Name of the catch-all bucket for folders that match no grouping.
pub const OTHER_DIR_NAME: &str = "Other";

/// Labels and letter bounds of the built-in groupings, in iteration order.
const DEFAULT_RANGES: [(&str, char, char); 5] = [
    ("A-E", 'A', 'E'),
    ("F-J", 'F', 'J'),
    ("K-O", 'K', 'O'),
    ("P-T", 'P', 'T'),
    ("U-Z", 'U', 'Z'),
];

/// Errors raised when parsing a grouping label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    /// The label has no `-` separator, or more than one.
    #[error("grouping label '{0}' must have the form START-END")]
    MissingSeparator(String),
    /// One side of the separator is empty.
    #[error("grouping label '{0}' has an empty bound")]
    EmptyBound(String),
}

/// One alphabetical bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grouping {
    label: String,
    start_letter: char,
    end_letter: char,
}

impl Grouping {
    /// Parses a `START-END` label, taking the first character of each side.
    ///
    /// Bounds are uppercased. An inverted label such as `Z-A` is accepted and
    /// produces a range that matches nothing.
    pub fn new(label: impl Into<String>) -> Result<Self, GroupingError> {
        let label = label.into();
        let (start, end) = match label.split_once('-') {
            Some((start, end)) if !end.contains('-') => (start, end),
            _ => return Err(GroupingError::MissingSeparator(label)),
        };

        let (Some(start_letter), Some(end_letter)) = (first_upper(start), first_upper(end)) else {
            return Err(GroupingError::EmptyBound(label));
        };

        Ok(Self {
            label,
            start_letter,
            end_letter,
        })
    }

    fn from_bounds(label: &str, start_letter: char, end_letter: char) -> Self {
        Self {
            label: label.to_string(),
            start_letter,
            end_letter,
        }
    }

    /// The label, which is also the bucket directory name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// First letter of the range, uppercase.
    pub fn start_letter(&self) -> char {
        self.start_letter
    }

    /// Last letter of the range, inclusive.
    pub fn end_letter(&self) -> char {
        self.end_letter
    }

    /// Returns true if `letter` falls inside this grouping's inclusive range.
    pub fn contains(&self, letter: char) -> bool {
        (self.start_letter..=self.end_letter).contains(&letter)
    }
}

impl std::fmt::Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Returns the five built-in groupings: `A-E, F-J, K-O, P-T, U-Z`.
pub fn default_groupings() -> Vec<Grouping> {
    DEFAULT_RANGES
        .iter()
        .map(|&(label, start, end)| Grouping::from_bounds(label, start, end))
        .collect()
}

/// Finds the first grouping whose range contains the uppercased first
/// character of `name`.
///
/// Returns `None` for an empty name or a first character outside every range.
///
/// # Arguments
///
/// * `name` - The folder name; only its first character is looked at
/// * `groupings` - Buckets to search, in order
///
/// # Examples
///
/// ```
/// use folder_organizer::grouping::{classify, default_groupings};
///
/// let groupings = default_groupings();
/// assert_eq!(classify("banana", &groupings).map(|g| g.label()), Some("A-E"));
/// assert!(classify("ßtraße", &groupings).is_none());
/// ```
pub fn classify<'a>(name: &str, groupings: &'a [Grouping]) -> Option<&'a Grouping> {
    let letter = first_upper(name)?;
    groupings.iter().find(|grouping| grouping.contains(letter))
}

/// ASCII-only folding; characters outside ASCII keep their case and so
/// never land in a letter range.
fn first_upper(s: &str) -> Option<char> {
    s.chars().next().map(|c| c.to_ascii_uppercase())
}

/// Owns the groupings for a run and answers classification queries.
#[derive(Debug, Clone)]
pub struct GroupingCatalog {
    groupings: Vec<Grouping>,
}

impl GroupingCatalog {
    /// Creates a catalog over `groupings`, kept in the given order.
    ///
    /// # Arguments
    ///
    /// * `groupings` - Buckets to match against; the first match wins
    ///
    /// # Examples
    ///
    /// ```
    /// use folder_organizer::grouping::{Grouping, GroupingCatalog};
    ///
    /// let catalog = GroupingCatalog::new(vec![Grouping::new("A-M").unwrap()]);
    /// assert_eq!(catalog.classify("kiwi").map(|g| g.label()), Some("A-M"));
    /// assert!(catalog.classify("zebra").is_none());
    /// ```
    pub fn new(groupings: Vec<Grouping>) -> Self {
        Self { groupings }
    }

    /// See [`classify`].
    pub fn classify(&self, name: &str) -> Option<&Grouping> {
        classify(name, &self.groupings)
    }

    /// Returns true for names owned by the organizer itself: every grouping
    /// label plus [`OTHER_DIR_NAME`].
    ///
    /// Matching is exact, so a folder called `a-e` is still a candidate.
    pub fn is_reserved_name(&self, name: &str) -> bool {
        name == OTHER_DIR_NAME || self.groupings.iter().any(|g| g.label == name)
    }

    /// All groupings, in matching order.
    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grouping> {
        self.groupings.iter()
    }
}

impl Default for GroupingCatalog {
    fn default() -> Self {
        Self::new(default_groupings())
    }
}
