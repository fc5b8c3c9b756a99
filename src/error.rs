use crate::{identifier::IdGroup, version::Part, Version};
use core::fmt::{self, Display};

/// Errors arising from turning text into a [`Version`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The version string was empty.
    #[error("Version string should not be empty")]
    Empty,

    /// The core part was not exactly `MAJOR.MINOR.PATCH`.
    #[error("Version `{version}` should have exactly three dot-separated core parts (major.minor.patch), but has {found}")]
    CoreArity { version: String, found: usize },

    /// A core part was not made up entirely of decimal digits.
    #[error("The {part} version `{value}` should be a non-negative integer")]
    NonNumeric { part: Part, value: String },

    /// A core part had a leading zero.
    #[error("The {part} version `{value}` should not have leading zeros")]
    LeadingZero { part: Part, value: String },

    /// A core part did not fit in 64 bits.
    #[error("The {part} version `{value}` is too large")]
    TooLarge { part: Part, value: String },

    /// Two dots with nothing between them, or a trailing `-`/`+`/`.`.
    #[error("Each {group} identifier should be non-empty")]
    EmptyIdentifier { group: IdGroup },

    /// An identifier contained something other than an ASCII alphanumeric or a hyphen.
    #[error("The {group} identifier `{id}` contains `{ch}`, but only ASCII alphanumerics and hyphens are allowed")]
    BadCharacter { group: IdGroup, id: String, ch: char },

    /// A purely numeric pre-release identifier had a leading zero.
    #[error("The numeric {group} identifier `{id}` should not have leading zeros")]
    NumericLeadingZero { group: IdGroup, id: String },
}

/// One rule that a list of identifiers failed, and the identifiers that failed it.
///
/// Aggregate rules (like a minimum count) have no individual offenders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: String,
    pub offenders: Vec<String>,
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)?;
        if !self.offenders.is_empty() {
            let offenders = self
                .offenders
                .iter()
                .map(|id| format!("`{id}`"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " (offending: {offenders})")?;
        }
        Ok(())
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A list of identifiers broke one or more configured rules. Every broken rule is listed, not
/// just the first.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Bad list of {group} identifiers: {}", join_violations(.violations))]
pub struct RuleViolationError {
    pub group: IdGroup,
    pub violations: Vec<Violation>,
}

/// How the later of two adjacent versions sorts before the earlier one.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disorder {
    #[error("the former has a higher {0} version number than the latter")]
    Part(Part),

    #[error("the former is greater than the latter - check the pre-release identifiers")]
    PreRelease,
}

/// How the later of two adjacent versions skips ahead of the earlier one.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    #[error("the {0} version number has grown but by more than 1")]
    GrewByMoreThanOne(Part),

    #[error("the {grown} version number has grown but the {non_zero} version number is not zero")]
    NotReset { grown: Part, non_zero: Part },
}

/// The kind of problem found between two adjacent versions in a list.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceErrorKind {
    #[error("the versions are out of order: {0}")]
    OutOfOrder(Disorder),

    #[error("the versions have gaps: {0}")]
    Gap(Gap),

    #[error("duplicate entries")]
    Duplicate,
}

/// A problem between the versions at `prev_index` and `index` of a list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Bad version list at: [{prev_index}] {prev}, [{index}] {curr}: {kind}")]
pub struct SequenceError {
    pub prev_index: usize,
    pub prev: Version,
    pub index: usize,
    pub curr: Version,
    pub kind: SequenceErrorKind,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IncrementError {
    #[error("No pre-release identifier to increment")]
    NoPreRelease,

    #[error("The pre-release identifier `{id}` has no numerical part")]
    NoNumericPart { id: String },

    #[error("Only part of the pre-release identifier `{id}` matched: `{matched}`")]
    PartialMatch { id: String, matched: String },

    #[error("The numerical part of the pre-release identifier `{id}` is too large to increment")]
    IdentifierOverflow { id: String },

    #[error("The {0} version number is too large to increment")]
    PartOverflow(Part),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Release and release-candidate should not both be set")]
    ReleaseAndCandidate,

    #[error("Release-candidate and explicit pre-release identifiers should not both be set")]
    CandidateAndPreRelease,

    #[error("Release-candidate should not be combined with a pre-release increment")]
    CandidateAndPreReleaseIncrement,

    #[error("Pattern `{pattern}` should be a valid regular expression: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Any error the engine can produce. Used where a single version runs through several stages,
/// any of which may fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    RuleViolation(#[from] RuleViolationError),

    #[error(transparent)]
    Increment(#[from] IncrementError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
