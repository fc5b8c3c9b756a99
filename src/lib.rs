//! # semverkit
//!
//! A library for parsing, checking, comparing, incrementing and sorting
//! [semantic versions](https://semver.org/).
//!
//! ## Examples
//!
//! Parse a version and get the next one:
//!
//! ```
//! use semverkit::prelude::*;
//!
//! let version = Version::parse("v1.2.3").unwrap();
//! let next = version.next(Increment::Minor).unwrap();
//! assert_eq!("1.3.0", next.to_string());
//! ```
//!
//! Work a pre-release towards a release:
//!
//! ```
//! use semverkit::prelude::*;
//!
//! let config = IncrConfig {
//!     increment: Increment::Minor,
//!     release_candidate: true,
//!     ..Default::default()
//! };
//! let candidate = config.apply(&"1.2.3".parse().unwrap(), &IdRules::default()).unwrap();
//! assert_eq!("1.3.0-rc.1", candidate.to_string());
//!
//! let next = candidate.next(Increment::PreRelease).unwrap();
//! assert_eq!("1.3.0-rc.2", next.to_string());
//! assert!(candidate.precedes(&next));
//! ```
//!
//! Check that a release history has no holes in it:
//!
//! ```
//! use semverkit::prelude::*;
//!
//! let versions: Vec<Version> = ["1.0.0", "1.1.0", "1.3.0"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let errs = check_sequence(&versions);
//! assert_eq!(1, errs.len());
//! assert_eq!(2, errs[0].index);
//! ```
//!
//! ## Important Terms
//!
//! - **Version**: Three numeric parts (major, minor and patch) and two optional lists of
//!   identifiers. It's modeled by the [`Version`] struct.
//! - **Pre-release identifiers**: The dot-separated identifiers after a `-`. A version with them
//!   has lower precedence than the same version without them.
//! - **Build identifiers**: The dot-separated identifiers after a `+`. They are carried along but
//!   never affect precedence.
//! - **Precedence**: The ordering of versions defined by semver. Two versions can have the same
//!   precedence and still be different, if their build identifiers differ. See
//!   [`Version::cmp_precedence`].
//! - **Rules**: Optional extra constraints on identifiers, such as a pattern they must match.
//!   They're modeled by [`Rule`], grouped in a [`RuleSet`] per identifier group in [`IdRules`].
//!
//! ## Prelude
//!
//! semverkit provides a prelude module for convenience. Use it with:
//!
//! ```
//! use semverkit::prelude::*;
//! ```

mod check;
mod error;
pub mod identifier;
mod increment;
mod rules;
mod sequence;
mod sort;
mod version;

pub use crate::check::{parse_checked, CheckConfig, CheckReport, Checker};
pub use crate::error::{
    ConfigError, Disorder, Error, Gap, IncrementError, ParseError, RuleViolationError,
    SequenceError, SequenceErrorKind, Violation,
};
pub use crate::identifier::IdGroup;
pub use crate::increment::{increment_identifier, ClearIds, IncrConfig, Increment};
pub use crate::rules::{IdRules, Rule, RuleSet};
pub use crate::sequence::{check_pair, check_sequence};
pub use crate::sort::{sort_versions, SortConfig, SortReport, Sorter};
pub use crate::version::{Part, Version};

/// A convenience module appropriate for glob imports (`use semverkit::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::check_sequence;
    #[doc(no_inline)]
    pub use crate::ClearIds;
    #[doc(no_inline)]
    pub use crate::Error;
    #[doc(no_inline)]
    pub use crate::IdGroup;
    #[doc(no_inline)]
    pub use crate::IdRules;
    #[doc(no_inline)]
    pub use crate::IncrConfig;
    #[doc(no_inline)]
    pub use crate::Increment;
    #[doc(no_inline)]
    pub use crate::IncrementError;
    #[doc(no_inline)]
    pub use crate::ParseError;
    #[doc(no_inline)]
    pub use crate::Part;
    #[doc(no_inline)]
    pub use crate::Rule;
    #[doc(no_inline)]
    pub use crate::RuleSet;
    #[doc(no_inline)]
    pub use crate::SequenceError;
    #[doc(no_inline)]
    pub use crate::Version;
}
