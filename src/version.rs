use crate::{
    error::ParseError,
    identifier::{self, IdGroup},
};
use core::{
    cmp::Ordering,
    fmt::{self, Display},
    str::FromStr,
};

/// One of the three numeric parts of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The major part. It is more significant than the minor and patch parts.
    Major,
    /// The minor part. It is less significant than the major part and more than the patch part.
    Minor,
    /// The patch part. It is less significant than the major and minor parts.
    Patch,
}

impl Part {
    /// All parts, most significant first.
    pub const ALL: [Part; 3] = [Part::Major, Part::Minor, Part::Patch];

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Part::Major => "major",
            Part::Minor => "minor",
            Part::Patch => "patch",
        }
    }

    /// Returns the parts that are less significant than this one, most significant first.
    pub fn lesser(&self) -> &'static [Part] {
        match self {
            Part::Major => &[Part::Minor, Part::Patch],
            Part::Minor => &[Part::Patch],
            Part::Patch => &[],
        }
    }
}

impl Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A semantic version: `MAJOR.MINOR.PATCH[-PRE.RELEASE][+BUILD.IDS]`.
///
/// Versions are created by [parsing](Version::parse) text or by deriving a new version from an
/// existing one (e.g. [`Version::next`]). All identifiers held by a `Version` are valid.
///
/// Equality (`==`) is structural and includes build identifiers. Precedence, which ignores build
/// identifiers, is available through [`Version::cmp_precedence`].
///
/// # Examples
///
/// ```
/// use semverkit::prelude::*;
///
/// let version = Version::parse("v1.2.3-rc.1+build.5").unwrap();
/// assert_eq!(1, version.major());
/// assert_eq!(["rc", "1"], version.pre_release());
/// assert_eq!("1.2.3-rc.1+build.5", version.to_string());
///
/// let release = Version::parse("1.2.3").unwrap();
/// assert!(version.precedes(&release));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub(crate) major: u64,
    pub(crate) minor: u64,
    pub(crate) patch: u64,
    pub(crate) pre_release: Vec<String>,
    pub(crate) build: Vec<String>,
}

impl Version {
    /// Returns a version with the given numeric parts and no identifiers.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Returns a version with the given numeric parts and identifiers.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if any identifier is invalid.
    pub fn with_ids<P, B>(
        major: u64,
        minor: u64,
        patch: u64,
        pre_release: P,
        build: B,
    ) -> Result<Self, ParseError>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self::new(major, minor, patch)
            .with_pre_release(pre_release)?
            .with_build(build)
    }

    /// Parses a version string of the form `[v]MAJOR.MINOR.PATCH[-PRE][+BUILD]`.
    ///
    /// The numeric parts must not have leading zeros (other than a lone `0`). Identifiers must be
    /// non-empty and made of ASCII alphanumerics and hyphens, and numeric pre-release identifiers
    /// must not have leading zeros.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the first rule the string breaks.
    pub fn parse(version_str: &str) -> Result<Self, ParseError> {
        if version_str.is_empty() {
            return Err(ParseError::Empty);
        }

        let text = version_str.strip_prefix('v').unwrap_or(version_str);

        // pre-release identifiers may contain hyphens but never a `+`, so split off the build
        // identifiers first.
        let (text, build) = match text.split_once('+') {
            Some((text, build)) => (text, identifier::split(IdGroup::Build, build)?),
            None => (text, Vec::new()),
        };
        let (core, pre_release) = match text.split_once('-') {
            Some((core, pre)) => (core, identifier::split(IdGroup::PreRelease, pre)?),
            None => (text, Vec::new()),
        };

        let parts: Vec<&str> = core.split('.').collect();
        let [major, minor, patch] = parts[..] else {
            return Err(ParseError::CoreArity {
                version: version_str.to_owned(),
                found: parts.len(),
            });
        };

        Ok(Self {
            major: parse_part(Part::Major, major)?,
            minor: parse_part(Part::Minor, minor)?,
            patch: parse_part(Part::Patch, patch)?,
            pre_release,
            build,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Returns the value of the given numeric part.
    pub fn part(&self, part: Part) -> u64 {
        match part {
            Part::Major => self.major,
            Part::Minor => self.minor,
            Part::Patch => self.patch,
        }
    }

    pub fn pre_release(&self) -> &[String] {
        &self.pre_release
    }

    pub fn build(&self) -> &[String] {
        &self.build
    }

    /// Returns the identifiers of the given group.
    pub fn ids(&self, group: IdGroup) -> &[String] {
        match group {
            IdGroup::PreRelease => &self.pre_release,
            IdGroup::Build => &self.build,
        }
    }

    pub fn has_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// Returns this version with its pre-release identifiers replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if any identifier is invalid.
    pub fn with_pre_release<I>(mut self, ids: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.pre_release = collect_ids(IdGroup::PreRelease, ids)?;
        Ok(self)
    }

    /// Returns this version with its build identifiers replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if any identifier is invalid.
    pub fn with_build<I>(mut self, ids: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.build = collect_ids(IdGroup::Build, ids)?;
        Ok(self)
    }

    /// Compares two versions by semantic version precedence.
    ///
    /// 1. `major`, `minor` then `patch` compare numerically.
    /// 2. With equal numeric parts, a version without pre-release identifiers is greater than one
    ///    with them.
    /// 3. Otherwise pre-release identifiers compare left to right (see
    ///    [`cmp_identifier`](crate::identifier::cmp_identifier)), and a shorter list that is a
    ///    prefix of a longer one is lesser.
    ///
    /// Build identifiers are never considered. This is a total order, but it is coarser than
    /// `==`: `1.0.0+a` and `1.0.0+b` have equal precedence yet are not equal.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(
                || match (self.pre_release.is_empty(), other.pre_release.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        identifier::cmp_pre_release(&self.pre_release, &other.pre_release)
                    }
                },
            )
    }

    /// Returns true if this version has strictly lower precedence than `other`.
    pub fn precedes(&self, other: &Self) -> bool {
        self.cmp_precedence(other).is_lt()
    }

    /// Returns true if the two versions have equal precedence (they may differ in build
    /// identifiers).
    pub fn same_precedence(&self, other: &Self) -> bool {
        self.cmp_precedence(other).is_eq()
    }
}

fn parse_part(part: Part, value: &str) -> Result<u64, ParseError> {
    if !identifier::is_numeric(value) {
        return Err(ParseError::NonNumeric {
            part,
            value: value.to_owned(),
        });
    }
    if value.len() > 1 && value.starts_with('0') {
        return Err(ParseError::LeadingZero {
            part,
            value: value.to_owned(),
        });
    }
    value.parse().map_err(|_| ParseError::TooLarge {
        part,
        value: value.to_owned(),
    })
}

fn collect_ids<I>(group: IdGroup, ids: I) -> Result<Vec<String>, ParseError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
    identifier::validate_all(group, &ids)?;
    Ok(ids)
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Version {
    /// Renders the canonical form, `MAJOR.MINOR.PATCH[-PRE][+BUILD]`, without any `v` prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "-{}", self.pre_release.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}
