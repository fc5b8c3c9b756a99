use crate::{
    error::{ConfigError, Error, IncrementError},
    identifier::IdGroup,
    rules::IdRules,
    version::Part,
    Version,
};
use tracing::debug;

/// Which part of a version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Increment {
    /// Leave the version unchanged.
    #[default]
    None,
    /// Increment major, reset minor and patch, clear pre-release identifiers.
    Major,
    /// Increment minor, reset patch, clear pre-release identifiers.
    Minor,
    /// Increment patch, clear pre-release identifiers.
    Patch,
    /// Increment the numeric part of the last pre-release identifier.
    PreRelease,
    /// [`Increment::PreRelease`] if there are pre-release identifiers, otherwise
    /// [`Increment::Patch`].
    Least,
}

/// Which identifiers to remove from a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearIds {
    #[default]
    None,
    All,
    PreRelease,
    Build,
}

impl ClearIds {
    fn clears(&self, group: IdGroup) -> bool {
        match self {
            ClearIds::None => false,
            ClearIds::All => true,
            ClearIds::PreRelease => group == IdGroup::PreRelease,
            ClearIds::Build => group == IdGroup::Build,
        }
    }
}

/// An identifier split around its first run of digits.
#[derive(Debug, PartialEq, Eq)]
struct NumericSplit<'a> {
    prefix: &'a str,
    digits: &'a str,
    suffix: &'a str,
}

impl<'a> NumericSplit<'a> {
    /// Splits `id` into a non-digit prefix, the first maximal run of digits, and the non-digit
    /// text following it. Any further digits are left out of all three parts.
    fn find(id: &'a str) -> Option<Self> {
        let is_digit = |c: char| c.is_ascii_digit();
        let start = id.find(is_digit)?;
        let (prefix, rest) = id.split_at(start);
        let digits_len = rest.find(|c: char| !is_digit(c)).unwrap_or(rest.len());
        let (digits, rest) = rest.split_at(digits_len);
        let suffix = &rest[..rest.find(is_digit).unwrap_or(rest.len())];
        Some(Self {
            prefix,
            digits,
            suffix,
        })
    }

    fn len(&self) -> usize {
        self.prefix.len() + self.digits.len() + self.suffix.len()
    }
}

/// Increments the numeric part of a single identifier.
///
/// A wholly numeric identifier is incremented as a number (`"9"` becomes `"10"`). Otherwise the
/// digits keep their original width, zero-padded, and the surrounding text is kept (`"RC009"`
/// becomes `"RC010"`, `"12-RC"` becomes `"13-RC"`).
///
/// # Errors
///
/// - [`IncrementError::NoNumericPart`] if there are no digits.
/// - [`IncrementError::PartialMatch`] if there is more than one run of digits, since it is then
///   unclear which one to increment.
/// - [`IncrementError::IdentifierOverflow`] if the number does not fit in 64 bits.
///
/// # Examples
///
/// ```
/// use semverkit::increment_identifier;
///
/// assert_eq!(Ok("RC013".to_owned()), increment_identifier("RC012"));
/// assert!(increment_identifier("RC-RC").is_err());
/// ```
pub fn increment_identifier(id: &str) -> Result<String, IncrementError> {
    let split = NumericSplit::find(id).ok_or_else(|| IncrementError::NoNumericPart {
        id: id.to_owned(),
    })?;

    if split.len() != id.len() {
        return Err(IncrementError::PartialMatch {
            id: id.to_owned(),
            matched: format!("{}{}{}", split.prefix, split.digits, split.suffix),
        });
    }

    let overflow = || IncrementError::IdentifierOverflow { id: id.to_owned() };
    let num = split
        .digits
        .parse::<u64>()
        .map_err(|_| overflow())?
        .checked_add(1)
        .ok_or_else(overflow)?;

    Ok(if split.prefix.is_empty() && split.suffix.is_empty() {
        num.to_string()
    } else {
        format!(
            "{}{:0width$}{}",
            split.prefix,
            num,
            split.suffix,
            width = split.digits.len()
        )
    })
}

impl Version {
    fn bump(&self, part: Part) -> Result<Self, IncrementError> {
        let value = self
            .part(part)
            .checked_add(1)
            .ok_or(IncrementError::PartOverflow(part))?;

        let mut next = self.clone();
        match part {
            Part::Major => (next.major, next.minor, next.patch) = (value, 0, 0),
            Part::Minor => (next.minor, next.patch) = (value, 0),
            Part::Patch => next.patch = value,
        }
        next.pre_release.clear();
        Ok(next)
    }

    fn bump_pre_release(&self) -> Result<Self, IncrementError> {
        let (last, rest) = self
            .pre_release
            .split_last()
            .ok_or(IncrementError::NoPreRelease)?;

        let mut pre_release = rest.to_vec();
        pre_release.push(increment_identifier(last)?);
        Ok(Self {
            pre_release,
            ..self.clone()
        })
    }

    /// Returns a new version with the given [`Increment`] applied. Build identifiers are never
    /// changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use semverkit::prelude::*;
    ///
    /// let version = Version::parse("1.2.3-rc.1+build5").unwrap();
    /// assert_eq!("2.0.0+build5", version.next(Increment::Major).unwrap().to_string());
    /// assert_eq!("1.2.3-rc.2+build5", version.next(Increment::Least).unwrap().to_string());
    /// ```
    ///
    /// # Errors
    ///
    /// - [`IncrementError::NoPreRelease`] when incrementing the pre-release identifiers of a
    ///   version without any.
    /// - Any error from [`increment_identifier`] on the last pre-release identifier.
    /// - [`IncrementError::PartOverflow`] if a numeric part is already `u64::MAX`.
    pub fn next(&self, increment: Increment) -> Result<Self, IncrementError> {
        debug!(version = %self, ?increment, "incrementing");
        match increment {
            Increment::None => Ok(self.clone()),
            Increment::Major => self.bump(Part::Major),
            Increment::Minor => self.bump(Part::Minor),
            Increment::Patch => self.bump(Part::Patch),
            Increment::PreRelease => self.bump_pre_release(),
            Increment::Least if self.has_pre_release() => self.bump_pre_release(),
            Increment::Least => self.bump(Part::Patch),
        }
    }

    /// Returns this version without the identifiers selected by `clear`.
    pub fn cleared(mut self, clear: ClearIds) -> Self {
        if clear.clears(IdGroup::PreRelease) {
            self.pre_release.clear();
        }
        if clear.clears(IdGroup::Build) {
            self.build.clear();
        }
        self
    }
}

/// Everything the incrementer does to one version.
///
/// The steps run in order: increment, clear, then replace identifiers. Replacing a group of
/// identifiers makes clearing that group redundant.
#[derive(Debug, Clone)]
pub struct IncrConfig {
    pub increment: Increment,
    pub clear: ClearIds,
    /// Replacement pre-release identifiers. Empty leaves them as they are.
    pub pre_release: Vec<String>,
    /// Replacement build identifiers. Empty leaves them as they are.
    pub build: Vec<String>,
    /// Make a release: clear the pre-release identifiers and skip the increment.
    pub release: bool,
    /// Make a release candidate: set the pre-release identifiers to `candidate_ids`. This
    /// replaces the pre-release identifiers, so it cannot be combined with an increment of them.
    pub release_candidate: bool,
    pub candidate_ids: Vec<String>,
}

impl Default for IncrConfig {
    fn default() -> Self {
        Self {
            increment: Increment::None,
            clear: ClearIds::None,
            pre_release: Vec::new(),
            build: Vec::new(),
            release: false,
            release_candidate: false,
            candidate_ids: vec!["rc".to_owned(), "1".to_owned()],
        }
    }
}

impl IncrConfig {
    /// Checks that the options do not contradict each other.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReleaseAndCandidate`] if both release toggles are set.
    /// - [`ConfigError::CandidateAndPreRelease`] if release-candidate is set along with explicit
    ///   pre-release identifiers.
    /// - [`ConfigError::CandidateAndPreReleaseIncrement`] if release-candidate is set along with
    ///   [`Increment::PreRelease`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.release && self.release_candidate {
            return Err(ConfigError::ReleaseAndCandidate);
        }
        if self.release_candidate && !self.pre_release.is_empty() {
            return Err(ConfigError::CandidateAndPreRelease);
        }
        if self.release_candidate && self.increment == Increment::PreRelease {
            return Err(ConfigError::CandidateAndPreReleaseIncrement);
        }
        Ok(())
    }

    /// Applies this configuration to `version`, checking any replacement identifiers against
    /// `rules`.
    ///
    /// # Errors
    ///
    /// Any failure is returned as is; there is no partially updated result. Besides the
    /// [`validate`](IncrConfig::validate) errors, release-candidate with [`Increment::Least`] is
    /// rejected for a version that has pre-release identifiers, since the least increment would
    /// then be discarded.
    pub fn apply(&self, version: &Version, rules: &IdRules) -> Result<Version, Error> {
        self.validate()?;
        if self.release_candidate && self.increment == Increment::Least && version.has_pre_release()
        {
            return Err(ConfigError::CandidateAndPreReleaseIncrement.into());
        }

        let (increment, clear) = if self.release {
            (Increment::None, ClearIds::PreRelease)
        } else {
            (self.increment, ClearIds::None)
        };
        let mut next = version.next(increment)?.cleared(clear).cleared(self.clear);

        let pre_release = if self.release_candidate {
            &self.candidate_ids
        } else {
            &self.pre_release
        };
        if !pre_release.is_empty() {
            next = next.with_pre_release(pre_release.iter().cloned())?;
            rules.pre_release.check(IdGroup::PreRelease, pre_release)?;
        }
        if !self.build.is_empty() {
            next = next.with_build(self.build.iter().cloned())?;
            rules.build.check(IdGroup::Build, &self.build)?;
        }

        debug!(from = %version, to = %next, "applied increment config");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ParseError, RuleViolationError},
        rules::{Rule, RuleSet},
    };
    use rstest::*;

    #[rstest]
    #[case("12", "13")]
    #[case("9", "10")]
    #[case("0", "1")]
    #[case("RC12", "RC13")]
    #[case("RC012", "RC013")]
    #[case("RC0012", "RC0013")]
    #[case("RC009XX", "RC010XX")]
    #[case("RC99", "RC100")]
    #[case("12-RC", "13-RC")]
    #[case("RC12-RC", "RC13-RC")]
    fn test_increment_identifier(#[case] id: &str, #[case] expected: &str) {
        assert_eq!(Ok(expected.to_owned()), increment_identifier(id));
    }

    #[test]
    fn test_increment_identifier_no_numeric_part() {
        let err = increment_identifier("RC-RC").unwrap_err();
        assert_eq!(
            IncrementError::NoNumericPart {
                id: "RC-RC".to_owned()
            },
            err
        );
        assert_eq!(
            "The pre-release identifier `RC-RC` has no numerical part",
            err.to_string()
        );
    }

    #[rstest]
    #[case("a1b2", "a1b")]
    #[case("1.2", "1.")]
    #[case("rc1-2", "rc1-")]
    fn test_increment_identifier_several_digit_runs(#[case] id: &str, #[case] matched: &str) {
        assert_eq!(
            Err(IncrementError::PartialMatch {
                id: id.to_owned(),
                matched: matched.to_owned(),
            }),
            increment_identifier(id)
        );
    }

    #[test]
    fn test_increment_identifier_overflow() {
        assert!(matches!(
            increment_identifier("18446744073709551615"),
            Err(IncrementError::IdentifierOverflow { .. })
        ));
    }

    #[fixture]
    fn version() -> Version {
        Version::parse("1.2.3-rc001+bID").unwrap()
    }

    #[rstest]
    #[case(Increment::Major, "2.0.0+bID")]
    #[case(Increment::Minor, "1.3.0+bID")]
    #[case(Increment::Patch, "1.2.4+bID")]
    #[case(Increment::PreRelease, "1.2.3-rc002+bID")]
    #[case(Increment::Least, "1.2.3-rc002+bID")]
    #[case(Increment::None, "1.2.3-rc001+bID")]
    fn test_next(version: Version, #[case] increment: Increment, #[case] expected: &str) {
        assert_eq!(expected, version.next(increment).unwrap().to_string());
    }

    #[test]
    fn test_next_major_keeps_build() {
        let version = Version::parse("1.2.3-rc.1+build5").unwrap();
        assert_eq!(
            Version::parse("2.0.0+build5").unwrap(),
            version.next(Increment::Major).unwrap()
        );
    }

    #[test]
    fn test_next_only_last_pre_release_id() {
        let version = Version::parse("1.0.0-rc.1.XX").unwrap();
        assert!(matches!(
            version.next(Increment::PreRelease),
            Err(IncrementError::NoNumericPart { id }) if id == "XX"
        ));

        let version = Version::parse("1.0.0-rc1.2").unwrap();
        assert_eq!(
            "1.0.0-rc1.3",
            version.next(Increment::PreRelease).unwrap().to_string()
        );
    }

    #[test]
    fn test_next_without_pre_release() {
        let version = Version::parse("1.2.3").unwrap();
        assert_eq!(
            Err(IncrementError::NoPreRelease),
            version.next(Increment::PreRelease)
        );
        assert_eq!("1.2.4", version.next(Increment::Least).unwrap().to_string());
    }

    #[test]
    fn test_next_is_greater() {
        let version = Version::parse("1.2.3-rc.1").unwrap();
        for increment in [
            Increment::Major,
            Increment::Minor,
            Increment::Patch,
            Increment::PreRelease,
            Increment::Least,
        ] {
            let next = version.next(increment).unwrap();
            assert!(version.precedes(&next), "{increment:?} gave {next}");
        }
    }

    #[test]
    fn test_part_overflow() {
        let version = Version::new(u64::MAX, 0, 0);
        assert_eq!(
            Err(IncrementError::PartOverflow(Part::Major)),
            version.next(Increment::Major)
        );
    }

    fn apply(config: IncrConfig) -> Result<Version, Error> {
        config.apply(
            &Version::parse("1.2.3-prID+bID").unwrap(),
            &IdRules::default(),
        )
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[rstest]
    #[case(ClearIds::All, &[], &[], "1.2.3")]
    #[case(ClearIds::PreRelease, &[], &[], "1.2.3+bID")]
    #[case(ClearIds::Build, &[], &[], "1.2.3-prID")]
    #[case(ClearIds::None, &[], &[], "1.2.3-prID+bID")]
    #[case(ClearIds::None, &["newPrID"], &[], "1.2.3-newPrID+bID")]
    #[case(ClearIds::None, &[], &["newBID"], "1.2.3-prID+newBID")]
    #[case(ClearIds::All, &["newPrID"], &[], "1.2.3-newPrID")]
    #[case(ClearIds::All, &[], &["newBID"], "1.2.3+newBID")]
    #[case(ClearIds::PreRelease, &["a", "1"], &["b"], "1.2.3-a.1+b")]
    fn test_set_ids(
        #[case] clear: ClearIds,
        #[case] pre_release: &[&str],
        #[case] build: &[&str],
        #[case] expected: &str,
    ) {
        let next = apply(IncrConfig {
            clear,
            pre_release: ids(pre_release),
            build: ids(build),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(expected, next.to_string());
    }

    #[test]
    fn test_release() {
        let next = apply(IncrConfig {
            increment: Increment::Major,
            release: true,
            ..Default::default()
        });
        assert_eq!("1.2.3+bID", next.unwrap().to_string());
    }

    #[test]
    fn test_release_candidate() {
        let next = apply(IncrConfig {
            increment: Increment::Minor,
            release_candidate: true,
            ..Default::default()
        });
        assert_eq!("1.3.0-rc.1+bID", next.unwrap().to_string());
    }

    #[test]
    fn test_contradictory_config() {
        let res = apply(IncrConfig {
            release: true,
            release_candidate: true,
            ..Default::default()
        });
        assert_eq!(Err(Error::Config(ConfigError::ReleaseAndCandidate)), res);

        let res = apply(IncrConfig {
            release_candidate: true,
            pre_release: ids(&["beta"]),
            ..Default::default()
        });
        assert_eq!(Err(Error::Config(ConfigError::CandidateAndPreRelease)), res);
    }

    #[rstest]
    #[case(Increment::PreRelease, "1.3.0-rc.1")]
    #[case(Increment::PreRelease, "1.3.0")]
    #[case(Increment::Least, "1.3.0-rc.1")]
    fn test_candidate_rejects_pre_release_increment(
        #[case] increment: Increment,
        #[case] version_str: &str,
    ) {
        let res = IncrConfig {
            increment,
            release_candidate: true,
            ..Default::default()
        }
        .apply(&Version::parse(version_str).unwrap(), &IdRules::default());
        assert_eq!(
            Err(Error::Config(ConfigError::CandidateAndPreReleaseIncrement)),
            res
        );
    }

    #[test]
    fn test_candidate_with_least_on_release() {
        let next = IncrConfig {
            increment: Increment::Least,
            release_candidate: true,
            ..Default::default()
        }
        .apply(&Version::new(1, 2, 3), &IdRules::default());
        assert_eq!("1.2.4-rc.1", next.unwrap().to_string());
    }

    #[test]
    fn test_replacement_ids_checked() {
        let res = apply(IncrConfig {
            pre_release: ids(&["new prID"]),
            ..Default::default()
        });
        assert!(matches!(
            res,
            Err(Error::Parse(ParseError::BadCharacter { ch: ' ', .. }))
        ));

        let rules = IdRules {
            build: RuleSet::new().with(Rule::matching("^[0-9]+$").unwrap()),
            ..Default::default()
        };
        let res = IncrConfig {
            build: ids(&["abc"]),
            ..Default::default()
        }
        .apply(&Version::new(1, 0, 0), &rules);
        assert!(matches!(
            res,
            Err(Error::RuleViolation(RuleViolationError {
                group: IdGroup::Build,
                ..
            }))
        ));
    }

    #[test]
    fn test_increment_error_is_fatal() {
        let res = IncrConfig {
            increment: Increment::PreRelease,
            ..Default::default()
        }
        .apply(&Version::new(1, 0, 0), &IdRules::default());
        assert_eq!(Err(Error::Increment(IncrementError::NoPreRelease)), res);
    }
}
