use crate::{
    error::{ConfigError, RuleViolationError, Violation},
    identifier::IdGroup,
    Version,
};
use core::fmt::{self, Display};
use regex::Regex;

/// A constraint on a list of identifiers, on top of the basic identifier syntax.
///
/// Patterns are unanchored: use `^` and `$` to match whole identifiers.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Every identifier must match the pattern.
    Matches(Regex),
    /// No identifier may match the pattern.
    NotMatches(Regex),
    /// There must be at least this many identifiers.
    MinCount(usize),
    /// There must be at most this many identifiers.
    MaxCount(usize),
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::BadPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

impl Rule {
    /// Returns a [`Rule::Matches`] rule.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::BadPattern`] if `pattern` is not a valid regular expression.
    pub fn matching(pattern: &str) -> Result<Self, ConfigError> {
        compile(pattern).map(Rule::Matches)
    }

    /// Returns a [`Rule::NotMatches`] rule.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::BadPattern`] if `pattern` is not a valid regular expression.
    pub fn not_matching(pattern: &str) -> Result<Self, ConfigError> {
        compile(pattern).map(Rule::NotMatches)
    }

    fn offenders<S: AsRef<str>>(ids: &[S], keep: impl Fn(&str) -> bool) -> Vec<String> {
        ids.iter()
            .map(|id| id.as_ref())
            .filter(|id| keep(*id))
            .map(str::to_owned)
            .collect()
    }

    /// Applies this rule, returning the violation if there is one.
    pub fn check<S: AsRef<str>>(&self, ids: &[S]) -> Option<Violation> {
        let violated = |offenders: Vec<String>| Violation {
            rule: self.to_string(),
            offenders,
        };

        match self {
            Rule::Matches(re) => Some(Self::offenders(ids, |id| !re.is_match(id)))
                .filter(|offenders| !offenders.is_empty())
                .map(violated),
            Rule::NotMatches(re) => Some(Self::offenders(ids, |id| re.is_match(id)))
                .filter(|offenders| !offenders.is_empty())
                .map(violated),
            Rule::MinCount(min) => (ids.len() < *min).then(|| violated(Vec::new())),
            Rule::MaxCount(max) => (ids.len() > *max).then(|| violated(Vec::new())),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Matches(re) => write!(f, "each identifier must match `{re}`"),
            Rule::NotMatches(re) => write!(f, "no identifier may match `{re}`"),
            Rule::MinCount(min) => write!(f, "there must be at least {min} identifier(s)"),
            Rule::MaxCount(max) => write!(f, "there must be at most {max} identifier(s)"),
        }
    }
}

/// An ordered collection of [`Rule`]s applied together to one list of identifiers.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this set with `rule` added.
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule to `ids`.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleViolationError`] listing every violated rule (not just the first) along
    /// with the identifiers that broke it.
    pub fn check<S: AsRef<str>>(
        &self,
        group: IdGroup,
        ids: &[S],
    ) -> Result<(), RuleViolationError> {
        let violations: Vec<Violation> = self.rules.iter().filter_map(|r| r.check(ids)).collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(RuleViolationError { group, violations })
        }
    }
}

/// Independently configured rules for the pre-release and build identifiers of a version.
#[derive(Debug, Clone, Default)]
pub struct IdRules {
    pub pre_release: RuleSet,
    pub build: RuleSet,
}

impl IdRules {
    /// Returns the rule set for the given group.
    pub fn for_group(&self, group: IdGroup) -> &RuleSet {
        match group {
            IdGroup::PreRelease => &self.pre_release,
            IdGroup::Build => &self.build,
        }
    }

    /// Checks the pre-release identifiers of `version`, then its build identifiers.
    ///
    /// # Errors
    ///
    /// Returns the [`RuleViolationError`] of the first group that breaks any rule.
    pub fn check(&self, version: &Version) -> Result<(), RuleViolationError> {
        [IdGroup::PreRelease, IdGroup::Build]
            .into_iter()
            .try_for_each(|group| self.for_group(group).check(group, version.ids(group)))
    }
}
