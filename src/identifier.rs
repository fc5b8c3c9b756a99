use crate::error::ParseError;
use core::{
    cmp::Ordering,
    fmt::{self, Display},
};

/// The two groups of dot-separated identifiers a version may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdGroup {
    /// Identifiers after the `-`. They take part in precedence.
    PreRelease,
    /// Identifiers after the `+`. They never take part in precedence.
    Build,
}

impl IdGroup {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            IdGroup::PreRelease => "pre-release",
            IdGroup::Build => "build",
        }
    }
}

impl Display for IdGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the identifier is made up of ASCII digits only.
pub fn is_numeric(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Checks a single identifier of the given group.
///
/// All identifiers must be non-empty and consist of ASCII alphanumerics and hyphens. Numeric
/// pre-release identifiers must not have leading zeros; build identifiers may (e.g. `+001`).
pub fn validate(group: IdGroup, id: &str) -> Result<(), ParseError> {
    if id.is_empty() {
        return Err(ParseError::EmptyIdentifier { group });
    }

    if let Some(ch) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
        return Err(ParseError::BadCharacter {
            group,
            id: id.to_owned(),
            ch,
        });
    }

    if group == IdGroup::PreRelease && id.len() > 1 && id.starts_with('0') && is_numeric(id) {
        return Err(ParseError::NumericLeadingZero {
            group,
            id: id.to_owned(),
        });
    }

    Ok(())
}

/// Checks every identifier in `ids`, returning the first problem found.
pub fn validate_all<S: AsRef<str>>(group: IdGroup, ids: &[S]) -> Result<(), ParseError> {
    ids.iter().try_for_each(|id| validate(group, id.as_ref()))
}

/// Splits the text following a `-` or `+` into validated identifiers.
pub(crate) fn split(group: IdGroup, text: &str) -> Result<Vec<String>, ParseError> {
    text.split('.')
        .map(|id| validate(group, id).map(|_| id.to_owned()))
        .collect()
}

/// Compares two numeric identifiers by value without parsing them, so that arbitrarily long digit
/// strings still compare correctly.
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compares two pre-release identifiers by precedence.
///
/// Numeric identifiers always have lower precedence than alphanumeric ones. Two numeric
/// identifiers compare numerically and two alphanumeric identifiers compare by ASCII order.
pub fn cmp_identifier(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => cmp_numeric(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // str ordering is bytewise, which is ASCII order for valid identifiers
        (false, false) => a.cmp(b),
    }
}

/// Compares two non-empty lists of pre-release identifiers element by element. If one list is a
/// strict prefix of the other, the shorter one has lower precedence.
pub fn cmp_pre_release<S: AsRef<str>>(a: &[S], b: &[S]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| cmp_identifier(x.as_ref(), y.as_ref()))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}
