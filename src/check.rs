use crate::{
    error::{Error, SequenceError},
    rules::IdRules,
    sequence::check_sequence,
    Version,
};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Options for checking a list of version strings.
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    /// Print each version once it has passed its checks.
    pub print: bool,
    /// Check that the versions form a gap-free, strictly increasing sequence.
    pub check_sequence: bool,
    pub rules: IdRules,
}

/// Parses `version_str` and checks its identifiers against `rules`.
///
/// # Errors
///
/// Returns the [`ParseError`](crate::ParseError) or
/// [`RuleViolationError`](crate::RuleViolationError), wrapped in an [`Error`].
pub fn parse_checked(version_str: &str, rules: &IdRules) -> Result<Version, Error> {
    let version = Version::parse(version_str)?;
    rules.check(&version)?;
    Ok(version)
}

/// The result of checking a whole list.
#[derive(Debug)]
pub struct CheckReport {
    /// Every version that passed its checks, in input order.
    pub versions: Vec<Version>,
    pub sequence_errors: Vec<SequenceError>,
    /// True if any entry was rejected or the sequence was bad.
    pub failed: bool,
}

/// Checks version strings one at a time, so input can be consumed as it arrives.
///
/// Rejected entries are reported to `out` and left out of the list; checking carries on with the
/// next entry. The sequence check, if configured, runs over the accepted versions in
/// [`Checker::finish`].
pub struct Checker<'c, W> {
    config: &'c CheckConfig,
    out: W,
    versions: Vec<Version>,
    seen: usize,
    failed: bool,
}

impl<'c, W: Write> Checker<'c, W> {
    pub fn new(config: &'c CheckConfig, out: W) -> Self {
        Self {
            config,
            out,
            versions: Vec::new(),
            seen: 0,
            failed: false,
        }
    }

    /// Checks the next candidate. Returns whether it was accepted.
    ///
    /// # Errors
    ///
    /// Only fails if writing to the output fails.
    pub fn push(&mut self, candidate: &str) -> io::Result<bool> {
        self.seen += 1;
        match parse_checked(candidate, &self.config.rules) {
            Ok(version) => {
                if self.config.print {
                    writeln!(self.out, "{version}")?;
                }
                self.versions.push(version);
                Ok(true)
            }
            Err(err) => {
                debug!(candidate, %err, "rejected version");
                self.failed = true;
                writeln!(self.out, "Bad version: {} : '{}'", self.seen, candidate)?;
                writeln!(self.out, "    {err}")?;
                Ok(false)
            }
        }
    }

    /// Checks every line of `input` as a candidate, as is. Blank lines are bad entries, so a
    /// reported entry number is always the line number.
    ///
    /// # Errors
    ///
    /// Fails if reading the input or writing to the output fails.
    pub fn push_lines<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            self.push(&line?)?;
        }
        Ok(())
    }

    /// Runs the sequence check, if configured, and reports the outcome of the whole run.
    ///
    /// # Errors
    ///
    /// Only fails if writing to the output fails.
    pub fn finish(mut self) -> io::Result<CheckReport> {
        let sequence_errors = if self.config.check_sequence {
            check_sequence(&self.versions)
        } else {
            Vec::new()
        };
        for err in &sequence_errors {
            writeln!(self.out, "{err}")?;
        }

        Ok(CheckReport {
            failed: self.failed || !sequence_errors.is_empty(),
            versions: self.versions,
            sequence_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleSet};

    fn run(config: &CheckConfig, candidates: &[&str]) -> (CheckReport, String) {
        let mut out = Vec::new();
        let mut checker = Checker::new(config, &mut out);
        for candidate in candidates {
            checker.push(candidate).unwrap();
        }
        let report = checker.finish().unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_good_list() {
        let config = CheckConfig {
            print: true,
            check_sequence: true,
            ..Default::default()
        };
        let (report, out) = run(&config, &["v1.0.0", "1.0.1", "1.1.0-rc.1", "1.1.0"]);
        assert!(!report.failed);
        assert_eq!(4, report.versions.len());
        assert_eq!("1.0.0\n1.0.1\n1.1.0-rc.1\n1.1.0\n", out);
    }

    #[test]
    fn test_bad_entry_dropped_and_reported() {
        let config = CheckConfig::default();
        let (report, out) = run(&config, &["1.0.0", "1.0", "1.0.1"]);
        assert!(report.failed);
        assert_eq!(2, report.versions.len());
        assert_eq!(
            "Bad version: 2 : '1.0'\n    Version `1.0` should have exactly three \
             dot-separated core parts (major.minor.patch), but has 2\n",
            out
        );
    }

    #[test]
    fn test_rules_applied() {
        let config = CheckConfig {
            rules: IdRules {
                pre_release: RuleSet::new()
                    .with(Rule::matching("^(alpha|beta|rc|[0-9]+)$").unwrap()),
                ..Default::default()
            },
            ..Default::default()
        };
        let (report, out) = run(&config, &["1.0.0-rc.1", "1.0.0-gamma.1"]);
        assert!(report.failed);
        assert_eq!(1, report.versions.len());
        assert!(out.contains("(offending: `gamma`)"), "{out}");
    }

    #[test]
    fn test_sequence_errors_accumulate() {
        let config = CheckConfig {
            check_sequence: true,
            ..Default::default()
        };
        let (report, out) = run(&config, &["1.0.0", "1.2.0", "1.2.0", "1.3.0"]);
        assert!(report.failed);
        assert_eq!(2, report.sequence_errors.len());
        assert_eq!(2, out.lines().count());
    }

    #[test]
    fn test_lines_numbered_as_read() {
        let config = CheckConfig {
            print: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        let mut checker = Checker::new(&config, &mut out);
        checker
            .push_lines(&b"1.0.0\n\nbad\n1.0.1 \n1.0.2\n"[..])
            .unwrap();
        let report = checker.finish().unwrap();
        assert!(report.failed);
        assert_eq!(2, report.versions.len());
        assert_eq!(
            "1.0.0\n\
             Bad version: 2 : ''\n    Version string should not be empty\n\
             Bad version: 3 : 'bad'\n    Version `bad` should have exactly three \
             dot-separated core parts (major.minor.patch), but has 1\n\
             Bad version: 4 : '1.0.1 '\n    The patch version `1 ` should be a non-negative \
             integer\n\
             1.0.2\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_sequence_not_checked_unless_asked() {
        let (report, out) = run(&CheckConfig::default(), &["2.0.0", "1.0.0"]);
        assert!(!report.failed);
        assert!(out.is_empty());
    }
}
