use crate::Version;
use regex::Regex;
use std::{
    collections::{HashMap, VecDeque},
    io::{self, Write},
};
use tracing::{debug, trace};

/// Options for sorting a list of version strings.
#[derive(Debug, Clone, Default)]
pub struct SortConfig {
    /// Sort highest precedence first.
    pub reverse: bool,
    /// Report strings that are not versions instead of silently dropping them.
    pub report_bad: bool,
    /// Drop versions that have pre-release identifiers.
    pub ignore_pre_release: bool,
    /// Don't re-emit the text following a version on its line.
    pub hide_trailing_text: bool,
    /// Text matching this pattern at the start of a line's first word is set aside before
    /// parsing.
    pub ignored_prefix: Option<Regex>,
    /// Don't re-emit the ignored prefix.
    pub hide_ignored_prefix: bool,
}

/// Sorts versions by precedence. The sort is stable in both directions: versions of equal
/// precedence stay in their original relative order.
pub fn sort_versions(versions: &mut [Version], reverse: bool) {
    if reverse {
        versions.sort_by(|a, b| b.cmp_precedence(a));
    } else {
        versions.sort_by(Version::cmp_precedence);
    }
}

/// The non-version text found around a version on an input line.
#[derive(Debug, Clone, Default)]
struct Surroundings {
    prefix: String,
    trailing: String,
}

/// The result of a sort run.
#[derive(Debug)]
pub struct SortReport {
    /// The output lines, in sorted order.
    pub lines: Vec<String>,
    /// True if any input could not be parsed.
    pub failed: bool,
}

/// Collects version strings and sorts them.
///
/// Each line's surrounding text is queued under the version's canonical rendering. Several lines
/// may render the same, so on output each is given the text queued first, which (as the sort is
/// stable) is the text from the line it came from.
pub struct Sorter<'c, W> {
    config: &'c SortConfig,
    err_out: W,
    versions: Vec<Version>,
    surroundings: HashMap<String, VecDeque<Surroundings>>,
    failed: bool,
}

impl<'c, W: Write> Sorter<'c, W> {
    pub fn new(config: &'c SortConfig, err_out: W) -> Self {
        Self {
            config,
            err_out,
            versions: Vec::new(),
            surroundings: HashMap::new(),
            failed: false,
        }
    }

    /// Adds a line of input. The first word on the line is taken as the version; everything
    /// from the whitespace after it is trailing text. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Only fails if reporting a bad version fails.
    pub fn push_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim_start();
        if line.is_empty() {
            return Ok(());
        }
        let word_len = line.find(char::is_whitespace).unwrap_or(line.len());
        let (word, trailing) = line.split_at(word_len);
        self.push_parts(word, trailing)
    }

    /// Adds a single version string with no trailing text, such as a command-line argument.
    ///
    /// # Errors
    ///
    /// Only fails if reporting a bad version fails.
    pub fn push_str(&mut self, candidate: &str) -> io::Result<()> {
        self.push_parts(candidate, "")
    }

    fn split_prefix<'t>(&self, word: &'t str) -> (&'t str, &'t str) {
        match self.config.ignored_prefix.as_ref().and_then(|re| re.find(word)) {
            Some(m) if m.start() == 0 => word.split_at(m.end()),
            _ => ("", word),
        }
    }

    fn push_parts(&mut self, word: &str, trailing: &str) -> io::Result<()> {
        let (prefix, candidate) = self.split_prefix(word);
        let version = match Version::parse(candidate) {
            Ok(version) => version,
            Err(err) => {
                debug!(candidate, %err, "dropping bad version");
                self.failed = true;
                if self.config.report_bad {
                    writeln!(self.err_out, "{candidate} : {err}")?;
                }
                return Ok(());
            }
        };

        if self.config.ignore_pre_release && version.has_pre_release() {
            trace!(%version, "dropping pre-release version");
            return Ok(());
        }

        self.surroundings
            .entry(version.to_string())
            .or_default()
            .push_back(Surroundings {
                prefix: prefix.to_owned(),
                trailing: trailing.to_owned(),
            });
        self.versions.push(version);
        Ok(())
    }

    /// Sorts everything pushed so far and renders the output lines.
    pub fn finish(self) -> SortReport {
        let Self {
            config,
            mut versions,
            mut surroundings,
            failed,
            ..
        } = self;

        sort_versions(&mut versions, config.reverse);

        let lines = versions
            .iter()
            .map(|version| {
                let around = surroundings
                    .get_mut(&version.to_string())
                    .and_then(VecDeque::pop_front)
                    .unwrap_or_default();
                let prefix = if config.hide_ignored_prefix {
                    ""
                } else {
                    around.prefix.as_str()
                };
                let trailing = if config.hide_trailing_text {
                    ""
                } else {
                    around.trailing.as_str()
                };
                format!("{prefix}{version}{trailing}")
            })
            .collect();

        SortReport { lines, failed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::rstest;

    fn sort_lines(config: &SortConfig, lines: &[&str]) -> (SortReport, String) {
        let mut err_out = Vec::new();
        let mut sorter = Sorter::new(config, &mut err_out);
        for line in lines {
            sorter.push_line(line).unwrap();
        }
        let report = sorter.finish();
        (report, String::from_utf8(err_out).unwrap())
    }

    #[rstest]
    #[case(false, &["1.2.3", "2.3.4"])]
    #[case(true, &["2.3.4", "1.2.3"])]
    fn test_sort(#[case] reverse: bool, #[case] expected: &[&str]) {
        let config = SortConfig {
            reverse,
            ..Default::default()
        };
        let (report, _) = sort_lines(&config, &["2.3.4", "1.2.3"]);
        assert_eq!(expected, report.lines);
        assert!(!report.failed);
    }

    #[test]
    fn test_sort_by_precedence_not_text() {
        let (report, _) = sort_lines(
            &SortConfig::default(),
            &["1.10.0", "1.2.0", "1.2.0-rc.10", "1.2.0-rc.9", "1.2.0-alpha"],
        );
        assert_eq!(
            vec!["1.2.0-alpha", "1.2.0-rc.9", "1.2.0-rc.10", "1.2.0", "1.10.0"],
            report.lines
        );
    }

    #[test]
    fn test_sort_versions_stable() {
        let mut versions: Vec<Version> = ["1.0.0+c", "0.1.0", "1.0.0+a", "1.0.0+b"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        sort_versions(&mut versions, false);
        assert_eq!("0.1.0,1.0.0+c,1.0.0+a,1.0.0+b", versions.iter().join(","));

        sort_versions(&mut versions, true);
        assert_eq!("1.0.0+c,1.0.0+a,1.0.0+b,0.1.0", versions.iter().join(","));
    }

    #[test]
    fn test_trailing_text_follows_duplicates() {
        let lines = [
            "1.0.0 first",
            "  0.9.0\tolder",
            "1.0.0+b second",
            "v1.0.0 third",
        ];
        let (report, _) = sort_lines(&SortConfig::default(), &lines);
        assert_eq!(
            vec!["0.9.0\tolder", "1.0.0 first", "1.0.0+b second", "1.0.0 third"],
            report.lines
        );

        let config = SortConfig {
            reverse: true,
            ..Default::default()
        };
        let (report, _) = sort_lines(&config, &lines);
        assert_eq!(
            vec!["1.0.0 first", "1.0.0+b second", "1.0.0 third", "0.9.0\tolder"],
            report.lines
        );

        let config = SortConfig {
            hide_trailing_text: true,
            ..Default::default()
        };
        let (report, _) = sort_lines(&config, &lines);
        assert_eq!(vec!["0.9.0", "1.0.0", "1.0.0+b", "1.0.0"], report.lines);
    }

    #[test]
    fn test_ignore_pre_release() {
        let config = SortConfig {
            ignore_pre_release: true,
            ..Default::default()
        };
        let (report, _) = sort_lines(&config, &["v1.2.3", "v2.3.4-rc.1", "v2.3.4"]);
        assert_eq!(vec!["1.2.3", "2.3.4"], report.lines);
        assert!(!report.failed);
    }

    #[rstest]
    #[case(false, "")]
    #[case(
        true,
        "v2.3.4.1 : Version `v2.3.4.1` should have exactly three dot-separated core parts \
         (major.minor.patch), but has 4\n"
    )]
    fn test_bad_versions_dropped(#[case] report_bad: bool, #[case] expected_err: &str) {
        let config = SortConfig {
            report_bad,
            ..Default::default()
        };
        let (report, err_out) = sort_lines(&config, &["v1.2.3", "v2.3.4.1", "", "v2.3.4"]);
        assert_eq!(vec!["1.2.3", "2.3.4"], report.lines);
        assert!(report.failed);
        assert_eq!(expected_err, err_out);
    }

    #[test]
    fn test_ignored_prefix() {
        let mut config = SortConfig {
            ignored_prefix: Some(Regex::new("^release-").unwrap()),
            ..Default::default()
        };
        let lines = ["release-2.0.0 b", "release-1.0.0 a", "1.5.0"];

        let (report, _) = sort_lines(&config, &lines);
        assert_eq!(
            vec!["release-1.0.0 a", "1.5.0", "release-2.0.0 b"],
            report.lines
        );

        config.hide_ignored_prefix = true;
        let (report, _) = sort_lines(&config, &lines);
        assert_eq!(vec!["1.0.0 a", "1.5.0", "2.0.0 b"], report.lines);
    }

    #[test]
    fn test_push_str_whole_argument() {
        let config = SortConfig::default();
        let mut sorter = Sorter::new(&config, io::sink());
        sorter.push_str("2.0.0").unwrap();
        sorter.push_str("1.0.0 trailing").unwrap();
        let report = sorter.finish();
        assert_eq!(vec!["2.0.0"], report.lines);
        assert!(report.failed);
    }
}
