use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use semverkit::{
    CheckConfig, Checker, ClearIds, ConfigError, Error, IdRules, IncrConfig, Increment, Rule,
    RuleSet, SortConfig, Sorter, Version,
};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, Debug)]
enum PartArg {
    None,
    Major,
    Minor,
    Patch,
    PreRelease,
    Least,
}

impl PartArg {
    fn to_increment(self) -> Increment {
        match self {
            PartArg::None => Increment::None,
            PartArg::Major => Increment::Major,
            PartArg::Minor => Increment::Minor,
            PartArg::Patch => Increment::Patch,
            PartArg::PreRelease => Increment::PreRelease,
            PartArg::Least => Increment::Least,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, Debug)]
enum ClearArg {
    None,
    All,
    PreRelease,
    Build,
}

impl ClearArg {
    fn to_clear_ids(self) -> ClearIds {
        match self {
            ClearArg::None => ClearIds::None,
            ClearArg::All => ClearIds::All,
            ClearArg::PreRelease => ClearIds::PreRelease,
            ClearArg::Build => ClearIds::Build,
        }
    }
}

/// Extra constraints on identifiers, on top of the semver syntax
#[derive(Args, Debug)]
struct RuleArgs {
    /// Each pre-release identifier must match this pattern
    #[arg(long, value_name = "REGEX", env = "SEMVERKIT_PRE_RELEASE_PATTERN")]
    pre_release_pattern: Option<String>,

    /// No pre-release identifier may match this pattern
    #[arg(long, value_name = "REGEX", env = "SEMVERKIT_PRE_RELEASE_FORBID")]
    pre_release_forbid: Option<String>,

    /// The least number of pre-release identifiers allowed
    #[arg(long, value_name = "N", env = "SEMVERKIT_PRE_RELEASE_MIN")]
    pre_release_min: Option<usize>,

    /// The greatest number of pre-release identifiers allowed
    #[arg(long, value_name = "N", env = "SEMVERKIT_PRE_RELEASE_MAX")]
    pre_release_max: Option<usize>,

    /// Each build identifier must match this pattern
    #[arg(long, value_name = "REGEX", env = "SEMVERKIT_BUILD_PATTERN")]
    build_pattern: Option<String>,

    /// No build identifier may match this pattern
    #[arg(long, value_name = "REGEX", env = "SEMVERKIT_BUILD_FORBID")]
    build_forbid: Option<String>,

    /// The least number of build identifiers allowed
    #[arg(long, value_name = "N", env = "SEMVERKIT_BUILD_MIN")]
    build_min: Option<usize>,

    /// The greatest number of build identifiers allowed
    #[arg(long, value_name = "N", env = "SEMVERKIT_BUILD_MAX")]
    build_max: Option<usize>,
}

fn rule_set(
    pattern: Option<&str>,
    forbid: Option<&str>,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<RuleSet, ConfigError> {
    let mut rules = RuleSet::new();
    if let Some(pattern) = pattern {
        rules.push(Rule::matching(pattern)?);
    }
    if let Some(pattern) = forbid {
        rules.push(Rule::not_matching(pattern)?);
    }
    if let Some(min) = min {
        rules.push(Rule::MinCount(min));
    }
    if let Some(max) = max {
        rules.push(Rule::MaxCount(max));
    }
    Ok(rules)
}

impl RuleArgs {
    fn to_rules(&self) -> Result<IdRules, ConfigError> {
        Ok(IdRules {
            pre_release: rule_set(
                self.pre_release_pattern.as_deref(),
                self.pre_release_forbid.as_deref(),
                self.pre_release_min,
                self.pre_release_max,
            )?,
            build: rule_set(
                self.build_pattern.as_deref(),
                self.build_forbid.as_deref(),
                self.build_min,
                self.build_max,
            )?,
        })
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// The versions to check. Read one per line from stdin if omitted.
    versions: Vec<String>,

    /// Print each version after it passes its checks
    #[arg(short, long, env = "SEMVERKIT_PRINT")]
    print: bool,

    /// Check that the versions form a strictly increasing sequence without gaps
    #[arg(short, long, env = "SEMVERKIT_CHECK_SEQUENCE")]
    sequence: bool,

    #[command(flatten)]
    rules: RuleArgs,
}

impl CheckArgs {
    fn to_config(&self) -> Result<CheckConfig, ConfigError> {
        Ok(CheckConfig {
            print: self.print,
            check_sequence: self.sequence,
            rules: self.rules.to_rules()?,
        })
    }
}

#[derive(Args, Debug)]
struct IncrArgs {
    /// The version to increment
    version: String,

    /// The part of the version to increment
    #[arg(short, long, value_enum, default_value_t = PartArg::Patch, env = "SEMVERKIT_PART")]
    part: PartArg,

    /// The identifiers to remove after incrementing
    #[arg(short, long, value_enum, default_value_t = ClearArg::None, env = "SEMVERKIT_CLEAR")]
    clear: ClearArg,

    /// Replace the pre-release identifiers with these (dot-separated)
    #[arg(long, value_name = "IDS", value_delimiter = '.')]
    pre_release: Vec<String>,

    /// Replace the build identifiers with these (dot-separated)
    #[arg(long, value_name = "IDS", value_delimiter = '.')]
    build: Vec<String>,

    /// Make a release: drop the pre-release identifiers without incrementing
    #[arg(long, conflicts_with = "release_candidate")]
    release: bool,

    /// Make a release candidate: set the pre-release identifiers to the candidate identifiers
    #[arg(long = "rc", conflicts_with = "pre_release")]
    release_candidate: bool,

    /// The pre-release identifiers of a release candidate (dot-separated)
    #[arg(
        long,
        value_name = "IDS",
        value_delimiter = '.',
        default_value = "rc.1",
        env = "SEMVERKIT_RC_IDS"
    )]
    rc_ids: Vec<String>,

    #[command(flatten)]
    rules: RuleArgs,
}

impl IncrArgs {
    fn to_config(&self) -> IncrConfig {
        IncrConfig {
            increment: self.part.to_increment(),
            clear: self.clear.to_clear_ids(),
            pre_release: self.pre_release.clone(),
            build: self.build.clone(),
            release: self.release,
            release_candidate: self.release_candidate,
            candidate_ids: self.rc_ids.clone(),
        }
    }

    fn next_version(&self) -> Result<Version, Error> {
        let rules = self.rules.to_rules()?;
        let version = semverkit::parse_checked(&self.version, &rules)?;
        self.to_config().apply(&version, &rules)
    }
}

#[derive(Args, Debug)]
struct SortArgs {
    /// The versions to sort. Read one per line from stdin if omitted, where any text after the
    /// version is kept with it.
    versions: Vec<String>,

    /// Sort highest first
    #[arg(short, long, env = "SEMVERKIT_REVERSE")]
    reverse: bool,

    /// Report strings that are not valid versions
    #[arg(long, env = "SEMVERKIT_REPORT_BAD_VERSION")]
    report_bad_version: bool,

    /// Leave out versions with pre-release identifiers
    #[arg(long, visible_alias = "no-pr", env = "SEMVERKIT_IGNORE_PRE_RELEASE")]
    ignore_pre_release: bool,

    /// Don't print the text that followed each version on its line
    #[arg(long, env = "SEMVERKIT_HIDE_TRAILING_TEXT")]
    hide_trailing_text: bool,

    /// Set aside text matching this pattern at the start of each version before parsing it
    #[arg(long, value_name = "REGEX", env = "SEMVERKIT_IGNORED_PREFIX")]
    ignored_prefix: Option<String>,

    /// Don't print the ignored prefix
    #[arg(long, env = "SEMVERKIT_HIDE_IGNORED_PREFIX")]
    hide_ignored_prefix: bool,
}

impl SortArgs {
    fn to_config(&self) -> Result<SortConfig, ConfigError> {
        let ignored_prefix = self
            .ignored_prefix
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::BadPattern {
                    pattern: pattern.to_owned(),
                    source,
                })
            })
            .transpose()?;

        Ok(SortConfig {
            reverse: self.reverse,
            report_bad: self.report_bad_version,
            ignore_pre_release: self.ignore_pre_release,
            hide_trailing_text: self.hide_trailing_text,
            ignored_prefix,
            hide_ignored_prefix: self.hide_ignored_prefix,
        })
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log what the tools decide, to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Checks that versions are valid, and optionally that they form a proper sequence
    Check(CheckArgs),

    /// Prints the next version after `VERSION`
    ///
    /// The increment runs first, then clearing, then replacing identifiers.
    Incr(IncrArgs),

    /// Sorts versions by precedence
    Sort(SortArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SEMVERKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a subscriber may already be installed (e.g. under test)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match do_work(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn exit_code(failed: bool) -> i32 {
    i32::from(failed)
}

fn do_work(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Commands::Check(args) => {
            let config = args.to_config()?;
            let mut checker = Checker::new(&config, io::stdout().lock());
            if args.versions.is_empty() {
                checker.push_lines(io::stdin().lock())?;
            } else {
                for candidate in &args.versions {
                    checker.push(candidate)?;
                }
            }
            Ok(exit_code(checker.finish()?.failed))
        }
        Commands::Incr(args) => match args.next_version() {
            Ok(next) => {
                println!("{next}");
                Ok(0)
            }
            Err(err) => {
                eprintln!("{} : {err}", args.version);
                Ok(1)
            }
        },
        Commands::Sort(args) => {
            let config = args.to_config()?;
            let mut sorter = Sorter::new(&config, io::stderr().lock());
            if args.versions.is_empty() {
                for line in io::stdin().lock().lines() {
                    sorter.push_line(&line?)?;
                }
            } else {
                for candidate in &args.versions {
                    sorter.push_str(candidate)?;
                }
            }
            let report = sorter.finish();

            let mut out = io::stdout().lock();
            for line in &report.lines {
                writeln!(out, "{line}")?;
            }
            Ok(exit_code(report.failed))
        }
    }
}
