use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "unpak")]
#[command(version)]
#[command(about = "A Rust extractor for idTech 2 PACK (.pak) archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  unpak pak0.pak -d baseq2            extract everything into baseq2/\n  \
  unpak pak0.pak 'maps/*.bsp' -d out  extract only the maps\n  \
  unpak -p pak0.pak default.cfg       send default.cfg to stdout\n  \
  unpak -v pak0.pak                   list entries with offsets and sizes")]
pub struct Cli {
    /// PAK file path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Entries to extract, by name or glob pattern (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely: header, offsets and sizes
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract entries to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract entries into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Exclude entries that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Log parser and extractor diagnostics
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Maximum level for the log subscriber.
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else if self.is_very_quiet() {
            tracing::Level::ERROR
        } else if self.is_quiet() {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }

    /// Destination root for extracted entries.
    pub fn output_root(&self) -> &Path {
        self.extract_dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Whether the user limited extraction to particular entries.
    pub fn has_selection(&self) -> bool {
        !self.files.is_empty() || !self.exclude.is_empty()
    }

    /// Whether `name` is selected by the positional patterns and not excluded.
    ///
    /// A pattern with `*` or `?` is matched against the full entry name;
    /// a plain pattern matches the full name or its last path component.
    pub fn selects(&self, name: &str) -> bool {
        if !self.files.is_empty() && !self.files.iter().any(|f| pattern_matches(f, name)) {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|x| name.contains(x.as_str()) || glob_match(x, name))
    }

    /// Plain (non-glob) patterns that match none of `names`.
    pub fn unmatched<'a>(&'a self, names: &[&str]) -> Vec<&'a str> {
        self.files
            .iter()
            .filter(|f| !has_glob_chars(f))
            .filter(|f| !names.iter().any(|n| pattern_matches(f, n)))
            .map(String::as_str)
            .collect()
    }
}

fn pattern_matches(pattern: &str, name: &str) -> bool {
    if has_glob_chars(pattern) {
        glob_match(pattern, name)
    } else {
        let basename = name.rsplit(['/', '\\']).next().unwrap_or(name);
        name == pattern || basename == pattern
    }
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters, `/` included
/// - `?` matches exactly one character
///
/// Only the most recent `*` is ever retried, so matching stays
/// O(pattern * text) however many stars the pattern has.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text position it is matched up to
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                // Let the last star absorb one more character
                Some((sp, st)) => {
                    star = Some((sp, st + 1));
                    p = sp + 1;
                    t = st + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
