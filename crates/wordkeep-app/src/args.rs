//! Command-line argument parsing for the wordkeep binary.

use std::env;
use std::path::PathBuf;

/// Default log destination; the terminal itself is in raw mode.
pub const DEFAULT_LOG_PATH: &str = "wordkeep.log";

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    /// JSON difficulty table replacing the built-in one.
    pub levels_path: Option<PathBuf>,
    /// RNG seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    pub log_path: PathBuf,
    /// Whether help was requested (or arguments were bad).
    pub show_help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            levels_path: None,
            seed: None,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            show_help: false,
        }
    }
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse from an explicit argument list (program name excluded).
    pub fn parse_from<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = Self::default();
        let mut iter = iter.into_iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            match flag.as_str() {
                "--help" | "-h" => {
                    args.show_help = true;
                }
                "--levels" | "--seed" | "--log" => {
                    let Some(value) = inline.or_else(|| iter.next()) else {
                        eprintln!("{flag} requires an argument");
                        args.show_help = true;
                        continue;
                    };
                    match flag.as_str() {
                        "--levels" => args.levels_path = Some(PathBuf::from(value)),
                        "--log" => args.log_path = PathBuf::from(value),
                        _ => match value.parse::<u64>() {
                            Ok(seed) => args.seed = Some(seed),
                            Err(_) => {
                                eprintln!("Invalid seed: {value}");
                                args.show_help = true;
                            }
                        },
                    }
                }
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    args.show_help = true;
                }
            }
        }

        args
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  wordkeep [--levels <file.json>] [--seed <n>] [--log <path>]\n\n\
             Flags:\n\
             \x20 --levels <file>    Load the difficulty table from JSON\n\
             \x20 --seed <n>         Fix the RNG seed (same seed, same game)\n\
             \x20 --log <path>       Log file (default {DEFAULT_LOG_PATH}); filter with RUST_LOG\n\
             \x20 -h, --help         Show this help\n\n\
             Keys:\n\
             \x20 Enter              Start / play again\n\
             \x20 Tab                Pause / resume\n\
             \x20 Esc, Ctrl-C        Quit\n"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert!(args.levels_path.is_none());
        assert!(args.seed.is_none());
        assert_eq!(args.log_path, PathBuf::from(DEFAULT_LOG_PATH));
        assert!(!args.show_help);
    }

    #[test]
    fn test_flags_with_separate_and_inline_values() {
        let args = parse(&["--levels", "words.json", "--seed=99", "--log", "/tmp/w.log"]);
        assert_eq!(args.levels_path, Some(PathBuf::from("words.json")));
        assert_eq!(args.seed, Some(99));
        assert_eq!(args.log_path, PathBuf::from("/tmp/w.log"));
        assert!(!args.show_help);
    }

    #[test]
    fn test_bad_input_requests_help() {
        assert!(parse(&["--seed", "soon"]).show_help);
        assert!(parse(&["--levels"]).show_help);
        assert!(parse(&["--fast"]).show_help);
        assert!(parse(&["-h"]).show_help);
    }
}
