//! Checks seedling config files without starting the app.
//!
//! Exit status is 0 when every file is valid, 1 otherwise.

use clap::Parser;
use seedling_config::{load_config, ConfigError, Settings, CURRENT_CONFIG_VERSION};
use seedling_util::default_config_path;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "validate-config", version)]
#[command(about = "Check seedling configuration files", long_about = None)]
struct Args {
    /// Files to check (default: ~/.config/seedling/config.toml)
    files: Vec<PathBuf>,

    /// Only report files with problems
    #[arg(short, long)]
    quiet: bool,
}

fn describe(settings: &Settings) -> String {
    format!(
        "backend={} key={} data_dir={} log_level={}",
        settings.storage.backend,
        settings.storage.key,
        settings.storage.data_dir.display(),
        settings.log_level
    )
}

fn problems(error: &ConfigError) -> Vec<String> {
    match error {
        ConfigError::ReadError(e) => vec![format!("cannot read: {}", e)],
        ConfigError::ParseError(e) => vec![format!("not valid TOML: {}", e)],
        ConfigError::UnsupportedVersion(v) => vec![format!(
            "config_version {} is not supported (this build reads {})",
            v, CURRENT_CONFIG_VERSION
        )],
        ConfigError::ValidationFailed { errors } => errors.iter().map(ToString::to_string).collect(),
    }
}

fn check(path: &Path, quiet: bool) -> bool {
    match load_config(path) {
        Ok(settings) => {
            if !quiet {
                println!("ok    {}  ({})", path.display(), describe(&settings));
            }
            true
        }
        Err(e) => {
            eprintln!("FAIL  {}", path.display());
            for problem in problems(&e) {
                eprintln!("      {}", problem);
            }
            false
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let files = if args.files.is_empty() {
        vec![default_config_path()]
    } else {
        args.files
    };

    let failed = files.iter().filter(|path| !check(path, args.quiet)).count();
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_config::parse_config;

    #[test]
    fn test_problems_lists_each_validation_error() {
        let err = parse_config("config_version = 1\n[storage]\nbackend = \"floppy\"\nkey = \"\"\n").unwrap_err();
        assert!(problems(&err).len() >= 2);
    }

    #[test]
    fn test_problems_for_version_mismatch() {
        let err = parse_config("config_version = 99\n").unwrap_err();
        let lines = problems(&err);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("99"));
    }

    #[test]
    fn test_missing_file_fails_check() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!check(&dir.path().join("absent.toml"), true));
    }
}
