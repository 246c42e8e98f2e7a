//! Configuration management

mod file;

pub use file::FileConfig;

use super::types::SyncError;
use clap::Parser;
use std::path::{Path, PathBuf};

/// One-way directory synchronization.
///
/// Copies new or modified files from the source tree into the destination
/// tree, optionally deleting destination entries the source does not have.
#[derive(Parser, Debug, Clone)]
#[command(name = "treesync")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// The path to the source directory
    #[arg(short, long, value_name = "PATH")]
    pub source: PathBuf,

    /// The path to the destination directory
    #[arg(short, long = "dest", value_name = "PATH")]
    pub destination: PathBuf,

    /// Delete extra files and folders from the destination
    #[arg(long)]
    pub delete: bool,

    /// Show which operations would be performed without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable detailed logging of every decision
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of concurrent file copy workers (default: logical CPU count)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Exit with an error if any single file fails to sync
    #[arg(long)]
    pub strict: bool,

    /// Read default options from a TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Configuration for one synchronization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Dry run (log decisions, mutate nothing)
    pub dry_run: bool,

    /// Remove destination entries missing from the source
    pub delete: bool,

    /// Debug-level logging
    pub verbose: bool,

    /// Number of copy workers, 0 = one per logical CPU
    pub workers: usize,

    /// Per-file failures fail the whole run
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            dry_run: false,
            delete: false,
            verbose: false,
            workers: 0,
            strict: false,
        }
    }
}

impl Config {
    /// Worker count with the 0 = "logical CPU count" default applied
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Validate configuration
    ///
    /// Runs before any traversal and touches nothing on disk beyond
    /// reading metadata.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.source.as_os_str().is_empty() || self.destination.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "Source and destination paths are required".to_string(),
            ));
        }

        // Ensure source != destination
        if self.source == self.destination || resolve(&self.source) == resolve(&self.destination)
        {
            return Err(SyncError::Config(
                "Source and destination paths cannot be the same".to_string(),
            ));
        }

        // Ensure source exists and is a directory
        if !self.source.is_dir() {
            return Err(SyncError::Config(format!(
                "Source path is not a directory: {:?}",
                self.source
            )));
        }

        if self.delete && self.source_inside_destination() {
            return Err(SyncError::Config(format!(
                "Source {:?} lies inside destination {:?}; --delete would remove it",
                self.source, self.destination
            )));
        }

        Ok(())
    }

    /// Destination path relative to the source, when the destination is
    /// nested inside the source tree
    pub fn destination_within_source(&self) -> Option<PathBuf> {
        let source = resolve(&self.source);
        let destination = resolve(&self.destination);
        destination
            .strip_prefix(&source)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    fn source_inside_destination(&self) -> bool {
        let source = resolve(&self.source);
        let destination = resolve(&self.destination);
        source != destination && source.starts_with(&destination)
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let config = Config {
            source: cli.source,
            destination: cli.destination,
            dry_run: cli.dry_run || file.dry_run.unwrap_or(false),
            delete: cli.delete || file.delete.unwrap_or(false),
            verbose: cli.verbose || file.verbose.unwrap_or(false),
            workers: cli.workers.or(file.workers).unwrap_or(0),
            strict: cli.strict || file.strict.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Canonical form of a path. When it does not exist yet, the deepest
/// existing ancestor is canonicalized and the missing tail re-appended.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let absolute = match std::path::absolute(path) {
        Ok(absolute) => absolute,
        Err(_) => return path.to_path_buf(),
    };

    let mut missing = Vec::new();
    let mut current = absolute.as_path();
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            missing.push(name.to_os_string());
        }
        if let Ok(mut resolved) = std::fs::canonicalize(parent) {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        current = parent;
    }
    absolute
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(source: &Path, destination: &Path) -> Config {
        Config {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_accepts_distinct_paths() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        assert!(config_for(src.path(), dst.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_identical_paths() {
        let src = TempDir::new().expect("create src tempdir");
        let err = config_for(src.path(), src.path())
            .validate()
            .expect_err("identical paths must be rejected");
        assert!(err.is_config_error());
        assert!(err.to_string().contains("cannot be the same"));
    }

    #[test]
    fn test_validate_rejects_same_directory_spelled_differently() {
        let src = TempDir::new().expect("create src tempdir");
        fs::create_dir(src.path().join("sub")).expect("create sub");
        let dotted = src.path().join("sub").join("..");

        let err = config_for(src.path(), &dotted)
            .validate()
            .expect_err("equivalent paths must be rejected");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_missing_source() {
        let dst = TempDir::new().expect("create dst tempdir");
        let missing = dst.path().join("does-not-exist");
        let err = config_for(&missing, dst.path())
            .validate()
            .expect_err("missing source must be rejected");
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let err = Config::default()
            .validate()
            .expect_err("empty paths must be rejected");
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_source_inside_destination_with_delete() {
        let dst = TempDir::new().expect("create dst tempdir");
        let src = dst.path().join("inner");
        fs::create_dir(&src).expect("create inner source");

        let mut config = config_for(&src, dst.path());
        assert!(config.validate().is_ok(), "nesting is fine without --delete");

        config.delete = true;
        let err = config.validate().expect_err("delete would wipe the source");
        assert!(err.to_string().contains("lies inside destination"));
    }

    #[test]
    fn test_destination_within_source() {
        let src = TempDir::new().expect("create src tempdir");
        let config = config_for(src.path(), &src.path().join("backup/mirror"));
        assert_eq!(
            config.destination_within_source(),
            Some(PathBuf::from("backup/mirror"))
        );

        let other = TempDir::new().expect("create dst tempdir");
        assert_eq!(config_for(src.path(), other.path()).destination_within_source(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_destination_within_source_through_symlinked_source() {
        let temp_dir = TempDir::new().expect("create tempdir");
        fs::create_dir(temp_dir.path().join("real")).expect("create real");
        std::os::unix::fs::symlink(temp_dir.path().join("real"), temp_dir.path().join("link"))
            .expect("create symlink");

        let source = temp_dir.path().join("link");
        let config = config_for(&source, &source.join("a/backup"));
        assert_eq!(
            config.destination_within_source(),
            Some(PathBuf::from("a/backup"))
        );
    }

    #[test]
    fn test_worker_count_defaults_to_cpu_count() {
        let config = Config::default();
        assert!(config.worker_count() >= 1);

        let config = Config {
            workers: 3,
            ..Config::default()
        };
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_try_from_cli_merges_config_file() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let file = src.path().join("treesync.toml");
        fs::write(&file, "delete = true\nworkers = 2\n").expect("write config file");

        let cli = Cli::parse_from([
            "treesync",
            "--source",
            src.path().to_str().expect("utf-8 path"),
            "--dest",
            dst.path().to_str().expect("utf-8 path"),
            "--dry-run",
            "--config",
            file.to_str().expect("utf-8 path"),
        ]);

        let config = Config::try_from(cli).expect("config should validate");
        assert!(config.delete, "delete comes from the file");
        assert!(config.dry_run, "dry-run comes from the flag");
        assert_eq!(config.workers, 2);
        assert!(!config.verbose);
    }

    #[test]
    fn test_try_from_cli_workers_flag_overrides_file() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let file = dst.path().join("opts.toml");
        fs::write(&file, "workers = 2\n").expect("write config file");

        let cli = Cli::parse_from([
            "treesync",
            "-s",
            src.path().to_str().expect("utf-8 path"),
            "-d",
            dst.path().to_str().expect("utf-8 path"),
            "--workers",
            "8",
            "--config",
            file.to_str().expect("utf-8 path"),
        ]);

        let config = Config::try_from(cli).expect("config should validate");
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_try_from_cli_validates_immediately() {
        let src = TempDir::new().expect("create src tempdir");
        let path = src.path().to_str().expect("utf-8 path");
        let cli = Cli::parse_from(["treesync", "-s", path, "-d", path]);

        let err = Config::try_from(cli).expect_err("identical paths must be rejected");
        assert!(err.is_config_error());
    }
}
