//! `nyrodocs check` command implementation.
//!
//! Validates the sidebar against the content directory and the bundled
//! assets against what the page shell links to, so broken links are caught
//! before deploying.

use std::path::{Path, PathBuf};

use clap::Args;
use nyro_config::{CliSettings, Config};
use nyro_site::Navigation;
use nyro_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover nyro.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory holding docs/ and the changelog (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

/// Outcome of a check run.
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a navigation entry is broken
    /// or a bundled asset is missing.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.content.source_dir;

        output.heading("Checking navigation");
        output.field("Content", &source_dir.display());

        let storage = FsStorage::new(source_dir.clone());
        let mut report = check(
            &Navigation::builtin(),
            &storage,
            &config.content.changelog,
        );
        let assets: Vec<_> = nyro_assets::iter().collect();
        report.errors.extend(missing_assets(&assets));

        for warning in &report.warnings {
            output.warning(&format!("warning: {warning}"));
        }
        for error in &report.errors {
            output.error(&format!("error: {error}"));
        }

        if report.errors.is_empty() {
            output.success(&format!(
                "Check passed ({} warnings)",
                report.warnings.len()
            ));
            Ok(())
        } else {
            Err(CliError::Check(report.errors.len()))
        }
    }
}

fn check(navigation: &Navigation, storage: &dyn Storage, changelog: &Path) -> Report {
    let mut report = Report::default();
    for issue in navigation.validate(storage) {
        if issue.is_error() {
            report.errors.push(issue.to_string());
        } else {
            report.warnings.push(issue.to_string());
        }
    }
    if !storage.exists(changelog) {
        report
            .warnings
            .push(format!("changelog {} is missing", changelog.display()));
    }
    report
}

fn missing_assets<S: AsRef<str>>(available: &[S]) -> Vec<String> {
    nyro_assets::REQUIRED
        .iter()
        .filter(|required| !available.iter().any(|name| name.as_ref() == **required))
        .map(|name| format!("bundled asset {name} is missing"))
        .collect()
}

#[cfg(test)]
mod tests {
    use nyro_site::NavIssue;
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, file: &str, content: &str) {
        let path = root.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn complete_tree(root: &Path) {
        for file in [
            "docs/overview.md",
            "docs/getting_started/installation.md",
            "docs/getting_started/configuration.md",
            "docs/api/rest.md",
            "docs/api/realtime.md",
            "docs/internals/architecture.md",
        ] {
            write(root, file, "# Page\n");
        }
        write(root, "CHANGELOG.md", "# Changelog\n");
    }

    #[test]
    fn test_complete_tree_passes() {
        let dir = tempfile::tempdir().unwrap();
        complete_tree(dir.path());
        let storage = FsStorage::new(dir.path().to_path_buf());

        let report = check(&Navigation::builtin(), &storage, Path::new("CHANGELOG.md"));

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_missing_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        complete_tree(dir.path());
        std::fs::remove_file(dir.path().join("docs/api/realtime.md")).unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let issues = Navigation::builtin().validate(&storage);
        assert_eq!(
            issues
                .iter()
                .filter(|i| matches!(i, NavIssue::MissingDocument { .. }))
                .count(),
            1
        );

        let report = check(&Navigation::builtin(), &storage, Path::new("CHANGELOG.md"));
        assert_eq!(
            report.errors,
            vec!["/docs/api/realtime points to missing document docs/api/realtime.md"]
        );
    }

    #[test]
    fn test_unlisted_document_and_missing_changelog_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        complete_tree(dir.path());
        write(dir.path(), "docs/drafts/sharding.md", "# Sharding\n");
        std::fs::remove_file(dir.path().join("CHANGELOG.md")).unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let report = check(&Navigation::builtin(), &storage, Path::new("CHANGELOG.md"));

        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("docs/drafts/sharding.md"));
        assert_eq!(report.warnings[1], "changelog CHANGELOG.md is missing");
    }

    #[test]
    fn test_bundled_assets_complete() {
        let assets: Vec<_> = nyro_assets::iter().collect();
        assert_eq!(missing_assets(&assets), Vec::<String>::new());
    }

    #[test]
    fn test_missing_asset_reported() {
        assert_eq!(
            missing_assets(&["site.css", "site.js"]),
            vec!["bundled asset live-reload.js is missing"]
        );
    }
}
