//! Recording an execution's artifacts into the workspace
//!
//! Artifacts land in `generated/<version-millis>/<country>/<type>/`:
//! a report directory is mirrored into `report/`, a report file keeps its
//! base name. Recording the same (version, country, type) again overwrites.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::Workspace;
use crate::common::paths::CYCLE_DEFINITION_FILE;
use crate::common::{Error, Result};
use crate::config::{PlatformRule, QualityThreshold};
use crate::copy::ownership::Ownership;
use crate::copy::{ensure_outside, ArtifactCopier, CopyStats};

/// Subdirectory receiving a report given as a directory
pub const REPORT_DIR: &str = "report";

/// One `execution create` invocation
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Test type, e.g. "api" or "firefox-desktop"
    pub test_type: String,
    /// Country code, e.g. "fr"
    pub country: String,
    /// Report file or directory
    pub report: PathBuf,
    /// Optional step-definition file
    pub step_definitions: Option<PathBuf>,
    pub comment: Option<String>,
    pub job_url: String,
    /// Job duration in milliseconds
    pub job_millis: u64,
}

/// Where the artifacts of a recorded execution were placed
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub destination: PathBuf,
    pub report: PathBuf,
    pub step_definitions: Option<PathBuf>,
    pub cycle_definition: PathBuf,
    pub stats: CopyStats,
}

/// Cycle definition as read by the ARA file-system indexer
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycleDefinition<'a> {
    blocking_validation: bool,
    quality_thresholds: &'a BTreeMap<String, QualityThreshold>,
    platforms_rules: &'a BTreeMap<String, Vec<PlatformRule>>,
}

impl Workspace {
    /// Copy the request's artifacts under the configured version
    ///
    /// Nothing is created on disk unless the workspace exists, the report
    /// exists, the configuration carries `version.millis`, and a report
    /// directory does not contain the destination.
    pub fn record_execution<O: Ownership>(
        &self,
        request: &ExecutionRequest,
        copier: &ArtifactCopier<O>,
    ) -> Result<ExecutionRecord> {
        self.ensure_initialized()?;

        if !request.report.exists() {
            return Err(Error::ReportMissing(request.report.clone()));
        }

        let config = self.config().load()?;
        let version_millis = config.version_millis().ok_or(Error::VersionNotSet)?;
        check_segment("country", &request.country)?;
        check_segment("type", &request.test_type)?;

        tracing::info!(
            version = version_millis,
            country = %request.country,
            test_type = %request.test_type,
            job_url = %request.job_url,
            job_millis = request.job_millis,
            comment = request.comment.as_deref().unwrap_or(""),
            "recording execution"
        );

        let destination = self.layout().execution_dir(
            version_millis,
            &request.country,
            &request.test_type,
        );
        let report_dir = request.report.is_dir();
        if report_dir {
            ensure_outside(&request.report, &destination.join(REPORT_DIR))?;
        }
        fs::create_dir_all(&destination).map_err(|e| Error::unwritable(&destination, e))?;

        let mut stats = CopyStats::default();
        let report = if report_dir {
            let target = destination.join(REPORT_DIR);
            stats.add(copier.copy_dir(&request.report, &target)?);
            target
        } else {
            let target = destination.join(base_name("report", &request.report)?);
            stats.add(CopyStats::file(copier.copy_file(&request.report, &target)?));
            target
        };

        let step_definitions = match &request.step_definitions {
            Some(path) if path.is_file() => {
                let target = destination.join(base_name("step definition", path)?);
                stats.add(CopyStats::file(copier.copy_file(path, &target)?));
                Some(target)
            }
            Some(path) if path.exists() => {
                tracing::warn!(path = %path.display(), "step definitions are not a file, skipping");
                None
            }
            Some(path) => {
                tracing::debug!(path = %path.display(), "no step definitions found, skipping");
                None
            }
            None => None,
        };

        let cycle_definition = self
            .layout()
            .version_dir(version_millis)
            .join(CYCLE_DEFINITION_FILE);
        let definition = CycleDefinition {
            blocking_validation: config.is_blocking(),
            quality_thresholds: &config.thresholds,
            platforms_rules: &config.rules,
        };
        fs::write(&cycle_definition, serde_json::to_string_pretty(&definition)?)
            .map_err(|e| Error::unwritable(&cycle_definition, e))?;

        Ok(ExecutionRecord {
            destination,
            report,
            step_definitions,
            cycle_definition,
            stats,
        })
    }
}

/// Reject values that would escape or nest the generated tree
fn check_segment(field: &'static str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !value.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(Error::InvalidSegment {
            field,
            value: value.to_string(),
        })
    }
}

fn base_name<'a>(field: &'static str, path: &'a Path) -> Result<&'a std::ffi::OsStr> {
    path.file_name().ok_or_else(|| Error::InvalidSegment {
        field,
        value: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy::ownership::NoOwnership;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};

    const MILLIS: u64 = 1581908400000;

    fn initialized() -> (TempDir, Workspace) {
        let dir = tempdir().unwrap();
        let ws = Workspace::at(dir.path().join("ws"));
        ws.init().unwrap();
        ws.config().set("version.millis", &MILLIS.to_string()).unwrap();
        (dir, ws)
    }

    fn request(report: PathBuf) -> ExecutionRequest {
        ExecutionRequest {
            test_type: "api".to_string(),
            country: "fr".to_string(),
            report,
            step_definitions: None,
            comment: Some("nightly".to_string()),
            job_url: "https://build.company.com/demo/56/".to_string(),
            job_millis: 1200,
        }
    }

    fn copier() -> ArtifactCopier<NoOwnership> {
        ArtifactCopier::with_ownership(NoOwnership)
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_missing_report_creates_nothing() {
        let (dir, ws) = initialized();
        let err = ws
            .record_execution(&request(dir.path().join("absent.json")), &copier())
            .unwrap_err();

        assert!(matches!(err, Error::ReportMissing(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(!ws.layout().generated_dir().exists());
    }

    #[test]
    fn test_requires_workspace() {
        let dir = tempdir().unwrap();
        let ws = Workspace::at(dir.path());
        let report = dir.path().join("report.json");
        fs::write(&report, "[]").unwrap();

        let err = ws.record_execution(&request(report), &copier()).unwrap_err();
        assert!(matches!(err, Error::WorkspaceNotInitialized(_)));
    }

    #[test]
    fn test_requires_version() {
        let dir = tempdir().unwrap();
        let ws = Workspace::at(dir.path().join("ws"));
        ws.init().unwrap();
        let report = dir.path().join("report.json");
        fs::write(&report, "[]").unwrap();

        let err = ws.record_execution(&request(report), &copier()).unwrap_err();
        assert!(matches!(err, Error::VersionNotSet));
        assert!(!ws.layout().generated_dir().exists());
    }

    #[test]
    fn test_file_report_keeps_base_name() {
        let (dir, ws) = initialized();
        let report = dir.path().join("cucumber.json");
        fs::write(&report, "[{\"id\":\"f\"}]").unwrap();

        let record = ws.record_execution(&request(report), &copier()).unwrap();

        let destination = ws.layout().execution_dir(MILLIS, "fr", "api");
        assert_eq!(record.destination, destination);
        assert_eq!(entries(&destination), vec!["cucumber.json"]);
        assert_eq!(
            fs::read_to_string(destination.join("cucumber.json")).unwrap(),
            "[{\"id\":\"f\"}]"
        );
        assert_eq!(record.stats.files, 1);
    }

    #[test]
    fn test_directory_report_goes_under_report() {
        let (dir, ws) = initialized();
        let report = dir.path().join("newman");
        fs::create_dir_all(report.join("collections")).unwrap();
        fs::write(report.join("summary.json"), "{}").unwrap();
        fs::write(report.join("collections").join("a.json"), "{}").unwrap();

        let record = ws.record_execution(&request(report), &copier()).unwrap();

        let copied = ws.layout().execution_dir(MILLIS, "fr", "api").join(REPORT_DIR);
        assert_eq!(record.report, copied);
        assert!(copied.join("summary.json").is_file());
        assert!(copied.join("collections").join("a.json").is_file());
    }

    #[test]
    fn test_step_definitions_copied_or_skipped() {
        let (dir, ws) = initialized();
        let report = dir.path().join("report.json");
        let steps = dir.path().join("stepDefinitions.json");
        fs::write(&report, "[]").unwrap();
        fs::write(&steps, "[\"^I click$\"]").unwrap();

        let mut with_steps = request(report.clone());
        with_steps.step_definitions = Some(steps);
        let record = ws.record_execution(&with_steps, &copier()).unwrap();
        assert!(record.step_definitions.unwrap().is_file());

        let mut missing_steps = request(report);
        missing_steps.test_type = "web".to_string();
        missing_steps.step_definitions = Some(dir.path().join("absent.json"));
        let record = ws.record_execution(&missing_steps, &copier()).unwrap();
        assert!(record.step_definitions.is_none());
        assert_eq!(entries(&record.destination), vec!["report.json"]);
    }

    #[test]
    fn test_cycle_definition_written() {
        let (dir, ws) = initialized();
        ws.config().set("thresholds.api", r#"{"failure":95,"warning":98}"#).unwrap();
        ws.config().set("blockingValidation", "false").unwrap();
        let report = dir.path().join("report.json");
        fs::write(&report, "[]").unwrap();

        let record = ws.record_execution(&request(report), &copier()).unwrap();

        assert_eq!(
            record.cycle_definition,
            ws.layout().version_dir(MILLIS).join("cycleDefinition.json")
        );
        let written: Value =
            serde_json::from_str(&fs::read_to_string(&record.cycle_definition).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "blockingValidation": false,
                "qualityThresholds": {"api": {"failure": 95, "warning": 98}},
                "platformsRules": {}
            })
        );
    }

    #[test]
    fn test_rejects_path_like_segments() {
        let (dir, ws) = initialized();
        let report = dir.path().join("report.json");
        fs::write(&report, "[]").unwrap();

        for country in ["", ".", "..", "fr/api", "../fr"] {
            let mut req = request(report.clone());
            req.country = country.to_string();
            let err = ws.record_execution(&req, &copier()).unwrap_err();
            assert!(matches!(err, Error::InvalidSegment { field: "country", .. }));
        }
        assert!(!ws.layout().generated_dir().exists());
    }

    #[test]
    fn test_report_containing_workspace_creates_nothing() {
        let (_dir, ws) = initialized();
        fs::write(ws.layout().root().join("cucumber.json"), "[]").unwrap();

        let report = ws.layout().root().to_path_buf();
        let err = ws.record_execution(&request(report), &copier()).unwrap_err();

        assert!(matches!(err, Error::DestinationInsideSource { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(!ws.layout().generated_dir().exists());
    }
}
