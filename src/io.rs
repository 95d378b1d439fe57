//! JSON dataset loading and result export.
//!
//! A dataset directory holds four documents: `subjects.json`, `groups.json`,
//! `teachers.json` (each a JSON array) and `config.json` (an object). The
//! legacy file names `materias.json`, `grupos.json` and `profesores.json` are
//! accepted when the English names are absent.
//!
//! Results are written as objects keyed by group nomenclature and teacher
//! name, plus a run summary with issues and coherence findings.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    CoherenceReport, EngineConfig, Group, GroupTimetable, Issue, Subject, SubjectSummary, Teacher,
    TeacherTimetable,
};
use crate::scheduler::{self, RunKpi, RunReport};

pub const GROUP_TIMETABLES_FILE: &str = "group_timetables.json";
pub const TEACHER_TIMETABLES_FILE: &str = "teacher_timetables.json";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Everything one run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub config: EngineConfig,
    pub subjects: Vec<Subject>,
    pub groups: Vec<Group>,
    pub teachers: Vec<Teacher>,
}

impl Dataset {
    /// Loads the four documents from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> ScheduleResult<Self> {
        let dir = dir.as_ref();
        let dataset = Self {
            config: load_json(&locate(dir, &["config.json"])?)?,
            subjects: load_json(&locate(dir, &["subjects.json", "materias.json"])?)?,
            groups: load_json(&locate(dir, &["groups.json", "grupos.json"])?)?,
            teachers: load_json(&locate(dir, &["teachers.json", "profesores.json"])?)?,
        };
        info!(
            dir = %dir.display(),
            subjects = dataset.subjects.len(),
            groups = dataset.groups.len(),
            teachers = dataset.teachers.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Runs the engine over this dataset.
    pub fn run(self) -> ScheduleResult<RunReport> {
        scheduler::run(self.config, self.subjects, self.groups, self.teachers)
    }
}

/// Reads one JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> ScheduleResult<T> {
    debug!(path = %path.display(), "reading");
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// First of `names` that exists in `dir`.
fn locate(dir: &Path, names: &[&str]) -> ScheduleResult<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            ScheduleError::Io(std::io::Error::new(
                ErrorKind::NotFound,
                format!("{} not found in {}", names.join(" or "), dir.display()),
            ))
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ScheduleResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    debug!(path = %path.display(), "written");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    kpi: RunKpi,
    subjects: &'a [SubjectSummary],
    issues: &'a [Issue],
    coherence: &'a CoherenceReport,
}

/// Group timetables keyed by nomenclature.
pub fn group_documents(report: &RunReport) -> BTreeMap<&str, &GroupTimetable> {
    report
        .groups
        .iter()
        .map(|g| (g.nomenclature.as_str(), g))
        .collect()
}

/// Teacher timetables keyed by name.
pub fn teacher_documents(report: &RunReport) -> BTreeMap<&str, &TeacherTimetable> {
    report
        .teachers
        .iter()
        .map(|t| (t.name.as_str(), t))
        .collect()
}

/// Writes the result documents into `out_dir`, creating it if needed.
/// Returns the written paths.
pub fn write_results(report: &RunReport, out_dir: impl AsRef<Path>) -> ScheduleResult<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let groups = out_dir.join(GROUP_TIMETABLES_FILE);
    write_json(&groups, &group_documents(report))?;

    let teachers = out_dir.join(TEACHER_TIMETABLES_FILE);
    write_json(&teachers, &teacher_documents(report))?;

    let summary = out_dir.join(SUMMARY_FILE);
    write_json(
        &summary,
        &Summary {
            kpi: RunKpi::calculate(report),
            subjects: &report.subjects,
            issues: &report.issues,
            coherence: &report.coherence,
        },
    )?;

    info!(dir = %out_dir.display(), "results exported");
    Ok(vec![groups, teachers, summary])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompactionStrategy, Shift, SubjectCategory};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("horario-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn dataset() -> Dataset {
        Dataset {
            config: EngineConfig::new(8, 7).with_shift_boundary(8),
            subjects: vec![Subject::common_core("MAT1", 4)
                .with_name("Math")
                .with_semester(1)],
            groups: vec![Group::morning("101A", 1)],
            teachers: vec![Teacher::new("Ana", 4).with_subject("MAT1", &["101A"])],
        }
    }

    #[test]
    fn test_dataset_document_roundtrip() {
        let json = serde_json::to_string(&dataset()).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();

        assert_eq!(back.config, dataset().config);
        assert_eq!(back.subjects[0].id, "MAT1");
        assert_eq!(back.subjects[0].category, SubjectCategory::CommonCore);
        assert_eq!(back.groups[0].shift, Shift::Morning);
        assert_eq!(back.teachers[0].subjects[0].preferred_group_ids, vec!["101A".to_string()]);
    }

    #[test]
    fn test_legacy_keys() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"bloques_matutino": 8, "bloques_vespertino": 7,
                "bloque_fin_matutino": 8, "bloque_inicio_vespertino": 8,
                "compaction": "swap"}"#,
        )
        .unwrap();
        assert_eq!(config.morning_block_count, 8);
        assert_eq!(config.afternoon_start_block, Some(8));
        assert_eq!(config.compaction, CompactionStrategy::Swap);

        let group: Group =
            serde_json::from_str(r#"{"nomenclatura": "301B", "semestre": 3, "turno": "Vespertino"}"#)
                .unwrap();
        assert_eq!(group.nomenclature, "301B");
        assert_eq!(group.shift, Shift::Afternoon);
    }

    #[test]
    fn test_load_run_and_export() {
        let dir = scratch_dir("load");
        let data = dataset();
        write_json(&dir.join("config.json"), &data.config).unwrap();
        write_json(&dir.join("materias.json"), &data.subjects).unwrap();
        write_json(&dir.join("groups.json"), &data.groups).unwrap();
        write_json(&dir.join("teachers.json"), &data.teachers).unwrap();

        let report = Dataset::load_dir(&dir).unwrap().run().unwrap();
        assert!(report.is_complete());

        let out = dir.join("out");
        let written = write_results(&report, &out).unwrap();
        assert_eq!(written.len(), 3);

        let groups: serde_json::Value = load_json(&out.join(GROUP_TIMETABLES_FILE)).unwrap();
        assert_eq!(groups["101A"]["stats"]["totalHours"], 4);
        let teachers: serde_json::Value = load_json(&out.join(TEACHER_TIMETABLES_FILE)).unwrap();
        assert_eq!(teachers["Ana"]["stats"]["hoursAssigned"], 4);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_document() {
        let dir = scratch_dir("missing");
        let err = Dataset::load_dir(&dir).unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
        assert!(err.to_string().contains("config.json"));
        let _ = fs::remove_dir_all(&dir);
    }
}
