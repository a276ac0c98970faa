//! Exam registry
//!
//! Immutable, process-wide tables describing each supported exam: its
//! native score scale and the speaking tasks it contains. All lookups are
//! pure and safe for unbounded concurrent reads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported exams
///
/// Closed set; unknown identifiers are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Toefl,
    Ielts,
    Pte,
    Duolingo,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [ExamType::Toefl, ExamType::Ielts, ExamType::Pte, ExamType::Duolingo];

    /// Lowercase wire identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::Toefl => "toefl",
            ExamType::Ielts => "ielts",
            ExamType::Pte => "pte",
            ExamType::Duolingo => "duolingo",
        }
    }

    /// Registry entry for this exam
    pub fn profile(self) -> &'static ExamProfile {
        match self {
            ExamType::Toefl => &EXAM_PROFILES[0],
            ExamType::Ielts => &EXAM_PROFILES[1],
            ExamType::Pte => &EXAM_PROFILES[2],
            ExamType::Duolingo => &EXAM_PROFILES[3],
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        ExamType::ALL
            .into_iter()
            .find(|exam| exam.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownExam(needle.to_string()))
    }
}

/// Inclusive native score range of an exam
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

/// One speaking task of an exam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskRubric {
    /// Task identifier as sent by clients (e.g. `task1`, `describeImage`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What a good answer to this task has to do
    pub requirement: &'static str,
}

/// Registry entry for one exam
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExamProfile {
    pub exam: ExamType,
    /// Native scale the candidate sees
    pub native_range: ScaleRange,
    /// Valid tasks; the first one is the default
    pub tasks: &'static [TaskRubric],
}

impl ExamProfile {
    /// Look up a task by identifier (case-insensitive)
    pub fn task(&self, task_id: &str) -> Option<&'static TaskRubric> {
        let needle = task_id.trim();
        self.tasks.iter().find(|t| t.id.eq_ignore_ascii_case(needle))
    }

    /// Task used when a request names none
    pub fn default_task(&self) -> &'static TaskRubric {
        &self.tasks[0]
    }

    /// Resolve an optional task identifier against this exam
    ///
    /// `None` or a blank identifier resolves to the default task; an
    /// identifier the exam does not define is an error.
    pub fn resolve_task(&self, task_id: Option<&str>) -> Result<&'static TaskRubric> {
        match task_id.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(self.default_task()),
            Some(id) => self.task(id).ok_or_else(|| Error::UnknownTask {
                exam: self.exam.to_string(),
                task: id.to_string(),
            }),
        }
    }
}

/// Task requirement lookup; `None` when the exam has no such task
pub fn get_task_rubric(exam: ExamType, task_id: &str) -> Option<&'static TaskRubric> {
    exam.profile().task(task_id)
}

// ============================================================================
// Registry data
// ============================================================================

static TOEFL_TASKS: [TaskRubric; 4] = [
    TaskRubric {
        id: "task1",
        name: "TOEFL Task 1 (Independent)",
        requirement: "Personal opinion question of roughly 37 seconds. Needs a clear position, one or two reasons and a simple example, compact sentences, no long pauses.",
    },
    TaskRubric {
        id: "task2",
        name: "TOEFL Task 2 (Integrated)",
        requirement: "One-minute integrated task. Accurately restate the key points from the reading and the listening and explain how they relate. The speaker's opinion from the listening must be clear, the logic easy to follow, linking words used accurately; information accuracy is key.",
    },
    TaskRubric {
        id: "task3",
        name: "TOEFL Task 3 (Integrated)",
        requirement: "One-minute integrated task. Accurately restate the key points from the reading and the listening. The story or experiment from the listening must be organized (background, process, result), the logic clear, linking words used accurately.",
    },
    TaskRubric {
        id: "task4",
        name: "TOEFL Task 4 (Integrated)",
        requirement: "One-minute integrated task. Clearly state the two sub-points from the lecture, give detailed information for each example, keep the logic clear and linking words accurate.",
    },
];

static IELTS_TASKS: [TaskRubric; 3] = [
    TaskRubric {
        id: "part1",
        name: "IELTS Speaking Part 1",
        requirement: "Casual conversation. Answers need not be long but should be natural and fluent, answer the question directly and avoid sounding memorized.",
    },
    TaskRubric {
        id: "part2",
        name: "IELTS Speaking Part 2",
        requirement: "Two-minute long turn. Develop the topic with plenty of details, stories and feelings to show sustained speaking ability.",
    },
    TaskRubric {
        id: "part3",
        name: "IELTS Speaking Part 3",
        requirement: "Abstract or social questions. Requires cause analysis, reasoning and expansion rather than small personal stories.",
    },
];

static PTE_TASKS: [TaskRubric; 2] = [
    TaskRubric {
        id: "describeImage",
        name: "PTE Describe Image",
        requirement: "Give an overall summary first, then two or three key details, and finish with a concluding sentence. Structure matters most.",
    },
    TaskRubric {
        id: "retellLecture",
        name: "PTE Retell Lecture",
        requirement: "Retell the lecture: main idea, supporting points and how they relate. Organizing the information matters more than word-for-word repetition.",
    },
];

static DUOLINGO_TASKS: [TaskRubric; 2] = [
    TaskRubric {
        id: "readAndSpeak",
        name: "Duolingo Read & Speak",
        requirement: "Read or retell the on-screen content. Requires clear pronunciation, a steady rhythm and as few reading errors or long pauses as possible.",
    },
    TaskRubric {
        id: "listenAndSpeak",
        name: "Duolingo Listen & Speak",
        requirement: "Listen to the audio and retell its key points, focusing on capturing key information and speaking clearly.",
    },
];

static EXAM_PROFILES: [ExamProfile; 4] = [
    ExamProfile {
        exam: ExamType::Toefl,
        native_range: ScaleRange { min: 0.0, max: 30.0 },
        tasks: &TOEFL_TASKS,
    },
    ExamProfile {
        exam: ExamType::Ielts,
        native_range: ScaleRange { min: 0.0, max: 9.0 },
        tasks: &IELTS_TASKS,
    },
    ExamProfile {
        exam: ExamType::Pte,
        native_range: ScaleRange { min: 10.0, max: 90.0 },
        tasks: &PTE_TASKS,
    },
    ExamProfile {
        exam: ExamType::Duolingo,
        native_range: ScaleRange { min: 10.0, max: 160.0 },
        tasks: &DUOLINGO_TASKS,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_parse_is_case_insensitive() {
        assert_eq!("TOEFL".parse::<ExamType>().unwrap(), ExamType::Toefl);
        assert_eq!(" Ielts ".parse::<ExamType>().unwrap(), ExamType::Ielts);
        assert_eq!("duolingo".parse::<ExamType>().unwrap(), ExamType::Duolingo);
    }

    #[test]
    fn test_unknown_exam_rejected() {
        let err = "gre".parse::<ExamType>().unwrap_err();
        assert!(matches!(err, Error::UnknownExam(ref s) if s == "gre"));
    }

    #[test]
    fn test_profiles_match_exam() {
        for exam in ExamType::ALL {
            let profile = exam.profile();
            assert_eq!(profile.exam, exam);
            assert!(!profile.tasks.is_empty());
            assert!(profile.native_range.min < profile.native_range.max);
        }
    }

    #[test]
    fn test_task_lookup() {
        let rubric = get_task_rubric(ExamType::Pte, "describeimage").unwrap();
        assert_eq!(rubric.id, "describeImage");
        assert!(get_task_rubric(ExamType::Toefl, "part2").is_none());
    }

    #[test]
    fn test_resolve_task_defaults_and_rejects() {
        let ielts = ExamType::Ielts.profile();
        assert_eq!(ielts.resolve_task(None).unwrap().id, "part1");
        assert_eq!(ielts.resolve_task(Some("  ")).unwrap().id, "part1");
        assert_eq!(ielts.resolve_task(Some("part3")).unwrap().id, "part3");
        assert!(matches!(
            ielts.resolve_task(Some("task1")),
            Err(Error::UnknownTask { .. })
        ));
    }
}
