//! Instruction builders for the generative engine
//!
//! Pure string composition: nothing here performs I/O, so every instruction
//! can be inspected in unit tests. Scores are always on the canonical 0-30
//! scale regardless of the exam.

use cosu_common::rubrics::GENERIC_TEXT_RUBRIC;
use cosu_common::{get_band, get_score_level_rubric, DimensionVector, ExamType, TaskRubric};

/// Descriptive correspondence between the canonical scale and the other exams.
/// Deliberately coarse; numeric mapping is done by `cosu_common::mapping`.
const CROSS_EXAM_NOTE: &str = "\
All scores use the TOEFL 0-30 scale as the shared backbone. Rough correspondences:
- IELTS: high (26-30) is about band 7.0-8.5, mid (20-25) about 6.0-6.5, low (0-19) about 3.0-5.5
- Duolingo: high (26-30) is about 130-160, mid (20-25) about 90-120, low (0-19) about 10-85
- PTE: high (26-30) is about 70-90, mid (20-25) about 50-65, low (0-19) about 10-45
Whatever the exam, report delivery, language_use, topic_dev and overall on the 0-30 scale.";

const TOPIC_DEV_GUIDANCE: &str = "\
When scoring topic development:
- weigh fluency and the amount of content above strict argumentation
- reward answers that keep going smoothly and carry real information
- be lenient about structure as long as ideas are expressed continuously
- apply strict coherence standards only when the acoustic baseline is very high (26 or above)";

const GENERIC_LEVEL_FALLBACK: &str =
    "use a reasonable level slightly above the current scores";

/// Input for the text-scoring instruction
#[derive(Debug, Clone)]
pub struct AssessmentRequest<'a> {
    pub transcript: &'a str,
    pub exam: ExamType,
    pub task: &'static TaskRubric,
    /// Acoustic vector the text scores must stay close to
    pub baseline: DimensionVector,
    /// Allowed deviation per dimension
    pub tolerance: f64,
}

/// Input for the improvement-tip instruction
#[derive(Debug, Clone)]
pub struct TipRequest<'a> {
    pub transcript: &'a str,
    pub exam: ExamType,
    pub task: &'static TaskRubric,
    pub final_score: DimensionVector,
}

/// Input for the target-level rewrite instruction
#[derive(Debug, Clone)]
pub struct RewriteRequest<'a> {
    pub transcript: &'a str,
    pub exam: ExamType,
    pub task: &'static TaskRubric,
    pub target_score: f64,
    pub current_score: DimensionVector,
    pub time_limit_sec: Option<u32>,
}

fn score_lines(v: &DimensionVector) -> String {
    format!(
        "- delivery: {}\n- language_use: {}\n- topic_dev: {}\n- overall: {}",
        v.delivery, v.language_use, v.topic_dev, v.overall
    )
}

fn exam_name(exam: ExamType) -> String {
    exam.as_str().to_uppercase()
}

/// Instruction asking for a text score vector plus reasoning
pub fn analysis_instruction(req: &AssessmentRequest<'_>) -> String {
    let band = get_band(req.baseline.overall);
    let b = &req.baseline;
    let tol = req.tolerance;

    format!(
        "You are a strict speaking examiner for {exam_upper}.\n\
         \n\
         Steps:\n\
         1. Read the candidate's transcript.\n\
         2. Take the acoustic baseline into account; it comes from a model trained on real candidate audio.\n\
         3. Take the task requirement and the band description into account.\n\
         4. Give four scores from 0 to 30: delivery, language_use, topic_dev, overall.\n\
         5. Briefly explain each score.\n\
         \n\
         [Acoustic baseline]\n\
         {baseline}\n\
         \n\
         The baseline measures delivery (fluency, pauses, hesitation, speed, repetition), \
         language_use (pronunciation clarity and grammatical stability audible in the recording) \
         and topic_dev (information density and structural patterns).\n\
         \n\
         Consistency rule: each dimension must stay within ±{tol} of the acoustic baseline for that dimension.\n\
         - delivery must be between {d_lo} and {d_hi}\n\
         - language_use must be between {l_lo} and {l_hi}\n\
         - topic_dev must be between {t_lo} and {t_hi}\n\
         - overall must be between {o_lo} and {o_hi}\n\
         The acoustic model is the primary source of truth. Use the transcript only for small adjustments.\n\
         \n\
         [Current band]\n\
         - Band: {band_label}\n\
         - Description: {band_desc}\n\
         \n\
         [Exam and task]\n\
         - Exam type: {exam}\n\
         - Task: {task_id}\n\
         - Task requirement: {task_name}: {task_req}\n\
         \n\
         [Text rubrics]\n\
         - Delivery: {r_delivery}\n\
         - Language use: {r_language}\n\
         - Topic development: {r_topic}\n\
         \n\
         {topic_guidance}\n\
         \n\
         [Cross-exam interpretation]\n\
         {cross_exam}\n\
         \n\
         [Candidate transcript]\n\
         {transcript}\n\
         \n\
         Output ONLY a JSON object in this format:\n\
         {{\n  \
           \"delivery\": number (0-30),\n  \
           \"language_use\": number (0-30),\n  \
           \"topic_dev\": number (0-30),\n  \
           \"overall\": number (0-30),\n  \
           \"reasoning\": {{\n    \
             \"delivery\": \"one or two sentences referring to the acoustic baseline and the text\",\n    \
             \"language_use\": \"one or two sentences about grammar and vocabulary\",\n    \
             \"topic_dev\": \"one or two sentences about structure and detail\",\n    \
             \"exam_specific\": \"how well the answer fits {exam} task {task_id}\"\n  \
           }}\n\
         }}\n",
        exam_upper = exam_name(req.exam),
        baseline = score_lines(b),
        tol = tol,
        d_lo = (b.delivery - tol).max(0.0),
        d_hi = (b.delivery + tol).min(30.0),
        l_lo = (b.language_use - tol).max(0.0),
        l_hi = (b.language_use + tol).min(30.0),
        t_lo = (b.topic_dev - tol).max(0.0),
        t_hi = (b.topic_dev + tol).min(30.0),
        o_lo = (b.overall - tol).max(0.0),
        o_hi = (b.overall + tol).min(30.0),
        band_label = band.label,
        band_desc = band.description,
        exam = req.exam,
        task_id = req.task.id,
        task_name = req.task.name,
        task_req = req.task.requirement,
        r_delivery = GENERIC_TEXT_RUBRIC.delivery,
        r_language = GENERIC_TEXT_RUBRIC.language_use,
        r_topic = GENERIC_TEXT_RUBRIC.topic_dev,
        topic_guidance = TOPIC_DEV_GUIDANCE,
        cross_exam = CROSS_EXAM_NOTE,
        transcript = req.transcript,
    )
}

/// Instruction asking for exactly three improvement tips
pub fn tip_instruction(req: &TipRequest<'_>) -> String {
    let band = get_band(req.final_score.overall);
    let weakest = req.final_score.weakest_dimension();

    format!(
        "You are a speaking coach. A candidate just finished a {exam_upper} speaking task ({task_id}).\n\
         \n\
         Final scores (0-30):\n\
         {scores}\n\
         \n\
         Current band: {band_label} ({band_desc})\n\
         Weakest dimension: {weakest}\n\
         \n\
         Exam and task:\n\
         - Exam type: {exam}\n\
         - Task: {task_id}\n\
         - Task requirement: {task_req}\n\
         \n\
         Candidate transcript:\n\
         {transcript}\n\
         \n\
         Give EXACTLY 3 concrete improvement tips as JSON:\n\
         {{\n  \
           \"tips\": [\n    \
             {{\n      \
               \"dimension\": \"delivery\" | \"language_use\" | \"topic_dev\",\n      \
               \"title\": \"short name of the problem\",\n      \
               \"detail\": \"where exactly the problem is, in plain language\",\n      \
               \"next_practice\": \"one very specific practice method for next time\"\n    \
             }}\n  \
           ]\n\
         }}\n\
         \n\
         Focus on the candidate's biggest problem at their current level, starting with {weakest}. \
         Each tip covers one thing only and says how to practice it.\n",
        exam_upper = exam_name(req.exam),
        scores = score_lines(&req.final_score),
        band_label = band.label,
        band_desc = band.description,
        weakest = weakest,
        exam = req.exam,
        task_id = req.task.id,
        task_req = req.task.requirement,
        transcript = req.transcript,
    )
}

/// Instruction asking for a content-preserving rewrite at the target level
pub fn rewrite_instruction(req: &RewriteRequest<'_>) -> String {
    let target = req.target_score;
    let level_text = match get_score_level_rubric(req.exam, target) {
        Some(rubric) => format!(
            "Target level ({target}/30):\n\
             - Delivery: {}\n\
             - Language use: {}\n\
             - Topic development: {}\n\
             - Summary: {}",
            rubric.delivery, rubric.language_use, rubric.topic_dev, rubric.summary
        ),
        None => format!("Target score: {target}/30 ({GENERIC_LEVEL_FALLBACK})."),
    };

    let length_note = match req.time_limit_sec {
        Some(secs) => format!("Keep it to roughly {secs} seconds of speech."),
        None => "Keep the length appropriate for the real exam time limit.".to_string(),
    };

    let ceiling_note = if target < cosu_common::MAX_SCORE {
        format!("Do NOT polish it to a perfect 30/30; aim for about {target}/30.")
    } else {
        "Aim for a top-level answer.".to_string()
    };

    format!(
        "You are a speaking coach.\n\
         \n\
         Rewrite the candidate's answer so it sounds like a typical {exam_upper} speaking response \
         at an overall level of about {target}/30.\n\
         \n\
         Rules:\n\
         - Use the candidate's original answer as the foundation.\n\
         - Preserve their ideas, opinions and examples.\n\
         - Do NOT invent new stories, facts or reasons.\n\
         - You may reorder or lightly reframe ideas so they are clearer.\n\
         - Adjust grammar, vocabulary, tone and structure to match the target level.\n\
         - {ceiling_note}\n\
         \n\
         Current scores (0-30):\n\
         {scores}\n\
         \n\
         Exam and task:\n\
         - Exam type: {exam}\n\
         - Task: {task_id}\n\
         - Task requirement: {task_req}\n\
         \n\
         {level_text}\n\
         \n\
         Candidate's original answer:\n\
         {transcript}\n\
         \n\
         Output ONLY the improved answer as plain text: no explanation, no JSON, no comments. \
         {length_note}\n",
        exam_upper = exam_name(req.exam),
        target = target,
        ceiling_note = ceiling_note,
        scores = score_lines(&req.current_score),
        exam = req.exam,
        task_id = req.task.id,
        task_req = req.task.requirement,
        level_text = level_text,
        transcript = req.transcript,
        length_note = length_note,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toefl_task1() -> &'static TaskRubric {
        ExamType::Toefl.profile().default_task()
    }

    #[test]
    fn test_analysis_instruction_carries_baseline_and_bound() {
        let req = AssessmentRequest {
            transcript: "I prefer studying alone because it is quiet.",
            exam: ExamType::Toefl,
            task: toefl_task1(),
            baseline: DimensionVector::new(15.0, 16.0, 14.0, 15.0),
            tolerance: 2.0,
        };
        let text = analysis_instruction(&req);

        assert!(text.contains("- delivery: 15"));
        assert!(text.contains("- language_use: 16"));
        assert!(text.contains("within ±2 of the acoustic baseline"));
        assert!(text.contains("delivery must be between 13 and 17"));
        assert!(text.contains("Band: Low"));
        assert!(text.contains(toefl_task1().requirement));
        assert!(text.contains(GENERIC_TEXT_RUBRIC.topic_dev));
        assert!(text.contains("IELTS: high"));
        assert!(text.contains("\"reasoning\""));
        assert!(text.contains("I prefer studying alone"));
    }

    #[test]
    fn test_analysis_bounds_stay_on_scale() {
        let req = AssessmentRequest {
            transcript: "x",
            exam: ExamType::Ielts,
            task: ExamType::Ielts.profile().default_task(),
            baseline: DimensionVector::new(29.5, 1.0, 20.0, 20.0),
            tolerance: 2.0,
        };
        let text = analysis_instruction(&req);
        assert!(text.contains("delivery must be between 27.5 and 30"));
        assert!(text.contains("language_use must be between 0 and 3"));
    }

    #[test]
    fn test_tip_instruction_names_weakest_dimension() {
        let req = TipRequest {
            transcript: "Some answer",
            exam: ExamType::Pte,
            task: ExamType::Pte.profile().default_task(),
            final_score: DimensionVector::new(20.0, 18.0, 18.0, 19.0),
        };
        let text = tip_instruction(&req);
        assert!(text.contains("Weakest dimension: language_use"));
        assert!(text.contains("EXACTLY 3"));
        assert!(text.contains("\"next_practice\""));
        assert!(text.contains("Current band: Mid"));
    }

    #[test]
    fn test_rewrite_instruction_anchor_rubric() {
        let req = RewriteRequest {
            transcript: "My answer",
            exam: ExamType::Toefl,
            task: toefl_task1(),
            target_score: 23.0,
            current_score: DimensionVector::uniform(18.0),
            time_limit_sec: Some(45),
        };
        let text = rewrite_instruction(&req);
        let rubric = get_score_level_rubric(ExamType::Toefl, 23.0).unwrap();
        assert!(text.contains(rubric.summary));
        assert!(text.contains("Do NOT invent"));
        assert!(text.contains("Do NOT polish it to a perfect 30/30"));
        assert!(text.contains("roughly 45 seconds of speech"));
    }

    #[test]
    fn test_rewrite_instruction_generic_fallback() {
        let req = RewriteRequest {
            transcript: "My answer",
            exam: ExamType::Duolingo,
            task: ExamType::Duolingo.profile().default_task(),
            target_score: 21.0,
            current_score: DimensionVector::uniform(18.0),
            time_limit_sec: None,
        };
        let text = rewrite_instruction(&req);
        assert!(text.contains("Target score: 21/30"));
        assert!(text.contains(GENERIC_LEVEL_FALLBACK));
    }

    #[test]
    fn test_rewrite_at_maximum_has_no_ceiling_warning() {
        let req = RewriteRequest {
            transcript: "My answer",
            exam: ExamType::Toefl,
            task: toefl_task1(),
            target_score: 30.0,
            current_score: DimensionVector::uniform(25.0),
            time_limit_sec: None,
        };
        assert!(!rewrite_instruction(&req).contains("Do NOT polish"));
    }
}
