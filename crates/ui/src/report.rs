//! Plain-text result report offered as a download.

use std::fmt;

use chrono::{DateTime, Utc};

use insight_core::model::{Response, User};
use insight_core::scoring::{nominal_question_marks, percentage};

use crate::vm::NO_ANSWER;
use crate::vm::time_fmt::{format_datetime, format_duration, format_marks};

const RULE: &str = "==================================================";

/// Renders one graded result for `user` via `Display`.
pub struct TextReport<'a> {
    result: &'a Response,
    user: &'a User,
    generated_at: DateTime<Utc>,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(result: &'a Response, user: &'a User, generated_at: DateTime<Utc>) -> Self {
        Self {
            result,
            user,
            generated_at,
        }
    }

    /// `"{title}_Report_{student}.txt"` with path separators replaced.
    #[must_use]
    pub fn file_name(&self) -> String {
        let raw = format!(
            "{}_Report_{}.txt",
            self.result.title(),
            self.user.display_name()
        );
        raw.replace(['/', '\\'], "_")
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let user = self.user;
        let nominal = nominal_question_marks(result.total_marks(), result.question_count());

        writeln!(f, "INSIGHTQA TEST REPORT")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Student: {}", user.display_name())?;
        writeln!(f, "Email: {}", user.email())?;
        if let Some(department) = user.department() {
            writeln!(f, "Department: {department}")?;
        }
        writeln!(f)?;

        writeln!(f, "TEST DETAILS")?;
        writeln!(f, "============")?;
        writeln!(f, "Test Title: {}", result.title())?;
        writeln!(f, "Subject: {}", result.subject())?;
        writeln!(f, "Difficulty: {}", result.difficulty())?;
        writeln!(f, "Total Questions: {}", result.question_count())?;
        writeln!(f, "Total Marks: {}", result.total_marks())?;
        writeln!(f, "Marks Obtained: {}", format_marks(result.marks_obtained()))?;
        writeln!(
            f,
            "Percentage: {}%",
            percentage(result.marks_obtained(), f64::from(result.total_marks()))
        )?;
        writeln!(f)?;
        writeln!(f, "Duration: {}", format_duration(result.duration_minutes()))?;
        writeln!(f, "Submitted At: {}", format_datetime(result.submitted_at()))?;
        writeln!(f, "Question Pairs: {}", result.pairs())?;
        writeln!(f)?;

        writeln!(f, "QUESTION-WISE ANALYSIS")?;
        writeln!(f, "=====================")?;
        for (index, qa) in result.answers().iter().enumerate() {
            let answer = if qa.is_answered() {
                qa.user_answer.as_str()
            } else {
                NO_ANSWER
            };
            writeln!(f)?;
            writeln!(f, "Question {}:", index + 1)?;
            writeln!(f, "{}", qa.question)?;
            writeln!(f)?;
            writeln!(f, "Your Answer:")?;
            writeln!(f, "{answer}")?;
            writeln!(f)?;
            writeln!(f, "Sample Answer:")?;
            writeln!(f, "{}", qa.sample_answer)?;
            writeln!(f)?;
            writeln!(f, "Similarity Score: {}%", format_marks(qa.similarity))?;
            writeln!(f, "Marks: {}/{nominal}", format_marks(qa.marks))?;
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
        }
        writeln!(f)?;
        writeln!(f, "Generated on: {}", format_datetime(self.generated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::model::{Difficulty, GradedAnswer, ResponseId, ResponsePayload, TestId};
    use insight_core::time::fixed_now;

    fn result(title: &str) -> Response {
        Response::from_payload(ResponsePayload {
            id: ResponseId::new("r1"),
            test_id: TestId::new("t1"),
            title: title.into(),
            subject: "Physics".into(),
            marks_obtained: 7.0,
            total_marks: 10,
            duration: 65,
            difficulty: Difficulty::Hard,
            pairs: 2,
            submitted_at: fixed_now(),
            teacher_email: "t@uni.edu".into(),
            questions_and_answers: vec![
                GradedAnswer {
                    question: "What is inertia?".into(),
                    sample_answer: "Resistance to change in motion".into(),
                    user_answer: "Resisting motion change".into(),
                    similarity: 72.5,
                    marks: 4.0,
                },
                GradedAnswer {
                    question: "Define momentum".into(),
                    sample_answer: "Mass times velocity".into(),
                    user_answer: String::new(),
                    similarity: 0.0,
                    marks: 0.0,
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn report_contains_every_section() {
        let user = User::new("ana@uni.edu", Some("Ana".into()), Some("Physics".into())).unwrap();
        let result = result("Mechanics");
        let text = TextReport::new(&result, &user, fixed_now()).to_string();

        assert!(text.starts_with("INSIGHTQA TEST REPORT\n"));
        assert!(text.contains("Student: Ana\nEmail: ana@uni.edu\nDepartment: Physics\n"));
        assert!(text.contains("Percentage: 70%"));
        assert!(text.contains("Duration: 1h 5m"));
        assert!(text.contains("Question 2:\nDefine momentum\n\nYour Answer:\nNo answer provided\n"));
        assert!(text.contains("Similarity Score: 72.5%\nMarks: 4/5\n"));
        assert!(text.trim_end().ends_with("Generated on: 2024-03-01 09:00"));
    }

    #[test]
    fn report_skips_missing_department() {
        let user = User::new("bo@uni.edu", None, None).unwrap();
        let result = result("Mechanics");
        let text = TextReport::new(&result, &user, fixed_now()).to_string();
        assert!(text.contains("Student: bo@uni.edu\n"));
        assert!(!text.contains("Department:"));
    }

    #[test]
    fn file_name_uses_title_and_student() {
        let user = User::new("bo@uni.edu", None, None).unwrap();
        let result = result("Unit 1/2");
        let report = TextReport::new(&result, &user, fixed_now());
        assert_eq!(report.file_name(), "Unit 1_2_Report_bo@uni.edu.txt");
    }
}
