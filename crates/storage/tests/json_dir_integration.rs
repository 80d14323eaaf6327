use insight_core::model::{AnswerSlot, Difficulty, ResponseSubmission, TestId, User};
use storage::{JsonDirRepository, Storage};

const TESTS: &str = r#"{
  "tests": [
    {
      "id": 12,
      "title": "Photosynthesis",
      "subject": "Biology",
      "marks": 20,
      "duration": 15,
      "difficulty": "medium",
      "scheduled_at": "2024-03-01T09:00:00",
      "teacher_email": "t@uni.edu",
      "pairs": 2,
      "questions_and_answers": [
        {"question": "What gas is absorbed?", "answer": "Carbon dioxide"},
        {"question": "Where does it happen?", "answer": "Chloroplasts"}
      ]
    }
  ]
}"#;

const RESPONSES: &str = r#"{
  "responses": [
    {
      "id": "r-1",
      "test_id": 12,
      "title": "Photosynthesis",
      "subject": "Biology",
      "marks_obtained": 14.5,
      "total_marks": 20,
      "duration": 15,
      "difficulty": "Medium",
      "pairs": 2,
      "submitted_at": "2024-03-01T09:20:00Z",
      "teacher_email": "t@uni.edu",
      "questions_and_answers": [
        {"question": "What gas is absorbed?", "sample_answer": "Carbon dioxide",
         "user_answer": "CO2", "similarity": 81, "marks": 9},
        {"question": "Where does it happen?", "sample_answer": "Chloroplasts",
         "user_answer": "leaves", "similarity": 45.5, "marks": 5.5}
      ]
    }
  ]
}"#;

fn user() -> User {
    User::new("ana@uni.edu", None, None).unwrap()
}

#[tokio::test]
async fn api_shaped_files_feed_storage_roles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tests.json"), TESTS).unwrap();
    std::fs::write(dir.path().join("responses.json"), RESPONSES).unwrap();
    let storage = Storage::from_repository(JsonDirRepository::new(dir.path()));

    let tests = storage.tests.list_tests(&user()).await.unwrap();
    assert_eq!(tests.len(), 1);
    let test = &tests[0];
    assert_eq!(test.id(), &TestId::new("12"));
    assert_eq!(test.difficulty(), Difficulty::Medium);
    assert_eq!(test.duration_seconds(), 900);
    assert_eq!(test.scheduled_at(), insight_core::time::fixed_now());

    let results = storage.results.list_results(&user()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].marks_obtained(), 14.5);
    assert_eq!(results[0].answers()[1].marks, 5.5);

    let submission = ResponseSubmission {
        test_id: test.id().clone(),
        email: user().email().to_owned(),
        questions_and_answers: test.questions().iter().map(AnswerSlot::empty_for).collect(),
    };
    storage.responses.submit_response(&submission).await.unwrap();

    let written = std::fs::read_to_string(dir.path().join("submissions.jsonl")).unwrap();
    let line: serde_json::Value = serde_json::from_str(written.trim_end()).unwrap();
    assert_eq!(line["test_id"], "12");
    assert_eq!(line["email"], "ana@uni.edu");
    assert_eq!(line["questions_and_answers"][0]["sampleAnswer"], "Carbon dioxide");
    assert_eq!(line["questions_and_answers"][0]["userAnswer"], "");
}
