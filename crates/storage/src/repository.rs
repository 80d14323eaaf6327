use async_trait::async_trait;
use insight_core::model::{Response, ResponseSubmission, Test, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("submission rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Connection(err.to_string())
    }
}

/// Source of the tests a user may browse and take.
#[async_trait]
pub trait TestCatalogRepository: Send + Sync {
    /// Fetch the tests visible to `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be reached or decoded.
    async fn list_tests(&self, user: &User) -> Result<Vec<Test>, StorageError>;
}

/// Source of graded results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Fetch every graded result belonging to `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if results cannot be reached or decoded.
    async fn list_results(&self, user: &User) -> Result<Vec<Response>, StorageError>;
}

/// Receiver of completed sessions. Called at most once per session.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Hand one submission to the grader/persistence layer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the submission is not accepted.
    async fn submit_response(&self, submission: &ResponseSubmission) -> Result<(), StorageError>;
}

/// In-memory collaborator for tests and prototyping.
///
/// Every submission is recorded, including rejected ones, so callers can
/// count hand-off attempts.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tests: Arc<Mutex<Vec<Test>>>,
    results: Arc<Mutex<HashMap<String, Vec<Response>>>>,
    submissions: Arc<Mutex<Vec<ResponseSubmission>>>,
    reject_submissions: Arc<Mutex<bool>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_test(&self, test: Test) -> Result<(), StorageError> {
        let mut guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.retain(|existing| existing.id() != test.id());
        guard.push(test);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_result(&self, email: &str, response: Response) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let bucket = guard.entry(email.to_owned()).or_default();
        bucket.retain(|existing| existing.id() != response.id());
        bucket.push(response);
        Ok(())
    }

    /// Make every later submission fail with `StorageError::Rejected`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_reject_submissions(&self, reject: bool) -> Result<(), StorageError> {
        let mut guard = self
            .reject_submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = reject;
        Ok(())
    }

    /// Every submission received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<ResponseSubmission>, StorageError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl TestCatalogRepository for InMemoryRepository {
    async fn list_tests(&self, _user: &User) -> Result<Vec<Test>, StorageError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn list_results(&self, user: &User) -> Result<Vec<Response>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(user.email()).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ResponseSink for InMemoryRepository {
    async fn submit_response(&self, submission: &ResponseSubmission) -> Result<(), StorageError> {
        let reject = *self
            .reject_submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        self.submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .push(submission.clone());
        if reject {
            return Err(StorageError::Rejected("submissions disabled".into()));
        }
        Ok(())
    }
}

/// Aggregates collaborators behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub tests: Arc<dyn TestCatalogRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub responses: Arc<dyn ResponseSink>,
}

impl Storage {
    /// Use one adapter for all three roles.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: TestCatalogRepository + ResultRepository + ResponseSink + Clone + 'static,
    {
        let tests: Arc<dyn TestCatalogRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let responses: Arc<dyn ResponseSink> = Arc::new(repo);
        Self {
            tests,
            results,
            responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::model::{
        AnswerSlot, Difficulty, QuestionAnswer, ResponseId, ResponsePayload, TestId, TestPayload,
    };
    use insight_core::time::fixed_now;

    fn user(email: &str) -> User {
        User::new(email, None, None).unwrap()
    }

    fn build_test(id: &str) -> Test {
        Test::from_payload(TestPayload {
            id: TestId::new(id),
            title: format!("Test {id}"),
            subject: "Math".into(),
            marks: 10,
            duration: 5,
            difficulty: Difficulty::Easy,
            scheduled_at: fixed_now(),
            teacher_email: "t@uni.edu".into(),
            pairs: 1,
            questions_and_answers: vec![QuestionAnswer::new("Q", "A")],
        })
        .unwrap()
    }

    fn build_result(id: &str) -> Response {
        Response::from_payload(ResponsePayload {
            id: ResponseId::new(id),
            test_id: TestId::new("1"),
            title: "Test 1".into(),
            subject: "Math".into(),
            marks_obtained: 7.0,
            total_marks: 10,
            duration: 5,
            difficulty: Difficulty::Easy,
            pairs: 1,
            submitted_at: fixed_now(),
            teacher_email: "t@uni.edu".into(),
            questions_and_answers: Vec::new(),
        })
        .unwrap()
    }

    fn submission() -> ResponseSubmission {
        ResponseSubmission {
            test_id: TestId::new("1"),
            email: "ana@uni.edu".into(),
            questions_and_answers: vec![AnswerSlot::empty_for(&QuestionAnswer::new("Q", "A"))],
        }
    }

    #[tokio::test]
    async fn insert_test_replaces_same_id() {
        let repo = InMemoryRepository::new();
        repo.insert_test(build_test("1")).unwrap();
        repo.insert_test(build_test("1")).unwrap();
        repo.insert_test(build_test("2")).unwrap();

        let tests = repo.list_tests(&user("ana@uni.edu")).await.unwrap();
        assert_eq!(tests.len(), 2);
    }

    #[tokio::test]
    async fn results_are_scoped_to_user() {
        let repo = InMemoryRepository::new();
        repo.insert_result("ana@uni.edu", build_result("r1")).unwrap();
        repo.insert_result("bo@uni.edu", build_result("r2")).unwrap();

        let ana = repo.list_results(&user("ana@uni.edu")).await.unwrap();
        assert_eq!(ana.len(), 1);
        assert_eq!(ana[0].id().as_str(), "r1");
        assert!(
            repo.list_results(&user("cy@uni.edu"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn rejected_submissions_are_still_recorded() {
        let repo = InMemoryRepository::new();
        repo.submit_response(&submission()).await.unwrap();
        repo.set_reject_submissions(true).unwrap();
        let err = repo.submit_response(&submission()).await.unwrap_err();
        assert!(matches!(err, StorageError::Rejected(_)));
        assert_eq!(repo.submissions().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn storage_shares_one_repository() {
        let repo = InMemoryRepository::new();
        repo.insert_test(build_test("9")).unwrap();
        let storage = Storage::from_repository(repo.clone());

        storage.responses.submit_response(&submission()).await.unwrap();
        let tests = storage.tests.list_tests(&user("ana@uni.edu")).await.unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(repo.submissions().unwrap().len(), 1);
    }
}
