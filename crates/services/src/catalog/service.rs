use std::sync::Arc;

use tracing::error;

use insight_core::Clock;
use insight_core::model::{Response, ResponseId, Test, TestId, User};
use insight_core::scoring::average_percentage;
use storage::repository::{ResultRepository, TestCatalogRepository};

use super::pipeline::{CatalogQuery, apply_owned};
use crate::error::CatalogError;
use crate::sessions::TestHandoff;

/// Read side of the catalog: upcoming tests and graded results.
///
/// Fetch failures are logged and show up as an empty catalog.
#[derive(Clone)]
pub struct CatalogService {
    clock: Clock,
    tests: Arc<dyn TestCatalogRepository>,
    results: Arc<dyn ResultRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        clock: Clock,
        tests: Arc<dyn TestCatalogRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            tests,
            results,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub async fn tests_for(&self, user: &User, query: &CatalogQuery) -> Vec<Test> {
        let tests = self.fetch_tests(user).await;
        apply_owned(&tests, query)
    }

    pub async fn results_for(&self, user: &User, query: &CatalogQuery) -> Vec<Response> {
        let results = self.fetch_results(user).await;
        apply_owned(&results, query)
    }

    /// Resolve one result for the detail view.
    pub async fn result_by_id(&self, user: &User, id: &ResponseId) -> Option<Response> {
        self.fetch_results(user)
            .await
            .into_iter()
            .find(|result| result.id() == id)
    }

    /// Mean percentage over every result of `user`.
    pub async fn average_score(&self, user: &User) -> Option<f64> {
        average_percentage(&self.fetch_results(user).await)
    }

    /// Prepare the handoff that starts a session for `test_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownTest` when the test is not listed,
    /// `CatalogError::NotYetAvailable` before its scheduled start, or
    /// `CatalogError::Storage` when the catalog cannot be read.
    pub async fn start_test(&self, user: &User, test_id: &TestId) -> Result<TestHandoff, CatalogError> {
        let tests = self.tests.list_tests(user).await?;
        let test = tests
            .iter()
            .find(|test| test.id() == test_id)
            .ok_or_else(|| CatalogError::UnknownTest(test_id.clone()))?;
        if !test.is_available(self.clock.now()) {
            return Err(CatalogError::NotYetAvailable {
                test_id: test_id.clone(),
                opens_at: test.scheduled_at(),
            });
        }
        Ok(TestHandoff::from_test(test))
    }

    async fn fetch_tests(&self, user: &User) -> Vec<Test> {
        match self.tests.list_tests(user).await {
            Ok(tests) => tests,
            Err(err) => {
                error!(user = user.email(), error = %err, "failed to fetch tests");
                Vec::new()
            }
        }
    }

    async fn fetch_results(&self, user: &User) -> Vec<Response> {
        match self.results.list_results(user).await {
            Ok(results) => results,
            Err(err) => {
                error!(user = user.email(), error = %err, "failed to fetch results");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use insight_core::model::{Difficulty, QuestionAnswer, ResponsePayload, TestPayload};
    use insight_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, StorageError};

    struct Offline;

    #[async_trait::async_trait]
    impl TestCatalogRepository for Offline {
        async fn list_tests(&self, _user: &User) -> Result<Vec<Test>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[async_trait::async_trait]
    impl ResultRepository for Offline {
        async fn list_results(&self, _user: &User) -> Result<Vec<Response>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn user() -> User {
        User::new("ana@uni.edu", None, None).unwrap()
    }

    fn build_test(id: &str, offset_h: i64) -> Test {
        Test::from_payload(TestPayload {
            id: TestId::new(id),
            title: format!("Test {id}"),
            subject: "History".into(),
            marks: 20,
            duration: 10,
            difficulty: Difficulty::Medium,
            scheduled_at: fixed_now() + Duration::hours(offset_h),
            teacher_email: "t@uni.edu".into(),
            pairs: 1,
            questions_and_answers: vec![QuestionAnswer::new("Q", "A")],
        })
        .unwrap()
    }

    fn build_result(id: &str, obtained: f64) -> Response {
        Response::from_payload(ResponsePayload {
            id: ResponseId::new(id),
            test_id: TestId::new("1"),
            title: "Test 1".into(),
            subject: "History".into(),
            marks_obtained: obtained,
            total_marks: 10,
            duration: 10,
            difficulty: Difficulty::Medium,
            pairs: 1,
            submitted_at: fixed_now(),
            teacher_email: "t@uni.edu".into(),
            questions_and_answers: Vec::new(),
        })
        .unwrap()
    }

    fn service(repo: &InMemoryRepository) -> CatalogService {
        CatalogService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn fetch_failures_yield_empty_catalogs() {
        let offline = Arc::new(Offline);
        let svc = CatalogService::new(fixed_clock(), offline.clone(), offline);
        assert!(svc.tests_for(&user(), &CatalogQuery::new()).await.is_empty());
        assert!(svc.results_for(&user(), &CatalogQuery::new()).await.is_empty());
        assert_eq!(svc.average_score(&user()).await, None);
        assert!(matches!(
            svc.start_test(&user(), &TestId::new("1")).await,
            Err(CatalogError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn result_lookup_by_id() {
        let repo = InMemoryRepository::new();
        repo.insert_result("ana@uni.edu", build_result("r1", 7.0)).unwrap();
        repo.insert_result("ana@uni.edu", build_result("r2", 9.0)).unwrap();
        let svc = service(&repo);

        let found = svc.result_by_id(&user(), &ResponseId::new("r2")).await;
        assert_eq!(found.unwrap().marks_obtained(), 9.0);
        assert!(svc.result_by_id(&user(), &ResponseId::new("zz")).await.is_none());
        assert_eq!(svc.average_score(&user()).await, Some(80.0));
    }

    #[tokio::test]
    async fn start_test_respects_schedule() {
        let repo = InMemoryRepository::new();
        repo.insert_test(build_test("open", -1)).unwrap();
        repo.insert_test(build_test("now", 0)).unwrap();
        repo.insert_test(build_test("later", 2)).unwrap();
        let svc = service(&repo);

        assert!(svc.start_test(&user(), &TestId::new("open")).await.is_ok());
        assert!(svc.start_test(&user(), &TestId::new("now")).await.is_ok());
        assert!(matches!(
            svc.start_test(&user(), &TestId::new("later")).await,
            Err(CatalogError::NotYetAvailable { .. })
        ));
        assert!(matches!(
            svc.start_test(&user(), &TestId::new("missing")).await,
            Err(CatalogError::UnknownTest(_))
        ));
    }
}
