//! File-backed collaborator reading API-shaped JSON from a directory.
//!
//! Layout:
//! - `tests.json`: `{"tests": [...]}` or a bare array of test payloads
//! - `responses.json`: `{"responses": [...]}` or a bare array of result payloads
//! - `submissions.jsonl`: one outbound submission per line, appended

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use insight_core::model::{
    Response, ResponsePayload, ResponseSubmission, Test, TestPayload, User,
};

use crate::repository::{ResponseSink, ResultRepository, StorageError, TestCatalogRepository};

pub const TESTS_FILE: &str = "tests.json";
pub const RESPONSES_FILE: &str = "responses.json";
pub const SUBMISSIONS_FILE: &str = "submissions.jsonl";

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Tests { tests: Vec<Value> },
    Responses { responses: Vec<Value> },
    Bare(Vec<Value>),
}

impl Envelope {
    fn into_entries(self) -> Vec<Value> {
        match self {
            Envelope::Tests { tests } => tests,
            Envelope::Responses { responses } => responses,
            Envelope::Bare(entries) => entries,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    root: PathBuf,
}

impl JsonDirRepository {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_entries(&self, file: &str) -> Result<Vec<Value>, StorageError> {
        let path = self.root.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_entries())
    }
}

/// Decode each entry, skipping the ones that fail payload decoding or validation.
fn decode_entries<P, T, E>(file: &str, entries: Vec<Value>, validate: fn(P) -> Result<T, E>) -> Vec<T>
where
    P: DeserializeOwned,
    E: std::fmt::Display,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let decoded = serde_json::from_value::<P>(entry)
                .map_err(|e| e.to_string())
                .and_then(|payload| validate(payload).map_err(|e| e.to_string()));
            match decoded {
                Ok(item) => Some(item),
                Err(reason) => {
                    tracing::warn!("skipping {file}[{index}]: {reason}");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl TestCatalogRepository for JsonDirRepository {
    async fn list_tests(&self, _user: &User) -> Result<Vec<Test>, StorageError> {
        let entries = self.read_entries(TESTS_FILE).await?;
        Ok(decode_entries::<TestPayload, _, _>(
            TESTS_FILE,
            entries,
            Test::from_payload,
        ))
    }
}

#[async_trait]
impl ResultRepository for JsonDirRepository {
    /// The file already holds one user's results, so `user` is not consulted.
    async fn list_results(&self, _user: &User) -> Result<Vec<Response>, StorageError> {
        let entries = self.read_entries(RESPONSES_FILE).await?;
        Ok(decode_entries::<ResponsePayload, _, _>(
            RESPONSES_FILE,
            entries,
            Response::from_payload,
        ))
    }
}

#[async_trait]
impl ResponseSink for JsonDirRepository {
    async fn submit_response(&self, submission: &ResponseSubmission) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let mut line = serde_json::to_vec(submission)?;
        line.push(b'\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(SUBMISSIONS_FILE))
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
