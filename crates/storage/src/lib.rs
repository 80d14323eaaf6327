#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonDirRepository;
pub use repository::{
    InMemoryRepository, ResponseSink, ResultRepository, Storage, StorageError,
    TestCatalogRepository,
};
