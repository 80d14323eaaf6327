mod pipeline;
mod service;

pub use crate::error::CatalogError;
pub use pipeline::{
    CatalogEntry, CatalogQuery, DifficultyFilter, SortKey, Timeline, apply, apply_owned,
};
pub use service::CatalogService;
