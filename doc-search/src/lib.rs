//! Public API:
//! - [`ElasticClient`]: one ranked text-expansion `_search` against the annotations index.
//! - [`retrieve_documents`]: search, dedup by title, project into [`DocumentSummary`];
//!   failures become `None`.

mod elastic;
pub mod errors;
pub mod query;
mod retriever;
pub mod structs;

pub use elastic::ElasticClient;
pub use errors::search_error::SearchError;
pub use retriever::{DocumentSearch, RetrievalResult, project_hits, retrieve_documents};
pub use structs::document_summary::DocumentSummary;
pub use structs::search_config::SearchConfig;
pub use structs::search_hit::SearchHit;
