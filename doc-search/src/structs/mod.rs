pub mod document_summary;
pub mod search_config;
pub mod search_hit;
