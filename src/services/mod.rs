pub mod query_log_service;
pub mod search_service;

pub use query_log_service::*;
pub use search_service::*;
