pub mod query_log_repo;

pub use query_log_repo::*;
