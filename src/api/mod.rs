// HTTP API

pub mod query;

pub use query::{create_query_router, QueryAppState};
