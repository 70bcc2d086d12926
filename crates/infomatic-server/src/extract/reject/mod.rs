//! Request-data extractors whose rejections use the service error type.

mod json;
mod path;
mod query;
mod validate_json;

pub use crate::extract::reject::json::Json;
pub use crate::extract::reject::path::Path;
pub use crate::extract::reject::query::Query;
pub use crate::extract::reject::validate_json::ValidateJson;
