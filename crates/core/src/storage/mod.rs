//! Contract for the underlying document store and the repository error taxonomy.

mod error;
mod http_mapping;
mod rule;
mod traits;
mod types;

pub use error::{RepositoryError, Result, StoreError, StoreResult};
pub use http_mapping::repository_error_to_status_code;
pub use rule::{filter_by_rule, Condition, Rule};
pub use traits::{DocumentStore, EntityRepository};
pub use types::{document_id, from_document, to_document, Document};
