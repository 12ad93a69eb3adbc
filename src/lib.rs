pub mod errors;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod sort;
pub mod traits;
pub mod validation;

pub use errors::{ApiError, DEPENDENT_RECORDS_MESSAGE, ErrorResponse};
pub use models::{DeleteOutcome, ListQuery, OptionsQuery};
pub use pagination::Page;
pub use traits::CrudResource;
pub use validation::{Rule, RuleSet, ValidationErrors};
