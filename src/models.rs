use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for the list operation.
///
/// # Filtering
/// The `filter` parameter is a JSON-encoded object mapping field names to
/// values, for example:
/// ```json
/// {"nome": "ana", "cidade_id": 3}
/// ```
/// Keys ending in `_id` match exactly; other keys match case-insensitively
/// on substrings. Empty strings and nested values are ignored.
///
/// # Sorting
/// The `sort` parameter is pipe-delimited, `field|direction`, defaulting to
/// `id|desc`:
/// ```text
/// sort=nome|asc
/// ```
///
/// # Pagination
/// `page` is 1-based, `per_page` defaults to 15 and is capped.
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// JSON-encoded object of field filters, e.g. `{"nome": "ana"}`.
    #[param(example = json!({"nome": "ana", "cidade_id": 3}))]
    pub filter: Option<String>,
    /// Sort specification in the form `field|direction`.
    #[param(example = "nome|asc")]
    pub sort: Option<String>,
    /// 1-based page number.
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Page size, defaults to 15.
    #[param(example = 15)]
    pub per_page: Option<u64>,
}

/// Query parameters for the option-list endpoints.
///
/// The endpoints return `{id, value}`-style rows for select widgets; the
/// aliases control the key names in each row:
/// ```json
/// [{"value": 3, "label": "Curitiba"}]
/// ```
/// for `coluna=nome&colunaAlias=label&idAlias=value`.
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct OptionsQuery {
    /// Column to list distinct values of. Defaults to the id column.
    #[param(example = "nome")]
    pub coluna: Option<String>,
    /// Key under which the column value appears in each row. Defaults to
    /// the column name itself.
    #[serde(rename = "colunaAlias")]
    #[param(example = "label")]
    pub coluna_alias: Option<String>,
    /// Key under which the record id appears in each row. Defaults to `id`.
    #[serde(rename = "idAlias")]
    #[param(example = "value")]
    pub id_alias: Option<String>,
}

/// Acknowledgement body returned by destroy.
///
/// `success` echoes the delete guard: `true` means the guard blocked the
/// delete and nothing was removed, `false` means a row was actually
/// deleted. Clients treat the HTTP status as the success signal and this
/// flag as the guard report.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteOutcome {
    pub success: bool,
}
