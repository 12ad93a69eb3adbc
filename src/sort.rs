//! Pipe-delimited sort parsing, `sort=field|direction`.

use sea_orm::{ColumnTrait, sea_query::Order};

/// Sort applied when the request does not specify one.
pub const DEFAULT_SORT: &str = "id|desc";

/// Parsed `sort` parameter, before column resolution.
#[derive(Debug, Clone)]
pub struct SortSpec {
    /// Requested field name, still unresolved
    pub field: String,
    /// `asc` (any case) is ascending, anything else descending
    pub order: Order,
}

/// Parse the `sort` parameter. Missing or blank input falls back to
/// [`DEFAULT_SORT`]; a bare field name with no pipe sorts descending.
#[must_use]
pub fn parse_sort(raw: Option<&str>) -> SortSpec {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SORT);

    let (field, direction) = raw.split_once('|').unwrap_or((raw, "desc"));
    let order = if direction.trim().eq_ignore_ascii_case("asc") {
        Order::Asc
    } else {
        Order::Desc
    };

    SortSpec {
        field: field.trim().to_string(),
        order,
    }
}

/// Resolve the requested field against the sortable column whitelist,
/// falling back to the id column for unknown fields.
pub fn resolve_sort<C>(spec: &SortSpec, sortable: &[(&str, C)], default_column: C) -> (C, Order)
where
    C: ColumnTrait,
{
    let column = sortable
        .iter()
        .find(|&&(name, _)| name == spec.field)
        .map_or(default_column, |&(_, col)| col);

    (column, spec.order.clone())
}
