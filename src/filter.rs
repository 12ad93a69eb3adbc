//! Filter parsing and condition building
//!
//! The `filter` query parameter carries a JSON object mapping field names to
//! values (`{"nome":"ana","cidade_id":3}`). It is decoded exactly once, at
//! the request boundary, into a list of typed [`Predicate`]s:
//!
//! - keys ending in `_id` follow the foreign key convention and become an
//!   equality test on the raw value;
//! - every other key with a non-empty scalar value becomes a
//!   case-insensitive substring match, `UPPER(col) LIKE '%VALUE%'`;
//! - empty strings, nulls and nested values (arrays, objects) are skipped.
//!   Filtering through nested relations is not supported.
//!
//! Building the SQL condition is a separate step: each predicate field is
//! resolved against the resource's filterable column whitelist, and unknown
//! fields are dropped. Values are always bound as query parameters and
//! column identifiers only ever come from the whitelist, so no request text
//! reaches the SQL string.

use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, SimpleExpr},
};
use serde_json::{Map, Value};

/// Scalar filter value, as found in the decoded filter object.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl FilterValue {
    /// Convert a JSON value into a scalar, or `None` for nulls and nested
    /// values.
    fn from_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Upper-cased rendering used as a LIKE needle.
    fn to_needle(&self) -> String {
        match self {
            Self::Text(s) => s.to_uppercase(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string().to_uppercase(),
        }
    }
}

/// One typed filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match, emitted for `_id` keys
    Eq { field: String, value: FilterValue },
    /// Case-insensitive substring match; the needle is stored upper-cased
    Contains { field: String, needle: String },
}

impl Predicate {
    /// The payload key this predicate came from.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::Contains { field, .. } => field,
        }
    }
}

/// Decode the `filter` parameter into predicates.
///
/// Anything that is not a JSON object (bad JSON, a bare scalar, an array) is
/// logged at warn level and treated as the empty filter, matching the
/// lenient contract the UI clients rely on.
#[must_use]
pub fn parse_filter(raw: Option<&str>) -> Vec<Predicate> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let fields: Map<String, Value> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(filter = %other, "filter is not a JSON object, ignoring");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(error = %err, "filter is not valid JSON, ignoring");
            return Vec::new();
        }
    };

    let mut predicates = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let Some(value) = FilterValue::from_scalar(&value) else {
            tracing::debug!(field = %key, "nested or null filter value skipped");
            continue;
        };
        if value.is_blank() {
            continue;
        }
        if key.ends_with("_id") {
            predicates.push(Predicate::Eq { field: key, value });
        } else {
            let needle = value.to_needle();
            predicates.push(Predicate::Contains { field: key, needle });
        }
    }
    predicates
}

/// Resolve predicates against the filterable column whitelist and combine
/// them into a single AND condition. Predicates on unknown fields are
/// dropped.
pub fn build_condition<C: ColumnTrait>(
    predicates: &[Predicate],
    filterable: &[(&str, C)],
) -> Condition {
    let mut condition = Condition::all();
    for predicate in predicates {
        let Some((_, col)) = filterable
            .iter()
            .find(|(name, _)| *name == predicate.field())
        else {
            tracing::debug!(field = %predicate.field(), "filter field is not filterable, skipped");
            continue;
        };
        condition = condition.add(match predicate {
            Predicate::Eq { value, .. } => match value {
                FilterValue::Text(s) => col.eq(s.as_str()),
                FilterValue::Integer(i) => col.eq(*i),
                FilterValue::Float(f) => col.eq(*f),
                FilterValue::Bool(b) => col.eq(*b),
            },
            Predicate::Contains { needle, .. } => {
                SimpleExpr::FunctionCall(Func::upper(Expr::col(*col))).like(format!("%{needle}%"))
            }
        });
    }
    condition
}
