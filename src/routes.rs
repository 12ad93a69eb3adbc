//! Generic Axum handlers over [`CrudResource`] plus the [`crud_router!`]
//! wiring macro. Each handler is a thin translation between the HTTP
//! surface and the trait operations; instantiate them with a concrete
//! resource, `get(list::<Cliente>)`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    errors::ApiError,
    models::{DeleteOutcome, ListQuery, OptionsQuery},
    pagination::Page,
    traits::CrudResource,
};

/// GET `/`, the paginated listing.
pub async fn list<R>(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<R::ListModel>>, ApiError>
where
    R: CrudResource,
{
    Ok(Json(R::list(&db, &params).await?))
}

/// GET `/{id}`. A missing record is a 404 here; the operation itself
/// reports it as `None`.
pub async fn show<R>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<R::Id>,
) -> Result<Json<R>, ApiError>
where
    R: CrudResource,
{
    match R::show(&db, &id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::not_found(
            R::RESOURCE_NAME_SINGULAR,
            Some(id.to_string()),
        )),
    }
}

/// POST `/`, create or update by payload id. Returns the stored record.
pub async fn store<R>(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<Value>,
) -> Result<Json<R>, ApiError>
where
    R: CrudResource,
{
    let Value::Object(fields) = payload else {
        return Err(ApiError::bad_request("Payload must be a JSON object"));
    };
    Ok(Json(R::save(&db, fields).await?))
}

/// DELETE `/{id}`.
pub async fn destroy<R>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<R::Id>,
) -> Result<Json<DeleteOutcome>, ApiError>
where
    R: CrudResource,
{
    Ok(Json(R::destroy(&db, &id).await?))
}

/// GET `/options`.
pub async fn options<R>(
    State(db): State<DatabaseConnection>,
    Query(params): Query<OptionsQuery>,
) -> Result<Json<Vec<Value>>, ApiError>
where
    R: CrudResource,
{
    Ok(Json(R::options(&db, &params).await?))
}

/// GET `/options/active`.
pub async fn options_active<R>(
    State(db): State<DatabaseConnection>,
    Query(params): Query<OptionsQuery>,
) -> Result<Json<Vec<Value>>, ApiError>
where
    R: CrudResource,
{
    Ok(Json(R::options_active(&db, &params).await?))
}

/// Build a router exposing the six resource routes, with the connection as
/// state:
///
/// ```rust,ignore
/// let app = axum::Router::new()
///     .nest("/clientes", crud_router!(Cliente, db.clone()))
///     .nest("/cidades", crud_router!(Cidade, db.clone()));
/// ```
///
/// | method | path              | operation        |
/// |--------|-------------------|------------------|
/// | GET    | `/`               | list             |
/// | POST   | `/`               | store            |
/// | GET    | `/options`        | options          |
/// | GET    | `/options/active` | `options_active` |
/// | GET    | `/{id}`           | show             |
/// | DELETE | `/{id}`           | destroy          |
#[macro_export]
macro_rules! crud_router {
    ($resource:ty, $db:expr) => {{
        axum::Router::new()
            .route(
                "/",
                axum::routing::get($crate::routes::list::<$resource>)
                    .post($crate::routes::store::<$resource>),
            )
            .route(
                "/options",
                axum::routing::get($crate::routes::options::<$resource>),
            )
            .route(
                "/options/active",
                axum::routing::get($crate::routes::options_active::<$resource>),
            )
            .route(
                "/{id}",
                axum::routing::get($crate::routes::show::<$resource>)
                    .delete($crate::routes::destroy::<$resource>),
            )
            .with_state($db)
    }};
}
