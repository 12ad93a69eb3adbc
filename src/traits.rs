use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, EntityTrait, IntoActiveModel, Iterable, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, entity::prelude::*,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    errors::ApiError,
    filter::{build_condition, parse_filter},
    models::{DeleteOutcome, ListQuery, OptionsQuery},
    pagination::{Page, page_bounds},
    sort::{parse_sort, resolve_sort},
    validation::RuleSet,
};

/// Per-resource CRUD contract.
///
/// Implemented on the API-facing struct of a resource. The write target
/// ([`CrudResource::Entity`]) is the base table behind store, show and
/// destroy; the read target ([`CrudResource::ReadEntity`]) backs list and the
/// option listings and is where resources plug in a database view with
/// joined or computed columns. Resources without a view set
/// `ReadEntity = Entity`.
///
/// All operations come as default methods; a resource only declares its
/// types, names and whitelists, and overrides the two hooks
/// ([`CrudResource::delete_blocked`], [`CrudResource::validation_rules`])
/// when it needs them.
#[async_trait]
pub trait CrudResource: Sized + Send + Sync + Serialize
where
    Self::Entity: EntityTrait + Sync,
    Self::ReadEntity: EntityTrait + Sync,
    Self::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Default + Send + Sync,
    <Self::Entity as EntityTrait>::Model:
        Sync + IntoActiveModel<Self::ActiveModel> + Serialize + DeserializeOwned,
    <Self::ReadEntity as EntityTrait>::Model: Sync,
    Self: From<<Self::Entity as EntityTrait>::Model>,
    Self::ListModel: From<<Self::ReadEntity as EntityTrait>::Model>,
{
    /// Write target, the table records are stored in and deleted from.
    type Entity: EntityTrait + Sync;

    /// Read target for list and option queries, usually a view over
    /// [`CrudResource::Entity`]. Set it to the entity itself when there is
    /// no separate view.
    type ReadEntity: EntityTrait + Sync;

    /// Column enum of the read target.
    type ReadColumn: ColumnTrait + std::fmt::Debug;

    /// Active model of the write target.
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>;

    /// Row shape produced by list, converted from read-target models.
    type ListModel: Serialize + Send + Sync;

    /// Primary key type as it appears in URLs and payloads.
    type Id: Into<<<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType>
        + Clone
        + std::fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Id column on the read target. Default sort column and the id side of
    /// option rows.
    const ID_COLUMN: Self::ReadColumn;

    const RESOURCE_NAME_SINGULAR: &str;
    const RESOURCE_NAME_PLURAL: &str;

    /// Fields accepted in `filter`, resolved against read-target columns.
    /// Filter entries outside this list are ignored.
    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Fields accepted in `sort`. Unknown fields fall back to the id column.
    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Columns the option listings may project. Requests for columns outside
    /// this list are rejected.
    #[must_use]
    fn option_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Column holding the 0/1 active flag used by the active option listing.
    #[must_use]
    fn active_flag() -> Option<Self::ReadColumn> {
        None
    }

    /// Guard consulted before any destroy. Returning `Ok(true)` skips the
    /// deletion entirely and reports `success: true` to the caller; the
    /// usual override checks whether dependent rows still reference the
    /// record.
    async fn delete_blocked(_db: &DatabaseConnection, _id: &Self::Id) -> Result<bool, ApiError> {
        Ok(false)
    }

    /// Rules applied to store payloads, checked over every field except
    /// `id`. The default accepts everything.
    #[must_use]
    fn validation_rules() -> RuleSet {
        RuleSet::none()
    }

    /// Paginated listing over the read target with filtering and sorting.
    async fn list(
        db: &DatabaseConnection,
        query: &ListQuery,
    ) -> Result<Page<Self::ListModel>, ApiError> {
        let predicates = parse_filter(query.filter.as_deref());
        let condition = build_condition(&predicates, &Self::filterable_columns());
        let spec = parse_sort(query.sort.as_deref());
        let (order_column, order_direction) =
            resolve_sort(&spec, &Self::sortable_columns(), Self::ID_COLUMN);
        let bounds = page_bounds(query.page, query.per_page);

        tracing::debug!(
            resource = Self::RESOURCE_NAME_PLURAL,
            page = bounds.page,
            per_page = bounds.per_page,
            predicates = predicates.len(),
            "listing records"
        );

        let paginator = Self::ReadEntity::find()
            .filter(condition)
            .order_by(order_column, order_direction)
            .paginate(db, bounds.per_page);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(ApiError::database)?;
        let models = paginator
            .fetch_page(bounds.page - 1)
            .await
            .map_err(ApiError::database)?;

        Ok(Page::new(
            models.into_iter().map(Self::ListModel::from).collect(),
            totals.number_of_items,
            bounds,
            totals.number_of_pages,
        ))
    }

    /// Fetch one record by id from the write target. A missing id is
    /// `Ok(None)`; the HTTP layer decides what that maps to.
    async fn show(db: &DatabaseConnection, id: &Self::Id) -> Result<Option<Self>, ApiError> {
        let model = Self::Entity::find_by_id(id.clone().into())
            .one(db)
            .await
            .map_err(ApiError::database)?;
        Ok(model.map(Self::from))
    }

    /// Upsert. With no `id` in the payload a record is created; with an `id`
    /// matching an existing record the payload fields are merged over the
    /// stored row and written back; with an `id` matching nothing a record is
    /// created under that id. Validation runs first, against everything
    /// except `id`.
    async fn save(db: &DatabaseConnection, payload: Map<String, Value>) -> Result<Self, ApiError> {
        let mut fields = payload.clone();
        fields.remove("id");
        Self::validation_rules().check(&fields)?;

        let id_value = payload.get("id").filter(|v| !v.is_null()).cloned();
        let Some(raw_id) = id_value else {
            // A null id is treated the same as an absent one.
            let model = Self::insert_from(db, fields).await?;
            return Ok(Self::from(model));
        };

        let id: Self::Id = serde_json::from_value(raw_id)
            .map_err(|err| ApiError::bad_request(format!("Invalid id: {err}")))?;
        let existing = Self::Entity::find_by_id(id.clone().into())
            .one(db)
            .await
            .map_err(ApiError::database)?;

        match existing {
            Some(model) => {
                // Merge the payload over the stored row so absent columns
                // keep their values, then mark only the supplied ones for
                // the update statement.
                let mut merged = serde_json::to_value(&model).map_err(|err| {
                    ApiError::internal("Falha ao processar registro", Some(err.to_string()))
                })?;
                if let Value::Object(row) = &mut merged {
                    for (key, value) in &fields {
                        row.insert(key.clone(), value.clone());
                    }
                }
                let patched: <Self::Entity as EntityTrait>::Model = serde_json::from_value(merged)
                    .map_err(|err| ApiError::bad_request(format!("Invalid payload: {err}")))?;
                let mut active_model = patched.into_active_model();
                for column in <<Self::Entity as EntityTrait>::Column as Iterable>::iter() {
                    if !fields.contains_key(column.as_str()) {
                        continue;
                    }
                    if let Some(value) = active_model.get(column).into_value() {
                        active_model.set(column, value);
                    }
                }
                // Nothing set besides the id, return the record as is.
                if !active_model.is_changed() {
                    return Ok(Self::from(model));
                }
                let updated = active_model.update(db).await.map_err(ApiError::database)?;
                tracing::debug!(
                    resource = Self::RESOURCE_NAME_SINGULAR,
                    id = %id,
                    "record updated"
                );
                Ok(Self::from(updated))
            }
            None => {
                let model = Self::insert_from(db, payload).await?;
                tracing::debug!(
                    resource = Self::RESOURCE_NAME_SINGULAR,
                    id = %id,
                    "record created with caller-supplied id"
                );
                Ok(Self::from(model))
            }
        }
    }

    /// Insert a new row from payload fields. Payload keys that match no
    /// column are dropped by the model deserialization; a present `id` is
    /// kept, an absent one follows the column default.
    async fn insert_from(
        db: &DatabaseConnection,
        payload: Map<String, Value>,
    ) -> Result<<Self::Entity as EntityTrait>::Model, ApiError> {
        let active_model =
            Self::ActiveModel::from_json(Value::Object(payload)).map_err(payload_error)?;
        active_model.insert(db).await.map_err(ApiError::database)
    }

    /// Delete by id, honoring the [`CrudResource::delete_blocked`] guard.
    ///
    /// A blocked delete removes nothing and acknowledges with
    /// `success: true`. A delete that violates referential integrity keeps
    /// the record and fails with the fixed dependency message. Deleting an
    /// id that never existed is a 404.
    async fn destroy(db: &DatabaseConnection, id: &Self::Id) -> Result<DeleteOutcome, ApiError> {
        if Self::delete_blocked(db, id).await? {
            tracing::debug!(
                resource = Self::RESOURCE_NAME_SINGULAR,
                id = %id,
                "delete blocked by guard"
            );
            return Ok(DeleteOutcome { success: true });
        }

        let result = Self::Entity::delete_by_id(id.clone().into()).exec(db).await;
        match result {
            Ok(res) if res.rows_affected == 0 => Err(ApiError::not_found(
                Self::RESOURCE_NAME_SINGULAR,
                Some(id.to_string()),
            )),
            Ok(_) => Ok(DeleteOutcome { success: false }),
            Err(err) => match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(ApiError::dependent_records(err))
                }
                _ => Err(ApiError::database(err)),
            },
        }
    }

    /// Distinct values of one read-target column, shaped for select widgets.
    async fn options(db: &DatabaseConnection, query: &OptionsQuery) -> Result<Vec<Value>, ApiError> {
        Self::fetch_options(db, query, None).await
    }

    /// Same as [`CrudResource::options`], restricted to rows whose active
    /// flag equals 1.
    async fn options_active(
        db: &DatabaseConnection,
        query: &OptionsQuery,
    ) -> Result<Vec<Value>, ApiError> {
        match Self::active_flag() {
            Some(flag) => Self::fetch_options(db, query, Some(flag)).await,
            None => Err(ApiError::internal(
                format!("Falha ao listar {}", Self::RESOURCE_NAME_PLURAL),
                Some(format!(
                    "{} has no active flag column configured",
                    Self::RESOURCE_NAME_SINGULAR
                )),
            )),
        }
    }

    /// Shared implementation of the two option listings.
    ///
    /// Projects the requested column (aliased) together with the id
    /// (aliased), excluding rows where the column is null, ordered
    /// ascending. When the requested column is the id itself only the id is
    /// selected. The column name must be whitelisted; aliases pass through
    /// identifier quoting and never reach the SQL text raw.
    async fn fetch_options(
        db: &DatabaseConnection,
        query: &OptionsQuery,
        active_flag: Option<Self::ReadColumn>,
    ) -> Result<Vec<Value>, ApiError> {
        let column_name = query.coluna.as_deref().unwrap_or("id");
        let Some((_, column)) = Self::option_columns()
            .into_iter()
            .find(|(name, _)| *name == column_name)
        else {
            return Err(ApiError::bad_request(format!(
                "Unknown column '{column_name}' for {}",
                Self::RESOURCE_NAME_PLURAL
            )));
        };
        let column_alias = query.coluna_alias.as_deref().unwrap_or(column_name);
        let id_alias = query.id_alias.as_deref().unwrap_or("id");

        let mut select = Self::ReadEntity::find().select_only();
        if column_name == "id" {
            select = select.column_as(Self::ID_COLUMN, id_alias);
        } else {
            select = select
                .distinct()
                .column_as(column, column_alias)
                .column_as(Self::ID_COLUMN, id_alias);
        }
        select = select.filter(column.is_not_null()).order_by_asc(column);
        if let Some(flag) = active_flag {
            select = select.filter(flag.eq(1));
        }

        select.into_json().all(db).await.map_err(ApiError::database)
    }
}

/// Payload deserialization problems are the caller's fault, everything else
/// stays a database error.
fn payload_error(err: DbErr) -> ApiError {
    match err {
        DbErr::Json(message) => ApiError::bad_request(format!("Invalid payload: {message}")),
        other => ApiError::database(other),
    }
}
