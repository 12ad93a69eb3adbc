//! Minimal CRUD API over a single `produtos` table.
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then try:
//! - `curl 'http://localhost:3000/produtos?filter=%7B%22nome%22%3A%22caf%22%7D&sort=nome|asc'`
//! - `curl -X POST http://localhost:3000/produtos -H 'Content-Type: application/json' -d '{"nome": "Café", "preco": 12.5}'`
//! - `curl 'http://localhost:3000/produtos/options?coluna=nome'`
//! - `curl -X DELETE http://localhost:3000/produtos/1`

use crudbase::{CrudResource, Rule, RuleSet, crud_router};
use sea_orm::{Database, DatabaseConnection, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::env;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod produto {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "produtos")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub nome: String,
        #[sea_orm(column_type = "Double", nullable)]
        pub preco: Option<f64>,
        pub ativo: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Serialize)]
pub struct Produto(produto::Model);

impl From<produto::Model> for Produto {
    fn from(model: produto::Model) -> Self {
        Self(model)
    }
}

#[async_trait::async_trait]
impl CrudResource for Produto {
    type Entity = produto::Entity;
    type ReadEntity = produto::Entity;
    type ReadColumn = produto::Column;
    type ActiveModel = produto::ActiveModel;
    type ListModel = produto::Model;
    type Id = i32;

    const ID_COLUMN: Self::ReadColumn = produto::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "produto";
    const RESOURCE_NAME_PLURAL: &'static str = "produtos";

    fn filterable_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![
            ("nome", produto::Column::Nome),
            ("preco", produto::Column::Preco),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![
            ("id", produto::Column::Id),
            ("nome", produto::Column::Nome),
            ("preco", produto::Column::Preco),
        ]
    }

    fn option_columns() -> Vec<(&'static str, Self::ReadColumn)> {
        vec![("id", produto::Column::Id), ("nome", produto::Column::Nome)]
    }

    fn active_flag() -> Option<Self::ReadColumn> {
        Some(produto::Column::Ativo)
    }

    fn validation_rules() -> RuleSet {
        RuleSet::none()
            .rule("nome", Rule::Required)
            .rule(
                "nome",
                Rule::Length {
                    min: Some(2),
                    max: Some(120),
                },
            )
            .rule("preco", Rule::Numeric)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS produtos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            preco DOUBLE,
            ativo INTEGER
        );"
        .to_owned(),
    ))
    .await?;

    let app = axum::Router::new()
        .nest("/produtos", crud_router!(Produto, db.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on http://0.0.0.0:3000/produtos");
    axum::serve(listener, app).await?;
    Ok(())
}
