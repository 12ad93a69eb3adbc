use async_trait::async_trait;
use crudbase::CrudResource;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pedidos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cliente_id: i32,
    pub descricao: String,
    pub valor: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Bare-minimum resource: every whitelist and hook stays on its default.
#[derive(Debug, Serialize)]
pub struct Pedido(pub Model);

impl From<Model> for Pedido {
    fn from(model: Model) -> Self {
        Self(model)
    }
}

#[async_trait]
impl CrudResource for Pedido {
    type Entity = Entity;
    type ReadEntity = Entity;
    type ReadColumn = Column;
    type ActiveModel = ActiveModel;
    type ListModel = Model;
    type Id = i32;

    const ID_COLUMN: Self::ReadColumn = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "pedido";
    const RESOURCE_NAME_PLURAL: &'static str = "pedidos";
}
