use axum::{Router, body::Body, http::Request};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub mod pedido_entity;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    use cidade_entity::Cidade;
    use cliente_entity::Cliente;
    use etiqueta_entity::Etiqueta;
    use pedido_entity::Pedido;

    let api = Router::new()
        .nest("/cidades", crudbase::crud_router!(Cidade, db.clone()))
        .nest("/clientes", crudbase::crud_router!(Cliente, db.clone()))
        .nest("/pedidos", crudbase::crud_router!(Pedido, db.clone()))
        .nest("/etiquetas", crudbase::crud_router!(Etiqueta, db));

    Router::new().nest("/api/v1", api)
}

/// Four cidades, five clientes (two with pedidos), three pedidos. Clientes 1
/// and 2 cannot be deleted through the guard; cidades 1 to 3 are referenced
/// by clientes and protected by the foreign key alone.
pub async fn seed_all(db: &DatabaseConnection) -> Result<(), DbErr> {
    seed_cidades(db).await?;
    seed_clientes(db).await?;
    seed_pedidos(db).await?;
    Ok(())
}

pub async fn seed_cidades(db: &DatabaseConnection) -> Result<(), DbErr> {
    let rows = [
        (1, "São Paulo", Some("SP"), Some(1)),
        (2, "Curitiba", Some("PR"), Some(1)),
        (3, "Santos", Some("SP"), Some(0)),
        (4, "Belém", Some("PA"), None),
    ];
    for (id, nome, uf, ativo) in rows {
        cidade_entity::ActiveModel {
            id: Set(id),
            nome: Set(nome.to_string()),
            uf: Set(uf.map(str::to_string)),
            ativo: Set(ativo),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub async fn seed_clientes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let rows = [
        (1, "Ana Souza", Some("ana@exemplo.com"), Some(1), Some(1)),
        (2, "Bruno Lima", Some("bruno@exemplo.com"), Some(2), Some(0)),
        (3, "Carla Dias", None, Some(1), Some(1)),
        (4, "Daniel Rocha", Some("daniel@exemplo.com"), None, None),
        (5, "Mariana Costa", Some("mariana@exemplo.com"), Some(3), Some(1)),
    ];
    for (id, nome, email, cidade_id, ativo) in rows {
        cliente_entity::ActiveModel {
            id: Set(id),
            nome: Set(nome.to_string()),
            email: Set(email.map(str::to_string)),
            cidade_id: Set(cidade_id),
            ativo: Set(ativo),
            criado_em: if id == 1 {
                Set(Some(chrono::Utc::now().fixed_offset()))
            } else {
                Set(None)
            },
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub async fn seed_pedidos(db: &DatabaseConnection) -> Result<(), DbErr> {
    let rows = [
        (1, 1, "Assinatura anual", Some(199.9)),
        (2, 1, "Upgrade de plano", Some(49.0)),
        (3, 2, "Assinatura mensal", Some(19.9)),
    ];
    for (id, cliente_id, descricao, valor) in rows {
        pedido_entity::ActiveModel {
            id: Set(id),
            cliente_id: Set(cliente_id),
            descricao: Set(descricao.to_string()),
            valor: Set(valor),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateCidadesTable),
            Box::new(CreateClientesTable),
            Box::new(CreatePedidosTable),
            Box::new(CreateEtiquetasTable),
            Box::new(CreateClientesResumoView),
        ]
    }
}

pub struct CreateCidadesTable;

impl MigrationName for CreateCidadesTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_cidades_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCidadesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(CidadeTable)
            .if_not_exists()
            .col(
                ColumnDef::new(CidadeColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(CidadeColumn::Nome).string().not_null())
            .col(ColumnDef::new(CidadeColumn::Uf).string_len(2))
            .col(ColumnDef::new(CidadeColumn::Ativo).integer())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CidadeTable).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateClientesTable;

impl MigrationName for CreateClientesTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_clientes_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateClientesTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ClienteTable)
            .if_not_exists()
            .col(
                ColumnDef::new(ClienteColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(ClienteColumn::Nome).string().not_null())
            .col(ColumnDef::new(ClienteColumn::Email).string())
            .col(ColumnDef::new(ClienteColumn::CidadeId).integer())
            .col(ColumnDef::new(ClienteColumn::Ativo).integer())
            .col(ColumnDef::new(ClienteColumn::CriadoEm).timestamp_with_time_zone())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_clientes_cidade_id")
                    .from(ClienteTable, ClienteColumn::CidadeId)
                    .to(CidadeTable, CidadeColumn::Id),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClienteTable).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreatePedidosTable;

impl MigrationName for CreatePedidosTable {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_pedidos_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePedidosTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(PedidoTable)
            .if_not_exists()
            .col(
                ColumnDef::new(PedidoColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(PedidoColumn::ClienteId).integer().not_null())
            .col(ColumnDef::new(PedidoColumn::Descricao).string().not_null())
            .col(ColumnDef::new(PedidoColumn::Valor).double())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_pedidos_cliente_id")
                    .from(PedidoTable, PedidoColumn::ClienteId)
                    .to(ClienteTable, ClienteColumn::Id),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PedidoTable).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateEtiquetasTable;

impl MigrationName for CreateEtiquetasTable {
    fn name(&self) -> &'static str {
        "m20240101_000004_create_etiquetas_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateEtiquetasTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(EtiquetaTable)
            .if_not_exists()
            .col(
                ColumnDef::new(EtiquetaColumn::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(EtiquetaColumn::Nome).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EtiquetaTable).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateClientesResumoView;

impl MigrationName for CreateClientesResumoView {
    fn name(&self) -> &'static str {
        "m20240101_000005_create_clientes_resumo_view"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateClientesResumoView {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE VIEW IF NOT EXISTS clientes_resumo AS \
                 SELECT c.id, c.nome, c.email, c.cidade_id, c.ativo, c.criado_em, \
                        ci.nome AS cidade_nome \
                 FROM clientes c \
                 LEFT JOIN cidades ci ON ci.id = c.cidade_id",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP VIEW IF EXISTS clientes_resumo")
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CidadeTable;

impl Iden for CidadeTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "cidades").unwrap();
    }
}

#[derive(Debug)]
pub enum CidadeColumn {
    Id,
    Nome,
    Uf,
    Ativo,
}

impl Iden for CidadeColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Nome => "nome",
                Self::Uf => "uf",
                Self::Ativo => "ativo",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ClienteTable;

impl Iden for ClienteTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "clientes").unwrap();
    }
}

#[derive(Debug)]
pub enum ClienteColumn {
    Id,
    Nome,
    Email,
    CidadeId,
    Ativo,
    CriadoEm,
}

impl Iden for ClienteColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Nome => "nome",
                Self::Email => "email",
                Self::CidadeId => "cidade_id",
                Self::Ativo => "ativo",
                Self::CriadoEm => "criado_em",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct PedidoTable;

impl Iden for PedidoTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "pedidos").unwrap();
    }
}

#[derive(Debug)]
pub enum PedidoColumn {
    Id,
    ClienteId,
    Descricao,
    Valor,
}

impl Iden for PedidoColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::ClienteId => "cliente_id",
                Self::Descricao => "descricao",
                Self::Valor => "valor",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct EtiquetaTable;

impl Iden for EtiquetaTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "etiquetas").unwrap();
    }
}

#[derive(Debug)]
pub enum EtiquetaColumn {
    Id,
    Nome,
}

impl Iden for EtiquetaColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Nome => "nome",
            }
        )
        .unwrap();
    }
}
