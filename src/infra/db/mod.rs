//! Connection pool setup and the migration entry points used by the CLI.

use std::collections::HashSet;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

pub mod migrations;

pub use migrations::Migrator;

/// Pool handle shared by the services and the health check
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(database_url).await?;
        Migrator::up(&db.connection, None).await?;
        tracing::info!("Schema is up to date");
        Ok(db)
    }

    /// Open the pool and leave the schema alone.
    pub async fn connect_without_migrations(database_url: &str) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);

        // Every pooled connection to `sqlite::memory:` opens a separate database
        if database_url.starts_with("sqlite::memory:") {
            options.max_connections(1).min_connections(1);
        }

        Ok(Self {
            connection: SeaDatabase::connect(options).await?,
        })
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn migrate_up(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    pub async fn migrate_down_one(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Drop every table, then migrate from scratch.
    pub async fn migrate_fresh(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Every known migration name, paired with whether it has run.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = Migrator::get_applied_migrations(&self.connection)
            .await?
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                let done = applied.contains(&name);
                (name, done)
            })
            .collect())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .map(|_| ())
    }
}
