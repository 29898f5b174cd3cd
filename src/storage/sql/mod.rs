//! Unified SQL storage implementations.
//!
//! This module provides the shared implementation for SQL-based stock
//! stores (MySQL, SQLite). The implementation is parameterized by database
//! type using the `SqlDatabase` trait.

mod stock_store;

pub use stock_store::SqlStockStore;

/// Abstraction over a SQL backend: the sqlx pool type plus the sea-query
/// statement builders for its dialect.
pub trait SqlDatabase {
    type Pool;

    fn build_select(stmt: sea_query::SelectStatement) -> String;
    fn build_insert(stmt: sea_query::InsertStatement) -> String;
    fn build_update(stmt: sea_query::UpdateStatement) -> String;
}

#[cfg(feature = "mysql")]
pub mod mysql {
    //! MySQL database backend.

    use sea_query::MysqlQueryBuilder;
    use sqlx::MySqlPool;

    /// MySQL database marker type.
    pub struct MySql;

    impl super::SqlDatabase for MySql {
        type Pool = MySqlPool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(MysqlQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(MysqlQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(MysqlQueryBuilder)
        }
    }

    /// MySQL stock store.
    pub type MySqlStockStore = super::SqlStockStore<MySql>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite stock store.
    pub type SqliteStockStore = super::SqlStockStore<Sqlite>;
}
