//! Unified SQL StockStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of the durable stock store.
///
/// Works with any SQL database implementing the `SqlDatabase` trait (MySQL,
/// SQLite). The pool is injected at construction. The absolute-set path
/// owns its transaction; the batch-adjustment path runs inside a
/// caller-supplied transaction, so the order collaborator controls the
/// commit/rollback boundary around order creation and deletion.
pub struct SqlStockStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlStockStore<DB> {
    /// Create a new SQL stock store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement the stock store for a specific SQL backend.
macro_rules! impl_stock_store {
    ($db_type:ty, $sqlx_db:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlStockStore<$db_type> {
            /// Initialize the stocks table, plus the products table as a
            /// standalone/test convenience.
            pub async fn init(&self) -> crate::interfaces::Result<()> {
                sqlx::query(crate::storage::schema::CREATE_STOCKS_TABLE)
                    .execute(&self.pool)
                    .await?;
                sqlx::query(crate::storage::schema::CREATE_PRODUCTS_TABLE)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }

            /// Apply `quantity = quantity +/- item.quantity` to each line
            /// item's stock row inside the caller's transaction.
            ///
            /// Nothing is committed here; the caller owns the transaction.
            /// A product without a stock row is left untouched: the UPDATE
            /// affects zero rows and the batch moves on. The first per-item
            /// failure aborts the batch and propagates.
            pub async fn adjust_quantities(
                &self,
                tx: &mut sqlx::Transaction<'_, $sqlx_db>,
                items: &[crate::items::LineItem],
                operation: crate::items::StockOperation,
            ) -> crate::interfaces::Result<()> {
                use sea_query::{Expr, Query};

                use crate::items::StockOperation;
                use crate::storage::schema::Stocks;

                for item in items {
                    let item = item.normalize()?;

                    let quantity = match operation {
                        StockOperation::CheckIn => {
                            Expr::col(Stocks::Quantity).add(item.quantity)
                        }
                        StockOperation::CheckOut => {
                            Expr::col(Stocks::Quantity).sub(item.quantity)
                        }
                    };

                    let stmt = Query::update()
                        .table(Stocks::Table)
                        .value(Stocks::Quantity, quantity)
                        .value(Stocks::UpdatedAt, chrono::Utc::now().to_rfc3339())
                        .and_where(Expr::col(Stocks::ProductId).eq(item.product_id))
                        .to_owned();

                    let sql = <$db_type>::build_update(stmt);
                    let result = sqlx::query(&sql).execute(&mut **tx).await?;

                    if result.rows_affected() == 0 {
                        tracing::debug!(
                            product_id = item.product_id,
                            "No stock row for product; adjustment skipped"
                        );
                    }
                }

                Ok(())
            }

            /// Decrease stock quantities for each line item (order placed).
            pub async fn check_out_items(
                &self,
                tx: &mut sqlx::Transaction<'_, $sqlx_db>,
                items: &[crate::items::LineItem],
            ) -> crate::interfaces::Result<()> {
                self.adjust_quantities(tx, items, crate::items::StockOperation::CheckOut)
                    .await
            }

            /// Increase stock quantities for each line item (order cancelled).
            pub async fn check_in_items(
                &self,
                tx: &mut sqlx::Transaction<'_, $sqlx_db>,
                items: &[crate::items::LineItem],
            ) -> crate::interfaces::Result<()> {
                self.adjust_quantities(tx, items, crate::items::StockOperation::CheckIn)
                    .await
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::StockStore for SqlStockStore<$db_type> {
            async fn set_quantity(
                &self,
                product_id: i64,
                quantity: i64,
            ) -> crate::interfaces::Result<crate::interfaces::UpsertOutcome> {
                use sea_query::{Expr, Query};
                use sqlx::Acquire;

                use crate::interfaces::UpsertOutcome;
                use crate::storage::schema::Stocks;

                let updated_at = chrono::Utc::now().to_rfc3339();

                let mut conn = self.pool.acquire().await?;
                let mut tx = conn.begin().await?;

                let stmt = Query::update()
                    .table(Stocks::Table)
                    .value(Stocks::Quantity, quantity)
                    .value(Stocks::UpdatedAt, updated_at.clone())
                    .and_where(Expr::col(Stocks::ProductId).eq(product_id))
                    .to_owned();

                let sql = <$db_type>::build_update(stmt);
                let result = sqlx::query(&sql).execute(&mut *tx).await?;

                let outcome = if result.rows_affected() == 0 {
                    let stmt = Query::insert()
                        .into_table(Stocks::Table)
                        .columns([Stocks::ProductId, Stocks::Quantity, Stocks::UpdatedAt])
                        .values_panic([product_id.into(), quantity.into(), updated_at.into()])
                        .to_owned();

                    let sql = <$db_type>::build_insert(stmt);
                    sqlx::query(&sql).execute(&mut *tx).await?;

                    UpsertOutcome::Inserted(product_id)
                } else {
                    UpsertOutcome::Updated(result.rows_affected())
                };

                tx.commit().await?;

                tracing::debug!(product_id, quantity, outcome = %outcome, "Set stock quantity");

                Ok(outcome)
            }

            async fn quantity(
                &self,
                product_id: i64,
            ) -> crate::interfaces::Result<Option<i64>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Stocks;

                let stmt = Query::select()
                    .column(Stocks::Quantity)
                    .from(Stocks::Table)
                    .and_where(Expr::col(Stocks::ProductId).eq(product_id))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                Ok(row.map(|row| row.get("quantity")))
            }

            async fn stock_overview(
                &self,
            ) -> crate::interfaces::Result<Vec<crate::interfaces::ProductStock>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::interfaces::ProductStock;
                use crate::storage::schema::{Products, Stocks};

                let stmt = Query::select()
                    .column((Products::Table, Products::Id))
                    .column((Products::Table, Products::Name))
                    .column((Products::Table, Products::Sku))
                    .column((Products::Table, Products::Price))
                    .column((Stocks::Table, Stocks::Quantity))
                    .from(Products::Table)
                    .inner_join(
                        Stocks::Table,
                        Expr::col((Products::Table, Products::Id))
                            .equals((Stocks::Table, Stocks::ProductId)),
                    )
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                Ok(rows
                    .iter()
                    .map(|row| ProductStock {
                        product_id: row.get("id"),
                        name: row.get("name"),
                        sku: row.get("sku"),
                        price: row.get("price"),
                        quantity: row.get("quantity"),
                    })
                    .collect())
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_stock_store!(super::mysql::MySql, sqlx::MySql, "mysql");
impl_stock_store!(super::sqlite::Sqlite, sqlx::Sqlite, "sqlite");

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::super::sqlite::SqliteStockStore;
    use crate::interfaces::{StockStore, UpsertOutcome};

    async fn store() -> SqliteStockStore {
        // Single connection: each new in-memory connection is a fresh db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteStockStore::new(pool);
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = store().await;
        store.init().await.unwrap();
    }

    #[tokio::test]
    async fn test_set_quantity_inserts_then_updates() {
        let store = store().await;

        let outcome = store.set_quantity(1, 5).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted(1));
        assert_eq!(store.quantity(1).await.unwrap(), Some(5));

        let outcome = store.set_quantity(1, 9).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(1));
        assert_eq!(store.quantity(1).await.unwrap(), Some(9));
    }

    #[tokio::test]
    async fn test_quantity_missing_row() {
        let store = store().await;
        assert_eq!(store.quantity(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overview_empty_without_stock_rows() {
        let store = store().await;
        assert!(store.stock_overview().await.unwrap().is_empty());
    }
}
