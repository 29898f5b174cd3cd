//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Products table schema.
///
/// Owned by the product CRUD collaborator; this crate only reads it when
/// joining metadata into cache entries.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "sku"]
    Sku,
    #[iden = "price"]
    Price,
}

/// Stocks table schema.
#[derive(Iden)]
pub enum Stocks {
    Table,
    #[iden = "product_id"]
    ProductId,
    #[iden = "quantity"]
    Quantity,
    #[iden = "updated_at"]
    UpdatedAt,
}

/// SQL for creating the stocks table.
pub const CREATE_STOCKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stocks (
    product_id INTEGER NOT NULL,
    quantity INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (product_id)
);
"#;

/// SQL for creating the products table.
///
/// Standalone/test convenience only; deployments own this table elsewhere.
pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER NOT NULL,
    name TEXT NOT NULL,
    sku TEXT NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    PRIMARY KEY (id)
);
"#;
