//! Order line items and the direction of a stock movement.
//!
//! Order collaborators hand stock movements to this crate in two shapes:
//! typed records produced by their own domain structs, or loosely-typed
//! key/value mappings decoded straight from a request body. Both shapes
//! normalize to the same canonical view, one item at a time, so a single
//! batch may mix shapes freely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::interfaces::{Result, StorageError};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    /// Return units to stock (order cancelled or refunded).
    CheckIn,
    /// Remove units from stock (order placed).
    CheckOut,
}

impl StockOperation {
    /// Apply the movement to a current quantity. The result is not floored
    /// at zero.
    pub fn apply(self, current: i64, quantity: i64) -> i64 {
        match self {
            StockOperation::CheckIn => current + quantity,
            StockOperation::CheckOut => current - quantity,
        }
    }
}

/// Attribute-bearing line item, as produced by typed order models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
}

/// A line item in either of the shapes order collaborators supply.
#[derive(Debug, Clone)]
pub enum LineItem {
    /// Typed record shape.
    Record(OrderItem),
    /// Key/value mapping shape, e.g. a decoded JSON object.
    Fields(Map<String, Value>),
}

impl From<OrderItem> for LineItem {
    fn from(item: OrderItem) -> Self {
        LineItem::Record(item)
    }
}

impl From<Map<String, Value>> for LineItem {
    fn from(fields: Map<String, Value>) -> Self {
        LineItem::Fields(fields)
    }
}

/// Canonical view of a line item after shape normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub product_id: i64,
    pub quantity: i64,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
}

impl NormalizedItem {
    /// Display name, defaulting when the item does not carry one.
    pub fn name_or_default(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Product {}", self.product_id))
    }

    /// SKU, defaulting when the item does not carry one.
    pub fn sku_or_default(&self) -> String {
        self.sku
            .clone()
            .unwrap_or_else(|| format!("SKU-{}", self.product_id))
    }

    /// Price, defaulting to 0.0 when the item does not carry one.
    pub fn price_or_default(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

impl LineItem {
    /// Normalize this item to the canonical view.
    ///
    /// Mapping-shaped items must carry `product_id` and `quantity`; `name`,
    /// `sku` and `price` are optional in both shapes.
    pub fn normalize(&self) -> Result<NormalizedItem> {
        match self {
            LineItem::Record(item) => Ok(NormalizedItem {
                product_id: item.product_id,
                quantity: item.quantity,
                name: item.name.clone(),
                sku: item.sku.clone(),
                price: item.price,
            }),
            LineItem::Fields(fields) => Ok(NormalizedItem {
                product_id: require_i64(fields, "product_id")?,
                quantity: require_i64(fields, "quantity")?,
                name: fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                sku: fields
                    .get("sku")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                price: fields.get("price").and_then(Value::as_f64),
            }),
        }
    }
}

fn require_i64(fields: &Map<String, Value>, field: &'static str) -> Result<i64> {
    fields
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(StorageError::MalformedLineItem { field })
}
