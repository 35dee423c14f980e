//! Row types as stored in PostgreSQL and their mapping to domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::{CategoryId, LineItemId, OrderId, ProductId, UserId};
use domain::{Category, Money, Order, OrderLineItem, Password, Product, User};

use crate::{Result, StoreError};

fn parse_column<T: FromStr>(table: &'static str, column: &'static str, value: String) -> Result<T> {
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(StoreError::Corrupt {
            table,
            column,
            value,
        }),
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub cellphone: String,
    pub password: String,
    pub user_type: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: Some(UserId::new(self.id)),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            address: self.address,
            cellphone: self.cellphone,
            password: Password::new(self.password),
            role: parse_column("users", "user_type", self.user_type)?,
            date_created: Some(self.date_created),
            date_updated: Some(self.date_updated),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: Some(CategoryId::new(row.id)),
            name: row.name,
            date_created: Some(row.date_created),
            date_updated: Some(row.date_updated),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
    pub url_image: String,
    pub price_cents: i64,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    pub user_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: Some(ProductId::new(row.id)),
            name: row.name,
            code: row.code,
            description: row.description,
            url_image: row.url_image,
            price: Money::from_cents(row.price_cents),
            date_created: Some(row.date_created),
            date_updated: Some(row.date_updated),
            user_id: row.user_id.map(UserId::new),
            category_id: row.category_id.map(CategoryId::new),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub date_created: DateTime<Utc>,
    pub order_state: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct OrderLineRow {
    pub id: i32,
    pub order_id: i32,
    pub quantity: i64,
    pub price_cents: i64,
    pub product_id: i32,
}

impl OrderLineRow {
    pub fn into_line_item(self) -> Result<OrderLineItem> {
        let quantity = u32::try_from(self.quantity).map_err(|_| StoreError::Corrupt {
            table: "order_products",
            column: "quantity",
            value: self.quantity.to_string(),
        })?;

        Ok(OrderLineItem {
            id: Some(LineItemId::new(self.id)),
            quantity,
            price: Money::from_cents(self.price_cents),
            product_id: ProductId::new(self.product_id),
        })
    }
}

impl OrderRow {
    /// Assembles an order from its row and the rows of its lines, which
    /// must already be sorted by id.
    pub fn into_order(self, lines: Vec<OrderLineRow>) -> Result<Order> {
        let line_items = lines
            .into_iter()
            .map(OrderLineRow::into_line_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Order {
            id: Some(OrderId::new(self.id)),
            date_created: Some(self.date_created),
            state: parse_column("orders", "order_state", self.order_state)?,
            user_id: self.user_id.map(UserId::new),
            line_items,
        })
    }
}
