//! Order and line item records.

use chrono::{DateTime, Utc};
use common::{LineItemId, OrderId, ProductId, UserId};

use crate::money::Money;

use super::OrderState;

/// A single line of an order.
///
/// `price` is the unit price captured when the order was placed and does
/// not follow later changes to the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineItem {
    pub id: Option<LineItemId>,
    pub quantity: u32,
    pub price: Money,
    pub product_id: ProductId,
}

impl OrderLineItem {
    /// Creates an unsaved line.
    pub fn new(product_id: ProductId, quantity: u32, price: Money) -> Self {
        Self {
            id: None,
            quantity,
            price,
            product_id,
        }
    }

    /// Returns the line total (price * quantity).
    pub fn total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    pub id: Option<OrderId>,
    pub date_created: Option<DateTime<Utc>>,
    pub state: OrderState,
    pub user_id: Option<UserId>,
    pub line_items: Vec<OrderLineItem>,
}

impl Order {
    /// Creates an unsaved order for a user.
    pub fn new(user_id: Option<UserId>, line_items: Vec<OrderLineItem>) -> Self {
        Self {
            user_id,
            line_items,
            ..Self::default()
        }
    }

    /// Returns the sum of every line total.
    pub fn total(&self) -> Money {
        self.line_items.iter().map(OrderLineItem::total).sum()
    }

    /// Returns the order total, or `None` if any line total or the sum
    /// does not fit in an `i64` number of cents.
    pub fn checked_total(&self) -> Option<Money> {
        self.line_items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.price.checked_multiply(item.quantity)?)
        })
    }
}
