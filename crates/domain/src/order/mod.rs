//! Orders and their line items.

mod model;
mod service;
mod state;

pub use model::{Order, OrderLineItem};
pub use service::OrderService;
pub use state::OrderState;
