//! Domain layer for the storefront backend.
//!
//! This crate provides:
//! - Plain models for users, products, categories and orders
//! - Repository ports implemented by the storage adapters
//! - One application service per model, delegating to its port

pub mod category;
pub mod error;
pub mod money;
pub mod order;
pub mod ports;
pub mod product;
pub mod user;

pub use category::{Category, CategoryService};
pub use error::{DomainError, Entity};
pub use money::Money;
pub use order::{Order, OrderLineItem, OrderService, OrderState};
pub use ports::{
    CategoryRepository, OrderRepository, ProductRepository, RepoResult, Store, UserRepository,
};
pub use product::{Product, ProductService};
pub use user::{Password, User, UserRole, UserService};
