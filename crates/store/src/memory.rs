use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{CategoryId, LineItemId, OrderId, ProductId, UserId};
use domain::{
    Category, CategoryRepository, DomainError, Entity, Order, OrderRepository, OrderState,
    Product, ProductRepository, RepoResult, User, UserRepository,
};
use tokio::sync::RwLock;

/// Next value of each identity column.
#[derive(Default)]
struct Sequences {
    user: i32,
    category: i32,
    product: i32,
    order: i32,
    line: i32,
}

fn next_id(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    sequences: Sequences,
}

fn foreign_key_violation(table: &str, constraint: &str) -> DomainError {
    DomainError::Conflict(format!(
        "insert or update on table \"{table}\" violates foreign key constraint \"{constraint}\""
    ))
}

impl Tables {
    fn check_user_ref(&self, user_id: Option<UserId>, table: &str) -> RepoResult<()> {
        match user_id {
            Some(id) if !self.users.contains_key(&id) => {
                Err(foreign_key_violation(table, &format!("{table}_user_id_fkey")))
            }
            _ => Ok(()),
        }
    }

    fn check_category_ref(&self, category_id: Option<CategoryId>) -> RepoResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(foreign_key_violation(
                "products",
                "products_category_id_fkey",
            )),
            _ => Ok(()),
        }
    }
}

/// In-memory implementation of every repository port.
///
/// Mirrors the PostgreSQL schema: generated ids, audit timestamps, the
/// unique email index and the foreign keys between tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, mut user: User) -> RepoResult<User> {
        let mut tables = self.tables.write().await;

        let email_taken = tables
            .users
            .values()
            .any(|other| other.email == user.email && other.id != user.id);
        if email_taken {
            return Err(DomainError::Conflict(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            ));
        }

        let now = Utc::now();
        match user.id {
            None => {
                user.id = Some(UserId::new(next_id(&mut tables.sequences.user)));
                user.date_created = Some(now);
            }
            Some(id) => {
                let existing = tables
                    .users
                    .get(&id)
                    .ok_or_else(|| DomainError::not_found(Entity::User, id))?;
                user.date_created = existing.date_created;
            }
        }
        user.date_updated = Some(now);

        if let Some(id) = user.id {
            tables.users.insert(id, user.clone());
        }
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn save(&self, mut product: Product) -> RepoResult<Product> {
        let mut tables = self.tables.write().await;
        tables.check_user_ref(product.user_id, "products")?;
        tables.check_category_ref(product.category_id)?;

        let now = Utc::now();
        match product.id {
            None => {
                product.id = Some(ProductId::new(next_id(&mut tables.sequences.product)));
                product.date_created = Some(now);
            }
            Some(id) => {
                let existing = tables
                    .products
                    .get(&id)
                    .ok_or_else(|| DomainError::not_found(Entity::Product, id))?;
                product.date_created = existing.date_created;
            }
        }
        product.date_updated = Some(now);

        if let Some(id) = product.id {
            tables.products.insert(id, product.clone());
        }
        Ok(product)
    }

    async fn find_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: ProductId) -> RepoResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn save(&self, mut category: Category) -> RepoResult<Category> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        match category.id {
            None => {
                category.id = Some(CategoryId::new(next_id(&mut tables.sequences.category)));
                category.date_created = Some(now);
            }
            Some(id) => {
                let existing = tables
                    .categories
                    .get(&id)
                    .ok_or_else(|| DomainError::not_found(Entity::Category, id))?;
                category.date_created = existing.date_created;
            }
        }
        category.date_updated = Some(now);

        if let Some(id) = category.id {
            tables.categories.insert(id, category.clone());
        }
        Ok(category)
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;

        if tables
            .products
            .values()
            .any(|p| p.category_id == Some(id))
        {
            return Err(DomainError::Conflict(
                "update or delete on table \"categories\" violates foreign key constraint \
                 \"products_category_id_fkey\" on table \"products\""
                    .to_string(),
            ));
        }

        Ok(tables.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn save(&self, mut order: Order) -> RepoResult<Order> {
        let mut tables = self.tables.write().await;
        tables.check_user_ref(order.user_id, "orders")?;

        match order.id {
            None => {
                order.id = Some(OrderId::new(next_id(&mut tables.sequences.order)));
                order.date_created = Some(Utc::now());
            }
            Some(id) => {
                let existing = tables
                    .orders
                    .get(&id)
                    .ok_or_else(|| DomainError::not_found(Entity::Order, id))?;
                order.date_created = existing.date_created;
            }
        }

        // Lines are always rewritten, so every save hands out fresh line ids.
        for item in &mut order.line_items {
            item.id = Some(LineItemId::new(next_id(&mut tables.sequences.line)));
        }

        if let Some(id) = order.id {
            tables.orders.insert(id, order.clone());
        }
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> RepoResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Order>> {
        Ok(self.tables.read().await.orders.values().cloned().collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_state_by_id(&self, id: OrderId, state: OrderState) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&id) {
            Some(order) => {
                order.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
