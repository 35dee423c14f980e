use std::collections::HashMap;

use async_trait::async_trait;
use common::{CategoryId, OrderId, ProductId, UserId};
use domain::{
    Category, CategoryRepository, DomainError, Entity, Order, OrderLineItem, OrderRepository,
    OrderState, Product, ProductRepository, RepoResult, User, UserRepository,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

use crate::entity::{CategoryRow, OrderLineRow, OrderRow, ProductRow, UserRow};
use crate::{Result, StoreError};

/// PostgreSQL-backed implementation of every repository port.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        tracing::debug!(max_connections, "connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, first_name, last_name, email, address, cellphone, password, user_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, first_name, last_name, email, address, cellphone, password,
                      user_type, date_created, date_updated
            "#,
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.address)
        .bind(&user.cellphone)
        .bind(user.password.as_str())
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_user(&self, id: UserId, user: &User) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                username = $2, first_name = $3, last_name = $4, email = $5, address = $6,
                cellphone = $7, password = $8, user_type = $9, date_updated = NOW()
            WHERE id = $1
            RETURNING id, username, first_name, last_name, email, address, cellphone, password,
                      user_type, date_created, date_updated
            "#,
        )
        .bind(id.get())
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.address)
        .bind(&user.cellphone)
        .bind(user.password.as_str())
        .bind(user.role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_product(&self, product: &Product) -> Result<ProductRow> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, code, description, url_image, price_cents, user_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, code, description, url_image, price_cents, date_created,
                      date_updated, user_id, category_id
            "#,
        )
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(&product.url_image)
        .bind(product.price.cents())
        .bind(product.user_id.map(i32::from))
        .bind(product.category_id.map(i32::from))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_product(&self, id: ProductId, product: &Product) -> Result<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products SET
                name = $2, code = $3, description = $4, url_image = $5, price_cents = $6,
                user_id = $7, category_id = $8, date_updated = NOW()
            WHERE id = $1
            RETURNING id, name, code, description, url_image, price_cents, date_created,
                      date_updated, user_id, category_id
            "#,
        )
        .bind(id.get())
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(&product.url_image)
        .bind(product.price.cents())
        .bind(product.user_id.map(i32::from))
        .bind(product.category_id.map(i32::from))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_category(&self, category: &Category) -> Result<CategoryRow> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, date_created, date_updated
            "#,
        )
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        category: &Category,
    ) -> Result<Option<CategoryRow>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories SET name = $2, date_updated = NOW()
            WHERE id = $1
            RETURNING id, name, date_created, date_updated
            "#,
        )
        .bind(id.get())
        .bind(&category.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_order(&self, order: &Order) -> Result<(OrderRow, Vec<OrderLineRow>)> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (order_state, user_id)
            VALUES ($1, $2)
            RETURNING id, date_created, order_state, user_id
            "#,
        )
        .bind(order.state.as_str())
        .bind(order.user_id.map(i32::from))
        .fetch_one(&mut *tx)
        .await?;

        let lines = insert_lines(&mut *tx, row.id, &order.line_items).await?;

        tx.commit().await?;
        Ok((row, lines))
    }

    /// Rewrites an order and replaces all of its lines in one transaction.
    async fn update_order(
        &self,
        id: OrderId,
        order: &Order,
    ) -> Result<Option<(OrderRow, Vec<OrderLineRow>)>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders SET order_state = $2, user_id = $3
            WHERE id = $1
            RETURNING id, date_created, order_state, user_id
            "#,
        )
        .bind(id.get())
        .bind(order.state.as_str())
        .bind(order.user_id.map(i32::from))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM order_products WHERE order_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;

        let lines = insert_lines(&mut *tx, row.id, &order.line_items).await?;

        tx.commit().await?;
        Ok(Some((row, lines)))
    }

    /// Loads the lines of every given order and assembles the orders,
    /// keeping the input order.
    async fn attach_lines(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let lines = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT id, order_id, quantity, price_cents, product_id
            FROM order_products
            WHERE order_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderLineRow>> = HashMap::new();
        for line in lines {
            by_order.entry(line.order_id).or_default().push(line);
        }

        rows.into_iter()
            .map(|row| {
                let lines = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect()
    }
}

async fn insert_lines(
    conn: &mut PgConnection,
    order_id: i32,
    items: &[OrderLineItem],
) -> Result<Vec<OrderLineRow>> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let line = sqlx::query_as::<_, OrderLineRow>(
            r#"
            INSERT INTO order_products (order_id, quantity, price_cents, product_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, quantity, price_cents, product_id
            "#,
        )
        .bind(order_id)
        .bind(i64::from(item.quantity))
        .bind(item.price.cents())
        .bind(item.product_id.get())
        .fetch_one(&mut *conn)
        .await?;

        lines.push(line);
    }
    Ok(lines)
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn save(&self, user: User) -> RepoResult<User> {
        let row = match user.id {
            None => self.insert_user(&user).await?,
            Some(id) => self
                .update_user(id, &user)
                .await?
                .ok_or_else(|| DomainError::not_found(Entity::User, id))?,
        };

        Ok(row.into_user()?)
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, first_name, last_name, email, address, cellphone, password,
                   user_type, date_created, date_updated
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(UserRow::into_user).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, first_name, last_name, email, address, cellphone, password,
                   user_type, date_created, date_updated
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(UserRow::into_user).transpose()?)
    }
}

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn save(&self, product: Product) -> RepoResult<Product> {
        let row = match product.id {
            None => self.insert_product(&product).await?,
            Some(id) => self
                .update_product(id, &product)
                .await?
                .ok_or_else(|| DomainError::not_found(Entity::Product, id))?,
        };

        Ok(row.into())
    }

    async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, code, description, url_image, price_cents, date_created,
                   date_updated, user_id, category_id
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, code, description, url_image, price_cents, date_created,
                   date_updated, user_id, category_id
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(Product::from))
    }

    async fn delete_by_id(&self, id: ProductId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryRepository for PostgresStore {
    async fn save(&self, category: Category) -> RepoResult<Category> {
        let row = match category.id {
            None => self.insert_category(&category).await?,
            Some(id) => self
                .update_category(id, &category)
                .await?
                .ok_or_else(|| DomainError::not_found(Entity::Category, id))?,
        };

        Ok(row.into())
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, date_created, date_updated
            FROM categories
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, date_created, date_updated
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(Category::from))
    }

    async fn delete_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn save(&self, order: Order) -> RepoResult<Order> {
        let (row, lines) = match order.id {
            None => self.insert_order(&order).await?,
            Some(id) => self
                .update_order(id, &order)
                .await?
                .ok_or_else(|| DomainError::not_found(Entity::Order, id))?,
        };

        Ok(row.into_order(lines)?)
    }

    async fn find_by_id(&self, id: OrderId) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, date_created, order_state, user_id
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        match row {
            Some(row) => Ok(self.attach_lines(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, date_created, order_state, user_id
            FROM orders
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(self.attach_lines(rows).await?)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, date_created, order_state, user_id
            FROM orders
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(self.attach_lines(rows).await?)
    }

    async fn update_state_by_id(&self, id: OrderId, state: OrderState) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE orders SET order_state = $2 WHERE id = $1")
            .bind(id.get())
            .bind(state.as_str())
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
