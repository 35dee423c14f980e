//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{CategoryId, OrderId, ProductId, UserId};
use domain::{
    Category, CategoryRepository, DomainError, Money, Order, OrderLineItem, OrderRepository,
    OrderState, Password, Product, ProductRepository, User, UserRepository, UserRole,
};
use serial_test::serial;
use sqlx::PgPool;
use store::PostgresStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let store = PostgresStore::connect(&connection_string, 1).await.unwrap();
            store.run_migrations().await.unwrap();
            store.pool().close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    truncate(&pool).await;
    PostgresStore::new(pool)
}

async fn truncate(pool: &PgPool) {
    sqlx::query(
        "TRUNCATE TABLE order_products, orders, products, categories, users RESTART IDENTITY",
    )
    .execute(pool)
    .await
    .unwrap();
}

fn test_user(email: &str) -> User {
    User {
        username: "jlopez".to_string(),
        first_name: "Juan".to_string(),
        last_name: "López".to_string(),
        email: email.to_string(),
        address: "Calle 1".to_string(),
        cellphone: "555-0100".to_string(),
        password: Password::new("not-a-hash"),
        role: UserRole::Admin,
        ..User::default()
    }
}

#[tokio::test]
#[serial]
async fn user_round_trip() {
    let store = get_test_store().await;

    let saved = UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap();
    let id = saved.id.unwrap();
    assert!(saved.date_created.is_some());

    let fetched = UserRepository::find_by_id(&store, id).await.unwrap().unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(fetched.role, UserRole::Admin);
    assert_eq!(fetched.last_name, "López");
}

#[tokio::test]
#[serial]
async fn find_user_by_email() {
    let store = get_test_store().await;
    let saved = UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap();

    let found = store.find_by_email("juan@example.com").await.unwrap();
    assert_eq!(found.and_then(|u| u.id), saved.id);
    assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn duplicate_email_is_conflict() {
    let store = get_test_store().await;
    UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap();

    let err = UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn updating_unknown_user_is_not_found() {
    let store = get_test_store().await;
    let ghost = User {
        id: Some(UserId::new(404)),
        ..test_user("ghost@example.com")
    };

    let err = UserRepository::save(&store, ghost).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[serial]
async fn product_round_trip_and_update() {
    let store = get_test_store().await;
    let owner = UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap();
    let category = CategoryRepository::save(&store, Category::new("Peripherals"))
        .await
        .unwrap();

    let product = Product {
        name: "Mouse".to_string(),
        code: "M-001".to_string(),
        description: "Wireless mouse".to_string(),
        url_image: "https://img.example.com/m.png".to_string(),
        price: Money::from_cents(2599),
        user_id: owner.id,
        category_id: category.id,
        ..Product::default()
    };
    let saved = ProductRepository::save(&store, product).await.unwrap();
    let id = saved.id.unwrap();

    let fetched = ProductRepository::find_by_id(&store, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, saved);

    let mut changed = fetched.clone();
    changed.price = Money::from_cents(1999);
    let updated = ProductRepository::save(&store, changed).await.unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.price.cents(), 1999);
    assert_eq!(updated.date_created, saved.date_created);

    let all = ProductRepository::find_all(&store).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
#[serial]
async fn product_with_unknown_category_is_conflict() {
    let store = get_test_store().await;
    let product = Product {
        name: "Orphan".to_string(),
        category_id: Some(CategoryId::new(77)),
        ..Product::default()
    };

    let err = ProductRepository::save(&store, product).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn delete_product_reports_whether_row_existed() {
    let store = get_test_store().await;
    let saved = ProductRepository::save(
        &store,
        Product {
            name: "Keyboard".to_string(),
            ..Product::default()
        },
    )
    .await
    .unwrap();

    assert!(
        ProductRepository::delete_by_id(&store, saved.id.unwrap())
            .await
            .unwrap()
    );
    assert!(
        !ProductRepository::delete_by_id(&store, ProductId::new(999))
            .await
            .unwrap()
    );
}

#[tokio::test]
#[serial]
async fn referenced_category_cannot_be_deleted() {
    let store = get_test_store().await;
    let category = CategoryRepository::save(&store, Category::new("Books"))
        .await
        .unwrap();
    ProductRepository::save(
        &store,
        Product {
            name: "Dune".to_string(),
            category_id: category.id,
            ..Product::default()
        },
    )
    .await
    .unwrap();

    let err = CategoryRepository::delete_by_id(&store, category.id.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn order_round_trip_keeps_line_order_and_total() {
    let store = get_test_store().await;
    let owner = UserRepository::save(&store, test_user("juan@example.com"))
        .await
        .unwrap();

    let order = Order::new(
        owner.id,
        vec![
            OrderLineItem::new(ProductId::new(10), 2, Money::from_cents(1000)),
            OrderLineItem::new(ProductId::new(11), 1, Money::from_cents(500)),
        ],
    );
    let saved = OrderRepository::save(&store, order).await.unwrap();
    let id = saved.id.unwrap();

    let fetched = OrderRepository::find_by_id(&store, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(fetched.state, OrderState::Confirmed);
    assert_eq!(fetched.line_items[0].product_id, ProductId::new(10));
    assert_eq!(fetched.total().cents(), 2500);
}

#[tokio::test]
#[serial]
async fn order_update_replaces_lines() {
    let store = get_test_store().await;
    let saved = OrderRepository::save(
        &store,
        Order::new(
            None,
            vec![OrderLineItem::new(ProductId::new(1), 1, Money::from_cents(100))],
        ),
    )
    .await
    .unwrap();

    let mut changed = saved.clone();
    changed.line_items = vec![OrderLineItem::new(ProductId::new(2), 4, Money::from_cents(25))];
    OrderRepository::save(&store, changed).await.unwrap();

    let fetched = OrderRepository::find_by_id(&store, saved.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.line_items.len(), 1);
    assert_eq!(fetched.line_items[0].product_id, ProductId::new(2));
    assert_eq!(fetched.total().cents(), 100);
}

#[tokio::test]
#[serial]
async fn orders_by_user_and_state_update() {
    let store = get_test_store().await;
    let ana = UserRepository::save(&store, test_user("ana@example.com"))
        .await
        .unwrap();
    let bob = UserRepository::save(&store, test_user("bob@example.com"))
        .await
        .unwrap();

    let ana_order = OrderRepository::save(&store, Order::new(ana.id, Vec::new()))
        .await
        .unwrap();
    OrderRepository::save(&store, Order::new(bob.id, Vec::new()))
        .await
        .unwrap();

    let for_ana = store.find_by_user_id(ana.id.unwrap()).await.unwrap();
    assert_eq!(for_ana.len(), 1);
    assert_eq!(for_ana[0].id, ana_order.id);
    assert_eq!(OrderRepository::find_all(&store).await.unwrap().len(), 2);

    let order_id = ana_order.id.unwrap();
    assert!(
        store
            .update_state_by_id(order_id, OrderState::Cancelled)
            .await
            .unwrap()
    );
    let fetched = OrderRepository::find_by_id(&store, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.state, OrderState::Cancelled);

    assert!(
        !store
            .update_state_by_id(OrderId::new(999), OrderState::Cancelled)
            .await
            .unwrap()
    );
}
