//! Integration tests for the application services.
//!
//! The services run against the in-memory store, which mirrors the
//! PostgreSQL adapter's semantics.

use common::{CategoryId, OrderId, ProductId, UserId};
use domain::{
    Category, CategoryService, DomainError, Entity, Money, Order, OrderLineItem, OrderService,
    OrderState, Password, Product, ProductService, User, UserRole, UserService,
};
use store::InMemoryStore;

struct Services {
    users: UserService<InMemoryStore>,
    products: ProductService<InMemoryStore>,
    categories: CategoryService<InMemoryStore>,
    orders: OrderService<InMemoryStore>,
}

fn create_services() -> Services {
    let store = InMemoryStore::new();
    Services {
        users: UserService::new(store.clone()),
        products: ProductService::new(store.clone()),
        categories: CategoryService::new(store.clone()),
        orders: OrderService::new(store),
    }
}

fn new_user(email: &str) -> User {
    User {
        username: "jlopez".to_string(),
        first_name: "Juan".to_string(),
        last_name: "López".to_string(),
        email: email.to_string(),
        address: "Calle Falsa 123".to_string(),
        cellphone: "555-0100".to_string(),
        password: Password::new("s3cret"),
        role: UserRole::User,
        ..User::default()
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn save_then_fetch_round_trips() {
        let services = create_services();

        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();
        let fetched = services.users.find_by_id(saved.id.unwrap()).await.unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(fetched.email, "juan@example.com");
        assert_eq!(fetched.first_name, "Juan");
        assert_eq!(fetched.role, UserRole::User);
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let services = create_services();

        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();

        assert_ne!(saved.password.as_str(), "s3cret");
        assert!(saved.password.is_hashed());
        assert!(saved.password.verify("s3cret"));
    }

    #[tokio::test]
    async fn resaving_fetched_user_keeps_hash() {
        let services = create_services();
        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();

        let mut changed = saved.clone();
        changed.address = "Avenida 9".to_string();
        let updated = services.users.save(changed).await.unwrap();

        assert_eq!(updated.password, saved.password);
        assert_eq!(updated.address, "Avenida 9");
        assert_eq!(updated.date_created, saved.date_created);
    }

    #[tokio::test]
    async fn update_without_password_keeps_stored_hash() {
        let services = create_services();
        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();

        let changed = User {
            address: "Avenida 9".to_string(),
            password: Password::default(),
            ..saved.clone()
        };
        let updated = services.users.save(changed).await.unwrap();

        assert_eq!(updated.password, saved.password);
        assert!(updated.password.verify("s3cret"));
        assert!(!updated.password.verify(""));
    }

    #[tokio::test]
    async fn update_with_new_password_rehashes() {
        let services = create_services();
        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();

        let changed = User {
            password: Password::new("n3w-secret"),
            ..saved
        };
        let updated = services.users.save(changed).await.unwrap();

        assert!(updated.password.verify("n3w-secret"));
        assert!(!updated.password.verify("s3cret"));
    }

    #[tokio::test]
    async fn update_of_missing_user_without_password_is_not_found() {
        let services = create_services();
        let ghost = User {
            id: Some(UserId::new(9)),
            password: Password::default(),
            ..new_user("ghost@example.com")
        };

        let err = services.users.save(ghost).await.unwrap_err();
        assert_eq!(err.to_string(), "El usuario con id: 9 no existe.");
    }

    #[tokio::test]
    async fn find_by_email_returns_owner() {
        let services = create_services();
        let saved = services.users.save(new_user("juan@example.com")).await.unwrap();

        let found = services.users.find_by_email("juan@example.com").await.unwrap();
        assert_eq!(found.and_then(|u| u.id), saved.id);

        let missing = services.users.find_by_email("ana@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let services = create_services();
        services.users.save(new_user("juan@example.com")).await.unwrap();

        let err = services
            .users
            .save(new_user("juan@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let services = create_services();

        let err = services.users.find_by_id(UserId::new(5)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::User,
                id: 5
            }
        ));
        assert_eq!(err.to_string(), "El usuario con id: 5 no existe.");
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn category_round_trip_and_list() {
        let services = create_services();

        let books = services.categories.save(Category::new("Books")).await.unwrap();
        services.categories.save(Category::new("Games")).await.unwrap();

        let fetched = services.categories.find_by_id(books.id.unwrap()).await.unwrap();
        assert_eq!(fetched, books);

        let names: Vec<String> = services
            .categories
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books", "Games"]);
    }

    #[tokio::test]
    async fn product_round_trip() {
        let services = create_services();
        let owner = services.users.save(new_user("juan@example.com")).await.unwrap();
        let category = services.categories.save(Category::new("Audio")).await.unwrap();

        let saved = services
            .products
            .save(Product {
                name: "Headphones".to_string(),
                code: "HP-01".to_string(),
                description: "Over-ear".to_string(),
                url_image: "https://img.example.com/hp.png".to_string(),
                price: Money::from_cents(4999),
                user_id: owner.id,
                category_id: category.id,
                ..Product::default()
            })
            .await
            .unwrap();

        let fetched = services.products.find_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.price.cents(), 4999);
        assert_eq!(services.products.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_product_removes_it() {
        let services = create_services();
        let saved = services
            .products
            .save(Product {
                name: "Cable".to_string(),
                ..Product::default()
            })
            .await
            .unwrap();
        let id = saved.id.unwrap();

        services.products.delete_by_id(id).await.unwrap();

        let err = services.products.find_by_id(id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let services = create_services();

        let err = services
            .products
            .delete_by_id(ProductId::new(42))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Producto con Id: 42 no existe.");
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let services = create_services();

        let err = services
            .categories
            .delete_by_id(CategoryId::new(8))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Category,
                id: 8
            }
        ));
    }

    #[tokio::test]
    async fn delete_category_in_use_is_conflict() {
        let services = create_services();
        let category = services.categories.save(Category::new("Audio")).await.unwrap();
        services
            .products
            .save(Product {
                name: "Speaker".to_string(),
                category_id: category.id,
                ..Product::default()
            })
            .await
            .unwrap();

        let err = services
            .categories
            .delete_by_id(category.id.unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}

mod orders {
    use super::*;

    fn lines() -> Vec<OrderLineItem> {
        vec![
            OrderLineItem::new(ProductId::new(1), 2, Money::from_cents(1000)),
            OrderLineItem::new(ProductId::new(2), 3, Money::from_cents(250)),
        ]
    }

    #[tokio::test]
    async fn total_is_sum_of_lines() {
        let services = create_services();

        let saved = services.orders.save(Order::new(None, lines())).await.unwrap();
        let fetched = services.orders.find_by_id(saved.id.unwrap()).await.unwrap();

        assert_eq!(fetched.total().cents(), 2750);
        assert_eq!(fetched.line_items.len(), 2);
    }

    #[tokio::test]
    async fn line_price_is_a_snapshot() {
        let services = create_services();
        let product = services
            .products
            .save(Product {
                name: "Lamp".to_string(),
                price: Money::from_cents(1500),
                ..Product::default()
            })
            .await
            .unwrap();
        let product_id = product.id.unwrap();

        let order = services
            .orders
            .save(Order::new(
                None,
                vec![OrderLineItem::new(product_id, 1, product.price)],
            ))
            .await
            .unwrap();

        let mut repriced = product.clone();
        repriced.price = Money::from_cents(9900);
        services.products.save(repriced).await.unwrap();

        let fetched = services.orders.find_by_id(order.id.unwrap()).await.unwrap();
        assert_eq!(fetched.line_items[0].price.cents(), 1500);
    }

    #[tokio::test]
    async fn find_by_user_filters_orders() {
        let services = create_services();
        let ana = services.users.save(new_user("ana@example.com")).await.unwrap();
        let bob = services.users.save(new_user("bob@example.com")).await.unwrap();

        services.orders.save(Order::new(ana.id, lines())).await.unwrap();
        services.orders.save(Order::new(ana.id, Vec::new())).await.unwrap();
        services.orders.save(Order::new(bob.id, lines())).await.unwrap();

        let for_ana = services
            .orders
            .find_by_user_id(ana.id.unwrap())
            .await
            .unwrap();
        assert_eq!(for_ana.len(), 2);
        assert!(for_ana.iter().all(|o| o.user_id == ana.id));
        assert_eq!(services.orders.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn order_for_unknown_user_is_conflict() {
        let services = create_services();

        let err = services
            .orders
            .save(Order::new(Some(UserId::new(3)), lines()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn state_update_is_visible_on_fetch() {
        let services = create_services();
        let saved = services.orders.save(Order::new(None, lines())).await.unwrap();
        let id = saved.id.unwrap();
        assert_eq!(saved.state, OrderState::Confirmed);

        services
            .orders
            .update_state_by_id(id, "CANCELLED")
            .await
            .unwrap();

        let fetched = services.orders.find_by_id(id).await.unwrap();
        assert_eq!(fetched.state, OrderState::Cancelled);
        assert_eq!(fetched.line_items, saved.line_items);
    }

    #[tokio::test]
    async fn order_total_overflow_is_rejected_before_saving() {
        let services = create_services();
        let order = Order::new(
            None,
            vec![OrderLineItem::new(
                ProductId::new(1),
                2,
                Money::from_cents(9_000_000_000_000_000_000),
            )],
        );

        let err = services.orders.save(order).await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidAmount(_)));
        assert!(services.orders.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn state_update_rejects_unknown_state() {
        let services = create_services();
        let saved = services.orders.save(Order::new(None, lines())).await.unwrap();

        let err = services
            .orders
            .update_state_by_id(saved.id.unwrap(), "SHIPPED")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrderState(ref s) if s == "SHIPPED"));
    }

    #[tokio::test]
    async fn state_update_of_missing_order_is_not_found() {
        let services = create_services();

        let err = services
            .orders
            .update_state_by_id(OrderId::new(12), "CANCELLED")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Orden con Id: 12 no existe.");
    }
}
