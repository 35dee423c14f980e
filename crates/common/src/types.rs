use serde::{Deserialize, Serialize};

/// Declares a typed wrapper around a store-generated integer key.
///
/// The wrappers keep ids of different tables from being mixed up while
/// still serializing as the bare integer on the wire.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw key.
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw key.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId
);

entity_id!(
    /// Identifier of a catalog product.
    ProductId
);

entity_id!(
    /// Identifier of a product category.
    CategoryId
);

entity_id!(
    /// Identifier of a placed order.
    OrderId
);

entity_id!(
    /// Identifier of a single line inside an order.
    LineItemId
);
