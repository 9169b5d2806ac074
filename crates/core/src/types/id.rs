//! Integer primary keys for customers and products.
//!
//! Both tables use `SERIAL` keys. Wrapping them keeps a customer ID from being
//! passed where a product ID is expected.

macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

serial_id!(
    /// Key of a row in `marketplace.customer`.
    CustomerId
);

serial_id!(
    /// Key of a row in `marketplace.product`.
    ProductId
);
