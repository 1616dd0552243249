//! Shared test utilities for the catalog crates
//!
//! - `TestDatabase`: PostgreSQL container with the catalog schema (feature: "postgres")
//! - `TestDataBuilder`: deterministic names, slugs and ids derived from a test name
//! - `assertions`: assertion helpers with readable failure messages
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let slug = builder.slug("category", "books");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator for test data, so reruns produce the same values.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_category");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic UUID; different `n` give different ids for one seed.
    pub fn id(&self, n: u64) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(bytes)
    }

    /// Human-readable name, e.g. `"Test category 12345 books"`.
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("Test {} {} {}", prefix, self.seed, suffix)
    }

    /// URL-safe slug, e.g. `"test-category-12345-books"`.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let slug = TestDataBuilder::new(7).slug("product", "go-101");
    /// assert_eq!(slug, "test-product-7-go-101");
    /// ```
    pub fn slug(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    pub fn image_url(&self, suffix: &str) -> String {
        format!("https://cdn.example.com/{}/{}.jpg", self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::collections::HashSet;
    use std::hash::Hash;
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Order-insensitive equality of two collections
    pub fn assert_same_set<T, A, B>(actual: A, expected: B, context: &str)
    where
        T: Eq + Hash + std::fmt::Debug,
        A: IntoIterator<Item = T>,
        B: IntoIterator<Item = T>,
    {
        let actual: HashSet<T> = actual.into_iter().collect();
        let expected: HashSet<T> = expected.into_iter().collect();
        assert_eq!(actual, expected, "{}: sets differ", context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let a = TestDataBuilder::new(42);
        let b = TestDataBuilder::new(42);

        assert_eq!(a.id(1), b.id(1));
        assert_eq!(a.slug("category", "books"), b.slug("category", "books"));
    }

    #[test]
    fn test_data_builder_ids_differ_by_index() {
        let builder = TestDataBuilder::from_test_name("ids");
        assert_ne!(builder.id(1), builder.id(2));
    }

    #[test]
    fn test_data_builder_different_names() {
        let a = TestDataBuilder::from_test_name("test1");
        let b = TestDataBuilder::from_test_name("test2");
        assert_ne!(a.id(0), b.id(0));
        assert_ne!(a.slug("p", "x"), b.slug("p", "x"));
    }

    #[test]
    fn test_assert_same_set_ignores_order() {
        assertions::assert_same_set(vec![3, 1, 2], vec![1, 2, 3], "numbers");
    }
}
