//! Persisted "current order identifier".
//!
//! The store belongs to the host. A session only writes to it: clearing it
//! when the payment window expires. Clearing writes an empty identifier
//! instead of removing the key, because readers of the store may treat a
//! missing key differently from an empty one.

use thiserror::Error;

/// Key under which hosts persist the current order identifier.
pub const ORDER_ID_KEY: &str = "orderId";

/// Errors that can occur while writing the order identifier.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access order store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode order store: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value collaborator holding the current order identifier.
pub trait OrderIdStore {
    fn set_order_id(&mut self, order_id: &str) -> Result<(), StoreError>;

    /// Set the identifier to the empty value.
    fn clear_order_id(&mut self) -> Result<(), StoreError> {
        self.set_order_id("")
    }
}

/// Process-local store, for embedding hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderIdStore {
    order_id: Option<String>,
    writes: usize,
}

impl InMemoryOrderIdStore {
    pub fn with_order_id(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            writes: 0,
        }
    }

    /// `None` if the key was never written.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    /// Number of writes since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OrderIdStore for InMemoryOrderIdStore {
    fn set_order_id(&mut self, order_id: &str) -> Result<(), StoreError> {
        self.order_id = Some(order_id.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_key_with_empty_value() {
        let mut store = InMemoryOrderIdStore::with_order_id("abc");
        store.clear_order_id().unwrap();
        assert_eq!(store.order_id(), Some(""));
        assert_eq!(store.writes(), 1);
    }
}
