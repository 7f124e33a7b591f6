use anyhow::Result;

/// Key/value storage area (DOM's `Storage`), the ambient store behind the local and
/// session adapters.
///
/// Implementations use interior mutability; every method takes `&self` so one area can be
/// shared by any number of adapters.
pub trait StorageArea {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Returns the key at position `index`, or `None` when out of range.
    fn key(&self, index: usize) -> Option<String>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns `true` when the area holds no items at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<()>;

    /// Returns all keys in index order.
    fn keys(&self) -> Vec<String> {
        (0..self.len()).filter_map(|i| self.key(i)).collect()
    }
}
