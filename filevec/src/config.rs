//! Open-time configuration for file vectors

use filevec_core::MIN_CAPACITY;

/// Configuration applied when a file vector opens its backing file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VecConfig {
    /// Slots established when the backing file is empty, and the floor for `shrink_to_fit`
    pub min_capacity: usize,
    /// Pre-fault mapped pages when mapping
    pub populate: bool,
    /// Flush dirty pages to the file before unmapping on close
    pub flush_on_close: bool,
}

impl VecConfig {
    /// Set the minimum capacity (clamped to at least one slot)
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity.max(MIN_CAPACITY);
        self
    }

    /// Pre-fault pages on every mapping
    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    /// Flush the mapping before it is released on close
    pub fn with_flush_on_close(mut self, flush_on_close: bool) -> Self {
        self.flush_on_close = flush_on_close;
        self
    }

    /// Effective minimum capacity
    pub fn min_capacity(&self) -> usize {
        self.min_capacity.max(MIN_CAPACITY)
    }

    /// Serialize to JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for VecConfig {
    fn default() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            populate: false,
            flush_on_close: false,
        }
    }
}
