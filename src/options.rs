//! Compilation limits for clause parsing.

/// Limits applied while parsing untrusted clause text.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Maximum expression nesting depth accepted by the parser.
    pub max_depth: usize,
    /// Maximum number of order-by keys in one clause.
    pub max_order_keys: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_order_keys: 16,
        }
    }
}

impl CompileOptions {
    /// Creates the default compilation limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum expression nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of order-by keys.
    #[must_use]
    pub fn with_max_order_keys(mut self, max_order_keys: usize) -> Self {
        self.max_order_keys = max_order_keys;
        self
    }
}
