#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default nesting ceiling of type descriptions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource ceilings applied to a single decode.
///
/// The export format itself sets no limit on nesting, so hostile input could
/// otherwise exhaust the stack.
///
/// ```rust
/// use gcimport::ImportConfig;
///
/// let config = ImportConfig::default().with_max_depth(64).with_max_input_len(1 << 20);
/// assert_eq!(config.max_depth, 64);
/// assert_eq!(config.max_input_len, Some(1 << 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ImportConfig {
    /// Maximum nesting of type descriptions.
    ///
    /// Each level costs several kilobytes of stack in unoptimized builds; the
    /// default keeps a full-depth decode well inside a 2 MiB thread stack.
    pub max_depth: usize,
    /// Maximum size of the export data buffer, `None` for no limit.
    pub max_input_len: Option<usize>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl ImportConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = Some(max_input_len);
        self
    }
}
