//! Graph configuration options.

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Allow several edges between the same ordered pair, told apart by `EdgeKey::name`.
    pub multigraph: bool,
}

impl GraphOptions {
    pub fn multigraph() -> Self {
        Self { multigraph: true }
    }
}
