#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("duplicate node id: {node_id}")]
    DuplicateNode { node_id: String },

    #[error("duplicate edge id: {edge_id}")]
    DuplicateEdge { edge_id: String },

    #[error("edge {edge_id} references a missing endpoint: {node_id}")]
    MissingEndpoint { edge_id: String, node_id: String },

    #[error("cluster {cluster_id} references an unknown node: {node_id}")]
    UnknownClusterMember { cluster_id: String, node_id: String },

    #[error("duplicate cluster id: {cluster_id}")]
    DuplicateCluster { cluster_id: String },

    #[error("node {node_id} is claimed by sibling clusters {first} and {second}")]
    ConflictingMembership {
        node_id: String,
        first: String,
        second: String,
    },

    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("{what} produced a degenerate size {width}x{height}")]
    DegenerateSize {
        what: String,
        width: f64,
        height: f64,
    },

    #[error("edge {edge_id} still decreases in rank after reversal ({tail_rank} -> {head_rank})")]
    RankInversion {
        edge_id: String,
        tail_rank: i32,
        head_rank: i32,
    },

    #[error("constraint graph for {stage} is not solvable: {reason}")]
    Unsolvable { stage: &'static str, reason: String },

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
