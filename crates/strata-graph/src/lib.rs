//! Insertion-ordered directed multigraph container used by the `strata` layout engine.
//!
//! Node ids are strings. Edges are keyed by `(v, w, name)`, where `name` only matters when the
//! graph was created with [`GraphOptions::multigraph`]. Iteration always follows insertion
//! order.

#![forbid(unsafe_code)]

pub mod alg;
pub mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions};
