//! Directed multigraph container.
//!
//! Nodes and edges keep their insertion order. Every query that returns several items returns
//! them in that order, which keeps the layout pipeline deterministic without sorting by id.
//!
//! Removed nodes and edges leave a vacant slot behind, so indices handed out by
//! [`Graph::node_ix`] stay valid for the lifetime of the graph.

use rustc_hash::FxBuildHasher;

mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    options: GraphOptions,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_index: HashMap<String, usize>,
    node_count: usize,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_index: HashMap<EdgeKey, usize>,
    edge_count: usize,

    // Edge slots per node slot, in insertion order.
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl<N, E> Graph<N, E> {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            node_count: 0,
            edges: Vec::new(),
            edge_index: HashMap::default(),
            edge_count: 0,
            out_adj: Vec::new(),
            in_adj: Vec::new(),
        }
    }

    fn view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn edge_slot(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        self.edge_index.get(&self.view(v, w, name)).copied()
    }

    // ---------------------------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------------------------

    /// Inserts a node, or replaces the label of an existing one (keeping its position).
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            if let Some(entry) = self.nodes[ix].as_mut() {
                entry.label = label;
            }
            return self;
        }
        let ix = self.nodes.len();
        self.nodes.push(Some(NodeEntry {
            id: id.clone(),
            label,
        }));
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        self.node_index.insert(id, ix);
        self.node_count += 1;
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        let ix = *self.node_index.get(id)?;
        self.nodes[ix].as_ref().map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = *self.node_index.get(id)?;
        self.nodes[ix].as_mut().map(|n| &mut n.label)
    }

    /// Stable slot index of a node.
    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Upper bound (exclusive) of node slot indices, including vacant slots.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flatten().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in self.nodes.iter().flatten() {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in self.nodes.iter_mut().flatten() {
            f(&n.id, &mut n.label);
        }
    }

    pub fn for_each_node_ix<F>(&self, mut f: F)
    where
        F: FnMut(usize, &str, &N),
    {
        for (ix, n) in self.nodes.iter().enumerate() {
            if let Some(n) = n {
                f(ix, &n.id, &n.label);
            }
        }
    }

    /// Removes a node together with its incident edges and returns its label.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let ix = self.node_index.remove(id)?;
        let mut incident: Vec<usize> = self.out_adj[ix].clone();
        incident.extend(self.in_adj[ix].iter().copied());
        incident.sort_unstable();
        incident.dedup();
        for slot in incident {
            self.remove_edge_slot(slot);
        }
        self.node_count -= 1;
        self.nodes[ix].take().map(|n| n.label)
    }

    // ---------------------------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------------------------

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for e in self.edges.iter().flatten() {
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in self.edges.iter_mut().flatten() {
            f(&e.key, &mut e.label);
        }
    }

    /// Visits edges with the slot indices of their endpoints.
    pub fn for_each_edge_ix<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &EdgeKey, &E),
    {
        for e in self.edges.iter().flatten() {
            f(e.v_ix, e.w_ix, &e.key, &e.label);
        }
    }

    /// Inserts an edge between two existing nodes, or replaces the label of an existing edge.
    ///
    /// Returns `false` (and inserts nothing) when an endpoint is missing.
    pub fn insert_edge(&mut self, key: EdgeKey, label: E) -> bool {
        let key = EdgeKey {
            name: if self.options.multigraph {
                key.name
            } else {
                None
            },
            ..key
        };
        if let Some(&slot) = self.edge_index.get(&key) {
            if let Some(entry) = self.edges[slot].as_mut() {
                entry.label = label;
            }
            return true;
        }
        let (Some(&v_ix), Some(&w_ix)) = (self.node_index.get(&key.v), self.node_index.get(&key.w))
        else {
            return false;
        };
        let slot = self.edges.len();
        self.edges.push(Some(EdgeEntry {
            key: key.clone(),
            v_ix,
            w_ix,
            label,
        }));
        self.out_adj[v_ix].push(slot);
        self.in_adj[w_ix].push(slot);
        self.edge_index.insert(key, slot);
        self.edge_count += 1;
        true
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_slot(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let slot = self.edge_slot(v, w, name)?;
        self.edges[slot].as_ref().map(|e| &e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    fn remove_edge_slot(&mut self, slot: usize) -> Option<E> {
        let entry = self.edges.get_mut(slot)?.take()?;
        self.edge_index.remove(&entry.key);
        self.out_adj[entry.v_ix].retain(|&s| s != slot);
        self.in_adj[entry.w_ix].retain(|&s| s != slot);
        self.edge_count -= 1;
        Some(entry.label)
    }

    /// Removes an edge and returns its label.
    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<E> {
        let slot = self.edge_slot(&key.v, &key.w, key.name.as_deref())?;
        self.remove_edge_slot(slot)
    }

    // ---------------------------------------------------------------------------------------
    // Adjacency
    // ---------------------------------------------------------------------------------------

    fn adjacent_slots(&self, v: &str, outgoing: bool) -> &[usize] {
        match self.node_index.get(v) {
            Some(&ix) if outgoing => &self.out_adj[ix],
            Some(&ix) => &self.in_adj[ix],
            None => &[],
        }
    }

    pub fn out_edges(&self, v: &str) -> Vec<EdgeKey> {
        self.adjacent_slots(v, true)
            .iter()
            .filter_map(|&s| self.edges[s].as_ref().map(|e| e.key.clone()))
            .collect()
    }

    pub fn in_edges(&self, v: &str) -> Vec<EdgeKey> {
        self.adjacent_slots(v, false)
            .iter()
            .filter_map(|&s| self.edges[s].as_ref().map(|e| e.key.clone()))
            .collect()
    }

    pub fn in_degree(&self, v: &str) -> usize {
        self.adjacent_slots(v, false).len()
    }

    /// Heads of the out-edges of `v`, one entry per edge.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        self.adjacent_slots(v, true)
            .iter()
            .filter_map(|&s| self.edges[s].as_ref().map(|e| e.key.w.as_str()))
            .collect()
    }

    /// Tails of the in-edges of `v`, one entry per edge.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        self.adjacent_slots(v, false)
            .iter()
            .filter_map(|&s| self.edges[s].as_ref().map(|e| e.key.v.as_str()))
            .collect()
    }

    /// Distinct successors and predecessors of `v`.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for n in self.successors(v).into_iter().chain(self.predecessors(v)) {
            if !out.contains(&n) {
                out.push(n);
            }
        }
        out
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(ix, n)| {
                let n = n.as_ref()?;
                self.in_adj[ix].is_empty().then_some(n.id.as_str())
            })
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(ix, n)| {
                let n = n.as_ref()?;
                self.out_adj[ix].is_empty().then_some(n.id.as_str())
            })
            .collect()
    }
}

impl<N, E> Graph<N, E>
where
    N: Default,
{
    fn ensure_node(&mut self, id: &str) {
        if !self.node_index.contains_key(id) {
            self.set_node(id, N::default());
        }
    }

    /// Inserts an edge, creating missing endpoints with default labels.
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>, label: E) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, label)
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: E,
    ) -> &mut Self {
        let key = EdgeKey::new(v, w, name);
        self.ensure_node(&key.v);
        self.ensure_node(&key.w);
        self.insert_edge(key, label);
        self
    }
}

impl<N, E> Graph<N, E>
where
    N: Default,
    E: Default,
{
    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1], E::default());
        }
        self
    }
}
