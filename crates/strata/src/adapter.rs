//! Input graph → internal layered graph.
//!
//! Validates the caller's model, resolves inherited attributes, measures labels, sizes nodes and
//! flattens cluster nesting into a single node set plus a [`ClusterTree`].

use crate::context::{
    CellBox, ClusterIx, ClusterNode, EdgeChain, Endpoints, LayoutContext, LayoutEdge, LayoutNode,
    NodeKind, SelfLoop,
};
use crate::error::{Error, Result};
use crate::geom::Size;
use crate::model::{
    Attrs, Cluster, ClusterAttrs, EdgeAttrs, Font, Graph, NodeAttrs, merge_defaults,
};
use crate::options::LayoutOptions;
use crate::text::TextMeasurer;
use rustc_hash::{FxHashMap, FxHashSet};
use strata_graph::EdgeKey;

/// Largest accepted edge `minlen`. Every spanned rank costs a virtual node.
pub const MAX_MINLEN: u32 = 1024;

/// Minimum length of an edge as a rank distance.
///
/// Flat edges are not supported, so zero is raised to one.
fn checked_minlen(edge_id: &str, minlen: u32) -> Result<i32> {
    if minlen > MAX_MINLEN {
        return Err(Error::InvalidOption {
            name: "minlen",
            reason: format!("edge {edge_id} has minlen {minlen}, the limit is {MAX_MINLEN}"),
        });
    }
    Ok(minlen.max(1) as i32)
}

pub fn validate(graph: &Graph) -> Result<()> {
    if graph.nodes.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let attrs = &graph.attrs;
    for (name, value) in [
        ("nodesep", attrs.nodesep),
        ("ranksep", attrs.ranksep),
        ("edgesep", attrs.edgesep),
        ("loopsep", attrs.loopsep),
        ("margin", attrs.margin),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidOption {
                name,
                reason: format!("expected a finite non-negative length, got {value}"),
            });
        }
    }

    let mut node_ids: FxHashSet<&str> = FxHashSet::default();
    for n in &graph.nodes {
        if !node_ids.insert(n.id.as_str()) {
            return Err(Error::DuplicateNode {
                node_id: n.id.clone(),
            });
        }
    }

    let mut edge_ids: FxHashSet<&str> = FxHashSet::default();
    for e in &graph.edges {
        if !edge_ids.insert(e.id.as_str()) {
            return Err(Error::DuplicateEdge {
                edge_id: e.id.clone(),
            });
        }
        for end in [&e.tail, &e.head] {
            if !node_ids.contains(end.as_str()) {
                return Err(Error::MissingEndpoint {
                    edge_id: e.id.clone(),
                    node_id: end.clone(),
                });
            }
        }
        if let Some(weight) = e.attrs.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidOption {
                    name: "weight",
                    reason: format!("edge {} has weight {weight}", e.id),
                });
            }
        }
        if let Some(minlen) = e.attrs.minlen {
            checked_minlen(&e.id, minlen)?;
        }
    }

    let mut cluster_ids: FxHashSet<&str> = FxHashSet::default();
    let mut owner: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    let mut stack: Vec<(&Cluster, Vec<&str>)> =
        graph.clusters.iter().rev().map(|c| (c, Vec::new())).collect();
    while let Some((c, ancestors)) = stack.pop() {
        if !cluster_ids.insert(c.id.as_str()) {
            return Err(Error::DuplicateCluster {
                cluster_id: c.id.clone(),
            });
        }
        let mut path = ancestors.clone();
        path.push(c.id.as_str());
        for member in &c.nodes {
            if !node_ids.contains(member.as_str()) {
                return Err(Error::UnknownClusterMember {
                    cluster_id: c.id.clone(),
                    node_id: member.clone(),
                });
            }
            match owner.get(member.as_str()).cloned() {
                // Already listed by an ancestor (or this cluster): the deeper listing wins.
                Some(prev) if path.starts_with(&prev) => {
                    owner.insert(member.as_str(), path.clone());
                }
                Some(prev) => {
                    return Err(Error::ConflictingMembership {
                        node_id: member.clone(),
                        first: prev.last().copied().unwrap_or_default().to_string(),
                        second: c.id.clone(),
                    });
                }
                None => {
                    owner.insert(member.as_str(), path.clone());
                }
            }
        }
        for child in c.clusters.iter().rev() {
            stack.push((child, path.clone()));
        }
    }

    Ok(())
}

fn has_members(c: &Cluster) -> bool {
    !c.nodes.is_empty() || c.clusters.iter().any(has_members)
}

struct ClusterBuilder<'a> {
    graph: &'a Graph,
    measurer: &'a dyn TextMeasurer,
    ctx: &'a mut LayoutContext,
    innermost: FxHashMap<String, ClusterIx>,
    node_templates: Vec<NodeAttrs>,
    edge_templates: Vec<EdgeAttrs>,
}

impl ClusterBuilder<'_> {
    fn add(
        &mut self,
        c: &Cluster,
        parent: Option<ClusterIx>,
        depth: usize,
        node_tmpl: &NodeAttrs,
        edge_tmpl: &EdgeAttrs,
    ) {
        if !has_members(c) {
            tracing::warn!(cluster = %c.id, "skipping cluster without nodes");
            return;
        }
        let attrs = merge_defaults(
            &c.attrs,
            &self.graph.cluster_defaults,
            &ClusterAttrs::builtin(),
        );
        let font = attrs.font.clone().unwrap_or_default();
        let label_size = measure(self.measurer, attrs.label.as_deref(), &font);

        let ix = self.ctx.clusters.clusters.len();
        self.ctx.clusters.clusters.push(ClusterNode {
            id: c.id.clone(),
            parent,
            depth,
            margin: attrs.margin.unwrap_or(8.0).max(0.0),
            label: attrs.label.clone(),
            label_size,
            labelloc: attrs.labelloc.unwrap_or_default(),
            labeljust: attrs.labeljust.unwrap_or_default(),
            ..Default::default()
        });
        self.ctx.clusters.index.insert(c.id.clone(), ix);
        match parent {
            Some(p) => self.ctx.clusters.clusters[p].children.push(ix),
            None => self.ctx.clusters.roots.push(ix),
        }

        let node_tmpl = c.node_defaults.clone().or(node_tmpl);
        let edge_tmpl = c.edge_defaults.clone().or(edge_tmpl);
        self.node_templates.push(node_tmpl.clone());
        self.edge_templates.push(edge_tmpl.clone());

        for member in &c.nodes {
            self.innermost.insert(member.clone(), ix);
        }
        for child in &c.clusters {
            self.add(child, Some(ix), depth + 1, &node_tmpl, &edge_tmpl);
        }
    }
}

fn measure(measurer: &dyn TextMeasurer, text: Option<&str>, font: &Font) -> Size {
    match text {
        Some(t) if !t.is_empty() => measurer.measure(t, &font.name, font.size),
        _ => Size::ZERO,
    }
}

fn check_size(what: impl Into<String>, size: Size) -> Result<Size> {
    if size.is_valid() {
        Ok(size)
    } else {
        Err(Error::DegenerateSize {
            what: what.into(),
            width: size.width,
            height: size.height,
        })
    }
}

/// Builds the layout context for a validated graph.
pub fn build(
    graph: &Graph,
    measurer: &dyn TextMeasurer,
    options: &LayoutOptions,
) -> Result<LayoutContext> {
    validate(graph)?;
    let mut ctx = LayoutContext::new(graph.attrs.clone(), options.clone());

    let mut builder = ClusterBuilder {
        graph,
        measurer,
        ctx: &mut ctx,
        innermost: FxHashMap::default(),
        node_templates: Vec::new(),
        edge_templates: Vec::new(),
    };
    for c in &graph.clusters {
        builder.add(c, None, 0, &graph.node_defaults, &graph.edge_defaults);
    }
    let ClusterBuilder {
        innermost,
        node_templates,
        edge_templates,
        ..
    } = builder;

    let node_builtin = NodeAttrs::builtin();
    for n in &graph.nodes {
        let container = innermost.get(&n.id).copied();
        let template = container
            .map(|c| &node_templates[c])
            .unwrap_or(&graph.node_defaults);
        let attrs = merge_defaults(&n.attrs, template, &node_builtin);
        let shape = attrs.shape.unwrap_or_default();
        let font = attrs.font.clone().unwrap_or_default();

        let label_size = if shape.has_label() {
            measure(measurer, Some(attrs.label.as_deref().unwrap_or(&n.id)), &font)
        } else {
            Size::ZERO
        };
        let label_size = check_size(format!("label of node {}", n.id), label_size)?;

        let default = shape.default_size();
        let explicit = Size::new(
            attrs.width.unwrap_or(default.width),
            attrs.height.unwrap_or(default.height),
        );
        let mut size = if attrs.fixed_size.unwrap_or(false) {
            explicit
        } else {
            let margin = attrs.margin.unwrap_or(Size::ZERO);
            let inner = if label_size.is_empty() {
                Size::ZERO
            } else {
                Size::new(
                    label_size.width + 2.0 * margin.width,
                    label_size.height + 2.0 * margin.height,
                )
            };
            shape.min_container_size(inner).max(explicit)
        };
        for cell in &n.cells {
            let r = cell.rect;
            size = size.max(Size::new(
                2.0 * r.left.abs().max(r.right.abs()),
                2.0 * r.top.abs().max(r.bottom.abs()),
            ));
        }
        let size = check_size(format!("shape of node {}", n.id), size)?;

        ctx.g.set_node(
            n.id.clone(),
            LayoutNode {
                kind: NodeKind::Real,
                shape,
                size,
                drawn_size: size,
                label_size,
                cells: n
                    .cells
                    .iter()
                    .map(|c| CellBox {
                        id: c.id.clone(),
                        rect: c.rect,
                    })
                    .collect(),
                container,
                ..Default::default()
            },
        );
        ctx.node_order.push(n.id.clone());
        if let Some(c) = container {
            ctx.clusters.clusters[c].members.push(n.id.clone());
        }
    }

    let edge_builtin = EdgeAttrs::builtin();
    for e in &graph.edges {
        let lca = ctx.clusters.lca(
            innermost.get(&e.tail).copied(),
            innermost.get(&e.head).copied(),
        );
        let template = lca
            .map(|c| &edge_templates[c])
            .unwrap_or(&graph.edge_defaults);
        let attrs = merge_defaults(&e.attrs, template, &edge_builtin);
        let font = attrs.font.clone().unwrap_or_default();
        let label_size = match attrs.label.as_deref() {
            Some(l) if !l.is_empty() => Some(check_size(
                format!("label of edge {}", e.id),
                measure(measurer, Some(l), &font),
            )?),
            _ => None,
        };
        ctx.edge_order.push(e.id.clone());
        let endpoints = Endpoints {
            tail_port: e.tail_port,
            head_port: e.head_port,
            tail_cell: e.tail_cell.clone(),
            head_cell: e.head_cell.clone(),
        };

        if e.is_self_loop() {
            if let Some(n) = ctx.g.node_mut(&e.tail) {
                n.self_loops.push(SelfLoop {
                    id: e.id.clone(),
                    endpoints,
                    label_size,
                });
            }
            ctx.loop_edges.push((e.id.clone(), e.tail.clone()));
            continue;
        }

        ctx.has_edge_labels |= label_size.is_some();
        let minlen = checked_minlen(&e.id, attrs.minlen.unwrap_or(1))?;
        ctx.g.insert_edge(
            EdgeKey::new(e.tail.clone(), e.head.clone(), Some(e.id.clone())),
            LayoutEdge {
                id: e.id.clone(),
                weight: attrs.weight.unwrap_or(1.0),
                minlen,
                reversed: false,
            },
        );
        ctx.chains.insert(
            e.id.clone(),
            EdgeChain {
                id: e.id.clone(),
                tail: e.tail.clone(),
                head: e.head.clone(),
                endpoints,
                label_size,
                nodes: vec![e.tail.clone(), e.head.clone()],
                reversed: false,
                label_node: None,
            },
        );
    }

    ctx.graph_label = graph.attrs.label.clone().filter(|l| !l.is_empty());
    ctx.graph_label_size = measure(measurer, ctx.graph_label.as_deref(), &graph.attrs.font);

    tracing::debug!(
        nodes = ctx.g.node_count(),
        edges = ctx.g.edge_count(),
        self_loops = ctx.loop_edges.len(),
        clusters = ctx.clusters.len(),
        "adapted input graph"
    );
    Ok(ctx)
}
