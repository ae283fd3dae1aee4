//! Layout pipeline.
//!
//! Stages run in a fixed order over one [`LayoutContext`](crate::context::LayoutContext):
//! adapt, orient, break cycles, rank, normalize, order, position, route, then map out.

use crate::error::Result;
use crate::model::Graph;
use crate::options::LayoutOptions;
use crate::output::{self, Layout};
use crate::text::TextMeasurer;
use crate::{acyclic, adapter, collapse, coordinate_system, normalize, order, position, route};

/// Lays out `graph` with the default options.
pub fn layout(graph: &Graph, measurer: &dyn TextMeasurer) -> Result<Layout> {
    layout_with_options(graph, measurer, &LayoutOptions::default())
}

pub fn layout_with_options(
    graph: &Graph,
    measurer: &dyn TextMeasurer,
    options: &LayoutOptions,
) -> Result<Layout> {
    let span = tracing::info_span!(
        "layout",
        nodes = graph.nodes.len(),
        edges = graph.edges.len()
    );
    let _enter = span.enter();

    options.validate()?;
    let mut ctx = adapter::build(graph, measurer, options)?;
    coordinate_system::adjust(&mut ctx);

    acyclic::run(&mut ctx.g)?;
    normalize::prepare_label_ranks(&mut ctx)?;
    collapse::run(&mut ctx)?;
    normalize::run(&mut ctx);

    order::run(&mut ctx);

    let strategy = position::run(&mut ctx)?;
    let edges = route::run(&ctx);
    Ok(output::build(&ctx, edges, strategy))
}
