//! Coordinate assignment.
//!
//! X coordinates come from one of two interchangeable strategies; y coordinates stack the ranks
//! with `ranksep`, widened where cluster borders and labels need room. Cluster boxes are derived
//! last, once every member has a position.

mod clusters;
mod network_simplex;
mod priority;

pub use clusters::{cluster_pads, label_run, place_label};

use crate::context::{LayoutContext, RankBand};
use crate::error::Result;
use crate::options::CoordinateStrategy;
use crate::route::self_loop;

pub fn run(ctx: &mut LayoutContext) -> Result<CoordinateStrategy> {
    self_loop::reserve(ctx);

    let requested = ctx.options.coordinate_strategy();
    let strategy = if requested == CoordinateStrategy::Priority && !ctx.clusters.is_empty() {
        tracing::warn!("graph has clusters; using network simplex for x coordinates");
        CoordinateStrategy::NetworkSimplex
    } else {
        requested
    };
    match strategy {
        CoordinateStrategy::NetworkSimplex => network_simplex::assign_x(ctx)?,
        CoordinateStrategy::Priority => priority::assign_x(ctx),
    }

    assign_y(ctx);
    clusters::place(ctx);
    tracing::debug!(?strategy, ranks = ctx.ranks.len(), "assigned coordinates");
    Ok(strategy)
}

/// Stacks the ranks top to bottom and centers every node on its rank line.
///
/// Also records each cluster's pads. When labels run along the rank axis (left-to-right
/// drawings), a cluster too short for its label gets extra pads and the ranks are stacked again.
pub fn assign_y(ctx: &mut LayoutContext) {
    let n = ctx.layering.len();
    let mut extents = vec![RankBand::default(); n];
    for (r, layer) in ctx.layering.iter().enumerate() {
        for id in layer {
            if let Some(node) = ctx.g.node(id) {
                extents[r].top = extents[r].top.max(node.top_extent());
                extents[r].bottom = extents[r].bottom.max(node.bottom_extent());
            }
        }
    }

    let mut slack = vec![(0.0f64, 0.0f64); ctx.clusters.len()];
    let mut pads = cluster_pads(&ctx.clusters, ctx.orientation, &slack);
    let mut bands = stack(ctx, &extents, &pads);

    let mut short = false;
    for (c, cluster) in ctx.clusters.clusters.iter().enumerate() {
        if cluster.label.is_none()
            || ctx.orientation.label_side(cluster.labelloc).is_horizontal()
        {
            continue;
        }
        let need = label_run(
            ctx.orientation,
            cluster.labelloc,
            cluster.label_size,
            cluster.margin,
        );
        let span = band_at(&bands, cluster.max_rank).lower() + pads[c].1
            - (band_at(&bands, cluster.min_rank).upper() - pads[c].0);
        if span < need {
            let half = (need - span) / 2.0;
            slack[c] = (half, half);
            short = true;
        }
    }
    if short {
        // Pads only grow, so every span is at least as long as before plus its slack.
        pads = cluster_pads(&ctx.clusters, ctx.orientation, &slack);
        bands = stack(ctx, &extents, &pads);
    }

    for (r, layer) in ctx.layering.iter().enumerate() {
        for id in layer {
            if let Some(node) = ctx.g.node_mut(id) {
                node.y = bands[r].y;
            }
        }
    }
    for (cluster, pad) in ctx.clusters.clusters.iter_mut().zip(pads) {
        cluster.pads = pad;
    }
    ctx.ranks = bands;
}

fn band_at(bands: &[RankBand], r: i32) -> RankBand {
    usize::try_from(r)
        .ok()
        .and_then(|r| bands.get(r))
        .copied()
        .unwrap_or_default()
}

/// Rank center lines for the given node extents and cluster pads.
fn stack(ctx: &LayoutContext, extents: &[RankBand], pads: &[(f64, f64)]) -> Vec<RankBand> {
    let n = extents.len();
    // Room for cluster borders and labels that start or end at a rank.
    let mut top_extra = vec![0.0f64; n];
    let mut bottom_extra = vec![0.0f64; n];
    for (c, cluster) in ctx.clusters.clusters.iter().enumerate() {
        if let Some(t) = usize::try_from(cluster.min_rank)
            .ok()
            .and_then(|r| top_extra.get_mut(r))
        {
            *t = t.max(pads[c].0);
        }
        if let Some(b) = usize::try_from(cluster.max_rank)
            .ok()
            .and_then(|r| bottom_extra.get_mut(r))
        {
            *b = b.max(pads[c].1);
        }
    }

    let ranksep = ctx.attrs.ranksep;
    let mut bands = extents.to_vec();
    let mut y = 0.0f64;
    for r in 0..n {
        y += if r == 0 {
            bands[0].top + top_extra[0]
        } else {
            let gap = ranksep.max(bottom_extra[r - 1] + top_extra[r] + ranksep / 2.0);
            bands[r - 1].bottom + gap + bands[r].top
        };
        bands[r].y = y;
    }
    bands
}
