use crate::context::{ClusterNode, ClusterTree, LayoutContext};
use crate::coordinate_system::{Orientation, Side};
use crate::geom::{Rect, Size};
use crate::model::{LabelJust, LabelLoc};

/// Room a container keeps inside its borders for its label, per canonical side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelBand {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl LabelBand {
    /// Band of a label of canonical size `size` sitting at `loc` in the drawing.
    pub fn new(orientation: Orientation, loc: LabelLoc, size: Size) -> Self {
        let mut band = LabelBand::default();
        match orientation.label_side(loc) {
            Side::Top => band.top = size.height,
            Side::Bottom => band.bottom = size.height,
            Side::Left => band.left = size.width,
            Side::Right => band.right = size.width,
        }
        band
    }

    pub fn of(cluster: &ClusterNode, orientation: Orientation) -> Self {
        if cluster.label.is_none() {
            return LabelBand::default();
        }
        Self::new(orientation, cluster.labelloc, cluster.label_size)
    }
}

/// Length a label of canonical size `size` needs along the side it sits on, margins included.
pub fn label_run(orientation: Orientation, loc: LabelLoc, size: Size, margin: f64) -> f64 {
    if orientation.label_side(loc).is_horizontal() {
        size.width + 2.0 * margin
    } else {
        size.height + 2.0 * margin
    }
}

/// Space between a cluster's outermost rank and its top and bottom borders.
///
/// A cluster needs its margin plus its label band, plus whatever the nested clusters that start
/// (or end) on the same rank need. `slack` adds per-cluster room on both ends.
pub fn cluster_pads(
    tree: &ClusterTree,
    orientation: Orientation,
    slack: &[(f64, f64)],
) -> Vec<(f64, f64)> {
    let mut pads = vec![(0.0f64, 0.0f64); tree.len()];
    for c in tree.postorder() {
        let cluster = tree.get(c);
        let band = LabelBand::of(cluster, orientation);
        let mut top = 0.0f64;
        let mut bottom = 0.0f64;
        for &child in &cluster.children {
            let k = tree.get(child);
            if k.min_rank == cluster.min_rank {
                top = top.max(pads[child].0);
            }
            if k.max_rank == cluster.max_rank {
                bottom = bottom.max(pads[child].1);
            }
        }
        let (extra_top, extra_bottom) = slack.get(c).copied().unwrap_or_default();
        pads[c] = (
            cluster.margin + band.top + top + extra_top,
            cluster.margin + band.bottom + bottom + extra_bottom,
        );
    }
    pads
}

/// Label box of a container, computed in the drawing's frame and returned in the canonical one.
///
/// `rect` and `size` are canonical. `labelloc` picks the drawing's top or bottom edge and
/// `labeljust` the drawing's left, center or right.
pub fn place_label(
    orientation: Orientation,
    rect: &Rect,
    size: Size,
    loc: LabelLoc,
    just: LabelJust,
    margin: f64,
) -> Rect {
    let drawn = orientation.apply_rect(rect);
    let s = orientation.canonical_size(size);
    let x = match just {
        LabelJust::Left => drawn.left + margin,
        LabelJust::Right => drawn.right - margin - s.width,
        LabelJust::Center => drawn.center().x - s.width / 2.0,
    };
    let y = match loc {
        LabelLoc::Top => drawn.top + margin / 2.0,
        LabelLoc::Bottom => drawn.bottom - margin / 2.0 - s.height,
    };
    orientation.invert_rect(&Rect::new(x, x + s.width, y, y + s.height))
}

/// Computes every cluster box and label box, innermost first.
///
/// The horizontal borders come from the x assignment (`rect.left`/`rect.right`) and are widened
/// to cover the members if needed; the vertical borders follow the rank bands and the pads
/// recorded by the y assignment.
pub(super) fn place(ctx: &mut LayoutContext) {
    if ctx.clusters.is_empty() {
        return;
    }
    let orientation = ctx.orientation;

    let mut direct: Vec<Option<Rect>> = vec![None; ctx.clusters.len()];
    ctx.g.for_each_node(|_, n| {
        let Some(c) = n.container else {
            return;
        };
        let r = Rect::new(
            n.x - n.left_extent(),
            n.x + n.right_extent(),
            n.y - n.top_extent(),
            n.y + n.bottom_extent(),
        );
        direct[c] = Some(direct[c].map_or(r, |d| d.union(&r)));
    });

    for c in ctx.clusters.postorder() {
        let cluster = ctx.clusters.get(c);
        let margin = cluster.margin;
        let band = LabelBand::of(cluster, orientation);
        let mut left = cluster.rect.left;
        let mut right = cluster.rect.right;
        let mut inner = direct[c];
        for &child in &cluster.children {
            let r = ctx.clusters.get(child).rect;
            inner = Some(inner.map_or(r, |d| d.union(&r)));
        }
        if let Some(inner) = inner {
            left = left.min(inner.left - margin - band.left);
            right = right.max(inner.right + margin + band.right);
        }
        if orientation.label_side(cluster.labelloc).is_horizontal() {
            let width_needed = label_run(orientation, cluster.labelloc, cluster.label_size, margin);
            if right - left < width_needed {
                let grow = (width_needed - (right - left)) / 2.0;
                left -= grow;
                right += grow;
            }
        }

        let band_at = |r: i32| {
            usize::try_from(r)
                .ok()
                .and_then(|r| ctx.ranks.get(r))
                .copied()
                .unwrap_or_default()
        };
        let top = band_at(cluster.min_rank).upper() - cluster.pads.0;
        let bottom = band_at(cluster.max_rank).lower() + cluster.pads.1;
        let rect = Rect::new(left, right, top, bottom);

        let label_rect = cluster.label.as_ref().map(|_| {
            place_label(
                orientation,
                &rect,
                cluster.label_size,
                cluster.labelloc,
                cluster.labeljust,
                margin,
            )
        });

        let cluster = &mut ctx.clusters.clusters[c];
        cluster.rect = rect;
        cluster.label_rect = label_rect;
    }
}
