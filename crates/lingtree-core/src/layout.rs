//! The layout engine: three passes over a tree of node boxes.
//!
//! Pass one sizes every node bottom-up in ems and records per-level row
//! heights. Pass two converts widths to percentages of the parent container
//! top-down, per the horizontal spacing policy. Pass three assigns each
//! node's vertical dodge within its row from the alignment policy.
//!
//! X coordinates are percentages that compose multiplicatively through
//! nested containers; y coordinates are ems. [`TreeLayout`] owns the result
//! and answers geometry queries (path addressing, bounding boxes) and style
//! mutations, which rerun all three passes.

use lingtree_svg::Element;

use crate::adapter::{self, TreeValue, common_prefix};
use crate::edge::EdgeStyle;
use crate::error::LayoutError;
use crate::node::{ANNOTATION_MARGIN, DESCENDER_MARGIN, NodeBox};
use crate::options::{FontSpec, HorizSpacing, LayoutOptions, OptMask, VertAlign};

// ---------------------------------------------------------------------------
// Layout tree
// ---------------------------------------------------------------------------

/// One position in the laid-out tree: the node's box plus its daughters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub node: NodeBox,
    pub children: Vec<LayoutNode>,
}

/// A computed tree layout, the result of the three passes.
///
/// The layout is immutable with respect to structure. Style overrides
/// mutate per-node options and rerun the passes; annotations only append
/// geometry and grow `extra_y`, never moving placed nodes.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    pub(crate) options: LayoutOptions,
    pub(crate) tree: TreeValue,
    pub(crate) root: LayoutNode,
    pub(crate) depth: usize,
    pub(crate) level_heights: Vec<f64>,
    pub(crate) level_ys: Vec<f64>,
    pub(crate) max_width: f64,
    pub(crate) extra_y: f64,
    pub(crate) annotations: Vec<Element>,
    pub(crate) movement_arrows: Vec<(f64, f64, f64)>,
}

struct Computed {
    root: LayoutNode,
    depth: usize,
    level_heights: Vec<f64>,
    level_ys: Vec<f64>,
    max_width: f64,
}

impl TreeLayout {
    /// Lay out a tree under the given options.
    #[must_use]
    pub fn new(tree: impl Into<TreeValue>, options: LayoutOptions) -> Self {
        let tree = tree.into();
        let computed = compute(&options, &tree, None);
        Self {
            options,
            tree,
            root: computed.root,
            depth: computed.depth,
            level_heights: computed.level_heights,
            level_ys: computed.level_ys,
            max_width: computed.max_width,
            extra_y: 0.5,
            annotations: Vec::new(),
            movement_arrows: Vec::new(),
        }
    }

    /// A fresh layout of the same tree under different options. Per-node
    /// style overrides do not carry over.
    #[must_use]
    pub fn reset(&self, options: LayoutOptions) -> Self {
        Self::new(self.tree.clone(), options)
    }

    /// Rerun the layout passes. Node options survive (they live on the
    /// boxes), but annotations were placed against the old geometry and are
    /// dropped.
    pub fn relayout(&mut self) {
        let computed = compute(&self.options, &self.tree, Some(&self.root));
        self.root = computed.root;
        self.depth = computed.depth;
        self.level_heights = computed.level_heights;
        self.level_ys = computed.level_ys;
        self.max_width = computed.max_width;
        self.annotations.clear();
    }

    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    #[must_use]
    pub fn tree(&self) -> &TreeValue {
        &self.tree
    }

    /// The deepest level index; 0 for a bare leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    // --- Dimensions ---------------------------------------------------------

    /// Total canvas height in ems: all level offsets, the last row's height,
    /// and the annotation slack below the tree.
    #[must_use]
    pub fn em_height(&self) -> f64 {
        self.level_ys.iter().sum::<f64>() + self.level_heights[self.depth] + self.extra_y
    }

    /// Total canvas width in ems, from the root's pre-normalization width.
    #[must_use]
    pub fn em_width(&self) -> f64 {
        self.max_width
    }

    #[must_use]
    pub fn height_px(&self) -> f64 {
        self.options.em_to_px(self.em_height())
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        self.options.em_to_px(self.em_width())
    }

    /// Vertical gap in ems between two levels, measured from the bottom of
    /// the containing row for `level_a`.
    #[must_use]
    pub fn y_distance(&self, level_a: usize, level_b: usize) -> f64 {
        let level_b = level_b.min(self.depth);
        if level_a + 1 > level_b {
            return 0.0;
        }
        self.level_ys[level_a + 1..=level_b].iter().sum()
    }

    /// The vertical dodge of a node within its row: ems of slack above and
    /// below, as positive numbers.
    #[must_use]
    pub fn label_y_dodge(&self, node: &NodeBox) -> (f64, f64) {
        self.level_y_dodge(node.depth, node.height)
    }

    pub(crate) fn level_y_dodge(&self, level: usize, height: f64) -> (f64, f64) {
        dodge_for(&self.options, &self.level_heights, level, height)
    }

    // --- Path addressing ------------------------------------------------------

    pub(crate) fn layout_node_at(&self, path: &[isize]) -> Result<&LayoutNode, LayoutError> {
        let mut node = &self.root;
        for (i, &step) in path.iter().enumerate() {
            let idx = resolve_step(node.children.len(), step, i)?;
            node = &node.children[idx];
        }
        Ok(node)
    }

    fn layout_node_at_mut(&mut self, path: &[isize]) -> Result<&mut LayoutNode, LayoutError> {
        let mut node = &mut self.root;
        for (i, &step) in path.iter().enumerate() {
            let idx = resolve_step(node.children.len(), step, i)?;
            node = &mut node.children[idx];
        }
        Ok(node)
    }

    /// The node box at a tree path. Negative indices count daughters from
    /// the right.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] at the first step that addresses
    /// a missing daughter.
    pub fn node_at(&self, path: &[isize]) -> Result<&NodeBox, LayoutError> {
        Ok(&self.layout_node_at(path)?.node)
    }

    /// X position and width of the node at `path`, both as percentages of
    /// the outermost container. Percentages compose multiplicatively
    /// through the nested containers on the way down.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn node_x_vals(&self, path: &[isize]) -> Result<(f64, f64), LayoutError> {
        let mut node = &self.root;
        let mut left = node.node.x;
        let mut width = node.node.width;
        for (i, &step) in path.iter().enumerate() {
            let idx = resolve_step(node.children.len(), step, i)?;
            node = &node.children[idx];
            left += node.node.x * width / 100.0;
            width = width * node.node.width / 100.0;
        }
        Ok((left, width))
    }

    /// Deepest path reachable from `path` by repeatedly taking the first
    /// daughter.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] when `path` itself is invalid.
    pub fn leftmost_path(&self, path: &[isize]) -> Result<Vec<isize>, LayoutError> {
        self.nmost_path(path, 0)
    }

    /// Deepest path reachable from `path` by repeatedly taking the last
    /// daughter.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] when `path` itself is invalid.
    pub fn rightmost_path(&self, path: &[isize]) -> Result<Vec<isize>, LayoutError> {
        self.nmost_path(path, -1)
    }

    fn nmost_path(&self, path: &[isize], n: isize) -> Result<Vec<isize>, LayoutError> {
        let mut out = path.to_vec();
        let mut node = self.layout_node_at(path)?;
        while out.len() < self.depth + 1 {
            let Ok(idx) = resolve_step(node.children.len(), n, out.len()) else {
                break;
            };
            node = &node.children[idx];
            out.push(n);
        }
        Ok(out)
    }

    /// Bounding box of the subtree rooted at `path`, as
    /// `(x%, y_em, width%, height_em)` relative to the outermost container.
    /// The height leaves room for descenders and annotations below the
    /// deepest leaf.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn subtree_bounds(&self, path: &[isize]) -> Result<(f64, f64, f64, f64), LayoutError> {
        let parent = self.layout_node_at(path)?;
        let deepest = deepest_leaf_depth(parent);
        let left_path = self.leftmost_path(path)?;
        let right_path = self.rightmost_path(path)?;
        let x = self.node_x_vals(&left_path)?.0;
        let (right_x, right_w) = self.node_x_vals(&right_path)?;
        let width = right_x + right_w - x;
        let y = self.y_distance(0, parent.node.depth);
        let height = self.y_distance(parent.node.depth, deepest)
            + self.level_heights[deepest]
            + DESCENDER_MARGIN
            + ANNOTATION_MARGIN;
        Ok((x, y, width, height))
    }

    /// [`subtree_bounds`] converted to user units (px of the output canvas).
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    ///
    /// [`subtree_bounds`]: TreeLayout::subtree_bounds
    pub fn subtree_bounds_user(&self, path: &[isize]) -> Result<(f64, f64, f64, f64), LayoutError> {
        let (x, y, width, height) = self.subtree_bounds(path)?;
        let tree_width = self.width_px();
        Ok((
            x * tree_width / 100.0,
            self.options.em_to_px(y),
            width * tree_width / 100.0,
            self.options.em_to_px(height),
        ))
    }

    /// Depth of the deepest leaf in the span of leaves delimited by two
    /// paths, including the leaves under each path. The span is taken under
    /// the deepest common parent, so it may cross constituent boundaries.
    pub(crate) fn deepest_intervening_leaf(
        &self,
        path1: &[isize],
        path2: &[isize],
    ) -> Result<usize, LayoutError> {
        let branch_path = common_prefix(path1, path2);
        let branch = self.layout_node_at(branch_path)?;
        let sub1 = self.layout_node_at(path1)?;
        let sub2 = self.layout_node_at(path2)?;
        let start1 = leaves_before(branch, &path1[branch_path.len()..], branch_path.len())?;
        let start2 = leaves_before(branch, &path2[branch_path.len()..], branch_path.len())?;
        let (left, right) = if start1 < start2 {
            (start1, start2 + leaf_count(sub2))
        } else {
            (start2, start1 + leaf_count(sub1))
        };
        let mut depths = Vec::new();
        collect_leaf_depths(branch, &mut depths);
        Ok(depths[left..right].iter().copied().max().unwrap_or(0))
    }

    // --- Style overrides -------------------------------------------------------

    /// Override the style of the edge addressed by `path` (the edge from the
    /// node's parent down to it). An empty path is a no-op, since there is
    /// no edge above the root. Takes effect at the next render; does not
    /// rerun layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] when the path or the final
    /// daughter index is invalid.
    pub fn set_edge_style(&mut self, path: &[isize], style: EdgeStyle) -> Result<(), LayoutError> {
        let Some((&daughter, parent_path)) = path.split_last() else {
            return Ok(());
        };
        let parent = self.layout_node_at_mut(parent_path)?;
        let len = parent.children.len() as isize;
        if len == 0 || daughter >= len {
            return Err(LayoutError::InvalidPath {
                depth: path.len() - 1,
                index: daughter,
            });
        }
        let idx = daughter.rem_euclid(len) as usize;
        parent.node.edge_styles.insert(idx, style);
        Ok(())
    }

    /// Remove every edge style override in the tree.
    pub fn clear_edge_styles(&mut self) {
        fn clear(node: &mut LayoutNode) {
            node.node.edge_styles.clear();
            for c in &mut node.children {
                clear(c);
            }
        }
        clear(&mut self.root);
    }

    /// Apply style overrides to the single node at `path` and rerun layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn set_node_style(
        &mut self,
        path: &[isize],
        style: &StyleOverrides,
    ) -> Result<(), LayoutError> {
        let node = self.layout_node_at_mut(path)?;
        style.apply(&mut node.node.options);
        self.relayout();
        Ok(())
    }

    /// Apply style overrides to every node in the subtree at `path`
    /// (inclusive) and rerun layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPath`] for an invalid path.
    pub fn set_subtree_style(
        &mut self,
        path: &[isize],
        style: &StyleOverrides,
    ) -> Result<(), LayoutError> {
        fn apply_all(node: &mut LayoutNode, style: &StyleOverrides) {
            style.apply(&mut node.node.options);
            for c in &mut node.children {
                apply_all(c, style);
            }
        }
        let node = self.layout_node_at_mut(path)?;
        apply_all(node, style);
        self.relayout();
        Ok(())
    }

    /// Apply style overrides to every leaf in the tree and rerun layout.
    pub fn set_leaf_style(&mut self, style: &StyleOverrides) {
        fn apply_leaves(node: &mut LayoutNode, style: &StyleOverrides) {
            if node.children.is_empty() {
                style.apply(&mut node.node.options);
            }
            for c in &mut node.children {
                apply_leaves(c, style);
            }
        }
        apply_leaves(&mut self.root, style);
        self.relayout();
    }
}

// ---------------------------------------------------------------------------
// Style overrides
// ---------------------------------------------------------------------------

/// The strict subset of options that may vary per node within one tree.
/// Spacing and alignment stay whole-tree; anything here can differ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    pub debug: Option<bool>,
    pub font: Option<FontSpec>,
    pub font_size: Option<f64>,
    pub text_color: Option<String>,
    pub text_stroke: Option<String>,
}

impl StyleOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_debug(mut self, v: bool) -> Self {
        self.debug = Some(v);
        self
    }

    #[must_use]
    pub fn with_font(mut self, v: FontSpec) -> Self {
        self.font = Some(v);
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, v: f64) -> Self {
        self.font_size = Some(v);
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, v: impl Into<String>) -> Self {
        self.text_color = Some(v.into());
        self
    }

    #[must_use]
    pub fn with_text_stroke(mut self, v: impl Into<String>) -> Self {
        self.text_stroke = Some(v.into());
        self
    }

    /// Write the overrides onto an options record, marking them explicit so
    /// they survive later relayouts and subtree merges.
    fn apply(&self, options: &mut LayoutOptions) {
        if let Some(v) = self.debug {
            options.debug = v;
            options.mark_explicit(OptMask::DEBUG);
        }
        if let Some(v) = &self.font {
            options.font = v.clone();
            options.mark_explicit(OptMask::FONT_STYLE);
        }
        if let Some(v) = self.font_size {
            options.font_size = v;
            options.mark_explicit(OptMask::FONT_SIZE);
        }
        if let Some(v) = &self.text_color {
            options.text_color = v.clone();
            options.mark_explicit(OptMask::TEXT_COLOR);
        }
        if let Some(v) = &self.text_stroke {
            options.text_stroke = v.clone();
            options.mark_explicit(OptMask::TEXT_STROKE);
        }
    }
}

// ---------------------------------------------------------------------------
// The three passes
// ---------------------------------------------------------------------------

fn compute(options: &LayoutOptions, tree: &TreeValue, old: Option<&LayoutNode>) -> Computed {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("tree_layout").entered();

    let depth = adapter::tree_depth(options, tree) - 1;
    let mut level_heights = vec![0.0; depth + 1];
    let mut root = build_initial(options, tree, old, 0, depth, &mut level_heights);

    let mut level_ys = vec![0.0; depth + 1];
    for i in 1..=depth {
        level_ys[i] = options.distance_to_daughter + level_heights[i - 1];
    }

    let max_width = root.node.width;
    root.node.width = 100.0;
    root.node.x = 0.0;
    normalize_widths(&mut root);
    normalize_y(options, &level_heights, &mut root);

    Computed {
        root,
        depth,
        level_heights,
        level_ys,
        max_width,
    }
}

/// Pass one: size nodes bottom-up in ems, record row heights, assign depths.
fn build_initial(
    tree_options: &LayoutOptions,
    t: &TreeValue,
    old: Option<&LayoutNode>,
    level: usize,
    depth: usize,
    level_heights: &mut [f64],
) -> LayoutNode {
    let (label, children) = adapter::split_in(tree_options, t);
    // node options survive relayout by coming from the previous layout
    let node_options = old.map_or_else(|| tree_options.clone(), |o| o.node.options.clone());

    // leaf alignment attributes a leaf's row height to the deepest level;
    // path addressing still sees the structural nesting
    let level = if children.is_empty() && tree_options.leaf_nodes_align {
        depth
    } else {
        level
    };

    let mut node = label.resolve(&node_options, level);
    // per-node font sizes scale the box into tree-level ems
    node.height = node.height * node.options.font_size / tree_options.font_size;
    level_heights[level] = level_heights[level].max(node.height);

    let built: Vec<LayoutNode> = children
        .iter()
        .enumerate()
        .map(|(i, c)| {
            build_initial(
                tree_options,
                c,
                old.and_then(|o| o.children.get(i)),
                level + 1,
                depth,
                level_heights,
            )
        })
        .collect();

    // parents never shrink below the footprint of their daughters
    node.width = (node.width * node.options.font_size / tree_options.font_size)
        .max(built.iter().map(|c| c.node.width).sum());

    LayoutNode {
        node,
        children: built,
    }
}

/// Pass two: convert em widths to percentage shares of the parent, per the
/// spacing policy. Recurses first so parent widths are still in ems when the
/// daughters are normalized.
fn normalize_widths(layout: &mut LayoutNode) {
    if layout.children.is_empty() {
        return;
    }
    for c in &mut layout.children {
        normalize_widths(c);
    }

    let mut widths = Vec::with_capacity(layout.children.len());
    let mut sub_sum = 0.0;
    let mut em_sum = 0.0;
    for c in &layout.children {
        let w = sublayout_width(c);
        sub_sum += w;
        em_sum += c.node.width;
        widths.push(w);
    }

    // a parent label wider than all daughters together sets the scale
    // that inner widths normalize against
    if em_sum < layout.node.inner_width {
        em_sum = layout.node.inner_width;
    }

    let mut x_pos = 0.0;
    for (c, w) in layout.children.iter_mut().zip(widths) {
        c.node.inner_width = c.node.inner_width * 100.0 / em_sum;
        c.node.width = w * 100.0 / sub_sum;
        c.node.x = x_pos;
        x_pos += c.node.width;
    }
}

/// A daughter subtree's share weight under its parent's spacing policy.
fn sublayout_width(t: &LayoutNode) -> f64 {
    match t.node.options.horiz_spacing {
        HorizSpacing::Text => t.node.width,
        HorizSpacing::Leaves => layout_leaf_nodecount(t, &t.node.options),
        HorizSpacing::Even => 1.0,
    }
}

fn layout_leaf_nodecount(node: &LayoutNode, options: &LayoutOptions) -> f64 {
    if node.children.is_empty() {
        1.0 + options.leaf_padding
    } else {
        node.children
            .iter()
            .map(|c| layout_leaf_nodecount(c, options))
            .sum()
    }
}

/// Pass three: vertical dodges from the alignment policy. `Full` alignment
/// stretches boxes to the whole row first.
fn normalize_y(options: &LayoutOptions, level_heights: &[f64], layout: &mut LayoutNode) {
    if options.vert_align == VertAlign::Full {
        layout.node.height = level_heights[layout.node.depth];
    }
    layout.node.y = dodge_for(
        options,
        level_heights,
        layout.node.depth,
        layout.node.height,
    )
    .0;
    for c in &mut layout.children {
        normalize_y(options, level_heights, c);
    }
}

fn dodge_for(
    options: &LayoutOptions,
    level_heights: &[f64],
    level: usize,
    height: f64,
) -> (f64, f64) {
    let row = level_heights[level];
    match options.vert_align {
        VertAlign::Top => (0.0, row - height),
        VertAlign::Bottom => (row - height, 0.0),
        VertAlign::Center => {
            let dodge = (row - height) / 2.0;
            (dodge, dodge)
        }
        VertAlign::Full => (0.0, 0.0),
    }
}

// ---------------------------------------------------------------------------
// Path and leaf helpers
// ---------------------------------------------------------------------------

/// Resolve one path step against a daughter count. Negative indices count
/// from the right, Python-style.
fn resolve_step(len: usize, index: isize, depth: usize) -> Result<usize, LayoutError> {
    let l = len as isize;
    if index >= l || index < -l {
        return Err(LayoutError::InvalidPath { depth, index });
    }
    Ok(index.rem_euclid(l) as usize)
}

fn deepest_leaf_depth(node: &LayoutNode) -> usize {
    if node.children.is_empty() {
        node.node.depth
    } else {
        node.children
            .iter()
            .map(deepest_leaf_depth)
            .max()
            .unwrap_or(node.node.depth)
    }
}

fn leaf_count(node: &LayoutNode) -> usize {
    if node.children.is_empty() {
        1
    } else {
        node.children.iter().map(leaf_count).sum()
    }
}

fn collect_leaf_depths(node: &LayoutNode, out: &mut Vec<usize>) {
    if node.children.is_empty() {
        out.push(node.node.depth);
    }
    for c in &node.children {
        collect_leaf_depths(c, out);
    }
}

/// Number of leaves strictly to the left of the subtree at `rel` under
/// `node`. `offset` is how deep `node` already sits, for error reporting.
fn leaves_before(node: &LayoutNode, rel: &[isize], offset: usize) -> Result<usize, LayoutError> {
    let Some((&step, rest)) = rel.split_first() else {
        return Ok(0);
    };
    let idx = resolve_step(node.children.len(), step, offset)?;
    let before: usize = node.children[..idx].iter().map(leaf_count).sum();
    Ok(before + leaves_before(&node.children[idx], rest, offset + 1)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_tree() -> TreeValue {
        TreeValue::branch(
            "S",
            vec![
                TreeValue::branch("NP", vec!["I".into()]),
                TreeValue::branch(
                    "VP",
                    vec![
                        TreeValue::branch("V", vec!["saw".into()]),
                        TreeValue::branch("NP", vec!["it".into()]),
                    ],
                ),
            ],
        )
    }

    fn assert_children_sum_to_100(node: &LayoutNode) {
        if node.children.is_empty() {
            return;
        }
        let sum: f64 = node.children.iter().map(|c| c.node.width).sum();
        assert!((sum - 100.0).abs() < 1e-9, "children sum to {sum}");
        for c in &node.children {
            assert_children_sum_to_100(c);
        }
    }

    #[test]
    fn root_is_pinned_to_full_width() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        assert_eq!(layout.root().node.width, 100.0);
        assert_eq!(layout.root().node.x, 0.0);
    }

    #[test]
    fn children_widths_conserve_100_in_every_mode() {
        for spacing in [HorizSpacing::Text, HorizSpacing::Even, HorizSpacing::Leaves] {
            let options = LayoutOptions::default().with_horiz_spacing(spacing);
            let layout = TreeLayout::new(scenario_tree(), options);
            assert_children_sum_to_100(layout.root());
        }
    }

    #[test]
    fn even_spacing_splits_siblings_equally() {
        let options = LayoutOptions::default().with_horiz_spacing(HorizSpacing::Even);
        let layout = TreeLayout::new(scenario_tree(), options);
        assert_eq!(layout.node_at(&[0]).unwrap().width, 50.0);
        assert_eq!(layout.node_at(&[1]).unwrap().width, 50.0);
        // VP's two daughters split VP's own scale evenly
        assert_eq!(layout.node_at(&[1, 0]).unwrap().width, 50.0);
        assert_eq!(layout.node_at(&[1, 1]).unwrap().width, 50.0);
    }

    #[test]
    fn text_spacing_shares_by_em_width() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        // NP subtree is 2em wide, VP subtree 4.5em
        let np = layout.node_at(&[0]).unwrap().width;
        let vp = layout.node_at(&[1]).unwrap().width;
        assert!((np - 2.0 * 100.0 / 6.5).abs() < 1e-9);
        assert!((vp - 4.5 * 100.0 / 6.5).abs() < 1e-9);
        assert_eq!(layout.node_at(&[1]).unwrap().x, np);
    }

    #[test]
    fn leaves_spacing_weights_by_leaf_count() {
        let tree = TreeValue::branch(
            "S",
            vec![
                TreeValue::branch("NP", vec!["the".into(), "dog".into()]),
                "barks".into(),
            ],
        );
        let options = LayoutOptions::default().with_horiz_spacing(HorizSpacing::Leaves);
        let layout = TreeLayout::new(tree, options);
        // 2 padded leaves (weight 6) vs 1 (weight 3)
        let np = layout.node_at(&[0]).unwrap().width;
        let barks = layout.node_at(&[1]).unwrap().width;
        assert!((np - 200.0 / 3.0).abs() < 1e-9);
        assert!((barks - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn single_leaf_layout() {
        let layout = TreeLayout::new("X", LayoutOptions::default());
        assert_eq!(layout.depth(), 0);
        assert_eq!(layout.root().node.width, 100.0);
        assert!(layout.root().children.is_empty());
        assert_eq!(layout.em_height(), 1.5);
    }

    #[test]
    fn level_metrics_for_scenario_tree() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        assert_eq!(layout.depth(), 3);
        assert_eq!(layout.level_heights, vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(layout.level_ys, vec![0.0, 3.0, 3.0, 3.0]);
        assert_eq!(layout.em_height(), 10.5);
        assert_eq!(layout.em_width(), 6.5);
        assert_eq!(layout.width_px(), 104.0);
    }

    #[test]
    fn depth_is_monotone_without_leaf_alignment() {
        fn check(node: &LayoutNode) {
            for c in &node.children {
                assert_eq!(c.node.depth, node.node.depth + 1);
                check(c);
            }
        }
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        check(layout.root());
    }

    #[test]
    fn leaf_alignment_moves_row_attribution_to_deepest_level() {
        let tree = TreeValue::branch(
            "S",
            vec![
                TreeValue::branch("NP", vec![TreeValue::branch("N", vec!["cats".into()])]),
                "sleep".into(),
            ],
        );
        let options = LayoutOptions::default().with_leaf_nodes_align(true);
        let layout = TreeLayout::new(tree, options);
        // the shallow leaf sits on the deepest row
        assert_eq!(layout.node_at(&[1]).unwrap().depth, 3);
        // internal nodes keep their structural depth
        assert_eq!(layout.node_at(&[0]).unwrap().depth, 1);
        assert_eq!(layout.node_at(&[0, 0, 0]).unwrap().depth, 3);
    }

    #[test]
    fn wide_parent_label_scales_inner_widths() {
        let tree = TreeValue::branch("VeryLongLabel", vec!["a".into(), "b".into()]);
        let layout = TreeLayout::new(tree, LayoutOptions::default());
        // children together are 3em, parent label 7.5em; inner widths
        // normalize against the parent's em width
        let child = layout.node_at(&[0]).unwrap();
        assert_eq!(child.width, 50.0);
        assert!((child.inner_width - 1.5 * 100.0 / 7.5).abs() < 1e-9);
    }

    #[test]
    fn layout_is_deterministic() {
        let a = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        let b = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        fn assert_same(x: &LayoutNode, y: &LayoutNode) {
            assert_eq!(x.node.width, y.node.width);
            assert_eq!(x.node.x, y.node.x);
            assert_eq!(x.node.y, y.node.y);
            assert_eq!(x.children.len(), y.children.len());
            for (cx, cy) in x.children.iter().zip(&y.children) {
                assert_same(cx, cy);
            }
        }
        assert_same(a.root(), b.root());
    }

    #[test]
    fn negative_path_steps_count_from_the_right() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        let vp = layout.node_at(&[-1]).unwrap();
        assert_eq!(vp.depth, 1);
        assert_eq!(
            layout.node_at(&[1]).unwrap().width,
            layout.node_at(&[-1]).unwrap().width
        );
        assert_eq!(
            layout.node_at(&[-1, -2]).unwrap().x,
            layout.node_at(&[1, 0]).unwrap().x
        );
    }

    #[test]
    fn invalid_path_reports_failing_step() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        let err = layout.node_at(&[1, 5]).unwrap_err();
        assert_eq!(err, LayoutError::InvalidPath { depth: 1, index: 5 });
        let err = layout.subtree_bounds(&[5]).unwrap_err();
        assert_eq!(err, LayoutError::InvalidPath { depth: 0, index: 5 });
    }

    #[test]
    fn node_x_vals_compose_multiplicatively() {
        let options = LayoutOptions::default().with_horiz_spacing(HorizSpacing::Even);
        let layout = TreeLayout::new(scenario_tree(), options);
        // VP occupies [50, 100]; its second daughter the right half of that
        let (x, width) = layout.node_x_vals(&[1, 1]).unwrap();
        assert_eq!(x, 75.0);
        assert_eq!(width, 25.0);
    }

    #[test]
    fn leftmost_and_rightmost_paths_descend_to_leaves() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        assert_eq!(layout.leftmost_path(&[]).unwrap(), vec![0, 0]);
        assert_eq!(layout.rightmost_path(&[]).unwrap(), vec![-1, -1, -1]);
        assert_eq!(layout.leftmost_path(&[1]).unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn subtree_bounds_cover_the_whole_subtree() {
        let options = LayoutOptions::default().with_horiz_spacing(HorizSpacing::Even);
        let layout = TreeLayout::new(scenario_tree(), options);
        let (x, y, width, height) = layout.subtree_bounds(&[1]).unwrap();
        // leftmost leaf container under VP starts at the VP boundary
        assert_eq!(x, 50.0);
        assert_eq!(y, 3.0);
        // from VP's row down to the deepest leaf row, plus margins
        assert_eq!(height, 6.0 + 1.0 + 0.5);
        // spans to the right edge of the rightmost leaf container
        assert!((width - 50.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_alignment_dodges() {
        let tree = TreeValue::branch("S", vec!["x".into(), "a\nb\nc".into()]);
        for (align, expect_top) in [
            (VertAlign::Top, 0.0),
            (VertAlign::Center, 1.0),
            (VertAlign::Bottom, 2.0),
        ] {
            let options = LayoutOptions::default().with_vert_align(align);
            let layout = TreeLayout::new(tree.clone(), options);
            // the single-row leaf dodges within the 3em row
            assert_eq!(layout.node_at(&[0]).unwrap().y, expect_top);
            assert_eq!(layout.node_at(&[1]).unwrap().y, 0.0);
        }
    }

    #[test]
    fn full_alignment_stretches_boxes_to_row_height() {
        let tree = TreeValue::branch("S", vec!["x".into(), "a\nb\nc".into()]);
        let options = LayoutOptions::default().with_vert_align(VertAlign::Full);
        let layout = TreeLayout::new(tree, options);
        assert_eq!(layout.node_at(&[0]).unwrap().height, 3.0);
        assert_eq!(layout.node_at(&[0]).unwrap().y, 0.0);
    }

    #[test]
    fn node_style_override_rescales_its_row() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout
            .set_node_style(&[0], &StyleOverrides::new().with_font_size(32.0))
            .unwrap();
        // 1em at 32px is 2 tree-level ems
        assert_eq!(layout.node_at(&[0]).unwrap().height, 2.0);
        assert_eq!(layout.level_heights[1], 2.0);
        assert_eq!(layout.level_ys[2], 4.0);
        // the sibling keeps the tree options
        assert_eq!(layout.node_at(&[1]).unwrap().options.font_size, 16.0);
    }

    #[test]
    fn subtree_style_applies_to_all_descendants() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout
            .set_subtree_style(&[1], &StyleOverrides::new().with_text_color("red"))
            .unwrap();
        assert_eq!(layout.node_at(&[1]).unwrap().options.text_color, "red");
        assert_eq!(layout.node_at(&[1, 0, 0]).unwrap().options.text_color, "red");
        assert_eq!(layout.node_at(&[0]).unwrap().options.text_color, "");
    }

    #[test]
    fn leaf_style_applies_to_leaves_only() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout.set_leaf_style(&StyleOverrides::new().with_text_color("blue"));
        assert_eq!(layout.node_at(&[0, 0]).unwrap().options.text_color, "blue");
        assert_eq!(layout.node_at(&[0]).unwrap().options.text_color, "");
    }

    #[test]
    fn style_overrides_survive_later_relayouts() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout
            .set_node_style(&[0], &StyleOverrides::new().with_font_size(32.0))
            .unwrap();
        layout.relayout();
        assert_eq!(layout.node_at(&[0]).unwrap().options.font_size, 32.0);
        assert_eq!(layout.node_at(&[0]).unwrap().height, 2.0);
    }

    #[test]
    fn edge_style_is_stored_on_the_parent() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout.set_edge_style(&[1, 0], EdgeStyle::triangle()).unwrap();
        let vp = layout.node_at(&[1]).unwrap();
        assert!(vp.edge_styles.contains_key(&0));
        // negative daughter indices wrap
        layout.set_edge_style(&[1, -1], EdgeStyle::empty()).unwrap();
        assert!(layout.node_at(&[1]).unwrap().edge_styles.contains_key(&1));
        // the root has no incoming edge
        assert!(layout.set_edge_style(&[], EdgeStyle::triangle()).is_ok());
        // out-of-range daughters fail
        let err = layout
            .set_edge_style(&[1, 2], EdgeStyle::triangle())
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidPath { depth: 1, index: 2 });
    }

    #[test]
    fn clear_edge_styles_removes_all_overrides() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout.set_edge_style(&[0], EdgeStyle::triangle()).unwrap();
        layout.set_edge_style(&[1, 1], EdgeStyle::empty()).unwrap();
        layout.clear_edge_styles();
        assert!(layout.node_at(&[]).unwrap().edge_styles.is_empty());
        assert!(layout.node_at(&[1]).unwrap().edge_styles.is_empty());
    }

    #[test]
    fn reset_drops_node_overrides() {
        let mut layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        layout
            .set_node_style(&[0], &StyleOverrides::new().with_font_size(32.0))
            .unwrap();
        let fresh = layout.reset(LayoutOptions::default());
        assert_eq!(fresh.node_at(&[0]).unwrap().options.font_size, 16.0);
    }

    #[test]
    fn deepest_intervening_leaf_spans_between_paths() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        // between NP and VP's second daughter: crosses "saw" at depth 3
        assert_eq!(layout.deepest_intervening_leaf(&[0], &[1, 1]).unwrap(), 3);
        // a single shallow leaf
        assert_eq!(layout.deepest_intervening_leaf(&[0, 0], &[0, 0]).unwrap(), 2);
    }

    #[test]
    fn y_distance_sums_level_offsets() {
        let layout = TreeLayout::new(scenario_tree(), LayoutOptions::default());
        assert_eq!(layout.y_distance(0, 1), 3.0);
        assert_eq!(layout.y_distance(0, 3), 9.0);
        assert_eq!(layout.y_distance(1, 1), 0.0);
        // clamped to the tree depth
        assert_eq!(layout.y_distance(0, 99), 9.0);
    }
}
