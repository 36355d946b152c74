//! The render walk: turn a [`TreeLayout`] into an SVG document.
//!
//! Raw SVG has no relative positioning, so the walk leans on two tricks.
//! Every subtree gets its own nested `<svg>` container and positions its
//! node label at 50% of that container, which makes x layout compositional.
//! All y positioning is done in ems (converted to px at the tree font size
//! unless `relative_units` is set), since text sizes cannot be measured
//! ahead of time when generating SVG.

use lingtree_svg::{Document, Element, Length};

use crate::edge::{EdgeKind, EdgeStyle};
use crate::layout::{LayoutNode, TreeLayout};
use crate::node::{DESCENDER_MARGIN, LabelBlock, NodeBox};

impl TreeLayout {
    /// Render the laid-out tree, its edges, and any recorded annotations.
    ///
    /// The canvas is sized from the em dimensions at the tree font size;
    /// the root carries the label style so em units inside resolve
    /// against it.
    #[must_use]
    pub fn render(&self) -> Document {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tree_render").entered();

        let width = self.width_px();
        let height = self.height_px();
        let mut doc = Document::new(Length::Px(width), Length::Px(height));
        doc.set_viewbox(width, height);
        doc.set_style(self.root.node.options.style_str());

        if self.options.debug {
            self.push_debug_grid(&mut doc);
        }

        self.add_subtree(doc.body_mut(), &self.root);

        for a in &self.annotations {
            doc.push(a.clone());
        }
        doc
    }

    /// Shorthand for `render().to_svg_string()`.
    #[must_use]
    pub fn svg_string(&self) -> String {
        self.render().to_svg_string()
    }

    fn add_subtree(&self, svg_parent: &mut Element, t: &LayoutNode) {
        svg_parent.push(self.label_svg(&t.node));
        for (i, c) in t.children.iter().enumerate() {
            let edge = self.select_edge(&t.node, c, i);

            let box_y = match edge.kind {
                // an invisible node occupies the gap instead of the row offset
                EdgeKind::Empty { distance: Some(d) } => d + t.node.y + t.node.height,
                _ => self.y_distance(t.node.depth, c.node.depth),
            };

            let mut child = Element::group(
                Length::Percent(c.node.x),
                self.options.em_length(box_y),
                Length::Percent(c.node.width),
                None,
            );
            let style = c.node.options.style_str();
            if style != t.node.options.style_str() {
                child.set_attr("style", style);
            }

            if t.node.options.debug || c.node.options.debug {
                child.push(
                    Element::rect(
                        Length::Percent(0.0),
                        Length::Percent(0.0),
                        Length::Percent(100.0),
                        Length::Percent(100.0),
                    )
                    .attr("fill", "none")
                    .attr("stroke", "red"),
                );
            }

            self.add_subtree(&mut child, c);
            svg_parent.push(child);

            edge.draw(svg_parent, self, &t.node, &c.node);
        }
    }

    /// Pick the edge for daughter `i`: an explicit override wins, then leaf
    /// suppression, then the tree's descent mode.
    fn select_edge(&self, parent: &NodeBox, child: &LayoutNode, i: usize) -> EdgeStyle {
        if let Some(style) = parent.edge_styles.get(&i) {
            return style.clone();
        }
        if !self.options.leaf_edges && child.children.is_empty() {
            // under multi-level descent (leaf alignment), place the leaf row
            // immediately below the prior level
            let skipped = self.y_distance(parent.depth, child.node.depth.saturating_sub(1));
            return EdgeStyle::empty_at(skipped);
        }
        if parent.options.descend_direct {
            EdgeStyle::direct()
        } else {
            EdgeStyle::indirect()
        }
    }

    /// The node's own label container: rows (or a subscript pair) centered
    /// at 50% of the subtree container. The container's y offset is in
    /// tree-level units so per-node font sizes do not shift the row.
    fn label_svg(&self, node: &NodeBox) -> Element {
        let mut label = Element::group(
            Length::Raw(0.0),
            self.options.em_length(node.y),
            Length::Percent(100.0),
            None,
        );
        match &node.label {
            LabelBlock::Rows(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    let mut text = Element::text(
                        row,
                        Length::Percent(50.0),
                        node.options.em_length(i as f64 + 1.0),
                    )
                    .attr("text-anchor", "middle");
                    apply_text_paint(&mut text, node);
                    label.push(text);
                }
            }
            LabelBlock::Subscript { text, sub, scale } => {
                let mut holder = Element::text(
                    "",
                    Length::Percent(50.0),
                    node.options.em_length(1.0),
                )
                .attr("text-anchor", "middle");
                apply_text_paint(&mut holder, node);
                holder.push(Element::tspan(text));
                let mut sub_span = Element::tspan(sub);
                sub_span.set_attr(
                    "dy",
                    node.options.em_length(DESCENDER_MARGIN).to_string(),
                );
                sub_span.set_attr("style", node.options.font_size_style(*scale));
                holder.push(sub_span);
                label.push(holder);
            }
        }
        label
    }

    /// A light-gray frame and 1-em grid over the whole canvas.
    fn push_debug_grid(&self, doc: &mut Document) {
        doc.push(
            Element::rect(
                Length::Raw(0.0),
                Length::Raw(0.0),
                Length::Percent(100.0),
                Length::Percent(100.0),
            )
            .attr("fill", "none")
            .attr("stroke", "lightgray"),
        );
        for i in 1..self.em_width() as usize {
            doc.push(
                Element::line(
                    self.options.em_length(i as f64),
                    Length::Raw(0.0),
                    self.options.em_length(i as f64),
                    Length::Percent(100.0),
                )
                .attr("stroke", "lightgray"),
            );
        }
        for i in 1..self.em_height() as usize {
            doc.push(
                Element::line(
                    Length::Raw(0.0),
                    self.options.em_length(i as f64),
                    Length::Percent(100.0),
                    self.options.em_length(i as f64),
                )
                .attr("stroke", "lightgray"),
            );
        }
    }
}

fn apply_text_paint(text: &mut Element, node: &NodeBox) {
    if !node.options.text_color.is_empty() {
        text.set_attr("fill", node.options.text_color.clone());
    }
    if !node.options.text_stroke.is_empty() {
        text.set_attr("stroke", node.options.text_stroke.clone());
    }
}
