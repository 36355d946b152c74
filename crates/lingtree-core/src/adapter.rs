//! Tree values and the structural split that turns arbitrary tree shapes
//! into a label plus daughters.
//!
//! Trees are lisp-style: a sequence whose head is the node label and whose
//! tail is the daughter subtrees. [`split`] canonicalizes any [`TreeValue`]
//! into that form; [`split_in`] consults a custom adapter first, so callers
//! can feed in their own tree shapes without converting up front.

use std::borrow::Cow;
use std::fmt;

use crate::node::NodeSpec;
use crate::options::LayoutOptions;

// ---------------------------------------------------------------------------
// TreeValue
// ---------------------------------------------------------------------------

/// A tree in lisp style.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    /// A bare node with no daughters.
    Leaf(NodeSpec),
    /// A sequence whose head is the label and whose tail is the daughters.
    /// An empty sequence is an empty-labeled leaf.
    Seq(Vec<TreeValue>),
    /// An explicit label/daughter split, the canonical form.
    Branch {
        label: NodeSpec,
        children: Vec<TreeValue>,
    },
}

impl TreeValue {
    #[must_use]
    pub fn leaf(label: impl Into<NodeSpec>) -> Self {
        Self::Leaf(label.into())
    }

    #[must_use]
    pub fn branch(label: impl Into<NodeSpec>, children: Vec<TreeValue>) -> Self {
        Self::Branch {
            label: label.into(),
            children,
        }
    }

    #[must_use]
    pub fn seq(items: Vec<TreeValue>) -> Self {
        Self::Seq(items)
    }
}

impl From<&str> for TreeValue {
    fn from(s: &str) -> Self {
        Self::Leaf(NodeSpec::from(s))
    }
}

impl From<String> for TreeValue {
    fn from(s: String) -> Self {
        Self::Leaf(NodeSpec::from(s))
    }
}

impl From<NodeSpec> for TreeValue {
    fn from(spec: NodeSpec) -> Self {
        Self::Leaf(spec)
    }
}

impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(spec) => f.write_str(&spec.display_text()),
            Self::Branch { label, children } => {
                write!(f, "({}", label.display_text())?;
                for c in children {
                    write!(f, " {c}")?;
                }
                f.write_str(")")
            }
            Self::Seq(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split a tree into its label and daughters using the built-in rules.
///
/// A structured value in head position is flattened to its textual form;
/// labels are normally strings or node descriptors.
#[must_use]
pub fn split(t: &TreeValue) -> (NodeSpec, Cow<'_, [TreeValue]>) {
    match t {
        TreeValue::Leaf(spec) => (spec.clone(), Cow::Borrowed(&[][..])),
        TreeValue::Branch { label, children } => {
            (label.clone(), Cow::Borrowed(children.as_slice()))
        }
        TreeValue::Seq(items) => match items.split_first() {
            None => (NodeSpec::from(""), Cow::Borrowed(&[][..])),
            Some((head, rest)) => (label_of(head), Cow::Borrowed(rest)),
        },
    }
}

fn label_of(head: &TreeValue) -> NodeSpec {
    match head {
        TreeValue::Leaf(spec) => spec.clone(),
        other => NodeSpec::from(other.to_string()),
    }
}

/// Split a tree, trying the custom adapter from `options` first. An adapter
/// returning `None` falls back to the built-in split.
#[must_use]
pub fn split_in<'a>(options: &LayoutOptions, t: &'a TreeValue) -> (NodeSpec, Cow<'a, [TreeValue]>) {
    if let Some(adapter) = &options.adapter {
        if let Some((label, children)) = adapter(t) {
            return (label, Cow::Owned(children));
        }
    }
    split(t)
}

/// True when `t` has no daughters.
#[must_use]
pub fn is_leaf(options: &LayoutOptions, t: &TreeValue) -> bool {
    split_in(options, t).1.is_empty()
}

/// Maximum depth of `t`. A bare leaf has depth 1.
#[must_use]
pub fn tree_depth(options: &LayoutOptions, t: &TreeValue) -> usize {
    let (_, children) = split_in(options, t);
    1 + children
        .iter()
        .map(|c| tree_depth(options, c))
        .max()
        .unwrap_or(0)
}

/// How many node units wide are the leaves of `t`, padding included.
#[must_use]
pub fn leaf_nodecount(options: &LayoutOptions, t: &TreeValue) -> f64 {
    let (_, children) = split_in(options, t);
    if children.is_empty() {
        1.0 + options.leaf_padding
    } else {
        children.iter().map(|c| leaf_nodecount(options, c)).sum()
    }
}

/// Labels of the leaves of `t`, left to right.
#[must_use]
pub fn leaf_labels(options: &LayoutOptions, t: &TreeValue) -> Vec<NodeSpec> {
    fn walk(options: &LayoutOptions, t: &TreeValue, out: &mut Vec<NodeSpec>) {
        let (label, children) = split_in(options, t);
        if children.is_empty() {
            out.push(label);
        } else {
            for c in children.iter() {
                walk(options, c, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(options, t, &mut out);
    out
}

/// Longest shared prefix of two tree paths: the path to the deepest common
/// parent.
#[must_use]
pub fn common_prefix<'a>(path1: &'a [isize], path2: &[isize]) -> &'a [isize] {
    let n = path1.len().min(path2.len());
    for i in 0..n {
        if path1[i] != path2[i] {
            return &path1[..i];
        }
    }
    &path1[..n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    #[test]
    fn leaf_splits_to_label_and_no_daughters() {
        let t = TreeValue::from("NP");
        let (label, children) = split(&t);
        assert_eq!(label.display_text(), "NP");
        assert!(children.is_empty());
    }

    #[test]
    fn seq_head_becomes_label() {
        let t = TreeValue::seq(vec!["S".into(), "NP".into(), "VP".into()]);
        let (label, children) = split(&t);
        assert_eq!(label.display_text(), "S");
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn empty_seq_is_empty_leaf() {
        let t = TreeValue::seq(vec![]);
        let (label, children) = split(&t);
        assert_eq!(label.display_text(), "");
        assert!(children.is_empty());
    }

    #[test]
    fn nested_seq_splits_and_measures_depth() {
        let t = TreeValue::seq(vec![
            "S".into(),
            TreeValue::seq(vec!["NP".into(), "the".into(), "dog".into()]),
            TreeValue::seq(vec!["VP".into(), "barks".into()]),
        ]);
        let (label, children) = split(&t);
        assert_eq!(label.display_text(), "S");
        assert_eq!(children.len(), 2);
        assert_eq!(tree_depth(&opts(), &t), 3);
    }

    #[test]
    fn structured_head_is_stringified() {
        let head = TreeValue::branch("NP", vec!["I".into()]);
        let t = TreeValue::seq(vec![head, "VP".into()]);
        let (label, _) = split(&t);
        assert_eq!(label.display_text(), "(NP I)");
    }

    #[test]
    fn adapter_takes_precedence_over_builtin() {
        let options = opts().with_adapter(Arc::new(|t: &TreeValue| {
            if let TreeValue::Leaf(spec) = t {
                if spec.display_text() == "X" {
                    return Some((NodeSpec::from("expanded"), vec!["a".into(), "b".into()]));
                }
            }
            None
        }));
        let x = TreeValue::from("X");
        let (label, children) = split_in(&options, &x);
        assert_eq!(label.display_text(), "expanded");
        assert_eq!(children.len(), 2);
        // adapter declines: fall back to the builtin split
        let y = TreeValue::from("Y");
        let (label, children) = split_in(&options, &y);
        assert_eq!(label.display_text(), "Y");
        assert!(children.is_empty());
    }

    #[test]
    fn depth_counts_levels() {
        let o = opts();
        assert_eq!(tree_depth(&o, &TreeValue::from("D")), 1);
        let t = TreeValue::branch(
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
        );
        assert_eq!(tree_depth(&o, &t), 3);
    }

    #[test]
    fn leaf_nodecount_adds_padding_per_leaf() {
        let o = opts();
        assert_eq!(leaf_nodecount(&o, &TreeValue::from("I")), 3.0);
        let t = TreeValue::branch("NP", vec!["the".into(), "cat".into()]);
        assert_eq!(leaf_nodecount(&o, &t), 6.0);
    }

    #[test]
    fn leaf_labels_come_out_left_to_right() {
        let o = opts();
        let t = TreeValue::branch(
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
        );
        let labels: Vec<String> = leaf_labels(&o, &t)
            .iter()
            .map(NodeSpec::display_text)
            .collect();
        assert_eq!(labels, ["I", "saw", "it"]);
    }

    #[test]
    fn common_prefix_finds_deepest_shared_parent() {
        assert_eq!(common_prefix(&[0, 1, 2], &[0, 1, 3]), &[0, 1][..]);
        assert_eq!(common_prefix(&[0, 1], &[0, 1, 3]), &[0, 1][..]);
        assert_eq!(common_prefix(&[1], &[0, 1]), &[][..]);
    }

    #[test]
    fn display_round_trips_bracket_shape() {
        let t = TreeValue::branch(
            "S",
            vec![TreeValue::branch("NP", vec!["I".into()]), "VP".into()],
        );
        assert_eq!(t.to_string(), "(S (NP I) VP)");
    }
}
