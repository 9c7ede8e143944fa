use std::collections::HashMap;

use crate::simplify::{assign, simplify};
use crate::{CheckRef, Expr};

/// Index of a [`DecisionNode`] inside a [`DecisionTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A branch target: one of the two constants or a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeRef {
    False,
    True,
    Node(NodeId),
}

impl From<bool> for TreeRef {
    fn from(b: bool) -> Self {
        if b { TreeRef::True } else { TreeRef::False }
    }
}

/// Tests one check and continues on the matching branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNode {
    pub check: CheckRef,
    pub on_false: TreeRef,
    pub on_true: TreeRef,
}

/// A reduced, maximally shared decision diagram.
///
/// Nodes live in an arena and are interned by `(check, on_false, on_true)`,
/// so two structurally identical subtrees are always the same [`NodeId`].
/// Every node in the arena is reachable from the root.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<DecisionNode>,
    root: TreeRef,
}

impl DecisionTree {
    #[must_use]
    pub fn root(&self) -> TreeRef {
        self.root
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DecisionNode {
        match self.nodes.get(id.0) {
            Some(node) => node,
            None => panic!("node {} is not part of this decision tree", id.0),
        }
    }

    /// Number of distinct decision nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DecisionNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The constant the whole tree reduces to, if any.
    #[must_use]
    pub fn as_const(&self) -> Option<bool> {
        match self.root {
            TreeRef::True => Some(true),
            TreeRef::False => Some(false),
            TreeRef::Node(_) => None,
        }
    }

    /// Follow the branches chosen by `assignment` down to a leaf.
    pub fn evaluate(&self, assignment: &impl Fn(&CheckRef) -> bool) -> bool {
        let mut current = self.root;
        loop {
            match current {
                TreeRef::True => return true,
                TreeRef::False => return false,
                TreeRef::Node(id) => {
                    let node = self.node(id);
                    current = if assignment(&node.check) {
                        node.on_true
                    } else {
                        node.on_false
                    };
                }
            }
        }
    }

    /// Number of branches that end in the `true` leaf, counting a constant
    /// `true` root as one.
    #[must_use]
    pub fn true_leaves(&self) -> usize {
        let branches = self
            .nodes
            .iter()
            .flat_map(|n| [n.on_false, n.on_true])
            .filter(|r| *r == TreeRef::True)
            .count();
        branches + usize::from(self.root == TreeRef::True)
    }
}

/// Build the decision tree of `expr`.
///
/// The formula is simplified first. At each level the smallest remaining check
/// in the canonical order is tested; both cofactors are built recursively and
/// memoized by formula, and the resulting node is interned. A node whose two
/// branches coincide is replaced by that branch. Depth is bounded by the
/// number of distinct checks.
#[must_use]
pub fn build(expr: &Expr) -> DecisionTree {
    let mut builder = Builder::default();
    let root = builder.build_ref(simplify(expr));
    tracing::debug!(
        checks = expr.checks().len(),
        nodes = builder.nodes.len(),
        memoized = builder.memo.len(),
        "built decision tree"
    );
    DecisionTree {
        nodes: builder.nodes,
        root,
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<DecisionNode>,
    interned: HashMap<(CheckRef, TreeRef, TreeRef), NodeId>,
    memo: HashMap<Expr, TreeRef>,
}

impl Builder {
    fn build_ref(&mut self, formula: Expr) -> TreeRef {
        if let Some(b) = formula.as_const() {
            return b.into();
        }
        if let Some(&cached) = self.memo.get(&formula) {
            return cached;
        }

        let Some(check) = formula.checks().into_iter().next().cloned() else {
            unreachable!("simplified formula {formula} is neither constant nor has checks");
        };

        let on_false = self.build_ref(assign(&formula, &check, false));
        let on_true = self.build_ref(assign(&formula, &check, true));

        let result = if on_false == on_true {
            on_false
        } else {
            self.intern(check, on_false, on_true)
        };
        self.memo.insert(formula, result);
        result
    }

    fn intern(&mut self, check: CheckRef, on_false: TreeRef, on_true: TreeRef) -> TreeRef {
        let key = (check, on_false, on_true);
        if let Some(&id) = self.interned.get(&key) {
            return TreeRef::Node(id);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(DecisionNode {
            check: key.0.clone(),
            on_false,
            on_true,
        });
        self.interned.insert(key, id);
        TreeRef::Node(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check;

    fn leaf(kind: &str) -> Expr {
        Expr::Check(check(kind))
    }

    fn all_assignments(checks: &[&str]) -> Vec<Vec<String>> {
        (0..1_u32 << checks.len())
            .map(|mask| {
                checks
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, c)| (*c).to_owned())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn constants_build_leaf_roots() {
        assert_eq!(build(&Expr::Const(true)).root(), TreeRef::True);
        assert_eq!(build(&Expr::Const(false)).root(), TreeRef::False);
        assert!(build(&Expr::Const(false)).is_empty());
    }

    #[test]
    fn single_check() {
        let tree = build(&leaf("a"));
        assert_eq!(tree.len(), 1);
        let TreeRef::Node(id) = tree.root() else {
            panic!("expected a decision node");
        };
        let node = tree.node(id);
        assert_eq!(node.check, check("a"));
        assert_eq!(node.on_false, TreeRef::False);
        assert_eq!(node.on_true, TreeRef::True);
    }

    #[test]
    fn tree_agrees_with_expression() {
        let expr = leaf("a").and(leaf("b")).or(!leaf("c").and(leaf("d")));
        let tree = build(&expr);
        for truthy in all_assignments(&["a", "b", "c", "d"]) {
            let assignment = |c: &CheckRef| truthy.iter().any(|t| t == c.kind());
            assert_eq!(
                tree.evaluate(&assignment),
                expr.evaluate(&assignment),
                "mismatch for {truthy:?}"
            );
        }
    }

    #[test]
    fn shared_subtree_is_one_node() {
        // (a AND c) OR (NOT a AND b AND c): the `c` test is reached from both
        // branches of `a` and must be a single arena entry.
        let expr = leaf("a").and(leaf("c")).or((!leaf("a")).and(leaf("b")).and(leaf("c")));
        let tree = build(&expr);
        let c_nodes: Vec<NodeId> = tree
            .nodes()
            .filter(|(_, n)| n.check == check("c"))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(c_nodes.len(), 1);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn redundant_test_is_reduced() {
        // (a AND b) OR (NOT a AND b) only depends on b.
        let expr = leaf("a").and(leaf("b")).or((!leaf("a")).and(leaf("b")));
        let tree = build(&expr);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes().next().map(|(_, n)| n.check.clone()), Some(check("b")));
    }

    #[test]
    fn equivalent_formulas_build_identical_trees() {
        let left = build(&leaf("b").or(leaf("a")));
        let right = build(&leaf("a").or(leaf("b")));
        assert_eq!(left.root(), right.root());
        assert_eq!(left.nodes, right.nodes);
    }

    #[test]
    fn true_leaves_counts_branches() {
        let tree = build(&leaf("a").or(leaf("b")));
        // a ? true : (b ? true : false)
        assert_eq!(tree.true_leaves(), 2);
        assert_eq!(build(&Expr::Const(true)).true_leaves(), 1);
        assert_eq!(build(&Expr::Const(false)).true_leaves(), 0);
    }

    #[test]
    fn depth_is_bounded_by_checks() {
        let expr = Expr::any((0..10).map(|i| leaf(&format!("c{i}"))));
        let tree = build(&expr);
        assert_eq!(tree.len(), 10);
    }
}
