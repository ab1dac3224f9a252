//! Diagnostic passes that recompute subtree heights from scratch.
//!
//! Everything here is O(n) and is never invoked from the insert/delete path.

use std::cmp::Ordering;

use log::warn;

use crate::error::TreeError;
use crate::types::{AvlNodeLike, ValueNode};
use crate::util::{first, get_l, get_r, next};

/// A node whose stored balance factor disagrees with its recomputed heights.
#[derive(Debug, PartialEq, Eq)]
pub struct BalanceMismatch<'a, T> {
    pub index: u32,
    pub value: &'a T,
    pub stored: i32,
    pub left_height: usize,
    pub right_height: usize,
}

impl<T> BalanceMismatch<'_, T> {
    /// The factor the node should carry, `left_height - right_height`.
    pub fn expected(&self) -> i32 {
        self.left_height as i32 - self.right_height as i32
    }
}

/// Height of the subtree rooted at `node`; an absent subtree has height 0.
pub fn height<N: AvlNodeLike>(arena: &[N], node: Option<u32>) -> usize {
    match node {
        None => 0,
        Some(i) => 1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i))),
    }
}

/// Recomputes every subtree height and reports each node whose stored
/// factor differs. Mismatches are logged at `warn` level and returned; the
/// tree is not modified.
pub fn verify_balance<'a, T, N>(arena: &'a [N], root: Option<u32>) -> Vec<BalanceMismatch<'a, T>>
where
    N: AvlNodeLike + ValueNode<T>,
{
    fn walk<'a, T, N>(
        arena: &'a [N],
        node: Option<u32>,
        out: &mut Vec<BalanceMismatch<'a, T>>,
    ) -> usize
    where
        N: AvlNodeLike + ValueNode<T>,
    {
        let Some(i) = node else {
            return 0;
        };
        let n = &arena[i as usize];
        let left_height = walk(arena, n.l(), out);
        let right_height = walk(arena, n.r(), out);
        let mismatch = BalanceMismatch {
            index: i,
            value: n.value(),
            stored: n.bf(),
            left_height,
            right_height,
        };
        if mismatch.stored != mismatch.expected() {
            warn!(
                "unmatched balance factor at node {i}: left height {left_height}, right height {right_height}, expected {}, stored {}",
                mismatch.expected(),
                mismatch.stored
            );
            out.push(mismatch);
        }
        1 + left_height.max(right_height)
    }

    let mut out = Vec::new();
    walk(arena, root, &mut out);
    out
}

/// Checks every structural invariant: root has no parent, parent links are
/// consistent, stored factors match recomputed heights and stay within
/// `-1..=1`, and the in-order walk is strictly ascending.
///
/// Returns the number of reachable nodes.
pub fn assert_avl_tree<T, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<usize, TreeError>
where
    N: AvlNodeLike + ValueNode<T>,
    C: Fn(&T, &T) -> Ordering,
{
    let Some(root) = root else {
        return Ok(0);
    };

    if arena[root as usize].p().is_some() {
        return Err(TreeError::Invariant("root has parent".to_string()));
    }

    fn validate_links_and_bf<N: AvlNodeLike>(arena: &[N], node: u32) -> Result<usize, TreeError> {
        let l = get_l(arena, node);
        let r = get_r(arena, node);

        let mut lh = 0;
        if let Some(l) = l {
            if arena[l as usize].p() != Some(node) {
                return Err(TreeError::Invariant(format!(
                    "broken parent link on left child of node {node}"
                )));
            }
            lh = validate_links_and_bf(arena, l)?;
        }
        let mut rh = 0;
        if let Some(r) = r {
            if arena[r as usize].p() != Some(node) {
                return Err(TreeError::Invariant(format!(
                    "broken parent link on right child of node {node}"
                )));
            }
            rh = validate_links_and_bf(arena, r)?;
        }

        let expected_bf = lh as i32 - rh as i32;
        let actual_bf = arena[node as usize].bf();
        if actual_bf != expected_bf {
            return Err(TreeError::Invariant(format!(
                "balance factor mismatch at node {node}: expected {expected_bf}, got {actual_bf}"
            )));
        }
        if !(-1..=1).contains(&actual_bf) {
            return Err(TreeError::Invariant(format!(
                "AVL balance violated at node {node}: bf {actual_bf}"
            )));
        }

        Ok(1 + lh.max(rh))
    }

    validate_links_and_bf(arena, root)?;

    let mut count = 0;
    let mut curr = first(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            let cmp = comparator(arena[prev as usize].value(), arena[i as usize].value());
            if cmp != Ordering::Less {
                return Err(TreeError::Invariant(format!(
                    "node order violated between nodes {prev} and {i}"
                )));
            }
        }
        count += 1;
        prev_node = Some(i);
        curr = next(arena, i);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AvlNode;

    fn natural(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    //     2
    //    / \
    //   1   3
    fn triangle() -> Vec<AvlNode<i32>> {
        let mut arena: Vec<AvlNode<i32>> = [2, 1, 3].into_iter().map(AvlNode::new).collect();
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[1].p = Some(0);
        arena[2].p = Some(0);
        arena
    }

    #[test]
    fn valid_tree_passes_every_check() {
        let arena = triangle();
        assert_eq!(height(&arena, Some(0)), 2);
        assert!(verify_balance(&arena, Some(0)).is_empty());
        assert_eq!(assert_avl_tree(&arena, Some(0), &natural).unwrap(), 3);
    }

    #[test]
    fn mismatch_is_reported_not_fatal() {
        let mut arena = triangle();
        arena[0].bf = 1;
        let report = verify_balance(&arena, Some(0));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].index, 0);
        assert_eq!(*report[0].value, 2);
        assert_eq!(report[0].stored, 1);
        assert_eq!(report[0].expected(), 0);
        assert!(assert_avl_tree(&arena, Some(0), &natural).is_err());
    }

    #[test]
    fn broken_parent_link_is_detected() {
        let mut arena = triangle();
        arena[2].p = None;
        let err = assert_avl_tree(&arena, Some(0), &natural).unwrap_err();
        assert!(err.to_string().contains("broken parent link"));
    }

    #[test]
    fn order_violation_is_detected() {
        let mut arena = triangle();
        arena[1].v = 5;
        let err = assert_avl_tree(&arena, Some(0), &natural).unwrap_err();
        assert!(err.to_string().contains("order violated"));
    }

    #[test]
    fn empty_tree_is_valid() {
        let arena: Vec<AvlNode<i32>> = Vec::new();
        assert_eq!(height(&arena, None), 0);
        assert!(verify_balance::<i32, _>(&arena, None).is_empty());
        assert_eq!(assert_avl_tree(&arena, None, &natural).unwrap(), 0);
    }
}
