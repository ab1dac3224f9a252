//! Link accessors and in-order walkers over an arena of [`Node`]s.

use crate::types::Node;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Points whichever child link of `p` held `old` at `new`.
///
/// With no parent there is nothing to relink; the caller owns the root.
#[inline]
pub(crate) fn replace_child<N: Node>(arena: &mut [N], p: Option<u32>, old: u32, new: Option<u32>) {
    if let Some(p) = p {
        if get_l(arena, p) == Some(old) {
            set_l(arena, p, new);
        } else {
            set_r(arena, p, new);
        }
    }
}

/// Leftmost node.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        return last(arena, Some(l));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AvlNode;

    //     1
    //    / \
    //   0   3
    //      /
    //     2
    fn sample() -> Vec<AvlNode<i32>> {
        let mut arena: Vec<AvlNode<i32>> = (0..4).map(AvlNode::new).collect();
        arena[1].l = Some(0);
        arena[1].r = Some(3);
        arena[0].p = Some(1);
        arena[3].p = Some(1);
        arena[3].l = Some(2);
        arena[2].p = Some(3);
        arena
    }

    #[test]
    fn walks_in_order_both_ways() {
        let arena = sample();
        let mut forward = Vec::new();
        let mut curr = first(&arena, Some(1));
        while let Some(i) = curr {
            forward.push(arena[i as usize].v);
            curr = next(&arena, i);
        }
        assert_eq!(forward, vec![0, 1, 2, 3]);

        let mut backward = Vec::new();
        let mut curr = last(&arena, Some(1));
        while let Some(i) = curr {
            backward.push(arena[i as usize].v);
            curr = prev(&arena, i);
        }
        assert_eq!(backward, vec![3, 2, 1, 0]);
    }

    #[test]
    fn first_and_last_of_empty_tree() {
        let arena: Vec<AvlNode<i32>> = Vec::new();
        assert_eq!(first(&arena, None), None);
        assert_eq!(last(&arena, None), None);
    }

    #[test]
    fn replace_child_picks_the_matching_side() {
        let mut arena = sample();
        replace_child(&mut arena, Some(1), 3, None);
        assert_eq!(arena[1].r, None);
        assert_eq!(arena[1].l, Some(0));
        replace_child(&mut arena, Some(1), 0, Some(2));
        assert_eq!(arena[1].l, Some(2));
    }
}
