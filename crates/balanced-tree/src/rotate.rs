//! Rotation primitives and the composite left/right balance steps.
//!
//! Balance factors are updated algebraically from the pre-rotation factors;
//! subtree heights are never re-walked here.

use log::trace;

use crate::types::AvlNodeLike;
use crate::util::{get_l, get_p, get_r, replace_child, set_l, set_p, set_r};

#[inline]
fn bf<N: AvlNodeLike>(arena: &[N], i: u32) -> i32 {
    arena[i as usize].bf()
}

#[inline]
fn set_bf<N: AvlNodeLike>(arena: &mut [N], i: u32, v: i32) {
    arena[i as usize].set_bf(v);
}

/// Promotes `nr`, the right child of `n`, into the position of `n`.
///
/// `n` becomes the left child of `nr` and inherits the former left subtree
/// of `nr` as its right subtree. Returns `nr`, the new subtree root.
pub fn rotate_left<N: AvlNodeLike>(arena: &mut [N], n: u32, nr: u32) -> u32 {
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    set_p(arena, nr, p);
    replace_child(arena, p, n, Some(nr));
    set_p(arena, n, Some(nr));
    set_l(arena, nr, Some(n));

    let mut nbf = bf(arena, n) + 1;
    let mut nrbf = bf(arena, nr);
    if nrbf < 0 {
        nbf -= nrbf;
    }
    nrbf += 1;
    if nbf > 0 {
        nrbf += nbf;
    }
    set_bf(arena, n, nbf);
    set_bf(arena, nr, nrbf);

    trace!("rotate left at node {n}, promoted {nr} (bf {nbf}/{nrbf})");
    nr
}

/// Mirror of [`rotate_left`]: promotes `nl`, the left child of `n`.
pub fn rotate_right<N: AvlNodeLike>(arena: &mut [N], n: u32, nl: u32) -> u32 {
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    set_p(arena, nl, p);
    replace_child(arena, p, n, Some(nl));
    set_p(arena, n, Some(nl));
    set_r(arena, nl, Some(n));

    let mut nbf = bf(arena, n) - 1;
    let mut nlbf = bf(arena, nl);
    if nlbf > 0 {
        nbf -= nlbf;
    }
    nlbf -= 1;
    if nbf < 0 {
        nlbf += nbf;
    }
    set_bf(arena, n, nbf);
    set_bf(arena, nl, nlbf);

    trace!("rotate right at node {n}, promoted {nl} (bf {nbf}/{nlbf})");
    nl
}

/// Restores a left-heavy node (`bf == 2`). Returns the new subtree root.
///
/// A right-heavy left child is first rotated left so the final single
/// rotation handles the left-right case too.
pub fn left_balance<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let Some(nl) = get_l(arena, n) else {
        return n;
    };
    if bf(arena, nl) == -1 {
        if let Some(nlr) = get_r(arena, nl) {
            rotate_left(arena, nl, nlr);
        }
    }
    match get_l(arena, n) {
        Some(nl) => rotate_right(arena, n, nl),
        None => n,
    }
}

/// Restores a right-heavy node (`bf == -2`). Mirror of [`left_balance`].
pub fn right_balance<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let Some(nr) = get_r(arena, n) else {
        return n;
    };
    if bf(arena, nr) == 1 {
        if let Some(nrl) = get_l(arena, nr) {
            rotate_right(arena, nr, nrl);
        }
    }
    match get_r(arena, n) {
        Some(nr) => rotate_left(arena, n, nr),
        None => n,
    }
}
