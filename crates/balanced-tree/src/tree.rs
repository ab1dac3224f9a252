use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use log::{debug, trace};

use crate::error::TreeError;
use crate::print::print_subtree;
use crate::rotate::{left_balance, right_balance};
use crate::types::AvlNode;
use crate::util::{first, get_l, get_p, get_r, last, next, replace_child, set_l, set_p, set_r};
use crate::verify::{self, BalanceMismatch};

/// Nodes are addressed by `u32`, so one index is left unused as headroom.
pub const MAX_NODES: usize = u32::MAX as usize;

fn natural_order<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// Where a value sits, or would sit, in the tree.
enum Slot {
    Occupied(u32),
    /// Parent to attach under and the side the descent ended on; `None`
    /// for an empty tree.
    Vacant(Option<(u32, Ordering)>),
}

/// Ordered set backed by an AVL tree.
///
/// Nodes live in a dense arena and link to each other by index, including a
/// parent back-link used by the upward rebalancing walks. Every ordering
/// decision goes through the comparator given at construction.
///
/// Values are moved into the tree and never cloned. To keep caller-managed
/// lifetimes, store handles (`&'a V`, `Rc<V>`, ids) as `T`.
#[derive(Clone)]
pub struct BalancedTree<T, C = fn(&T, &T) -> Ordering>
where
    C: Fn(&T, &T) -> Ordering,
{
    root: Option<u32>,
    comparator: C,
    arena: Vec<AvlNode<T>>,
}

impl<T> BalancedTree<T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    /// Empty tree ordered by `T`'s own `Ord`.
    pub fn new() -> Self {
        Self::with_comparator(natural_order::<T>)
    }
}

impl<T> Default for BalancedTree<T, fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> BalancedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Empty tree ordered by `comparator`, which must be a total order that
    /// stays consistent for the tree's lifetime.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            comparator,
            arena: Vec::new(),
        }
    }

    /// Like [`with_comparator`](Self::with_comparator), with node storage
    /// for `capacity` values allocated up front.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            root: None,
            comparator,
            arena: Vec::with_capacity(capacity.min(MAX_NODES)),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        (self.comparator)(a, b)
    }

    fn locate(&self, value: &T) -> Slot {
        let Some(mut curr) = self.root else {
            return Slot::Vacant(None);
        };
        loop {
            let ord = self.cmp(value, &self.arena[curr as usize].v);
            let next = match ord {
                Ordering::Equal => return Slot::Occupied(curr),
                Ordering::Less => get_l(&self.arena, curr),
                Ordering::Greater => get_r(&self.arena, curr),
            };
            match next {
                Some(next) => curr = next,
                None => return Slot::Vacant(Some((curr, ord))),
            }
        }
    }

    fn find(&self, value: &T) -> Option<u32> {
        match self.locate(value) {
            Slot::Occupied(i) => Some(i),
            Slot::Vacant(_) => None,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// The stored value comparing equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).map(|i| &self.arena[i as usize].v)
    }

    /// Value stored at the root.
    pub fn root(&self) -> Option<&T> {
        self.root.map(|i| &self.arena[i as usize].v)
    }

    pub fn first(&self) -> Option<&T> {
        first(&self.arena, self.root).map(|i| &self.arena[i as usize].v)
    }

    pub fn last(&self) -> Option<&T> {
        last(&self.arena, self.root).map(|i| &self.arena[i as usize].v)
    }

    /// Inserts `value` unless an equal value is already present.
    ///
    /// Returns whether the value was added. A duplicate is dropped and the
    /// tree is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if node storage cannot grow, like [`Vec::push`]. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    pub fn insert(&mut self, value: T) -> bool {
        let Slot::Vacant(at) = self.locate(&value) else {
            return false;
        };
        assert!(
            self.arena.len() < MAX_NODES,
            "balanced tree node capacity exceeded"
        );
        let n = self.push_node(value);
        self.attach(n, at);
        true
    }

    /// Fallible [`insert`](Self::insert): node storage is reserved before
    /// any link changes, so on error the tree is exactly as it was.
    pub fn try_insert(&mut self, value: T) -> Result<bool, TreeError> {
        let Slot::Vacant(at) = self.locate(&value) else {
            return Ok(false);
        };
        if self.arena.len() >= MAX_NODES {
            return Err(TreeError::CapacityExceeded { limit: MAX_NODES });
        }
        self.arena.try_reserve(1)?;
        let n = self.push_node(value);
        self.attach(n, at);
        Ok(true)
    }

    fn push_node(&mut self, value: T) -> u32 {
        let n = self.arena.len() as u32;
        self.arena.push(AvlNode::new(value));
        n
    }

    fn attach(&mut self, n: u32, at: Option<(u32, Ordering)>) {
        let Some((p, ord)) = at else {
            self.root = Some(n);
            return;
        };
        set_p(&mut self.arena, n, Some(p));
        if ord == Ordering::Less {
            set_l(&mut self.arena, p, Some(n));
        } else {
            set_r(&mut self.arena, p, Some(n));
        }
        self.retrace_insert(p, n);
    }

    /// Walks up from the new node's parent, stopping as soon as a subtree
    /// height stops growing. At most one rebalance is needed.
    fn retrace_insert(&mut self, parent: u32, n: u32) {
        let mut curr = Some(parent);
        while let Some(p) = curr {
            let landed_right =
                self.cmp(&self.arena[p as usize].v, &self.arena[n as usize].v) == Ordering::Less;
            let bf = {
                let node = &mut self.arena[p as usize];
                node.bf += if landed_right { -1 } else { 1 };
                node.bf
            };

            match bf {
                0 => return,
                -2 | 2 => {
                    trace!("insert rebalance at node {p} (bf {bf})");
                    let sub = if bf < 0 {
                        right_balance(&mut self.arena, p)
                    } else {
                        left_balance(&mut self.arena, p)
                    };
                    if self.root == Some(p) {
                        self.root = Some(sub);
                    }
                    return;
                }
                _ => curr = get_p(&self.arena, p),
            }
        }
    }

    /// Removes the value comparing equal to `value` and returns it.
    /// An absent value leaves the tree untouched.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let n = self.find(value)?;
        Some(self.remove_node(n))
    }

    /// Removes and returns the smallest value.
    pub fn pop_first(&mut self) -> Option<T> {
        let n = first(&self.arena, self.root)?;
        Some(self.remove_node(n))
    }

    /// Removes and returns the largest value.
    pub fn pop_last(&mut self) -> Option<T> {
        let n = last(&self.arena, self.root)?;
        Some(self.remove_node(n))
    }

    fn remove_node(&mut self, n: u32) -> T {
        let leaf = self.sink_to_leaf(n);
        debug_assert!(self.arena[leaf as usize].is_leaf());
        self.retrace_delete(leaf);
        let p = get_p(&self.arena, leaf);
        replace_child(&mut self.arena, p, leaf, None);
        if p.is_none() {
            self.root = None;
        }
        self.release(leaf)
    }

    /// Moves the value held by `n` down to a leaf by repeatedly exchanging it
    /// with the maximum of the left subtree (or, with no left subtree, the
    /// minimum of the right one). Values stay in order everywhere except at
    /// the returned leaf, which is the node to physically remove.
    fn sink_to_leaf(&mut self, mut n: u32) -> u32 {
        if let Some(mut max) = get_l(&self.arena, n) {
            loop {
                while let Some(r) = get_r(&self.arena, max) {
                    max = r;
                }
                self.swap_values(n, max);
                match get_l(&self.arena, max) {
                    Some(l) => {
                        n = max;
                        max = l;
                    }
                    None => return max,
                }
            }
        }
        if let Some(mut min) = get_r(&self.arena, n) {
            loop {
                while let Some(l) = get_l(&self.arena, min) {
                    min = l;
                }
                self.swap_values(n, min);
                match get_r(&self.arena, min) {
                    Some(r) => {
                        n = min;
                        min = r;
                    }
                    None => return min,
                }
            }
        }
        n
    }

    fn swap_values(&mut self, a: u32, b: u32) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.arena.split_at_mut(hi as usize);
        std::mem::swap(&mut head[lo as usize].v, &mut tail[0].v);
    }

    /// Walks up from the leaf about to be unlinked. Unlike insertion, a
    /// rotation can shorten the subtree, so the walk continues above it until
    /// some factor lands on ±1.
    fn retrace_delete(&mut self, leaf: u32) {
        let mut child = leaf;
        let mut curr = get_p(&self.arena, leaf);
        while let Some(p) = curr {
            let from_left = get_l(&self.arena, p) == Some(child);
            let bf = {
                let node = &mut self.arena[p as usize];
                node.bf += if from_left { -1 } else { 1 };
                node.bf
            };

            let mut top = p;
            if bf == -2 || bf == 2 {
                trace!("delete rebalance at node {p} (bf {bf})");
                top = if bf < 0 {
                    right_balance(&mut self.arena, p)
                } else {
                    left_balance(&mut self.arena, p)
                };
                if self.root == Some(p) {
                    self.root = Some(top);
                }
            }

            if self.arena[top as usize].bf != 0 {
                return;
            }
            child = top;
            curr = get_p(&self.arena, top);
        }
    }

    /// Drops the unlinked node `n` from the arena. The last node is moved into
    /// the freed index and its links are repointed.
    fn release(&mut self, n: u32) -> T {
        let moved = (self.arena.len() - 1) as u32;
        let removed = self.arena.swap_remove(n as usize);
        if moved != n {
            let p = get_p(&self.arena, n);
            match p {
                Some(_) => replace_child(&mut self.arena, p, moved, Some(n)),
                None => self.root = Some(n),
            }
            if let Some(l) = get_l(&self.arena, n) {
                set_p(&mut self.arena, l, Some(n));
            }
            if let Some(r) = get_r(&self.arena, n) {
                set_p(&mut self.arena, r, Some(n));
            }
        }
        removed.v
    }

    /// Removes every value, keeping the comparator and the arena allocation.
    pub fn clear(&mut self) {
        debug!("clearing balanced tree ({} nodes)", self.arena.len());
        self.arena.clear();
        self.root = None;
    }

    /// Releases every node. The tree is consumed; build a new one to store
    /// values again.
    pub fn destroy(self) {
        debug!("destroying balanced tree ({} nodes)", self.arena.len());
    }

    /// Height of the tree, 0 when empty.
    ///
    /// Follows the taller child at each level using the stored factors, so
    /// this is O(log n).
    pub fn height(&self) -> usize {
        let mut h = 0;
        let mut curr = self.root;
        while let Some(i) = curr {
            h += 1;
            let node = &self.arena[i as usize];
            curr = if node.bf >= 0 { node.l } else { node.r };
        }
        h
    }

    /// In-order walk, smallest value first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            next: first(&self.arena, self.root),
            remaining: self.arena.len(),
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Recomputes subtree heights and reports every node whose stored
    /// balance factor disagrees. Mismatches are also logged; nothing fails.
    pub fn verify_balance(&self) -> Vec<BalanceMismatch<'_, T>> {
        verify::verify_balance(&self.arena, self.root)
    }

    /// Whether every node's recomputed height difference is within ±1.
    pub fn is_balanced(&self) -> bool {
        fn walk<T>(arena: &[AvlNode<T>], node: Option<u32>) -> Option<usize> {
            let Some(i) = node else {
                return Some(0);
            };
            let lh = walk(arena, get_l(arena, i))?;
            let rh = walk(arena, get_r(arena, i))?;
            (lh.abs_diff(rh) <= 1).then_some(1 + lh.max(rh))
        }
        walk(&self.arena, self.root).is_some()
    }

    /// Full structural check: parent links, balance factors, ordering, and
    /// that every stored node is reachable from the root.
    pub fn assert_valid(&self) -> Result<(), TreeError> {
        let reachable = verify::assert_avl_tree(&self.arena, self.root, &self.comparator)?;
        if reachable != self.arena.len() {
            return Err(TreeError::Invariant(format!(
                "{} nodes stored but {reachable} reachable from root",
                self.arena.len()
            )));
        }
        Ok(())
    }

    /// Renders the tree with each value formatted by `fmt_value`.
    pub fn print_with(&self, fmt_value: impl Fn(&T) -> String) -> String {
        print_subtree(&self.arena, self.root, "", &fmt_value)
    }
}

impl<T: fmt::Display, C> fmt::Display for BalancedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print_with(|v| v.to_string()))
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BalancedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for BalancedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C> Extend<T> for BalancedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a BalancedTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator returned by [`BalancedTree::iter`].
pub struct Iter<'a, T> {
    arena: &'a [AvlNode<T>],
    next: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next?;
        self.next = next(self.arena, i);
        self.remaining -= 1;
        Some(&self.arena[i as usize].v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
