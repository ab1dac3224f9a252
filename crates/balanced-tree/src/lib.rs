//! Height-balanced (AVL) ordered set.
//!
//! [`BalancedTree`] stores values in a binary search tree ordered by a
//! three-way comparator and keeps every node's balance factor,
//! `height(left) - height(right)`, within `-1..=1`. Factors are maintained
//! incrementally: insertion and deletion walk up the parent links from the
//! point of change, adjust factors, and rotate where a factor reaches ±2.
//!
//! Instead of raw pointers, all links are `Option<u32>` indices into a
//! `Vec`-backed arena owned by the tree.
//!
//! ```
//! use balanced_tree::BalancedTree;
//!
//! let mut tree = BalancedTree::new();
//! for v in [1, 2, 3] {
//!     tree.insert(v);
//! }
//! assert!(tree.contains(&2));
//! assert_eq!(tree.delete(&1), Some(1));
//! assert_eq!(tree.to_vec(), vec![2, 3]);
//! assert!(tree.verify_balance().is_empty());
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`], [`AvlNodeLike`] traits and the [`AvlNode`] arena slot |
//! [`util`] | link accessors, `first` / `last` / `next` / `prev` walkers |
//! [`rotate`] | rotations and the left/right balance steps |
//! [`tree`] | [`BalancedTree`]: lookup, insertion and deletion retraces |
//! [`verify`] | height recomputation, balance report, invariant checks |
//! [`print`] | tree-dump rendering |

pub mod error;
pub mod print;
pub mod rotate;
pub mod tree;
pub mod types;
pub mod util;
pub mod verify;

pub use error::TreeError;
pub use rotate::{left_balance, right_balance, rotate_left, rotate_right};
pub use tree::{BalancedTree, Iter, MAX_NODES};
pub use types::{AvlNode, AvlNodeLike, Node, ValueNode};
pub use util::{first, last, next, prev};
pub use verify::{assert_avl_tree, verify_balance, BalanceMismatch};
