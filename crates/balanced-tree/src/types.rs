//! Node trait definitions.
//!
//! Nodes never hold pointers to each other. Every link is an `Option<u32>`
//! index into the `Vec`-backed arena owned by the tree, so the parent
//! back-reference does not form an ownership cycle and dropping the arena
//! tears the whole tree down.

/// Structural links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Value-carrying node interface used by ordered lookups.
pub trait ValueNode<T>: Node {
    fn value(&self) -> &T;
}

/// AVL-specific node behavior.
pub trait AvlNodeLike: Node {
    fn bf(&self) -> i32;
    fn set_bf(&mut self, bf: i32);
}

#[derive(Clone, Debug)]
pub struct AvlNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub v: T,
    /// Balance factor, `height(left) - height(right)`.
    pub bf: i32,
}

impl<T> AvlNode<T> {
    pub fn new(v: T) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            v,
            bf: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.l.is_none() && self.r.is_none()
    }
}

impl<T> Node for AvlNode<T> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<T> ValueNode<T> for AvlNode<T> {
    fn value(&self) -> &T {
        &self.v
    }
}

impl<T> AvlNodeLike for AvlNode<T> {
    fn bf(&self) -> i32 {
        self.bf
    }

    fn set_bf(&mut self, bf: i32) {
        self.bf = bf;
    }
}
