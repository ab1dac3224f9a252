//! Tree-dump style rendering used by `Display` and debugging helpers.

use crate::types::{AvlNodeLike, ValueNode};

/// Renders one child line given the indentation it should continue with.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Joins rendered children under `tab` with box-drawing branches.
///
/// Trailing absent children are dropped; an absent child in the middle is
/// skipped without a branch.
pub fn print_tree(tab: &str, children: &[Option<&PrintChild<'_>>]) -> String {
    let mut out = String::new();

    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child_opt) in children.iter().enumerate().take(last + 1) {
        let Some(child_fn) = *child_opt else {
            continue;
        };

        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let child = child_fn(&child_tab);
        let branch = if child.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !child.is_empty() {
            out.push(' ');
            out.push_str(&child);
        }
    }

    out
}

/// Renders the subtree at `node` as `value [bf]` lines, left child first.
/// A missing child next to a present one is shown as `∅`.
pub fn print_subtree<T, N>(
    arena: &[N],
    node: Option<u32>,
    tab: &str,
    fmt_value: &dyn Fn(&T) -> String,
) -> String
where
    N: AvlNodeLike + ValueNode<T>,
{
    let Some(i) = node else {
        return "∅".to_string();
    };
    let n = &arena[i as usize];
    let head = format!("{} [{}]", fmt_value(n.value()), n.bf());
    let (l, r) = (n.l(), n.r());
    if l.is_none() && r.is_none() {
        return head;
    }

    let left: &PrintChild<'_> = &|tab: &str| print_subtree(arena, l, tab, fmt_value);
    let right: &PrintChild<'_> = &|tab: &str| print_subtree(arena, r, tab, fmt_value);
    head + &print_tree(tab, &[Some(left), Some(right)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_tree_skips_trailing_absent_children() {
        let a: &PrintChild<'_> = &|_: &str| "a".to_string();
        let b: &PrintChild<'_> = &|_: &str| "b".to_string();
        assert_eq!(print_tree("", &[Some(a), Some(b), None]), "\n├─ a\n└─ b");
        assert_eq!(print_tree("", &[None, None]), "");
    }

    #[test]
    fn print_tree_indents_nested_children() {
        let y: &PrintChild<'_> = &|_: &str| "y".to_string();
        let x: &PrintChild<'_> = &|tab: &str| format!("x{}", print_tree(tab, &[Some(y)]));
        let z: &PrintChild<'_> = &|_: &str| "z".to_string();
        assert_eq!(print_tree("", &[Some(x), Some(z)]), "\n├─ x\n│  └─ y\n└─ z");
    }
}
