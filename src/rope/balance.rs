//! AVL bookkeeping for the rope tree.
//!
//! Balance is measured in heights only. The char weights that drive
//! positional descent are carried through rotations separately.

use super::node::{Branch, Node};

/// Height of an optional subtree; absent subtrees and leaves are both 0.
pub(crate) fn height(node: Option<&Node>) -> usize {
    node.map_or(0, Node::height)
}

pub(crate) fn balance_factor(node: &Node) -> isize {
    match node {
        Node::Leaf(_) => 0,
        Node::Branch(branch) => branch.balance_factor(),
    }
}

impl Branch {
    pub(crate) fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }

    /// Lifts the left child into this position. A leaf left child cannot be
    /// lifted and leaves the branch unchanged.
    pub(crate) fn rotate_right(self) -> Branch {
        let Branch {
            left,
            right,
            weight,
            ..
        } = self;

        match left.into_branch() {
            Ok(pivot) => {
                let lowered = Branch::with_weight(pivot.right, right, weight - pivot.weight);
                Branch::with_weight(pivot.left, lowered.into_node(), pivot.weight)
            }
            Err(leaf) => Branch::with_weight(leaf.into_node(), right, weight),
        }
    }

    /// Lifts the right child into this position.
    pub(crate) fn rotate_left(self) -> Branch {
        let Branch {
            left,
            right,
            weight,
            ..
        } = self;

        match right.into_branch() {
            Ok(pivot) => {
                let raised_weight = weight + pivot.weight;
                let lowered = Branch::with_weight(left, pivot.left, weight);
                Branch::with_weight(lowered.into_node(), pivot.right, raised_weight)
            }
            Err(leaf) => Branch::with_weight(left, leaf.into_node(), weight),
        }
    }
}

fn rotate_node_left(node: Box<Node>) -> Box<Node> {
    match node.into_branch() {
        Ok(branch) => branch.rotate_left().into_node(),
        Err(leaf) => leaf.into_node(),
    }
}

fn rotate_node_right(node: Box<Node>) -> Box<Node> {
    match node.into_branch() {
        Ok(branch) => branch.rotate_right().into_node(),
        Err(leaf) => leaf.into_node(),
    }
}

/// Restores `|balance_factor| <= 1` at `branch`, assuming both children are
/// balanced and differ in height by at most two.
pub(crate) fn rebalance(mut branch: Branch) -> Branch {
    let factor = branch.balance_factor();

    if factor > 1 {
        if balance_factor(&branch.left) < 0 {
            branch.left = rotate_node_left(branch.left);
            branch.fix_height();
        }
        branch.rotate_right()
    } else if factor < -1 {
        if balance_factor(&branch.right) > 0 {
            branch.right = rotate_node_right(branch.right);
            branch.fix_height();
        }
        branch.rotate_left()
    } else {
        branch
    }
}

/// Concatenates two balanced subtrees whose heights may differ arbitrarily.
///
/// The shorter tree is hung off the taller tree's inner spine at the first
/// subtree within one level of its height, and every level above is
/// rebalanced on the way back up. Two leaves that fit in `max_leaf` chars
/// together are coalesced into one.
pub(crate) fn join(left: Box<Node>, right: Box<Node>, max_leaf: usize) -> Box<Node> {
    let (left_height, right_height) = (left.height(), right.height());

    if left_height > right_height + 1 {
        return match left.into_branch() {
            Ok(mut branch) => {
                branch.right = join(branch.right, right, max_leaf);
                branch.fix_height();
                rebalance(branch).into_node()
            }
            Err(leaf) => pair(leaf.into_node(), right, max_leaf),
        };
    }

    if right_height > left_height + 1 {
        return match right.into_branch() {
            Ok(mut branch) => {
                branch.weight += left.len();
                branch.left = join(left, branch.left, max_leaf);
                branch.fix_height();
                rebalance(branch).into_node()
            }
            Err(leaf) => pair(left, leaf.into_node(), max_leaf),
        };
    }

    pair(left, right, max_leaf)
}

fn pair(left: Box<Node>, right: Box<Node>, max_leaf: usize) -> Box<Node> {
    match (*left, *right) {
        (Node::Leaf(mut head), Node::Leaf(tail)) if head.chars + tail.chars <= max_leaf => {
            head.append(tail);
            head.into_node()
        }
        (left, right) => Branch::new(Box::new(left), Box::new(right)).into_node(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::node::Leaf;

    fn leaf(text: &str) -> Box<Node> {
        Leaf::new(text.to_string()).into_node()
    }

    fn branch(left: Box<Node>, right: Box<Node>) -> Box<Node> {
        Branch::new(left, right).into_node()
    }

    fn text(node: &Node) -> String {
        match node {
            Node::Leaf(leaf) => leaf.text.clone(),
            Node::Branch(branch) => text(&branch.left) + &text(&branch.right),
        }
    }

    fn assert_balanced(node: &Node) {
        if let Node::Branch(branch) = node {
            assert!(
                branch.balance_factor().abs() <= 1,
                "unbalanced at {:?}",
                text(node)
            );
            assert_eq!(branch.weight, branch.left.len());
            let expected = 1 + branch.left.height().max(branch.right.height());
            assert_eq!(branch.height, expected);
            assert_balanced(&branch.left);
            assert_balanced(&branch.right);
        }
    }

    #[test]
    fn height_of_absent_and_leaf() {
        assert_eq!(height(None), 0);
        assert_eq!(height(Some(&*leaf("abc"))), 0);
        assert_eq!(height(Some(&*branch(leaf("a"), leaf("b")))), 1);
    }

    #[test]
    fn rotate_right_moves_weight_with_subtrees() {
        // ((a, b), c) -> (a, (b, c))
        let root = branch(branch(leaf("aa"), leaf("bbb")), leaf("c"));
        let Ok(root) = root.into_branch() else {
            panic!("expected branch");
        };
        let rotated = root.rotate_right();

        assert_eq!(rotated.weight, 2);
        assert_eq!(rotated.height, 2);
        assert_eq!(rotated.right.len(), 4);
        assert_eq!(text(&rotated.into_node()), "aabbbc");
    }

    #[test]
    fn rotate_left_moves_weight_with_subtrees() {
        // (a, (b, c)) -> ((a, b), c)
        let root = branch(leaf("a"), branch(leaf("bb"), leaf("ccc")));
        let Ok(root) = root.into_branch() else {
            panic!("expected branch");
        };
        let rotated = root.rotate_left();

        assert_eq!(rotated.weight, 3);
        assert_eq!(rotated.height, 2);
        assert_eq!(text(&rotated.into_node()), "abbccc");
    }

    #[test]
    fn rebalance_left_right_case() {
        // ((a, (b, c)), d) leans left with an inner-heavy left child.
        let left = branch(leaf("a"), branch(leaf("b"), leaf("c")));
        let Ok(root) = branch(left, leaf("d")).into_branch() else {
            panic!("expected branch");
        };
        assert_eq!(root.balance_factor(), 2);

        let balanced = rebalance(root).into_node();
        assert_balanced(&balanced);
        assert_eq!(text(&balanced), "abcd");
        assert_eq!(balanced.height(), 2);
    }

    #[test]
    fn rebalance_right_right_case() {
        let right = branch(leaf("b"), branch(leaf("c"), leaf("d")));
        let Ok(root) = branch(leaf("a"), right).into_branch() else {
            panic!("expected branch");
        };
        assert_eq!(root.balance_factor(), -2);

        let balanced = rebalance(root).into_node();
        assert_balanced(&balanced);
        assert_eq!(text(&balanced), "abcd");
    }

    #[test]
    fn join_trees_of_very_different_heights() {
        let leaves = (0..64).map(|i| Leaf::new(format!("{:02}", i))).collect();
        let tall = Node::from_leaves(leaves).unwrap();

        let joined = join(tall.clone(), leaf("xy"), 2);
        assert_balanced(&joined);
        assert!(text(&joined).ends_with("6263xy"));

        let joined = join(leaf("xy"), tall, 2);
        assert_balanced(&joined);
        assert!(text(&joined).starts_with("xy0001"));
        assert_eq!(joined.len(), 130);
    }

    #[test]
    fn join_coalesces_small_leaves() {
        let joined = join(leaf("ab"), leaf("cd"), 4);
        let Node::Leaf(single) = *joined else {
            panic!("expected a single leaf");
        };
        assert_eq!((single.text.as_str(), single.chars), ("abcd", 4));

        let joined = join(leaf("ab"), leaf("cde"), 4);
        assert_eq!(joined.height(), 1);
    }
}
