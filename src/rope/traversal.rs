use std::str;

use super::node::{byte_offset, Node};

/// In-order iterator over the rope's leaf fragments.
///
/// Pending right subtrees are kept on an explicit stack, so memory use is
/// bounded by the tree height and deep trees never touch the call stack.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(root: Option<&'a Node>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }

    /// Positions the iterator so its next item is the leaf containing
    /// `offset`, and returns the char offset inside that leaf.
    pub(crate) fn seek(root: Option<&'a Node>, mut offset: usize) -> (Self, usize) {
        let mut stack = Vec::new();
        let Some(mut node) = root else {
            return (Self { stack }, 0);
        };

        loop {
            match node {
                Node::Leaf(_) => {
                    stack.push(node);
                    return (Self { stack }, offset);
                }
                Node::Branch(branch) if offset < branch.weight => {
                    stack.push(branch.right.as_ref());
                    node = branch.left.as_ref();
                }
                Node::Branch(branch) => {
                    offset -= branch.weight;
                    node = branch.right.as_ref();
                }
            }
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut node = self.stack.pop()?;

        loop {
            match node {
                Node::Leaf(leaf) => return Some(leaf.text.as_str()),
                Node::Branch(branch) => {
                    self.stack.push(branch.right.as_ref());
                    node = branch.left.as_ref();
                }
            }
        }
    }
}

/// In-order iterator over the rope's chars.
#[derive(Clone, Debug)]
pub struct Chars<'a> {
    chunks: Chunks<'a>,
    current: str::Chars<'a>,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(root: Option<&'a Node>) -> Self {
        Self {
            chunks: Chunks::new(root),
            current: "".chars(),
        }
    }

    pub(crate) fn seek(root: Option<&'a Node>, offset: usize) -> Self {
        let (mut chunks, skip) = Chunks::seek(root, offset);
        let current = match chunks.next() {
            Some(first) => first[byte_offset(first, skip)..].chars(),
            None => "".chars(),
        };

        Self { chunks, current }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.current.next() {
                return Some(c);
            }
            self.current = self.chunks.next()?.chars();
        }
    }
}
