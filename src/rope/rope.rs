use std::{convert::Infallible, fmt, str::FromStr};

use tracing::{debug, trace};

use super::{
    balance::{self, join, rebalance},
    node::{Branch, Leaf, Node},
    traversal::{Chars, Chunks},
    RopeError,
};

/// Largest leaf fragment, in chars, unless configured otherwise.
pub const DEFAULT_LEAF_SIZE: usize = 1024;

/// A height-balanced tree of text fragments addressed by char offset.
///
/// Mutation goes through `&mut self`, so sharing a rope between threads
/// requires the caller to serialize access (e.g. behind a `Mutex`).
#[derive(Clone, Debug)]
pub struct Rope {
    root: Option<Box<Node>>,
    len: usize,
    max_leaf: usize,
}

impl Rope {
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            max_leaf: DEFAULT_LEAF_SIZE,
        }
    }

    /// Creates an empty rope whose leaves hold at most `max_leaf` chars.
    pub fn with_leaf_size(max_leaf: usize) -> Result<Self, RopeError> {
        if max_leaf < 2 {
            return Err(RopeError::InvalidArgument(format!(
                "leaf size must be at least 2, got {}",
                max_leaf
            )));
        }

        Ok(Self {
            root: None,
            len: 0,
            max_leaf,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_size(&self) -> usize {
        self.max_leaf
    }

    /// Height of the tree; 0 for an empty rope or a single leaf.
    pub fn height(&self) -> usize {
        balance::height(self.root.as_deref())
    }

    /// Splices `text` in so that it starts at char `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), RopeError> {
        if offset > self.len {
            return Err(RopeError::OutOfRange {
                start: offset,
                end: offset,
                len: self.len,
            });
        }

        self.splice(offset, text);
        Ok(())
    }

    /// Appends `text` at the end of the rope.
    pub fn push_str(&mut self, text: &str) {
        self.splice(self.len, text);
    }

    /// Inserts at an offset already known to be within `[0, len]`.
    fn splice(&mut self, mut offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }

        let Some(mut root) = self.root.take() else {
            let leaves = split_chunks(text, self.max_leaf)
                .map(|(chunk, _)| Leaf::new(chunk.to_string()))
                .collect();
            self.root = Node::from_leaves(leaves);
            self.len = self.root.as_deref().map_or(0, Node::len);
            trace!(len = self.len, "insert into empty rope");
            return;
        };

        for (chunk, chars) in split_chunks(text, self.chunk_size()) {
            root = insert_at(root, offset, chunk, chars, self.max_leaf);
            offset += chars;
            self.len += chars;
        }
        self.root = Some(root);

        trace!(offset, len = self.len, height = self.height(), "insert");
    }

    /// Removes `count` chars starting at char `offset`.
    pub fn delete(&mut self, offset: usize, count: usize) -> Result<(), RopeError> {
        let end = offset.checked_add(count).ok_or_else(|| {
            RopeError::InvalidArgument(format!("span {} + {} overflows", offset, count))
        })?;

        if end > self.len {
            return Err(RopeError::OutOfRange {
                start: offset,
                end,
                len: self.len,
            });
        }

        if count == 0 {
            return Ok(());
        }

        if let Some(root) = self.root.take() {
            self.root = remove_range(root, offset, end, self.max_leaf);
            self.len -= count;
        }

        trace!(
            offset,
            count,
            len = self.len,
            height = self.height(),
            "delete"
        );
        Ok(())
    }

    pub fn char_at(&self, offset: usize) -> Result<char, RopeError> {
        let out_of_range = RopeError::OutOfRange {
            start: offset,
            end: offset.saturating_add(1),
            len: self.len,
        };

        match &self.root {
            Some(root) if offset < self.len => {
                let (leaf, local) = root.locate(offset);
                leaf.char_at(local).ok_or(out_of_range)
            }
            _ => Err(out_of_range),
        }
    }

    /// Copies the chars in `[start, end)` without walking the whole tree.
    pub fn slice(&self, start: usize, end: usize) -> Result<String, RopeError> {
        if start > end {
            return Err(RopeError::InvalidArgument(format!(
                "slice start {} is after end {}",
                start, end
            )));
        }

        if end > self.len {
            return Err(RopeError::OutOfRange {
                start,
                end,
                len: self.len,
            });
        }

        Ok(self.chars_at(start).take(end - start).collect())
    }

    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self.root.as_deref())
    }

    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self.root.as_deref())
    }

    /// Chars from `offset` to the end; empty when `offset >= len`.
    pub fn chars_at(&self, offset: usize) -> Chars<'_> {
        Chars::seek(self.root.as_deref(), offset)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Inserted text is cut into pieces no longer than half a leaf, so a
    /// piece always fits beside the shorter half of a split leaf.
    fn chunk_size(&self) -> usize {
        self.max_leaf / 2
    }
}

fn insert_at(
    node: Box<Node>,
    offset: usize,
    text: &str,
    chars: usize,
    max_leaf: usize,
) -> Box<Node> {
    match node.into_branch() {
        Ok(mut branch) => {
            if offset <= branch.weight {
                branch.left = insert_at(branch.left, offset, text, chars, max_leaf);
                branch.weight += chars;
            } else {
                let offset = offset - branch.weight;
                branch.right = insert_at(branch.right, offset, text, chars, max_leaf);
            }

            branch.fix_height();
            rebalance(branch).into_node()
        }
        Err(mut leaf) => {
            if leaf.chars + chars <= max_leaf {
                leaf.insert(offset, text, chars);
                return leaf.into_node();
            }

            let mut tail = leaf.split_off(offset);
            if leaf.chars <= tail.chars {
                leaf.push_str(text, chars);
            } else {
                tail.insert(0, text, chars);
            }

            debug!(head = leaf.chars, tail = tail.chars, "split leaf");
            let weight = leaf.chars;
            Branch::with_weight(leaf.into_node(), tail.into_node(), weight).into_node()
        }
    }
}

/// Removes `[start, end)` from the subtree, returning `None` when nothing is left.
fn remove_range(
    node: Box<Node>,
    start: usize,
    end: usize,
    max_leaf: usize,
) -> Option<Box<Node>> {
    match node.into_branch() {
        Ok(Branch {
            left,
            right,
            weight,
            ..
        }) => {
            let left = if start < weight {
                remove_range(left, start, end.min(weight), max_leaf)
            } else {
                Some(left)
            };
            let right = if end > weight {
                remove_range(right, start.saturating_sub(weight), end - weight, max_leaf)
            } else {
                Some(right)
            };

            match (left, right) {
                (Some(left), Some(right)) => Some(join(left, right, max_leaf)),
                (left, right) => left.or(right),
            }
        }
        Err(mut leaf) => {
            leaf.remove(start, end);
            (leaf.chars > 0).then(|| leaf.into_node())
        }
    }
}

/// Cuts `text` into consecutive pieces of at most `size` chars.
fn split_chunks(text: &str, size: usize) -> impl Iterator<Item = (&str, usize)> {
    let mut rest = text;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let (index, chars) = match rest.char_indices().nth(size) {
            Some((index, _)) => (index, size),
            None => (rest.len(), rest.chars().count()),
        };
        let (chunk, tail) = rest.split_at(index);
        rest = tail;
        Some((chunk, chars))
    })
}

impl Default for Rope {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        let mut rope = Rope::new();
        rope.push_str(text);
        rope
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Rope::from(text.as_str())
    }
}

impl FromStr for Rope {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Rope::from(text))
    }
}

impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Rope) -> bool {
        self.len == other.len && self.chars().eq(other.chars())
    }
}

impl Eq for Rope {}

impl PartialEq<str> for Rope {
    fn eq(&self, other: &str) -> bool {
        let mut rest = other.as_bytes();
        for chunk in self.chunks() {
            match rest.strip_prefix(chunk.as_bytes()) {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
        rest.is_empty()
    }
}

impl PartialEq<&str> for Rope {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
