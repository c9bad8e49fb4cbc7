/// A cell of the rope tree. Children are exclusively owned, so the tree never
/// shares a node between two parents.
#[derive(Clone, Debug)]
pub(crate) enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

/// A non-empty text fragment together with its char count.
#[derive(Clone, Debug)]
pub(crate) struct Leaf {
    pub(crate) text: String,
    pub(crate) chars: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Branch {
    pub(crate) left: Box<Node>,
    pub(crate) right: Box<Node>,
    /// Chars in the left subtree only.
    pub(crate) weight: usize,
    pub(crate) height: usize,
}

impl Node {
    /// Total chars below this node. Walks the right spine, so O(height).
    pub(crate) fn len(&self) -> usize {
        let mut total = 0;
        let mut node = self;

        loop {
            match node {
                Node::Leaf(leaf) => return total + leaf.chars,
                Node::Branch(branch) => {
                    total += branch.weight;
                    node = branch.right.as_ref();
                }
            }
        }
    }

    pub(crate) fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch(branch) => branch.height,
        }
    }

    pub(crate) fn into_branch(self: Box<Self>) -> Result<Branch, Leaf> {
        match *self {
            Node::Branch(branch) => Ok(branch),
            Node::Leaf(leaf) => Err(leaf),
        }
    }

    /// Returns the leaf holding `offset` and the offset within that leaf.
    pub(crate) fn locate(&self, mut offset: usize) -> (&Leaf, usize) {
        let mut node = self;

        loop {
            match node {
                Node::Leaf(leaf) => return (leaf, offset),
                Node::Branch(branch) if offset < branch.weight => node = branch.left.as_ref(),
                Node::Branch(branch) => {
                    offset -= branch.weight;
                    node = branch.right.as_ref();
                }
            }
        }
    }

    /// Builds a height-balanced tree over `leaves`, preserving their order.
    pub(crate) fn from_leaves(mut leaves: Vec<Leaf>) -> Option<Box<Node>> {
        match leaves.len() {
            0 => None,
            1 => leaves.pop().map(Leaf::into_node),
            len => {
                let right = leaves.split_off(len / 2);
                let left = Node::from_leaves(leaves)?;
                let right = Node::from_leaves(right)?;
                Some(Branch::new(left, right).into_node())
            }
        }
    }
}

impl Leaf {
    pub(crate) fn new(text: String) -> Self {
        let chars = text.chars().count();
        Self { text, chars }
    }

    pub(crate) fn into_node(self) -> Box<Node> {
        Box::new(Node::Leaf(self))
    }

    pub(crate) fn char_at(&self, offset: usize) -> Option<char> {
        self.text.chars().nth(offset)
    }

    pub(crate) fn insert(&mut self, offset: usize, text: &str, chars: usize) {
        let at = byte_offset(&self.text, offset);
        self.text.insert_str(at, text);
        self.chars += chars;
    }

    pub(crate) fn push_str(&mut self, text: &str, chars: usize) {
        self.text.push_str(text);
        self.chars += chars;
    }

    /// Keeps `[0, offset)` and returns the rest as a new leaf.
    pub(crate) fn split_off(&mut self, offset: usize) -> Leaf {
        let at = byte_offset(&self.text, offset);
        let tail = Leaf {
            text: self.text.split_off(at),
            chars: self.chars - offset,
        };
        self.chars = offset;
        tail
    }

    pub(crate) fn remove(&mut self, start: usize, end: usize) {
        let from = byte_offset(&self.text, start);
        let to = from + byte_offset(&self.text[from..], end - start);
        self.text.replace_range(from..to, "");
        self.chars -= end - start;
    }

    pub(crate) fn append(&mut self, other: Leaf) {
        self.text.push_str(&other.text);
        self.chars += other.chars;
    }
}

impl Branch {
    /// Joins two subtrees as-is; callers are responsible for balance.
    pub(crate) fn new(left: Box<Node>, right: Box<Node>) -> Self {
        let weight = left.len();
        Self::with_weight(left, right, weight)
    }

    pub(crate) fn with_weight(left: Box<Node>, right: Box<Node>, weight: usize) -> Self {
        let height = 1 + left.height().max(right.height());
        Self {
            left,
            right,
            weight,
            height,
        }
    }

    pub(crate) fn fix_height(&mut self) {
        self.height = 1 + self.left.height().max(self.right.height());
    }

    pub(crate) fn into_node(self) -> Box<Node> {
        Box::new(Node::Branch(self))
    }
}

/// Byte index of the `chars`-th char of `text`, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(index, _)| index)
}
