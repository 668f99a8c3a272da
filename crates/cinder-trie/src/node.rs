//! Trie node types and their RLP codec.
//!
//! Structured nodes come in three shapes: a branch (16 child slots plus an
//! optional value), an extension (a compressed path segment leading to one
//! child) and a leaf (a compressed path segment ending in a value). Wire
//! payloads can additionally be a bare 32-byte reference or the RLP empty
//! string; both decode but carry no structure of their own.

use crate::hash::NodeHash;
use crate::nibbles::Nibbles;
use crate::rlp;

/// How a node points at a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    /// The child's whole encoding, embedded in place. Only nodes shorter
    /// than 32 bytes are stored this way.
    Inline(Vec<u8>),
    /// The child by hash, stored elsewhere.
    Hash(NodeHash),
    /// No child.
    Empty,
}

impl NodeRef {
    /// The referenced hash, for hash references.
    pub fn as_hash(&self) -> Option<NodeHash> {
        match self {
            NodeRef::Hash(h) => Some(*h),
            _ => None,
        }
    }

    /// True if there is no child.
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeRef::Empty)
    }

    /// The reference as it appears inside its parent's encoding.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            NodeRef::Empty => rlp::encode_bytes(&[]),
            NodeRef::Inline(encoded) => encoded.clone(),
            NodeRef::Hash(hash) => rlp::encode_bytes(hash.as_bytes()),
        }
    }

    /// Classifies one list item of a parent's encoding: the empty string
    /// means no child, a 32-byte string is a hash reference, and anything
    /// else (a nested list, or a short string) is an embedded child.
    fn decode(item: &[u8]) -> Option<Self> {
        match item {
            [] | [0x80] => Some(NodeRef::Empty),
            [tag, ..] if *tag >= 0xc0 => Some(NodeRef::Inline(item.to_vec())),
            _ => {
                let payload = rlp::decode_bytes(item)?;
                Some(match NodeHash::from_slice(&payload) {
                    Ok(hash) => NodeRef::Hash(hash),
                    Err(_) => NodeRef::Inline(item.to_vec()),
                })
            }
        }
    }
}

/// A branch node: one child slot per nibble, plus an optional value.
#[derive(Debug, Clone)]
pub struct BranchNode {
    /// Children, indexed by the next nibble of the key.
    pub children: [NodeRef; 16],
    /// Value for a key that ends at this node.
    pub value: Option<Vec<u8>>,
}

impl BranchNode {
    /// A branch with no children and no value.
    pub fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| NodeRef::Empty),
            value: None,
        }
    }

    /// Points the slot for `nibble` at `child`.
    pub fn set_child(&mut self, nibble: u8, child: NodeRef) {
        self.children[nibble as usize] = child;
    }

    /// Encodes as a 17-item list: the 16 children, then the value (the
    /// empty string when absent).
    pub fn encode(&self) -> Vec<u8> {
        let mut items: Vec<Vec<u8>> = self.children.iter().map(NodeRef::encode).collect();
        items.push(rlp::encode_bytes(self.value.as_deref().unwrap_or_default()));
        rlp::encode_list(&items)
    }

    /// Decodes a 17-item list. A value slot that is not a byte string is
    /// malformed and fails the whole node.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let items = rlp::decode_list(data)?;
        let (child_items, value_item) = match items.as_slice() {
            [children @ .., value] if children.len() == 16 => (children, value),
            _ => return None,
        };

        let mut children = std::array::from_fn(|_| NodeRef::Empty);
        for (slot, item) in child_items.iter().enumerate() {
            children[slot] = NodeRef::decode(item)?;
        }

        let value = match rlp::decode_bytes(value_item)? {
            v if v.is_empty() => None,
            v => Some(v),
        };
        Some(Self { children, value })
    }
}

impl Default for BranchNode {
    fn default() -> Self {
        Self::new()
    }
}

/// An extension node: a shared path segment leading to a single child.
#[derive(Debug, Clone)]
pub struct ExtensionNode {
    /// The nibbles every key below this node shares.
    pub path: Nibbles,
    /// The node the path leads to.
    pub child: NodeRef,
}

impl ExtensionNode {
    /// Creates an extension over `path` pointing at `child`.
    pub fn new(path: Nibbles, child: NodeRef) -> Self {
        Self { path, child }
    }

    /// Encodes as `[hex-prefix(path), child]`.
    pub fn encode(&self) -> Vec<u8> {
        let items = [
            rlp::encode_bytes(&self.path.encode_hex_prefix(false)),
            self.child.encode(),
        ];
        rlp::encode_list(&items)
    }

    /// Decodes a two-item list whose path carries no terminator flag.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let (path, terminating, payload) = split_pair(data)?;
        if terminating {
            return None;
        }
        let child = NodeRef::decode(&payload)?;
        Some(Self { path, child })
    }
}

/// A leaf node: the rest of a key's path, and its value.
#[derive(Debug, Clone)]
pub struct LeafNode {
    /// The key nibbles remaining below the parent.
    pub path: Nibbles,
    /// The stored value.
    pub value: Vec<u8>,
}

impl LeafNode {
    /// Creates a leaf storing `value` under `path`.
    pub fn new(path: Nibbles, value: Vec<u8>) -> Self {
        Self { path, value }
    }

    /// Encodes as `[hex-prefix(path), value]`.
    pub fn encode(&self) -> Vec<u8> {
        let items = [
            rlp::encode_bytes(&self.path.encode_hex_prefix(true)),
            rlp::encode_bytes(&self.value),
        ];
        rlp::encode_list(&items)
    }

    /// Decodes a two-item list whose path carries the terminator flag.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let (path, terminating, payload) = split_pair(data)?;
        if !terminating {
            return None;
        }
        let value = rlp::decode_bytes(&payload)?;
        Some(Self { path, value })
    }
}

/// Splits a leaf/extension encoding into its decoded path, the terminator
/// flag, and the still-encoded second item.
fn split_pair(data: &[u8]) -> Option<(Nibbles, bool, Vec<u8>)> {
    let mut items = rlp::decode_list(data)?;
    if items.len() != 2 {
        return None;
    }
    let payload = items.pop()?;
    let path_item = items.pop()?;
    let (path, terminating) = Nibbles::decode_hex_prefix(&rlp::decode_bytes(&path_item)?)?;
    Some((path, terminating, payload))
}

/// A decoded trie payload.
#[derive(Debug, Clone)]
pub enum Node {
    Branch(BranchNode),
    Extension(ExtensionNode),
    Leaf(LeafNode),
    /// A bare 32-byte reference with no structure of its own.
    Hash(NodeHash),
    /// The RLP empty string.
    Empty,
}

impl Node {
    /// Encodes the node.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Node::Branch(n) => n.encode(),
            Node::Extension(n) => n.encode(),
            Node::Leaf(n) => n.encode(),
            Node::Hash(h) => rlp::encode_bytes(h.as_bytes()),
            Node::Empty => rlp::encode_bytes(&[]),
        }
    }

    /// Decodes a payload.
    ///
    /// Byte strings decode only as [`Node::Empty`] or [`Node::Hash`]; lists
    /// dispatch on item count, and two-item lists try the leaf reading
    /// before the extension reading (the terminator flag picks exactly one).
    pub fn decode(data: &[u8]) -> Option<Self> {
        if *data.first()? < 0xc0 {
            let payload = rlp::decode_bytes(data)?;
            return match payload.len() {
                0 => Some(Node::Empty),
                _ => NodeHash::from_slice(&payload).ok().map(Node::Hash),
            };
        }

        match rlp::decode_list(data)?.len() {
            17 => BranchNode::decode(data).map(Node::Branch),
            2 => match LeafNode::decode(data) {
                Some(leaf) => Some(Node::Leaf(leaf)),
                None => ExtensionNode::decode(data).map(Node::Extension),
            },
            _ => None,
        }
    }

    /// The node's content address.
    pub fn hash(&self) -> NodeHash {
        NodeHash::from_data(&self.encode())
    }

    /// How a parent would reference this node: embedded when the encoding
    /// stays under 32 bytes, by hash otherwise.
    pub fn to_ref(&self) -> NodeRef {
        let encoded = self.encode();
        if encoded.len() < 32 {
            NodeRef::Inline(encoded)
        } else {
            NodeRef::Hash(NodeHash::from_data(&encoded))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_node_encode_decode() {
        let mut branch = BranchNode::new();
        branch.value = Some(b"test".to_vec());
        branch.set_child(3, NodeRef::Hash(NodeHash::from_bytes([0xaa; 32])));

        let decoded = BranchNode::decode(&branch.encode()).unwrap();

        assert_eq!(decoded.value, Some(b"test".to_vec()));
        assert_eq!(
            decoded.children[3],
            NodeRef::Hash(NodeHash::from_bytes([0xaa; 32]))
        );
        assert!(decoded.children[0].is_empty());
    }

    #[test]
    fn test_leaf_node_encode_decode() {
        let leaf = LeafNode::new(Nibbles::from_nibbles(&[1, 2, 3, 4]), b"hello".to_vec());

        let decoded = LeafNode::decode(&leaf.encode()).unwrap();

        assert_eq!(decoded.path.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(decoded.value, b"hello".to_vec());
    }

    #[test]
    fn test_extension_node_encode_decode() {
        let ext = ExtensionNode::new(
            Nibbles::from_nibbles(&[1, 2, 3, 4]),
            NodeRef::Hash(NodeHash::from_bytes([0xaa; 32])),
        );

        let decoded = ExtensionNode::decode(&ext.encode()).unwrap();

        assert_eq!(decoded.path.as_slice(), &[1, 2, 3, 4]);
        assert!(matches!(decoded.child, NodeRef::Hash(_)));
    }

    #[test]
    fn test_leaf_and_extension_reject_each_other() {
        let leaf = LeafNode::new(Nibbles::from_nibbles(&[1, 2]), b"v".to_vec());
        assert!(ExtensionNode::decode(&leaf.encode()).is_none());

        let ext = ExtensionNode::new(
            Nibbles::from_nibbles(&[1, 2]),
            NodeRef::Hash(NodeHash::from_bytes([0; 32])),
        );
        assert!(LeafNode::decode(&ext.encode()).is_none());
    }

    #[test]
    fn test_node_decode_dispatch() {
        let leaf = LeafNode::new(Nibbles::from_nibbles(&[1, 2]), b"v".to_vec());
        assert!(matches!(Node::decode(&leaf.encode()), Some(Node::Leaf(_))));

        let ext = ExtensionNode::new(
            Nibbles::from_nibbles(&[1, 2]),
            NodeRef::Hash(NodeHash::from_bytes([0; 32])),
        );
        assert!(matches!(
            Node::decode(&ext.encode()),
            Some(Node::Extension(_))
        ));

        let mut branch = BranchNode::new();
        branch.value = Some(b"val".to_vec());
        assert!(matches!(
            Node::decode(&branch.encode()),
            Some(Node::Branch(_))
        ));
    }

    #[test]
    fn test_node_decode_bare_reference() {
        let hash = NodeHash::from_bytes([0x5a; 32]);
        let decoded = Node::decode(&Node::Hash(hash).encode()).unwrap();
        assert!(matches!(decoded, Node::Hash(h) if h == hash));
    }

    #[test]
    fn test_node_decode_empty() {
        assert!(matches!(Node::decode(&[0x80]), Some(Node::Empty)));
    }

    #[test]
    fn test_node_decode_rejects_garbage() {
        assert!(Node::decode(&[]).is_none());
        // A 3-byte string is neither empty nor a hash
        assert!(Node::decode(&[0x83, 1, 2, 3]).is_none());
        // A 3-item list is no node shape
        let items = vec![
            crate::rlp::encode_bytes(b"a"),
            crate::rlp::encode_bytes(b"b"),
            crate::rlp::encode_bytes(b"c"),
        ];
        assert!(Node::decode(&crate::rlp::encode_list(&items)).is_none());
        // Truncated branch
        let mut branch = BranchNode::new();
        branch.value = Some(vec![7; 40]);
        let mut encoded = branch.encode();
        encoded.truncate(encoded.len() - 4);
        assert!(Node::decode(&encoded).is_none());
    }

    #[test]
    fn test_node_ref_inline_vs_hash() {
        // Short encodings embed
        let small = Node::Leaf(LeafNode::new(Nibbles::from_nibbles(&[1]), b"v".to_vec()));
        assert!(matches!(small.to_ref(), NodeRef::Inline(_)));

        // Long encodings go by hash
        let large = Node::Leaf(LeafNode::new(Nibbles::from_bytes(&[0; 32]), vec![0; 100]));
        assert!(matches!(large.to_ref(), NodeRef::Hash(_)));
    }

    #[test]
    fn test_branch_with_inline_child() {
        let tiny = Node::Leaf(LeafNode::new(Nibbles::from_nibbles(&[7]), b"v".to_vec()));
        let mut branch = BranchNode::new();
        branch.set_child(0, tiny.to_ref());

        let decoded = BranchNode::decode(&branch.encode()).unwrap();
        assert!(matches!(decoded.children[0], NodeRef::Inline(_)));
    }
}
