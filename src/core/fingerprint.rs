//! Content fingerprints used to skip re-layout of an unchanged tree.

use sha2::{Digest, Sha256};

use super::tree::TreeNode;

/// SHA-256 over the tree's content plus its node and edge counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    digest: [u8; 32],
    pub nodes: usize,
    pub edges: usize,
}

impl Fingerprint {
    /// Hash the canonical JSON serialization of `root`.  Metadata maps are
    /// key-sorted and absent ids are omitted, so an absent id and an empty
    /// one hash differently.
    pub fn of(root: &TreeNode) -> Self {
        let mut hasher = Sha256::new();
        // Writes go to the hasher and every map key is a string, so
        // serialization cannot fail.
        let _ = serde_json::to_writer(&mut hasher, root);

        let nodes = count_nodes(root);
        hasher.update((nodes as u64).to_le_bytes());
        Self {
            digest: hasher.finalize().into(),
            nodes,
            edges: nodes.saturating_sub(1),
        }
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        self.digest[..6].iter().map(|b| format!("{b:02x}")).collect()
    }
}

fn count_nodes(root: &TreeNode) -> usize {
    let mut nodes = 0usize;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        nodes += 1;
        stack.extend(&node.children);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new("root").with_id("r").with_children(vec![
            TreeNode::new("cat").with_id("a"),
            TreeNode::new("car").with_id("b"),
        ])
    }

    #[test]
    fn equal_trees_share_a_fingerprint() {
        assert_eq!(Fingerprint::of(&sample()), Fingerprint::of(&sample().clone()));
    }

    #[test]
    fn counts_nodes_and_edges() {
        let fp = Fingerprint::of(&sample());
        assert_eq!((fp.nodes, fp.edges), (3, 2));
        assert_eq!(fp.short().len(), 12);
    }

    #[test]
    fn label_change_is_detected() {
        let mut changed = sample();
        changed.children[1].label = "cart".into();
        assert_ne!(Fingerprint::of(&sample()), Fingerprint::of(&changed));
    }

    #[test]
    fn reparenting_with_same_labels_is_detected() {
        // [a, b] under root vs. b nested under a.
        let flat = sample();
        let nested = TreeNode::new("root").with_id("r").with_children(vec![TreeNode::new("cat")
            .with_id("a")
            .with_children(vec![TreeNode::new("car").with_id("b")])]);
        assert_ne!(Fingerprint::of(&flat), Fingerprint::of(&nested));
    }

    #[test]
    fn missing_id_differs_from_empty_id() {
        let anonymous = TreeNode::new("x");
        let empty = TreeNode::new("x").with_id("");
        assert_ne!(Fingerprint::of(&anonymous), Fingerprint::of(&empty));
    }

    #[test]
    fn metadata_key_order_does_not_matter() {
        let mut forward = serde_json::Map::new();
        forward.insert("prefix".into(), serde_json::json!("cat"));
        forward.insert("document_count".into(), serde_json::json!(2));
        let mut backward = serde_json::Map::new();
        backward.insert("document_count".into(), serde_json::json!(2));
        backward.insert("prefix".into(), serde_json::json!("cat"));

        let mut a = TreeNode::new("w");
        a.metadata = Some(forward);
        let mut b = TreeNode::new("w");
        b.metadata = Some(backward);
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn metadata_participates() {
        let plain = TreeNode::new("w");
        let mut tagged = TreeNode::new("w");
        let mut meta = serde_json::Map::new();
        meta.insert("document_count".into(), serde_json::json!(3));
        tagged.metadata = Some(meta);
        assert_ne!(Fingerprint::of(&plain), Fingerprint::of(&tagged));
    }
}
