use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Versioned key into a [`Scene`]'s node store. Keys held after a node is
    /// removed resolve to nothing rather than aliasing a new node.
    pub struct NodeId;
}

/// Local TRS transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4], // quat xyzw
    pub scale: [f32; 3],
}

impl Transform {
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0], // identity quat
            scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node not found in scene")]
    MissingNode,
    #[error("reparenting would create a cycle")]
    WouldCycle,
}

struct SceneNode {
    transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Minimal scene graph: a forest of nodes with local TRS transforms.
///
/// The graph exists to answer one per-frame question, "where is this node in
/// world space", without allocating. Hosts with their own scene
/// representation can skip it and call the pure math directly.
#[derive(Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn add_node(&mut self, transform: Transform) -> NodeId {
        self.nodes.insert(SceneNode {
            transform,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, transform: Transform) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::MissingNode);
        }
        let id = self.nodes.insert(SceneNode {
            transform,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Re-home `node` under `parent` (`None` detaches it to a root).
    ///
    /// A node can never become a descendant of itself.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::MissingNode);
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(SceneError::MissingNode);
            }
            let mut cur = Some(p);
            while let Some(id) = cur {
                if id == node {
                    return Err(SceneError::WouldCycle);
                }
                cur = self.nodes[id].parent;
            }
        }

        if let Some(old) = self.nodes[node].parent {
            if let Some(old_node) = self.nodes.get_mut(old) {
                old_node.children.retain(|&c| c != node);
            }
        }
        self.nodes[node].parent = parent;
        if let Some(p) = parent {
            self.nodes[p].children.push(node);
        }
        Ok(())
    }

    /// Remove a node and all of its descendants. Returns false if the node
    /// was already gone.
    pub fn remove_subtree(&mut self, node: NodeId) -> bool {
        let Some(n) = self.nodes.get(node) else {
            return false;
        };

        if let Some(parent) = n.parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != node);
            }
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                stack.extend(removed.children);
            }
        }
        true
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn transform(&self, node: NodeId) -> Option<&Transform> {
        self.nodes.get(node).map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(node).map(|n| &mut n.transform)
    }

    /// Write `s` to all three local scale axes. Returns false (and leaves the
    /// scene untouched) if the node is gone.
    pub fn set_scale_uniform(&mut self, node: NodeId, s: f32) -> bool {
        match self.nodes.get_mut(node) {
            Some(n) => {
                n.transform.scale = [s, s, s];
                true
            }
            None => false,
        }
    }

    /// Resolve the node's world position into `out` without allocating.
    /// Returns false if the node (or an ancestor) is gone.
    pub fn world_position_into(&self, node: NodeId, out: &mut [f32; 3]) -> bool {
        let Some(n) = self.nodes.get(node) else {
            return false;
        };
        *out = n.transform.translation;

        let mut cur = n.parent;
        while let Some(pid) = cur {
            let Some(p) = self.nodes.get(pid) else {
                return false;
            };
            let t = &p.transform;
            let scaled = [
                out[0] * t.scale[0],
                out[1] * t.scale[1],
                out[2] * t.scale[2],
            ];
            let rotated = rotate_by_quat(t.rotation, scaled);
            out[0] = rotated[0] + t.translation[0];
            out[1] = rotated[1] + t.translation[1];
            out[2] = rotated[2] + t.translation[2];
            cur = p.parent;
        }
        true
    }

    pub fn world_position(&self, node: NodeId) -> Option<[f32; 3]> {
        let mut out = [0.0; 3];
        self.world_position_into(node, &mut out).then_some(out)
    }
}

/// Rotate `v` by a unit quaternion stored xyzw.
///
/// v' = v + w * t + q_xyz x t, with t = 2 * (q_xyz x v).
fn rotate_by_quat(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let qv = [q[0], q[1], q[2]];
    let w = q[3];
    let t = [
        2.0 * (qv[1] * v[2] - qv[2] * v[1]),
        2.0 * (qv[2] * v[0] - qv[0] * v[2]),
        2.0 * (qv[0] * v[1] - qv[1] * v[0]),
    ];
    [
        v[0] + w * t[0] + (qv[1] * t[2] - qv[2] * t[1]),
        v[1] + w * t[1] + (qv[2] * t[0] - qv[0] * t[2]),
        v[2] + w * t[2] + (qv[0] * t[1] - qv[1] * t[0]),
    ]
}
