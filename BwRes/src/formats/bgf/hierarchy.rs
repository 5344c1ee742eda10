//! Node hierarchy: connectivity, world matrices and render ordering
//!
//! Parents are indices into the model's node list. A world matrix is the
//! product `L(node) * L(parent) * ... * L(root)` of local matrices.

use glam::{Mat4, Vec3};

use super::types::{Model, Node};
use crate::error::{Error, Result};

/// Apply `(parent, child)` pairs and verify every chain is bounded.
///
/// A later pair for the same child replaces the earlier parent.
pub(crate) fn apply_links(nodes: &mut [Node], links: &[(u16, u16)], max_depth: usize) -> Result<()> {
    for &(parent, child) in links {
        let (parent, child) = (usize::from(parent), usize::from(child));
        if parent >= nodes.len() || child >= nodes.len() {
            return Err(Error::model(format!(
                "connectivity pair ({parent}, {child}) is out of range for {} nodes",
                nodes.len()
            )));
        }
        if parent == child {
            return Err(Error::model(format!("node {child} is linked to itself")));
        }
        nodes[child].parent = Some(parent);
    }

    for index in 0..nodes.len() {
        ancestry(nodes, index, max_depth)?;
    }
    Ok(())
}

/// `index` followed by its ancestors up to the root.
fn ancestry(nodes: &[Node], index: usize, max_depth: usize) -> Result<Vec<usize>> {
    let mut chain = vec![index];
    let mut current = nodes[index].parent;
    while let Some(parent) = current {
        if chain.len() >= max_depth {
            return Err(Error::model(format!(
                "parent chain of node {index} exceeds {max_depth} levels"
            )));
        }
        chain.push(parent);
        current = nodes[parent].parent;
    }
    Ok(chain)
}

impl Model {
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::model(format!(
                "node index {index} out of range for {} nodes",
                self.nodes.len()
            )))
        }
    }

    /// World matrix of one node, recomputed from every ancestor.
    pub fn world_matrix(&self, index: usize, max_depth: usize) -> Result<Mat4> {
        self.check_index(index)?;
        Ok(ancestry(&self.nodes, index, max_depth)?
            .into_iter()
            .fold(Mat4::IDENTITY, |acc, i| acc * self.nodes[i].transform.to_matrix()))
    }

    /// World matrices of all nodes, reusing each parent's product.
    pub fn world_matrices(&self, max_depth: usize) -> Result<Vec<Mat4>> {
        let mut cache: Vec<Option<Mat4>> = vec![None; self.nodes.len()];

        for index in 0..self.nodes.len() {
            if cache[index].is_some() {
                continue;
            }
            // Walk up to the first node with a known product, then fill down.
            let chain = ancestry(&self.nodes, index, max_depth)?;
            let known = chain.iter().position(|&i| cache[i].is_some());
            let (pending, mut world) = match known {
                Some(pos) => (&chain[..pos], cache[chain[pos]].unwrap_or(Mat4::IDENTITY)),
                None => (chain.as_slice(), Mat4::IDENTITY),
            };
            for &i in pending.iter().rev() {
                world = self.nodes[i].transform.to_matrix() * world;
                cache[i] = Some(world);
            }
        }

        Ok(cache.into_iter().map(|m| m.unwrap_or(Mat4::IDENTITY)).collect())
    }

    /// Number of ancestors of a node.
    pub fn depth(&self, index: usize, max_depth: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(ancestry(&self.nodes, index, max_depth)?.len() - 1)
    }

    /// Direct children of a node, in stream order.
    #[must_use]
    pub fn children(&self, index: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Nodes without a parent.
    #[must_use]
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Renderable nodes sorted far to near from `camera`.
    ///
    /// Ties keep stream order.
    #[must_use]
    pub fn render_order(&self, camera: Vec3) -> Vec<usize> {
        let mut order: Vec<(usize, f32)> = self
            .renderable_nodes()
            .map(|i| (i, camera.distance(self.nodes[i].world_center)))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));
        order.into_iter().map(|(i, _)| i).collect()
    }
}
