//! Live render nodes
//!
//! A live node is the transient, directly-manipulated copy of an image's
//! geometry. During a drag or resize only the node moves; the scene keeps
//! the committed geometry until the interaction ends. Nodes are keyed by
//! entity id, mounted after the first render that includes the entity, and
//! dropped when the entity goes away.

use std::collections::HashMap;
use tracing::debug;

use crate::core::errors::{CardError, CardResult};
use crate::core::state::{EntityId, ImageEntity, ImageGeometry, Scene};

#[derive(Debug, Clone, PartialEq)]
pub struct LiveNode {
    pub id: EntityId,
    pub geometry: ImageGeometry,
}

#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: HashMap<EntityId, LiveNode>,
}

impl NodeArena {
    /// Reconcile with the scene after a render: mount new entities, drop
    /// deleted ones, and reset every node except `active` to its committed
    /// geometry
    pub fn sync(&mut self, scene: &Scene, active: Option<EntityId>) {
        self.nodes.retain(|id, _| scene.image(*id).is_some());
        for entity in scene.images() {
            if Some(entity.id) == active && self.nodes.contains_key(&entity.id) {
                continue;
            }
            let node = self.nodes.entry(entity.id).or_insert_with(|| {
                debug!("Mounted node for image {}", entity.id);
                LiveNode {
                    id: entity.id,
                    geometry: entity.geometry,
                }
            });
            node.geometry = entity.geometry;
        }
    }

    pub fn is_mounted(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> CardResult<&LiveNode> {
        self.nodes.get(&id).ok_or(CardError::StaleNode(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> CardResult<&mut LiveNode> {
        self.nodes.get_mut(&id).ok_or(CardError::StaleNode(id))
    }

    pub fn unmount(&mut self, id: EntityId) -> Option<LiveNode> {
        self.nodes.remove(&id)
    }

    /// Geometry to display: the live node when mounted, else the model
    pub fn display_geometry(&self, entity: &ImageEntity) -> ImageGeometry {
        self.nodes
            .get(&entity.id)
            .map(|node| node.geometry)
            .unwrap_or(entity.geometry)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
