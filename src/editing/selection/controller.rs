//! Interaction controller
//!
//! Turns pointer input into scene mutations. One interaction runs at a time:
//!
//! - pointer down on an image selects it and raises it (`Pressing`)
//! - moving past the drag threshold starts a drag; only the live node moves
//! - pointer down on a handle of the selected image starts a resize
//! - pointer up commits the live node back into the scene
//!
//! `commit` is the only place live geometry flows back into the model.

use kurbo::Point;
use tracing::debug;

use super::drag::{drag_geometry, resize_geometry};
use super::handles::{hit_handle, HandleKind};
use super::nodes::NodeArena;
use crate::core::config::{CardSettings, InteractionSettings};
use crate::core::errors::{CardError, CardResult};
use crate::core::state::{EntityId, ImageGeometry, Scene};
use crate::geometry::exceeds_threshold;

/// Per-entity interaction state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Idle,
    Selected,
    Dragging,
    Resizing,
}

/// The interaction in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Button held on an image, not yet past the drag threshold
    Pressing {
        id: EntityId,
        start: Point,
        origin: ImageGeometry,
    },
    Dragging {
        id: EntityId,
        start: Point,
        origin: ImageGeometry,
    },
    Resizing {
        id: EntityId,
        handle: HandleKind,
        start: Point,
        origin: ImageGeometry,
    },
}

impl Interaction {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Interaction::Idle => None,
            Interaction::Pressing { id, .. }
            | Interaction::Dragging { id, .. }
            | Interaction::Resizing { id, .. } => Some(*id),
        }
    }

    /// Whether a drag or resize is moving a live node
    pub fn is_manipulating(&self) -> bool {
        matches!(
            self,
            Interaction::Dragging { .. } | Interaction::Resizing { .. }
        )
    }
}

#[derive(Debug)]
pub struct InteractionController {
    pub(super) settings: InteractionSettings,
    pub(super) canvas_center: Point,
    pub(super) nodes: NodeArena,
    pub(super) interaction: Interaction,
}

impl InteractionController {
    pub fn new(settings: &CardSettings) -> Self {
        Self {
            settings: settings.interaction.clone(),
            canvas_center: settings.canvas_center(),
            nodes: NodeArena::default(),
            interaction: Interaction::Idle,
        }
    }

    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Mount and reset live nodes after a render
    pub fn sync_nodes(&mut self, scene: &Scene) {
        self.nodes.sync(scene, self.interaction.entity());
    }

    pub fn state_of(&self, scene: &Scene, id: EntityId) -> EntityState {
        match &self.interaction {
            Interaction::Dragging { id: active, .. } if *active == id => EntityState::Dragging,
            Interaction::Resizing { id: active, .. } if *active == id => EntityState::Resizing,
            _ => match scene.image(id) {
                Some(entity) if entity.selected => EntityState::Selected,
                _ => EntityState::Idle,
            },
        }
    }

    fn current_geometry(&self, scene: &Scene, id: EntityId) -> Option<ImageGeometry> {
        scene
            .image(id)
            .map(|entity| self.nodes.display_geometry(entity))
    }

    /// Pointer pressed at a canvas point. Returns whether the scene changed.
    pub fn pointer_down(&mut self, scene: &mut Scene, point: Point) -> CardResult<bool> {
        self.interaction = Interaction::Idle;

        // Handles of the selected image take priority over any body hit
        if let Some(id) = scene.selected_id() {
            if let Some(origin) = self.current_geometry(scene, id) {
                if let Some(handle) = hit_handle(&origin, point, self.settings.handle_size) {
                    self.nodes.get(id)?;
                    debug!("Resize of {} started from {:?}", id, handle);
                    self.interaction = Interaction::Resizing {
                        id,
                        handle,
                        start: point,
                        origin,
                    };
                    return Ok(false);
                }
            }
        }

        match scene.hit_test(point) {
            Some(id) => {
                let already_selected = scene.selected_id() == Some(id)
                    && scene.z_order().last() == Some(&id);
                scene.select(id);
                let origin = self
                    .current_geometry(scene, id)
                    .ok_or(CardError::StaleNode(id))?;
                self.interaction = Interaction::Pressing {
                    id,
                    start: point,
                    origin,
                };
                Ok(!already_selected)
            }
            None => {
                let had_selection = scene.selected_id().is_some();
                scene.clear_selection();
                Ok(had_selection)
            }
        }
    }

    /// Pointer moved while held. Only live nodes change; returns whether one
    /// did.
    pub fn pointer_move(&mut self, point: Point, axis_lock: bool) -> CardResult<bool> {
        if let Interaction::Pressing { id, start, origin } = self.interaction {
            if !exceeds_threshold(point - start, self.settings.drag_threshold) {
                return Ok(false);
            }
            self.nodes.get(id)?;
            debug!("Drag of {} started", id);
            self.interaction = Interaction::Dragging { id, start, origin };
        }

        match self.interaction {
            Interaction::Dragging { id, start, origin } => {
                let node = self.nodes.get_mut(id)?;
                node.geometry = drag_geometry(&origin, point - start, axis_lock);
                Ok(true)
            }
            Interaction::Resizing {
                id,
                handle,
                start,
                origin,
            } => {
                let min_size = self.settings.min_image_size;
                let node = self.nodes.get_mut(id)?;
                match resize_geometry(&origin, handle, point - start, min_size) {
                    Some(geometry) => {
                        node.geometry = geometry;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    /// Pointer released. Ends any drag or resize with a commit; returns
    /// whether the scene changed.
    pub fn pointer_up(&mut self, scene: &mut Scene) -> CardResult<bool> {
        let finished = std::mem::take(&mut self.interaction);
        match finished {
            Interaction::Dragging { id, .. } | Interaction::Resizing { id, .. } => {
                self.commit(scene, id)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Copy the live node's geometry into the scene
    pub fn commit(&mut self, scene: &mut Scene, id: EntityId) -> CardResult<()> {
        let geometry = self.nodes.get(id)?.geometry;
        let entity = scene.image_mut(id).ok_or(CardError::StaleNode(id))?;
        entity.set_geometry(geometry);
        debug!(
            "Committed {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            id, geometry.x, geometry.y, geometry.width, geometry.height
        );
        Ok(())
    }

    /// Drop any interaction and clear the selection. Uncommitted live
    /// geometry goes back to the committed geometry.
    pub fn deselect(&mut self, scene: &mut Scene) -> bool {
        if let Some(id) = std::mem::take(&mut self.interaction).entity() {
            if let (Some(entity), Ok(node)) = (scene.image(id), self.nodes.get_mut(id)) {
                node.geometry = entity.geometry;
            }
        }
        let had_selection = scene.selected_id().is_some();
        scene.clear_selection();
        had_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CardColor;
    use crate::io::image_loader::Bitmap;
    use std::sync::Arc;

    fn setup() -> (Scene, InteractionController, EntityId) {
        let settings = CardSettings::default();
        let mut scene = Scene::with_defaults(&settings);
        let bitmap = Arc::new(Bitmap::solid(400, 200, CardColor::BLACK).unwrap());
        let id = scene.add_image(bitmap, &settings);
        let mut controller = InteractionController::new(&settings);
        controller.sync_nodes(&scene);
        (scene, controller, id)
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let (mut scene, mut controller, id) = setup();
        assert!(controller.pointer_down(&mut scene, Point::new(400.0, 400.0)).unwrap());
        assert_eq!(controller.state_of(&scene, id), EntityState::Selected);
        controller.pointer_up(&mut scene).unwrap();

        assert!(controller.pointer_down(&mut scene, Point::new(10.0, 10.0)).unwrap());
        assert_eq!(scene.selected_id(), None);
        assert_eq!(controller.state_of(&scene, id), EntityState::Idle);
    }

    #[test]
    fn test_drag_moves_node_not_model_until_commit() {
        let (mut scene, mut controller, id) = setup();
        controller.pointer_down(&mut scene, Point::new(400.0, 400.0)).unwrap();

        // Below threshold: still a press
        assert!(!controller.pointer_move(Point::new(401.0, 401.0), false).unwrap());
        assert_eq!(controller.state_of(&scene, id), EntityState::Selected);

        assert!(controller.pointer_move(Point::new(425.0, 410.0), false).unwrap());
        assert!(controller.pointer_move(Point::new(450.0, 420.0), false).unwrap());
        assert_eq!(controller.state_of(&scene, id), EntityState::Dragging);
        assert_eq!(scene.image(id).unwrap().geometry.x, 300.0);
        let live = controller.nodes().get(id).unwrap().geometry;
        assert_eq!((live.x, live.y), (350.0, 370.0));

        assert!(controller.pointer_up(&mut scene).unwrap());
        let committed = scene.image(id).unwrap().geometry;
        assert_eq!((committed.x, committed.y), (live.x, live.y));
        assert_eq!(controller.state_of(&scene, id), EntityState::Selected);
    }

    #[test]
    fn test_resize_from_handle_and_floor() {
        let (mut scene, mut controller, id) = setup();
        controller.pointer_down(&mut scene, Point::new(400.0, 400.0)).unwrap();
        controller.pointer_up(&mut scene).unwrap();

        // Right edge handle of the 200x100 box at (300, 350)
        controller.pointer_down(&mut scene, Point::new(500.0, 400.0)).unwrap();
        assert!(controller.pointer_move(Point::new(550.0, 400.0), false).unwrap());
        assert_eq!(controller.state_of(&scene, id), EntityState::Resizing);
        assert_eq!(controller.nodes().get(id).unwrap().geometry.width, 250.0);

        // Too small: the previous box is kept for this step
        assert!(!controller.pointer_move(Point::new(305.0, 400.0), false).unwrap());
        assert_eq!(controller.nodes().get(id).unwrap().geometry.width, 250.0);

        controller.pointer_up(&mut scene).unwrap();
        assert_eq!(scene.image(id).unwrap().geometry.width, 250.0);
    }

    #[test]
    fn test_drag_on_unmounted_node_is_stale() {
        let settings = CardSettings::default();
        let mut scene = Scene::with_defaults(&settings);
        let bitmap = Arc::new(Bitmap::solid(10, 10, CardColor::BLACK).unwrap());
        let id = scene.add_image(bitmap, &settings);
        let mut controller = InteractionController::new(&settings);

        controller.pointer_down(&mut scene, Point::new(400.0, 400.0)).unwrap();
        let err = controller.pointer_move(Point::new(450.0, 400.0), false).unwrap_err();
        assert!(err.is_stale_node());
        assert_eq!(scene.image(id).unwrap().geometry.x, 300.0);
        assert!(controller.commit(&mut scene, id).unwrap_err().is_stale_node());
    }

    #[test]
    fn test_deselect_discards_live_geometry() {
        let (mut scene, mut controller, id) = setup();
        controller.pointer_down(&mut scene, Point::new(400.0, 400.0)).unwrap();
        controller.pointer_move(Point::new(480.0, 400.0), false).unwrap();
        assert!(controller.deselect(&mut scene));
        // Restored before any sync so the next frame draws the model
        assert_eq!(controller.nodes().get(id).unwrap().geometry.x, 300.0);
        controller.sync_nodes(&scene);
        assert_eq!(controller.nodes().get(id).unwrap().geometry.x, 300.0);
        assert!(!controller.pointer_up(&mut scene).unwrap());
        assert_eq!(scene.image(id).unwrap().geometry.x, 300.0);
    }
}
