//! Discrete commands on the selected image
//!
//! Nudge, flip, reset, rotate, and delete write straight into the scene and
//! then bring the live node along. They act on the selected image only and
//! refuse to run while a drag or resize owns it. Every command except delete
//! needs the image's node to be mounted.

use tracing::debug;

use super::controller::{Interaction, InteractionController};
use super::nudge::NudgeDirection;
use crate::core::errors::{CardError, CardResult};
use crate::core::state::{EntityId, ImageGeometry, Scene};

impl InteractionController {
    /// Selected image that a command may touch, after checking its node
    fn command_target(&self, scene: &Scene) -> CardResult<Option<EntityId>> {
        if self.interaction.is_manipulating() {
            return Ok(None);
        }
        match scene.selected_id() {
            Some(id) => {
                self.nodes.get(id)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Apply `edit` to the selected image's committed geometry
    fn edit_selected(
        &mut self,
        scene: &mut Scene,
        edit: impl FnOnce(&mut ImageGeometry),
    ) -> CardResult<Option<EntityId>> {
        let Some(id) = self.command_target(scene)? else {
            return Ok(None);
        };
        let entity = scene.image_mut(id).ok_or(CardError::StaleNode(id))?;
        let mut geometry = entity.geometry;
        edit(&mut geometry);
        entity.set_geometry(geometry);
        self.nodes.get_mut(id)?.geometry = geometry;
        // A held press drags from the edited geometry once it crosses the threshold
        if let Interaction::Pressing {
            id: pressed,
            origin,
            ..
        } = &mut self.interaction
        {
            if *pressed == id {
                *origin = geometry;
            }
        }
        Ok(Some(id))
    }

    /// Move the selected image one step. Returns whether the key was used.
    pub fn nudge(&mut self, scene: &mut Scene, direction: NudgeDirection) -> CardResult<bool> {
        let delta = direction.vector(self.settings.nudge_step);
        let moved = self.edit_selected(scene, |geometry| {
            geometry.x += delta.x;
            geometry.y += delta.y;
        })?;
        if let Some(id) = moved {
            debug!("Nudged {} {:?}", id, direction);
        }
        Ok(moved.is_some())
    }

    /// Mirror the selected image horizontally in place.
    ///
    /// The shift uses the committed width: half of it moves the anchor to
    /// the box's vertical center line when flipping and back when unflipping.
    pub fn flip(&mut self, scene: &mut Scene) -> CardResult<bool> {
        let flipped = self.edit_selected(scene, |geometry| {
            let shift = geometry.width / 2.0;
            if geometry.is_flipped() {
                geometry.x -= shift;
            } else {
                geometry.x += shift;
            }
            geometry.scale_x = -geometry.scale_x;
        })?;
        Ok(flipped.is_some())
    }

    /// Restore the canonical width, natural aspect, centered placement, and
    /// identity rotation and flip
    pub fn reset(&mut self, scene: &mut Scene) -> CardResult<bool> {
        let Some(id) = self.command_target(scene)? else {
            return Ok(false);
        };
        let aspect = scene
            .image(id)
            .map(|entity| entity.source.aspect_ratio())
            .ok_or(CardError::StaleNode(id))?;
        let canonical = ImageGeometry::centered(
            self.canvas_center,
            self.settings.default_image_width,
            aspect,
        );
        self.edit_selected(scene, |geometry| *geometry = canonical)?;
        debug!("Reset {}", id);
        Ok(true)
    }

    /// Rotate the selected image by `delta_deg` around its center
    pub fn rotate(&mut self, scene: &mut Scene, delta_deg: f64) -> CardResult<bool> {
        let rotated =
            self.edit_selected(scene, |geometry| geometry.rotate_about_center(delta_deg))?;
        Ok(rotated.is_some())
    }

    /// Remove an image from the scene, ending any interaction on it. No
    /// other image becomes selected.
    pub fn delete(&mut self, scene: &mut Scene, id: EntityId) -> bool {
        if self.interaction.entity() == Some(id) {
            self.interaction = Interaction::Idle;
        }
        self.nodes.unmount(id);
        scene.remove_image(id).is_some()
    }

    /// Remove the selected image, if any
    pub fn delete_selected(&mut self, scene: &mut Scene) -> Option<EntityId> {
        let id = scene.selected_id()?;
        self.delete(scene, id).then_some(id)
    }
}
