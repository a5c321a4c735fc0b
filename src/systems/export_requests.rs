//! Export from the window
//!
//! An export clears the selection first, so the snapshot waits for one
//! render of the card without chrome and for anything still loading.

use bevy::prelude::*;
use std::path::PathBuf;

use super::async_loading::PendingLoads;
use super::plugins::CardSets;
use crate::core::state::{CardSession, TextRole};

/// Export in flight, if any
#[derive(Resource, Default, Debug)]
pub struct ExportRequest {
    path: Option<PathBuf>,
    /// Frames still to wait before the snapshot
    frames_left: u8,
}

impl ExportRequest {
    /// Deselect and schedule a snapshot to `path`
    pub fn request(&mut self, session: &mut CardSession, path: PathBuf) {
        if self.path.is_some() {
            debug!("Export already pending, ignoring request");
            return;
        }
        session.prepare_export();
        session.mark_dirty();
        info!("Exporting to {}", path.display());
        self.path = Some(path);
        self.frames_left = 1;
    }

    pub fn is_pending(&self) -> bool {
        self.path.is_some()
    }

    /// Advance one frame; returns the path once the snapshot may be taken
    fn tick(&mut self, loading: bool) -> Option<PathBuf> {
        self.path.as_ref()?;
        if self.frames_left > 0 {
            self.frames_left -= 1;
            return None;
        }
        if loading {
            return None;
        }
        self.path.take()
    }
}

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ExportRequest>()
            .add_systems(Update, run_pending_export.in_set(CardSets::Export));
    }
}

fn run_pending_export(
    session: Res<CardSession>,
    pending: Res<PendingLoads>,
    mut request: ResMut<ExportRequest>,
) {
    let loading = !pending.is_idle()
        || session.is_mask_pending(TextRole::Glyph)
        || session.is_mask_pending(TextRole::Message);
    let Some(path) = request.tick(loading) else {
        return;
    };
    let result = session
        .snapshot_document()
        .and_then(|document| document.persist(&path).map(|()| document));
    match result {
        Ok(document) => info!(
            "Exported {}x{} card to {}",
            document.pixel_width,
            document.pixel_height,
            path.display()
        ),
        Err(error) => error!("Export to {} failed: {}", path.display(), error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CardColor;
    use crate::io::image_loader::Bitmap;

    #[test]
    fn test_request_waits_one_frame() {
        let mut session = CardSession::default();
        let id = session.add_image(Bitmap::solid(40, 20, CardColor::BLACK).unwrap());
        session.select(id);

        let mut request = ExportRequest::default();
        request.request(&mut session, PathBuf::from("card.pdf"));
        assert!(session.scene().selected_id().is_none());
        assert!(request.is_pending());

        assert_eq!(request.tick(false), None);
        assert_eq!(request.tick(true), None);
        assert_eq!(request.tick(false), Some(PathBuf::from("card.pdf")));
        assert!(!request.is_pending());
        assert_eq!(request.tick(false), None);
    }

    #[test]
    fn test_second_request_is_ignored() {
        let mut session = CardSession::default();
        let mut request = ExportRequest::default();
        request.request(&mut session, PathBuf::from("a.pdf"));
        request.request(&mut session, PathBuf::from("b.pdf"));
        request.tick(false);
        assert_eq!(request.tick(false), Some(PathBuf::from("a.pdf")));
    }
}
