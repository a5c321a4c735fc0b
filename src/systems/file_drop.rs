//! Files dropped on the window become placed images

use bevy::prelude::*;
use bevy::window::FileDragAndDrop;

use super::async_loading::PendingLoads;
use super::plugins::CardSets;

pub struct FileDropPlugin;

impl Plugin for FileDropPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_file_drops.in_set(CardSets::Input));
    }
}

/// Queue every dropped file for decoding. Non-images fail to decode and
/// are skipped with a warning once their task finishes.
fn handle_file_drops(mut events: EventReader<FileDragAndDrop>, mut pending: ResMut<PendingLoads>) {
    for event in events.read() {
        if let FileDragAndDrop::DroppedFile { path_buf, .. } = event {
            info!("File dropped: {}", path_buf.display());
            pending.queue_image(path_buf.clone());
        }
    }
}
