//! Background font loading and image decoding
//!
//! Outline extraction and image decoding run on the `AsyncComputeTaskPool`.
//! Finished tasks are polled once per frame and applied to the session on
//! the main schedule. Nothing is cancelled: an outline for inputs that have
//! changed since its task started is discarded by the session.

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task};
use std::path::PathBuf;

use super::plugins::CardSets;
use crate::core::errors::CardResult;
use crate::core::state::session::OutlineResult;
use crate::core::state::CardSession;
use crate::io::image_loader::{self, Bitmap};

/// Tasks started but not yet applied
#[derive(Resource, Default)]
pub struct PendingLoads {
    outlines: Vec<Task<OutlineResult>>,
    images: Vec<(PathBuf, Task<CardResult<Bitmap>>)>,
}

impl PendingLoads {
    /// Decode `path` in the background and place it when done
    pub fn queue_image(&mut self, path: PathBuf) {
        let task_path = path.clone();
        let task = AsyncComputeTaskPool::get().spawn(async move {
            image_loader::decode_file(&task_path)
        });
        debug!("Decoding {} in the background", path.display());
        self.images.push((path, task));
    }

    pub fn is_idle(&self) -> bool {
        self.outlines.is_empty() && self.images.is_empty()
    }
}

pub struct AsyncLoadingPlugin;

impl Plugin for AsyncLoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoads>().add_systems(
            Update,
            (spawn_outline_tasks, poll_outline_tasks, poll_image_tasks)
                .chain()
                .in_set(CardSets::Loading),
        );
    }
}

/// Start a task for every text element whose outline inputs changed
fn spawn_outline_tasks(mut session: ResMut<CardSession>, mut pending: ResMut<PendingLoads>) {
    let jobs = session.outline_jobs();
    if jobs.is_empty() {
        return;
    }
    let pool = AsyncComputeTaskPool::get();
    for job in jobs {
        debug!("Extracting {:?} outline for '{}'", job.role, job.key.text);
        pending.outlines.push(pool.spawn(async move { job.run() }));
    }
}

fn poll_outline_tasks(mut session: ResMut<CardSession>, mut pending: ResMut<PendingLoads>) {
    pending.outlines.retain_mut(|task| {
        let Some(result) = block_on(future::poll_once(task)) else {
            return true;
        };
        let role = result.role;
        if !session.complete_outline(result) {
            debug!("Dropped stale {:?} outline", role);
        }
        false
    });
}

fn poll_image_tasks(mut session: ResMut<CardSession>, mut pending: ResMut<PendingLoads>) {
    pending.images.retain_mut(|(path, task)| {
        let Some(result) = block_on(future::poll_once(task)) else {
            return true;
        };
        match result {
            Ok(bitmap) => {
                let id = session.add_image(bitmap);
                info!("Placed image {} as {}", path.display(), id);
            }
            Err(error) => warn!("Skipping {}: {}", path.display(), error),
        }
        false
    });
}
