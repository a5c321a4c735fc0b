//! Application builder and initialization
//!
//! This module provides the main app creation functions

use super::plugins::{CorePluginGroup, RenderingPluginGroup};
use crate::core::config::CliArgs;
use crate::core::state::{CardSession, TextRole};
use crate::systems::{configure_default_plugins, PendingLoads};
use anyhow::Result;
use bevy::prelude::*;
use bevy::winit::WinitSettings;

/// Session seeded from the config file and the CLI text flags.
///
/// Images are not placed here: the window decodes them in the background
/// and the headless runner places them with [`place_images`].
pub fn build_session(cli_args: &CliArgs) -> CardSession {
    let settings = cli_args.resolve_settings();
    let mut session = CardSession::from_settings(settings);

    if let Some(number) = &cli_args.number {
        session.set_glyph_content(number);
    }
    if let Some(size) = &cli_args.size {
        session.set_size(TextRole::Glyph, size);
    }
    if let Some(message) = &cli_args.message {
        session.set_message_content(message);
    }
    session
}

/// Decode and place every `--image` on the calling thread. Files that fail
/// to decode are skipped; returns how many were placed.
pub fn place_images(session: &mut CardSession, cli_args: &CliArgs) -> usize {
    cli_args
        .images
        .iter()
        .filter(|path| match session.add_image_from_path(path) {
            Ok(_) => true,
            Err(error) => {
                warn!("Skipping {}: {}", path.display(), error);
                false
            }
        })
        .count()
}

/// Creates a fully configured Bevy card application.
///
/// This is the main entry point for the window. It creates a Bevy app with
/// the default plugins, the card session, and the card plugin groups.
pub fn create_app(cli_args: CliArgs) -> Result<App> {
    cli_args
        .validate()
        .map_err(|e| anyhow::anyhow!("CLI validation failed: {}", e))?;

    let mut app = App::new();
    configure_resources(&mut app, cli_args);
    app.add_plugins(configure_default_plugins());
    add_plugin_groups(&mut app);
    app.add_systems(Startup, queue_cli_images);
    Ok(app)
}

/// Sets up application resources and configuration
fn configure_resources(app: &mut App, cli_args: CliArgs) {
    let session = build_session(&cli_args);
    let background = session.settings().render.background;

    app.insert_resource(ClearColor(Color::srgba_u8(
        background.r,
        background.g,
        background.b,
        background.a,
    )))
    .insert_resource(session)
    .insert_resource(cli_args);

    // Reactive updates: the card only changes on input or finished tasks
    app.insert_resource(WinitSettings::desktop_app());
}

/// Add all plugin groups to the application
fn add_plugin_groups(app: &mut App) {
    debug!("Adding plugin groups...");
    app.add_plugins((RenderingPluginGroup, CorePluginGroup));
    debug!("All plugin groups added successfully");
}

fn queue_cli_images(cli_args: Res<CliArgs>, mut pending: ResMut<PendingLoads>) {
    for path in &cli_args.images {
        pending.queue_image(path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_text_flags_seed_session() {
        let cli = CliArgs::parse_from(["glyphcard", "--number", "7", "--size", "600", "--message", "Hi"]);
        let session = build_session(&cli);
        assert_eq!(session.scene().glyph.content, "7");
        assert_eq!(session.scene().glyph.size, 600.0);
        assert_eq!(session.scene().message.as_ref().unwrap().content, "Hi");
    }

    #[test]
    fn test_bad_cli_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("photo.png");
        image::RgbaImage::new(40, 20).save(&good).unwrap();
        let bad = dir.path().join("notes.txt");
        std::fs::write(&bad, "not an image").unwrap();

        let cli = CliArgs {
            images: vec![bad, good],
            ..Default::default()
        };
        let mut session = build_session(&cli);
        assert_eq!(place_images(&mut session, &cli), 1);
        assert_eq!(session.scene().image_count(), 1);
    }
}
