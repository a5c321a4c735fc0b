//! Input Consumer System
//!
//! Routes mouse and keyboard input to the card session. Mouse buttons drive
//! the press/drag/resize state machine; keys map one to one onto session
//! commands through [`shortcut_for`].

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::export_requests::ExportRequest;
use super::plugins::CardSets;
use crate::core::state::{CardSession, TextRole};
use crate::editing::{NudgeDirection, RotateDirection};
use crate::rendering::world_to_canvas;

/// Modifier keys held while a shortcut key is pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    /// Control, or Command on macOS
    pub command: bool,
}

impl Modifiers {
    fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
            alt: keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
            command: keyboard.any_pressed([
                KeyCode::ControlLeft,
                KeyCode::ControlRight,
                KeyCode::SuperLeft,
                KeyCode::SuperRight,
            ]),
        }
    }
}

/// Everything a key press can ask the session to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    NudgeImage(NudgeDirection),
    MoveText(TextRole, NudgeDirection),
    FlipImage,
    ResetImage,
    /// Sign of the image rotation step; positive is clockwise
    RotateImage(f64),
    DeleteImage,
    Deselect,
    RotateText(TextRole, RotateDirection),
    ResetGlyph,
    ResetMessage,
    Export,
}

/// Map a key press to an action
pub fn shortcut_for(key: KeyCode, modifiers: Modifiers) -> Option<ShortcutAction> {
    let direction = match key {
        KeyCode::ArrowLeft => Some(NudgeDirection::Left),
        KeyCode::ArrowRight => Some(NudgeDirection::Right),
        KeyCode::ArrowUp => Some(NudgeDirection::Up),
        KeyCode::ArrowDown => Some(NudgeDirection::Down),
        _ => None,
    };
    if let Some(direction) = direction {
        return Some(if modifiers.shift {
            ShortcutAction::MoveText(TextRole::Glyph, direction)
        } else if modifiers.alt {
            ShortcutAction::MoveText(TextRole::Message, direction)
        } else {
            ShortcutAction::NudgeImage(direction)
        });
    }

    let text_role = if modifiers.shift {
        TextRole::Message
    } else {
        TextRole::Glyph
    };

    match key {
        KeyCode::KeyS if modifiers.command => Some(ShortcutAction::Export),
        KeyCode::KeyP => Some(ShortcutAction::Export),
        _ if modifiers.command => None,
        KeyCode::KeyF => Some(ShortcutAction::FlipImage),
        KeyCode::KeyR => Some(ShortcutAction::ResetImage),
        KeyCode::KeyQ => Some(ShortcutAction::RotateImage(-1.0)),
        KeyCode::KeyE => Some(ShortcutAction::RotateImage(1.0)),
        KeyCode::Delete | KeyCode::Backspace => Some(ShortcutAction::DeleteImage),
        KeyCode::Escape => Some(ShortcutAction::Deselect),
        KeyCode::Comma => Some(ShortcutAction::RotateText(text_role, RotateDirection::Left)),
        KeyCode::Period => Some(ShortcutAction::RotateText(text_role, RotateDirection::Right)),
        KeyCode::KeyG => Some(ShortcutAction::ResetGlyph),
        KeyCode::KeyM => Some(ShortcutAction::ResetMessage),
        _ => None,
    }
}

/// Run one action against the session
pub fn apply_shortcut(
    action: ShortcutAction,
    session: &mut CardSession,
    export: &mut ExportRequest,
) -> bool {
    match action {
        ShortcutAction::NudgeImage(direction) => session.nudge(direction),
        ShortcutAction::MoveText(role, direction) => session.move_text(role, direction),
        ShortcutAction::FlipImage => session.flip_selected(),
        ShortcutAction::ResetImage => session.reset_selected(),
        ShortcutAction::RotateImage(sign) => {
            let step = session.settings().interaction.image_rotate_step;
            session.rotate_selected(sign * step)
        }
        ShortcutAction::DeleteImage => session.delete_selected().is_some(),
        ShortcutAction::Deselect => session.deselect(),
        ShortcutAction::RotateText(role, direction) => session.rotate_text(role, direction),
        ShortcutAction::ResetGlyph => session.reset_glyph(),
        ShortcutAction::ResetMessage => session.reset_message(),
        ShortcutAction::Export => {
            let dir = session.settings().export_dir.clone();
            export.request(session, crate::export::default_export_path(&dir));
            true
        }
    }
}

pub struct InputConsumerPlugin;

impl Plugin for InputConsumerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_pointer_input, handle_keyboard_shortcuts)
                .chain()
                .in_set(CardSets::Input),
        );
    }
}

/// Left-button edges seen in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerButton {
    pub just_pressed: bool,
    pub held: bool,
    pub just_released: bool,
}

impl PointerButton {
    fn from_mouse(mouse_input: &ButtonInput<MouseButton>) -> Self {
        Self {
            just_pressed: mouse_input.just_pressed(MouseButton::Left),
            held: mouse_input.pressed(MouseButton::Left),
            just_released: mouse_input.just_released(MouseButton::Left),
        }
    }
}

/// Send one frame of pointer input to the session. A press is delivered
/// before a release from the same frame, so a quick tap still selects.
pub fn dispatch_pointer(
    session: &mut CardSession,
    button: PointerButton,
    point: Option<kurbo::Point>,
    axis_lock: bool,
) {
    if let Some(point) = point {
        if button.just_pressed {
            session.pointer_down(point);
        } else if button.held {
            session.pointer_move(point, axis_lock);
        }
    }
    if button.just_released {
        session.pointer_up();
    }
}

/// Feed left-button press, drag, and release to the session
fn handle_pointer_input(
    mouse_input: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut session: ResMut<CardSession>,
) {
    let button = PointerButton::from_mouse(&mouse_input);
    if button == PointerButton::default() {
        return;
    }

    let point = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .zip(camera_query.single().ok())
        .and_then(|(cursor_position, (camera, camera_transform))| {
            camera
                .viewport_to_world_2d(camera_transform, cursor_position)
                .ok()
        })
        .map(|world_position| world_to_canvas(world_position, session.settings().canvas_size()));

    let axis_lock = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    dispatch_pointer(&mut session, button, point, axis_lock);
}

fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<CardSession>,
    mut export: ResMut<ExportRequest>,
) {
    let modifiers = Modifiers::from_keyboard(&keyboard);
    for key in keyboard.get_just_pressed() {
        let Some(action) = shortcut_for(*key, modifiers) else {
            continue;
        };
        let handled = apply_shortcut(action, &mut session, &mut export);
        debug!("Shortcut {:?} -> {:?} (handled: {})", key, action, handled);
    }
}
