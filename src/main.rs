//! Glyphcard: fill a big number with photos and export it as a card.

use glyphcard::core;

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = core::run_app(cli_args) {
        core::platform::handle_error(error);
    }
}
