use std::io;

use crate::view::Presenter;

use super::App;

pub fn render(app: &mut App) -> io::Result<()> {
    Presenter::render_dashboard(
        app.controller.connectivity,
        app.controller.active(),
        app.stream.stats(),
        app.controller.can_start() && !app.commands.in_progress(),
        app.controller.can_stop() && !app.commands.in_progress(),
        app.commands.in_progress(),
        &app.controller.log,
    )
}
