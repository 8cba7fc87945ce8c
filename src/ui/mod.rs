pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, &app.theme);
    process_table::render(
        frame,
        chunks[1],
        app.visible_processes(),
        app.selected_index,
        app.sort_order(),
        &app.theme,
    );
    statusbar::render(
        frame,
        chunks[2],
        app.status_message.as_ref(),
        &app.keybinds,
        app.sort_order(),
        &app.theme,
    );
}
