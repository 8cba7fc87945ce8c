use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::ui::theme::Theme;
use procmon::format::{format_elapsed, format_percent, kb_to_mb};
use procmon::system::process::{ProcessSnapshot, SortOrder};

const HEADERS: [&str; 6] = ["PID", "USER", "CPU%", "RAM[MB]", "TIME+", "COMMAND"];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessSnapshot],
    selected_index: usize,
    sort_order: SortOrder,
    theme: &Theme,
) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.pid().to_string()),
            Cell::from(p.user().to_string()),
            Cell::from(format_percent(p.cpu_utilization())),
            Cell::from(kb_to_mb(p.ram_kb()).to_string()),
            Cell::from(format_elapsed(p.uptime_seconds())),
            Cell::from(p.command().to_string()),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let widths = [
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Min(10),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Processes ({}) ", sort_order.label()),
            Style::default().fg(theme.text_secondary),
        ));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if !processes.is_empty() {
        state.select(Some(selected_index.min(processes.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
