use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::ui::theme::Theme;
use procmon::format::{format_elapsed, format_kb};
use procmon::system::snapshot::SystemSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_identity(frame, chunks[0], snapshot, theme);

    let cpu = f64::from(snapshot.cpu_utilization).clamp(0.0, 1.0);
    render_gauge(frame, chunks[1], " CPU ", cpu, format!("{:.1}%", cpu * 100.0), theme);

    let mem = f64::from(snapshot.memory_utilization).clamp(0.0, 1.0);
    let mem_label = format!(
        "{} / {}",
        format_kb(snapshot.memory.used_kb()),
        format_kb(snapshot.memory.total_kb)
    );
    render_gauge(frame, chunks[2], " Memory ", mem, mem_label, theme);
}

fn render_identity(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " procmon ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default().fg(theme.text_primary);
    let lines = vec![
        Line::from(vec![
            Span::styled("OS: ", label),
            Span::styled(snapshot.operating_system.as_str(), value),
            Span::styled("  Kernel: ", label),
            Span::styled(snapshot.kernel.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled("Up Time: ", label),
            Span::styled(format_elapsed(snapshot.uptime_seconds), value),
        ]),
        Line::from(vec![
            Span::styled("Processes: ", label),
            Span::styled(snapshot.total_processes.to_string(), value),
            Span::styled("  Running: ", label),
            Span::styled(snapshot.running_processes.to_string(), value),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &'static str,
    ratio: f64,
    label: String,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_color(ratio))
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}
