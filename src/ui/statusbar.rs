use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{ResolvedKeybinds, key_label};
use crate::ui::theme::Theme;
use procmon::system::process::SortOrder;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    status_message: Option<&(String, Instant)>,
    keybinds: &ResolvedKeybinds,
    sort_order: SortOrder,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some((msg, _)) = status_message {
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default()
                .fg(theme.status_ok)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let quit = key_label(keybinds.quit);
    let sort = key_label(keybinds.toggle_sort);
    let refresh = key_label(keybinds.refresh);
    let sort_desc = format!("Sort ({})", sort_order.toggle().label());

    let mut spans = Vec::new();
    spans.extend(pill_spans(&quit, "Quit", theme));
    spans.extend(pill_spans(&sort, &sort_desc, theme));
    spans.extend(pill_spans(&refresh, "Refresh", theme));
    spans.extend(pill_spans("\u{2191}\u{2193}", "Nav", theme));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg),
        ),
    ]
}
