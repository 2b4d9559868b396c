use gitglance::RepositorySnapshot;
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::constants::{SELECTED_TEXT, SPINNER_FRAMES, SPINNER_INTERVAL_MS};
use super::types::StatusTone;
use crate::report::branch_line;
use crate::theme::{change_color, change_icon};
use crate::tui::app::App;

const GITGLANCE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn ui(frame: &mut Frame, app: &mut App) {
    let size = frame.size();
    let footer_height = footer_height(app, size.width).min(size.height);
    let chunks =
        Layout::vertical([Constraint::Min(0), Constraint::Length(footer_height)]).split(size);
    let columns = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    let color = app.theme_color();
    if let Some(error) = app.error.clone() {
        render_repo_list(frame, columns[0], app);
        render_error(frame, columns[1], &error, color);
    } else if app.snapshots.is_empty() {
        match app.loading_since {
            Some(started_at) => {
                render_loading_column(frame, columns[0], "Repositories", color, started_at)
            }
            None => render_empty_column(
                frame,
                columns[0],
                "Repositories",
                "No repositories",
                color,
            ),
        }
        render_empty_column(frame, columns[1], "Changes", "", color);
    } else {
        render_repo_list(frame, columns[0], app);
        match app.selected_snapshot() {
            Some(snapshot) => render_snapshot(frame, columns[1], snapshot, color),
            None => render_empty_column(
                frame,
                columns[1],
                "Changes",
                "Nothing to report",
                color,
            ),
        }
    }

    render_status(frame, chunks[1], app);
}

fn render_repo_list(frame: &mut Frame, area: Rect, app: &mut App) {
    let color = app.theme_color();
    let normal = Style::default().fg(color);
    let dim = normal.add_modifier(Modifier::DIM);
    let selected = Style::default().fg(SELECTED_TEXT);
    let selected_index = app.list_state.selected();

    let items: Vec<ListItem> = app
        .visible()
        .into_iter()
        .enumerate()
        .map(|(idx, snapshot)| {
            let is_selected = selected_index == Some(idx);
            let count = snapshot.total_changes();
            let right = if count == 0 {
                "clean".to_string()
            } else {
                count.to_string()
            };
            list_item_with_right_text(
                &snapshot.name,
                &right,
                if is_selected { selected } else { normal },
                if is_selected { selected } else { dim },
                area.width,
            )
        })
        .collect();

    let summary = app.summary();
    let title = if summary.hidden > 0 {
        format!("Repositories ({} of {})", summary.shown, summary.total())
    } else {
        format!("Repositories ({})", summary.total())
    };

    let list = List::new(items)
        .style(normal)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(normal)
                .style(normal),
        )
        .highlight_style(Style::default().bg(color));

    frame.render_stateful_widget(list, area, &mut app.list_state);
    render_block_title(frame, area, &title, color);
}

fn render_snapshot(frame: &mut Frame, area: Rect, snapshot: &RepositorySnapshot, color: Color) {
    let normal = Style::default().fg(color);
    let dim = normal.add_modifier(Modifier::DIM);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(normal)
        .style(normal);
    let inner = inset_h(block.inner(area), 1);
    frame.render_widget(block, area);
    render_block_title(frame, area, &snapshot.name, color);

    let mut lines = Vec::new();
    let branch = branch_line(&snapshot.branch);
    if branch.is_empty() {
        lines.push(Line::from(Span::styled("no branch info", dim)));
    } else {
        lines.push(Line::from(Span::styled(branch, normal.add_modifier(Modifier::BOLD))));
    }
    lines.push(Line::from(""));

    if snapshot.is_unchanged() {
        lines.push(Line::from(Span::styled("no changes", dim)));
    }

    let max_rows = inner.height.saturating_sub(lines.len() as u16) as usize;
    let total = snapshot.total_changes();
    let shown = if total > max_rows {
        max_rows.saturating_sub(1)
    } else {
        total
    };
    for (kind, entry) in snapshot.changes().take(shown) {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", change_icon(kind)), Style::default().fg(change_color(kind))),
            Span::styled(entry.to_string(), normal),
        ]));
    }
    if shown < total {
        lines.push(Line::from(Span::styled(
            format!("(+{} more)", total - shown),
            dim,
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str, color: Color) {
    let border = Style::default().fg(color);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(border);
    let inner = inset_h(block.inner(area), 1);
    frame.render_widget(block, area);
    render_block_title(frame, area, "Something went wrong", color);

    let lines = vec![
        Line::from(Span::styled(
            "Something went wrong:",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn list_item_with_right_text(
    left: &str,
    right: &str,
    left_style: Style,
    right_style: Style,
    width: u16,
) -> ListItem<'static> {
    let content_width = width.saturating_sub(2) as usize;
    if content_width == 0 {
        return ListItem::new(Line::from(Span::raw(String::new())));
    }

    let right_len = right.chars().count();
    if right_len >= content_width {
        let right_text = truncate_to_width(right, content_width);
        return ListItem::new(Line::from(Span::styled(right_text, right_style)));
    }

    let max_left = content_width.saturating_sub(right_len + 1);
    let left_text = truncate_to_width(left, max_left);
    let left_len = left_text.chars().count();
    let padding = content_width.saturating_sub(left_len + right_len);

    ListItem::new(Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(right.to_string(), right_style),
    ]))
}

fn truncate_to_width(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn render_empty_column(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let border_style = Style::default().fg(color);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().fg(color));
    let inner = block.inner(area);

    frame.render_widget(block, area);
    render_block_title(frame, area, title, color);

    if inner.height == 0 || message.is_empty() {
        return;
    }

    let text_area = Rect {
        x: inner.x,
        y: inner.y + inner.height / 2,
        width: inner.width,
        height: 1,
    };
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, text_area);
}

fn render_loading_column(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    started_at: std::time::Instant,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().fg(color));
    let inner = block.inner(area);

    frame.render_widget(block, area);
    render_block_title(frame, area, title, color);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let normal = Style::default().fg(color);
    let dim = normal.add_modifier(Modifier::DIM);
    let line = Line::from(vec![
        Span::styled(spinner_frame(started_at), dim),
        Span::styled(" ", dim),
        Span::styled("Scanning…", normal),
    ]);
    let text_area = Rect {
        x: inner.x,
        y: inner.y + inner.height / 2,
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).style(normal),
        text_area,
    );
}

fn render_block_title(frame: &mut Frame, area: Rect, title: &str, color: Color) {
    if title.is_empty() || area.width < 4 {
        return;
    }

    let width = area.width.saturating_sub(3);
    if width == 0 {
        return;
    }

    let title_area = Rect {
        x: area.x.saturating_add(2),
        y: area.y,
        width,
        height: 1,
    };
    let paragraph = Paragraph::new(title).style(Style::default().fg(color));
    frame.render_widget(paragraph, title_area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let area = inset_h(area, 1);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let color = app.theme_color();
    let normal = Style::default().fg(color);
    let dim = normal.add_modifier(Modifier::DIM);

    if let Some(status) = app.status.as_ref() {
        let (prefix_style, message_style) = match status.tone {
            StatusTone::Success => (dim, normal),
            StatusTone::Error => (
                Style::default().fg(Color::Red),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };
        let line = Line::from(vec![
            Span::styled("→ ", prefix_style),
            Span::styled(status.text.clone(), message_style),
        ]);
        let paragraph = Paragraph::new(line)
            .style(message_style)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let (left_line, _) = build_help_line(app, normal, dim);
    let (right_line, right_len) = build_footer_line(app, normal, dim);
    let right_width = (right_len as u16).min(area.width);
    let columns = Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    if columns[0].width > 0 {
        frame.render_widget(Paragraph::new(left_line).style(normal), columns[0]);
    }
    if columns[1].width > 0 {
        frame.render_widget(
            Paragraph::new(right_line)
                .style(normal)
                .alignment(Alignment::Right),
            columns[1],
        );
    }
}

fn build_help_line(app: &App, normal: Style, dim: Style) -> (Line<'static>, usize) {
    let skip_label = if app.skip_unchanged {
        " show all"
    } else {
        " hide unchanged"
    };
    let items: [(&str, &str); 5] = [
        ("r", " refresh"),
        ("s", skip_label),
        ("o", " open"),
        ("h", " theme"),
        ("q", " quit"),
    ];

    let mut spans = Vec::new();
    let mut len = 0usize;
    for (idx, (key, label)) in items.iter().enumerate() {
        if idx > 0 {
            push_span_owned(&mut spans, " | ".to_string(), dim, &mut len);
        }
        push_span_owned(&mut spans, key.to_string(), normal, &mut len);
        push_span_owned(&mut spans, label.to_string(), dim, &mut len);
    }
    (Line::from(spans), len)
}

fn build_footer_line(app: &App, normal: Style, dim: Style) -> (Line<'static>, usize) {
    let mut spans = Vec::new();
    let mut len = 0usize;
    if let Some(started_at) = app.loading_since {
        push_span_owned(&mut spans, spinner_frame(started_at).to_string(), dim, &mut len);
        push_span_owned(&mut spans, " ".to_string(), dim, &mut len);
    } else if let Some(at) = app.last_refresh {
        let age = format!("{}s ago", at.elapsed().as_secs());
        push_span_owned(&mut spans, age, dim, &mut len);
        push_span_owned(&mut spans, " | ".to_string(), dim, &mut len);
    }
    push_span_owned(&mut spans, app.theme_name().to_string(), dim, &mut len);
    push_span_owned(&mut spans, " | ".to_string(), dim, &mut len);
    let footer = format!("gitglance v{GITGLANCE_VERSION}");
    push_span_owned(&mut spans, footer, normal, &mut len);
    (Line::from(spans), len)
}

fn push_span_owned(spans: &mut Vec<Span<'static>>, text: String, style: Style, len: &mut usize) {
    *len += text.chars().count();
    spans.push(Span::styled(text, style));
}

fn inset_h(area: Rect, padding: u16) -> Rect {
    let padding = padding.min(area.width / 2);
    Rect {
        x: area.x + padding,
        y: area.y,
        width: area.width.saturating_sub(padding * 2),
        height: area.height,
    }
}

fn footer_height(app: &App, width: u16) -> u16 {
    let Some(status) = app.status.as_ref() else {
        return 1;
    };
    let available = width.saturating_sub(2).max(1);
    let paragraph = Paragraph::new(format!("→ {}", status.text)).wrap(Wrap { trim: true });
    (paragraph.line_count(available) as u16).max(1)
}

fn spinner_frame(started_at: std::time::Instant) -> &'static str {
    let elapsed = started_at.elapsed().as_millis();
    let idx = (elapsed / SPINNER_INTERVAL_MS) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}
