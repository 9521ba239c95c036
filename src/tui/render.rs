use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::flatten::{EntryKind, Row, RowKind, search_matcher};

use super::app::{App, Mode};

/// Rows above the tree (the search bar).
pub const HEADER_ROWS: u16 = 1;

/// Paint the whole screen: search bar, tree, status row.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_tree(frame, app, chunks[1]);
    render_status_row(frame, app, chunks[2]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.mode == Mode::Search;
    let query = if focused {
        app.search_input.as_str()
    } else {
        app.engine.search_query()
    };

    let style = if focused {
        Style::default().fg(app.theme.text_bright).bg(app.theme.background)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    };

    let mut spans = vec![Span::styled(" / ", style)];
    if query.is_empty() && !focused {
        spans.push(Span::styled("search", Style::default().fg(app.theme.dim)));
    } else {
        spans.push(Span::styled(query.to_string(), style));
    }
    if focused {
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().fg(app.theme.highlight),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn render_tree(frame: &mut Frame, app: &mut App, area: Rect) {
    app.viewport.set_height(u32::from(area.height));
    let total = app.engine.rows().len();
    // Re-clamp after the sequence shrank (deletion, collapse).
    app.viewport.scroll_by(0, total);

    if total == 0 {
        let empty = Paragraph::new(" no matches")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let search_re = search_matcher(app.engine.search_query());
    let active_path = app.engine.active_path();
    let first = app.viewport.first_visible();
    let cursor = app.engine.cursor_index();
    let drag_over = app.drag.as_ref().filter(|d| d.moved).and_then(|d| d.over);

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    for index in app.viewport.visible_range(total) {
        // Overscan rows sit outside the paintable area.
        if index < first || index - first >= area.height as usize {
            continue;
        }
        let row = &app.engine.rows()[index];
        lines.push(render_row(
            app,
            row,
            RowFlags {
                is_cursor: cursor == Some(index),
                is_selected: app.engine.is_selected(&row.virtual_id),
                is_drop_target: drag_over == Some(index),
                on_active_path: matches!(
                    &row.kind,
                    RowKind::Folder { id, .. } if active_path.iter().any(|a| a == id)
                ),
            },
            area.width as usize,
            search_re.as_ref(),
        ));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

struct RowFlags {
    is_cursor: bool,
    is_selected: bool,
    is_drop_target: bool,
    on_active_path: bool,
}

fn render_row<'a>(
    app: &App,
    row: &Row,
    flags: RowFlags,
    width: usize,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = if flags.is_selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg).fg(if flags.is_cursor {
        theme.text_bright
    } else if flags.on_active_path {
        theme.cyan
    } else {
        theme.text
    });
    let match_style = Style::default()
        .bg(theme.search_match_bg)
        .fg(theme.search_match_fg);

    let mut spans: Vec<Span> = Vec::new();
    let indent = "  ".repeat(row.depth.indent_steps());
    spans.push(Span::styled(indent, base));

    match &row.kind {
        RowKind::PinnedHeader { collapsed } => {
            let arrow = if *collapsed { "\u{25b8} " } else { "\u{25be} " };
            spans.push(Span::styled(arrow, base.fg(theme.yellow)));
            spans.push(Span::styled(
                "Pinned",
                base.fg(theme.yellow).add_modifier(Modifier::BOLD),
            ));
        }
        RowKind::PinnedSnippet { id, dirty } => {
            spans.push(Span::styled("\u{2605} ", base.fg(theme.yellow)));
            push_title(app, &mut spans, id, base, match_style, search_re);
            if *dirty {
                spans.push(Span::styled(" \u{25cf}", base.fg(theme.green)));
            }
        }
        RowKind::Folder { id, collapsed, editing } => {
            let arrow = if *collapsed { "\u{25b8} " } else { "\u{25be} " };
            let folder_style = if flags.is_drop_target {
                base.fg(theme.drop_target).add_modifier(Modifier::BOLD)
            } else {
                base
            };
            spans.push(Span::styled(arrow, folder_style));
            if *editing {
                push_edit_buffer(app, &mut spans, folder_style);
            } else {
                let name = app
                    .library
                    .folder(id)
                    .map(|f| f.name.clone())
                    .unwrap_or_else(|| id.clone());
                push_highlighted_spans(&mut spans, &name, folder_style, match_style, search_re);
                spans.push(Span::styled(
                    format!(" ({})", app.engine.folder_count(id)),
                    folder_style.fg(theme.dim),
                ));
            }
        }
        RowKind::Snippet {
            id,
            pinned,
            draft,
            dirty,
            editing,
        } => {
            let bullet = if *draft { "\u{25cb} " } else { "\u{2022} " };
            spans.push(Span::styled(bullet, base.fg(theme.dim)));
            if *editing {
                push_edit_buffer(app, &mut spans, base);
            } else {
                push_title(app, &mut spans, id, base, match_style, search_re);
            }
            if *pinned {
                spans.push(Span::styled(" \u{2605}", base.fg(theme.yellow)));
            }
            if *dirty {
                spans.push(Span::styled(" \u{25cf}", base.fg(theme.green)));
            }
        }
        RowKind::CreationInput { kind, .. } => {
            let label = match kind {
                EntryKind::Folder => "+ folder: ",
                EntryKind::Snippet => "+ snippet: ",
            };
            spans.push(Span::styled(label, base.fg(theme.highlight)));
            push_edit_buffer(app, &mut spans, base.fg(theme.text_bright));
        }
        RowKind::FooterSpacer => {}
    }

    truncate_spans(&mut spans, width);
    Line::from(spans).style(Style::default().bg(bg))
}

fn push_title<'a>(
    app: &App,
    spans: &mut Vec<Span<'a>>,
    id: &str,
    base: Style,
    match_style: Style,
    search_re: Option<&Regex>,
) {
    let title = app
        .library
        .snippet(id)
        .map(|s| s.title.clone())
        .unwrap_or_else(|| id.to_string());
    push_highlighted_spans(spans, &title, base, match_style, search_re);
}

fn push_edit_buffer<'a>(app: &App, spans: &mut Vec<Span<'a>>, style: Style) {
    spans.push(Span::styled(app.edit_buffer.clone(), style));
    spans.push(Span::styled(
        "\u{2588}",
        style.fg(app.theme.highlight),
    ));
}

/// Push spans for text with regex match highlighting. If no regex or no
/// matches, pushes a single span with `base_style`.
fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    let mut has_match = false;
    for m in re.find_iter(text) {
        has_match = true;
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if !has_match {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Trim trailing spans so the line never exceeds the terminal width.
fn truncate_spans(spans: &mut Vec<Span>, width: usize) {
    let mut used = 0;
    let mut keep = spans.len();
    for (i, span) in spans.iter_mut().enumerate() {
        let w = span.content.width();
        if used + w <= width {
            used += w;
            continue;
        }
        let budget = width.saturating_sub(used);
        let mut taken = String::new();
        let mut taken_w = 0;
        for c in span.content.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if taken_w + cw > budget {
                break;
            }
            taken_w += cw;
            taken.push(c);
        }
        span.content = taken.into();
        keep = i + 1;
        break;
    }
    spans.truncate(keep);
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let style = Style::default().fg(theme.dim).bg(theme.background);

    let mode = match app.mode {
        Mode::Navigate => "NAV",
        Mode::Search => "SEARCH",
        Mode::Edit => "EDIT",
    };
    let left = match &app.status_message {
        Some(message) => format!(" {mode} \u{2502} {message}"),
        None => format!(" {mode}"),
    };

    let selected = app.engine.selection_len();
    let right = if selected > 1 {
        format!("{} snippets \u{00b7} {selected} selected ", app.library.snippets.len())
    } else {
        format!("{} snippets ", app.library.snippets.len())
    };

    let pad = (area.width as usize)
        .saturating_sub(left.width())
        .saturating_sub(right.width());
    let line = Line::from(vec![
        Span::styled(left, style.fg(theme.text)),
        Span::styled(" ".repeat(pad), style),
        Span::styled(right, style),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}
