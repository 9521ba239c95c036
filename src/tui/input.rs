use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::engine::{ClickMods, NavKey};
use crate::flatten::{EntryKind, RowKind};

use super::app::{App, DragState, Mode};
use super::render::HEADER_ROWS;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('q')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }

        (KeyModifiers::NONE, KeyCode::Char('/')) => {
            app.search_input = app.engine.search_query().to_string();
            app.mode = Mode::Search;
        }

        // Esc: drop the search filter first, then the selection.
        (_, KeyCode::Esc) => {
            if !app.engine.search_query().is_empty() {
                app.search_input.clear();
                app.engine.set_search("", &app.library);
            } else {
                app.engine.clear_selection();
            }
        }

        (_, KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Enter) => {
            let nav = match key.code {
                KeyCode::Up => NavKey::Up,
                KeyCode::Down => NavKey::Down,
                KeyCode::Left => NavKey::Left,
                KeyCode::Right => NavKey::Right,
                _ => NavKey::Enter,
            };
            if let Some(index) = app.engine.key(nav, shift, &app.library) {
                app.viewport.scroll_to_item(index);
            }
        }

        // New snippet / new folder under the current folder context
        (KeyModifiers::NONE, KeyCode::Char('n')) => {
            let parent = app.create_parent();
            app.engine
                .begin_create(EntryKind::Snippet, parent, &app.library);
            app.edit_buffer.clear();
            app.mode = Mode::Edit;
        }
        (KeyModifiers::NONE, KeyCode::Char('f')) => {
            let parent = app.create_parent();
            app.engine
                .begin_create(EntryKind::Folder, parent, &app.library);
            app.edit_buffer.clear();
            app.mode = Mode::Edit;
        }

        // Inline rename of the row under the cursor
        (KeyModifiers::NONE, KeyCode::Char('r')) => {
            if let Some(index) = app.engine.cursor_index() {
                let current = app.engine.rows().get(index).and_then(|row| {
                    let (kind, id) = row.real_id()?;
                    match kind {
                        EntryKind::Folder => app.library.folder(id).map(|f| f.name.clone()),
                        EntryKind::Snippet => app.library.snippet(id).map(|s| s.title.clone()),
                    }
                });
                if let Some(current) = current {
                    app.engine.begin_rename(index, &app.library);
                    app.edit_buffer = current;
                    app.mode = Mode::Edit;
                }
            }
        }

        // Context menu for the row under the cursor
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            if let Some(index) = app.engine.cursor_index() {
                app.engine.context_menu(index);
            }
        }

        (_, KeyCode::PageDown) => {
            let page = app.viewport.height() as i32;
            app.viewport.scroll_by(page, app.engine.rows().len());
        }
        (_, KeyCode::PageUp) => {
            let page = app.viewport.height() as i32;
            app.viewport.scroll_by(-page, app.engine.rows().len());
        }

        _ => {}
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.engine.set_search("", &app.library);
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
        }
        // Down leaves the input and enters the result list.
        KeyCode::Down => {
            app.mode = Mode::Navigate;
            if let Some(index) = app.engine.key(NavKey::Down, false, &app.library) {
                app.viewport.scroll_to_item(index);
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.engine.set_search(app.search_input.clone(), &app.library);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.engine.set_search(app.search_input.clone(), &app.library);
        }
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.engine.cancel_edit(&app.library);
            app.edit_buffer.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut app.edit_buffer);
            app.engine.commit_edit(&text, &app.library);
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(c) => {
            app.edit_buffer.push(c);
        }
        _ => {}
    }
}

/// Map a terminal row to an index in the compiled sequence.
fn row_at(app: &App, screen_row: u16) -> Option<usize> {
    let top = HEADER_ROWS;
    if screen_row < top || u32::from(screen_row - top) >= app.viewport.height() {
        return None;
    }
    let index = app.viewport.first_visible() + usize::from(screen_row - top);
    (index < app.engine.rows().len()).then_some(index)
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let mods = ClickMods {
        ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL)
            || mouse.modifiers.contains(KeyModifiers::SUPER),
        shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
    };

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.viewport.scroll_by(3, app.engine.rows().len());
        }
        MouseEventKind::ScrollUp => {
            app.viewport.scroll_by(-3, app.engine.rows().len());
        }

        MouseEventKind::Down(MouseButton::Left) => {
            // A press anywhere blurs the inline input (cancel, per contract).
            if app.mode == Mode::Edit {
                app.engine.cancel_edit(&app.library);
                app.edit_buffer.clear();
                app.mode = Mode::Navigate;
            }
            let index = row_at(app, mouse.row);
            let payload = index
                .and_then(|i| app.engine.drag_payload(i))
                .unwrap_or_default();
            app.drag = Some(DragState {
                payload,
                from_index: index.unwrap_or(usize::MAX),
                over: index,
                moved: false,
            });
        }

        MouseEventKind::Drag(MouseButton::Left) => {
            let over = row_at(app, mouse.row);
            if let Some(drag) = &mut app.drag {
                if over != Some(drag.from_index) {
                    drag.moved = true;
                }
                drag.over = over;
            }
        }

        MouseEventKind::Up(MouseButton::Left) => {
            let Some(drag) = app.drag.take() else {
                return;
            };
            let released_at = row_at(app, mouse.row);

            if drag.moved {
                drop_at(app, &drag, released_at);
            } else {
                match released_at {
                    Some(index) => app.engine.click(index, mods, &app.library),
                    // Background below the tree behaves like the footer.
                    None => app.engine.clear_selection(),
                }
            }
            if app.engine.edit_state().is_none() && app.mode == Mode::Edit {
                app.mode = Mode::Navigate;
            }
        }

        MouseEventKind::Down(MouseButton::Right) => {
            if let Some(index) = row_at(app, mouse.row) {
                app.engine.context_menu(index);
            }
        }

        _ => {}
    }
}

/// Resolve a release position to a drop target. Folder rows take the
/// payload as children; the footer and the background drop to the root;
/// anything else swallows the drop.
fn drop_at(app: &mut App, drag: &DragState, released_at: Option<usize>) {
    let target = match released_at.map(|i| &app.engine.rows()[i].kind) {
        Some(RowKind::Folder { id, .. }) => Some(id.clone()),
        Some(RowKind::FooterSpacer) | None => None,
        Some(_) => return,
    };
    app.engine
        .drop_payload(&drag.payload, target.as_deref(), &app.library);
}
