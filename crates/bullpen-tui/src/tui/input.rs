// Keyboard input handling.
//
// Every key is handled locally by mutating `ViewState`; the only signal
// passed back to the loop is whether to quit.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{TabId, ViewState};

/// Rows moved per PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Handle a key event. Returns `true` when the viewer should exit.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> bool {
    // crossterm on Windows reports press and release; act on press only.
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return true;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,

        KeyCode::Char('1') => state.active_tab = TabId::Pitches,
        KeyCode::Char('2') => state.active_tab = TabId::Zone,
        KeyCode::Char('3') => state.active_tab = TabId::Heatmap,
        KeyCode::Char('4') => state.active_tab = TabId::Trend,
        KeyCode::Tab => state.active_tab = next_tab(state.active_tab),

        KeyCode::Right | KeyCode::Char('l') => state.cycle_pitcher(true),
        KeyCode::Left | KeyCode::Char('h') => state.cycle_pitcher(false),

        KeyCode::Up | KeyCode::Char('k') => scroll_up(state, 1),
        KeyCode::Down | KeyCode::Char('j') => scroll_down(state, 1),
        KeyCode::PageUp => scroll_up(state, PAGE_SIZE),
        KeyCode::PageDown => scroll_down(state, PAGE_SIZE),
        KeyCode::Home => state.scroll_offset = 0,

        KeyCode::Char('m') => state.trend_mode = state.trend_mode.toggle(),

        _ => {}
    }
    false
}

fn next_tab(tab: TabId) -> TabId {
    let idx = TabId::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    TabId::ALL[(idx + 1) % TabId::ALL.len()]
}

fn scroll_up(state: &mut ViewState, by: usize) {
    state.scroll_offset = state.scroll_offset.saturating_sub(by);
}

/// Clamped so the last visible pitch stays on screen.
fn scroll_down(state: &mut ViewState, by: usize) {
    let max = state.visible_pitches().len().saturating_sub(1);
    state.scroll_offset = (state.scroll_offset + by).min(max);
}
