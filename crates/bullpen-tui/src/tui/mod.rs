// Terminal viewer: layout, input handling, and widget rendering.
//
// The viewer is read-only. It is handed a fully graded session (fresh or
// loaded from the store) plus per-pitcher history, and redraws after every
// key press until the user quits.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use bullpen_core::records::{PitchRow, SummaryRow};
use bullpen_grading::trend::TrendMode;
use bullpen_grading::zone::StrikeZone;
use chrono::NaiveDate;
use crossterm::event::{self, Event};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use layout::{build_layout, AppLayout};

/// Idle wait between input polls.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// TabId
// ---------------------------------------------------------------------------

/// Main-panel tabs, in key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Pitches,
    Zone,
    Heatmap,
    Trend,
}

impl TabId {
    pub const ALL: [TabId; 4] = [TabId::Pitches, TabId::Zone, TabId::Heatmap, TabId::Trend];

    pub fn label(self) -> &'static str {
        match self {
            TabId::Pitches => "Pitches",
            TabId::Zone => "Zone",
            TabId::Heatmap => "Heatmap",
            TabId::Trend => "Trend",
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Everything the viewer draws.
pub struct ViewState {
    pub session_date: NaiveDate,
    /// File name or "stored" for sessions loaded from the database.
    pub source: String,
    pub zone: StrikeZone,
    /// In upload order.
    pub pitches: Vec<PitchRow>,
    /// Alphabetical by pitcher.
    pub summaries: Vec<SummaryRow>,
    /// Stored sessions per pitcher, used by the trend tab.
    pub history: HashMap<String, Vec<SummaryRow>>,
    /// Pitchers in this session, alphabetical.
    pub pitchers: Vec<String>,
    /// Index into `pitchers`; `None` shows everyone.
    pub selected_pitcher: Option<usize>,
    pub active_tab: TabId,
    /// First visible row of the pitch table.
    pub scroll_offset: usize,
    pub trend_mode: TrendMode,
}

impl ViewState {
    pub fn new(
        session_date: NaiveDate,
        source: impl Into<String>,
        zone: StrikeZone,
        pitches: Vec<PitchRow>,
        summaries: Vec<SummaryRow>,
        history: HashMap<String, Vec<SummaryRow>>,
    ) -> Self {
        let mut pitchers: Vec<String> = summaries.iter().map(|s| s.pitcher.clone()).collect();
        pitchers.sort();
        pitchers.dedup();

        ViewState {
            session_date,
            source: source.into(),
            zone,
            pitches,
            summaries,
            history,
            pitchers,
            selected_pitcher: None,
            active_tab: TabId::Pitches,
            scroll_offset: 0,
            trend_mode: TrendMode::default(),
        }
    }

    /// Currently selected pitcher, or `None` for "All".
    pub fn pitcher_filter(&self) -> Option<&str> {
        self.selected_pitcher
            .and_then(|i| self.pitchers.get(i))
            .map(String::as_str)
    }

    pub fn pitcher_label(&self) -> &str {
        self.pitcher_filter().unwrap_or("All")
    }

    /// Pitches matching the pitcher filter, in upload order.
    pub fn visible_pitches(&self) -> Vec<&PitchRow> {
        match self.pitcher_filter() {
            Some(name) => self.pitches.iter().filter(|p| p.pitcher == name).collect(),
            None => self.pitches.iter().collect(),
        }
    }

    /// Stored history for the selected pitcher.
    pub fn selected_history(&self) -> Option<&[SummaryRow]> {
        self.pitcher_filter()
            .and_then(|name| self.history.get(name))
            .map(Vec::as_slice)
    }

    /// Step the pitcher filter through All -> first -> ... -> last -> All.
    pub fn cycle_pitcher(&mut self, forward: bool) {
        let n = self.pitchers.len();
        if n == 0 {
            self.selected_pitcher = None;
            return;
        }
        self.selected_pitcher = match (self.selected_pitcher, forward) {
            (None, true) => Some(0),
            (None, false) => Some(n - 1),
            (Some(i), true) if i + 1 < n => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        self.scroll_offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete viewer frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    widgets::summary::render(frame, layout.summary, state);
    render_help_bar(frame, &layout);
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.active_tab {
        TabId::Pitches => widgets::pitch_table::render(frame, layout.main_panel, state),
        TabId::Zone => widgets::zone_plot::render(frame, layout.main_panel, state),
        TabId::Heatmap => widgets::heatmap::render(frame, layout.main_panel, state),
        TabId::Trend => widgets::trend_chart::render(frame, layout.main_panel, state),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " q:Quit | 1-4:Tabs | \u{2190}/\u{2192}:Pitcher | \u{2191}/\u{2193}:Scroll | m:Trend mode";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the viewer until the user quits.
///
/// Takes over the terminal (raw mode, alternate screen), installs a panic
/// hook that restores it, and polls for key events between redraws.
pub fn run(mut state: ViewState) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = (|| -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| render_frame(frame, &state))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            if let Event::Key(key_event) = event::read()? {
                if input::handle_key(key_event, &mut state) {
                    return Ok(());
                }
            }
        }
    })();

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
