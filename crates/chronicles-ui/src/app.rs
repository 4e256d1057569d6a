//! Application state and TUI event loop for the dashboard.
//!
//! [`App`] owns the theme and the active tab. [`App::run_dashboard`] draws a
//! finished [`AnalysisResult`] until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use chronicles_data::analysis::AnalysisResult;
use chronicles_data::filter::FilterOptions;

use crate::dashboard_view::{self, DashboardTab};
use crate::themes::Theme;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Tab currently on screen.
    pub tab: DashboardTab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: DashboardTab::default(),
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Show the dashboard for `result` until `q`, `Q` or `Ctrl+C`.
    ///
    /// `options` describes the full dataset (not just the filtered rows).
    pub fn run_dashboard(
        mut self,
        result: &AnalysisResult,
        options: &FilterOptions,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let outcome = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, result, options)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        outcome
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.tab = self.tab.toggle(),
            _ => {}
        }
    }

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame, result: &AnalysisResult, options: &FilterOptions) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, result, options, self.tab, &self.theme);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
