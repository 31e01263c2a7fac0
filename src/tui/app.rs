//! Application state and event loop

use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::services::ReportExtractor;
use crate::session::{PendingAction, Session, ViewMode};
use crate::types::{ExtractError, ReportRecord};

use super::theme::Theme;
use super::widgets::{
    confirm::{ConfirmChoice, ConfirmPopup},
    days::DaysView,
    help::HelpPopup,
    input::InputView,
    overview::Overview,
    spinner::Spinner,
    suggestions::SuggestionsView,
    tabs::Tab,
};

type ExtractResult = Result<Vec<ReportRecord>, ExtractError>;

/// Main application
pub struct App {
    session: Session,
    current_tab: Tab,
    show_help: bool,
    confirm_choice: ConfirmChoice,
    spinner_frame: usize,
    suggestions_scroll: usize,
    should_quit: bool,
    theme: Theme,
    /// Text waiting to be handed to the extraction thread
    outgoing: Option<String>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            session: Session::new(),
            current_tab: Tab::default(),
            show_help: false,
            confirm_choice: ConfirmChoice::default(),
            spinner_frame: 0,
            suggestions_scroll: 0,
            should_quit: false,
            theme,
            outgoing: None,
        }
    }

    /// Pre-fill the input buffer
    pub fn with_input(mut self, text: &str) -> Self {
        self.session.push_str(text);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle terminal events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => {
                if self.session.view_mode() == ViewMode::Input
                    && self.session.pending().is_none()
                {
                    self.session.push_str(&text);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.session.pending().is_some() {
            self.handle_confirm_key(key);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.session.view_mode() {
            ViewMode::Input => self.handle_input_key(key),
            ViewMode::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('u') if ctrl => self.session.clear_input(),
            KeyCode::Char(c) if !ctrl => self.session.push_char(c),
            KeyCode::Enter => self.session.push_char('\n'),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Esc => {
                if !self.session.dismiss_error() {
                    self.session.set_view_mode(ViewMode::Dashboard);
                }
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.current_tab = self.current_tab.next();
            }
            KeyCode::BackTab => {
                self.current_tab = self.current_tab.prev();
            }
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                    self.current_tab = tab;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Char('x') | KeyCode::Delete if self.current_tab == Tab::Days => {
                self.confirm_choice = ConfirmChoice::default();
                self.session.request_remove_selected();
            }
            KeyCode::Char('c') => {
                self.confirm_choice = ConfirmChoice::default();
                self.session.request_clear_all();
            }
            KeyCode::Char('i') | KeyCode::Char('n') => {
                self.session.set_view_mode(ViewMode::Input);
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_pending(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.session.cancel(),
            KeyCode::Enter => match self.confirm_choice {
                ConfirmChoice::Yes => self.confirm_pending(),
                ConfirmChoice::No => self.session.cancel(),
            },
            _ => {}
        }
    }

    fn confirm_pending(&mut self) {
        self.session.confirm();
        self.confirm_choice = ConfirmChoice::default();
        let rows = self.suggestion_count();
        self.suggestions_scroll = self.suggestions_scroll.min(rows.saturating_sub(1));
    }

    fn suggestion_count(&self) -> usize {
        self.session
            .records()
            .iter()
            .map(|r| r.suggestions.len())
            .sum()
    }

    fn move_up(&mut self) {
        match self.current_tab {
            Tab::Days => self.session.select_prev(),
            Tab::Suggestions => {
                self.suggestions_scroll = self.suggestions_scroll.saturating_sub(1);
            }
            Tab::Overview => {}
        }
    }

    fn move_down(&mut self) {
        match self.current_tab {
            Tab::Days => self.session.select_next(),
            Tab::Suggestions => {
                let max = self.suggestion_count().saturating_sub(1);
                self.suggestions_scroll = (self.suggestions_scroll + 1).min(max);
            }
            Tab::Overview => {}
        }
    }

    /// Queue the input buffer for extraction
    fn submit(&mut self) {
        if let Some(text) = self.session.begin_submit() {
            self.spinner_frame = 0;
            self.outgoing = Some(text);
        }
    }

    /// Take the text queued by the last submission
    pub fn take_outgoing(&mut self) -> Option<String> {
        self.outgoing.take()
    }

    /// Apply an extraction result delivered by the background thread
    pub fn finish_submission(&mut self, result: ExtractResult) {
        if self.session.finish_submit(result).is_ok() {
            self.current_tab = Tab::Overview;
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.session.is_busy() {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        InputView::new(self.session.input(), self.theme)
            .busy(self.session.is_busy(), self.spinner_frame)
            .error(self.session.error())
            .record_count(self.session.records().len())
            .render(area, buf);
    }

    fn render_confirm(&self, action: PendingAction, area: Rect, buf: &mut Buffer) {
        let (title, question) = match action {
            PendingAction::ClearAll => (
                "Clear all",
                "Remove every day from this session?".to_string(),
            ),
            PendingAction::Remove(index) => {
                let date = self
                    .session
                    .records()
                    .get(index)
                    .map(|r| r.date_label())
                    .unwrap_or_default();
                ("Remove day", format!("Remove {} from this session?", date))
            }
        };
        let popup_area = ConfirmPopup::centered_area(area);
        ConfirmPopup::new(title, &question, self.confirm_choice, self.theme)
            .render(popup_area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.session.view_mode(), self.session.stats()) {
            (ViewMode::Dashboard, Some(stats)) => {
                match self.current_tab {
                    Tab::Overview => Overview::new(&stats, self.theme).render(area, buf),
                    Tab::Days => DaysView::new(
                        self.session.records(),
                        self.session.selected_index(),
                        self.theme,
                    )
                    .render(area, buf),
                    Tab::Suggestions => {
                        SuggestionsView::new(&stats.suggestions, self.suggestions_scroll, self.theme)
                            .render(area, buf)
                    }
                }

                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            _ => self.render_input(area, buf),
        }

        if let Some(action) = self.session.pending() {
            self.render_confirm(action, area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(extractor: Arc<dyn ReportExtractor>, initial_input: Option<String>) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let mut app = App::new(theme);
    if let Some(text) = initial_input {
        app = app.with_input(&text);
    }

    let mut terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableBracketedPaste)
        .map_err(anyhow::Error::from)
        .and_then(|_| run_app(&mut terminal, &mut app, extractor));
    let _ = execute!(io::stdout(), DisableBracketedPaste);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    extractor: Arc<dyn ReportExtractor>,
) -> anyhow::Result<()> {
    let (result_tx, result_rx) = mpsc::channel::<ExtractResult>();

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Hand a new submission to a background thread
        if let Some(text) = app.take_outgoing() {
            let extractor = Arc::clone(&extractor);
            let tx = result_tx.clone();
            thread::spawn(move || {
                let _ = tx.send(extractor.extract(&text));
            });
        }

        // Check for extraction completion (non-blocking)
        if let Ok(result) = result_rx.try_recv() {
            app.finish_submission(result);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn make_record(date: &str, suggestions: &[&str]) -> ReportRecord {
        ReportRecord {
            report_date: date.to_string(),
            total_duration_minutes: Some(480),
            efficiency_score: 80,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            ..ReportRecord::default()
        }
    }

    /// App on the dashboard with three days loaded
    fn make_ready_app() -> App {
        let mut app = App::new(Theme::Dark).with_input("three days of reports");
        app.handle_event(ctrl('s'));
        app.take_outgoing().unwrap();
        app.finish_submission(Ok(vec![
            make_record("12/22", &["a", "b"]),
            make_record("12/23", &[]),
            make_record("12/24", &["c"]),
        ]));
        app
    }

    fn render_to_string(app: &App) -> String {
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    // ========== input view tests ==========

    #[test]
    fn test_app_initial_state() {
        let app = App::new(Theme::Dark);
        assert_eq!(app.session().view_mode(), ViewMode::Input);
        assert_eq!(app.current_tab, Tab::Overview);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_typing_builds_input() {
        let mut app = App::new(Theme::Dark);
        for c in "12/22".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));
        app.handle_event(key(KeyCode::Char('x')));
        app.handle_event(key(KeyCode::Backspace));

        assert_eq!(app.session().input(), "12/22\n");
    }

    #[test]
    fn test_q_types_in_input_view() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.session().input(), "q");
    }

    #[test]
    fn test_paste_appends_to_input() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(Event::Paste("line one\r\nline two".into()));
        assert_eq!(app.session().input(), "line one\nline two");
    }

    #[test]
    fn test_ctrl_u_clears_input() {
        let mut app = App::new(Theme::Dark).with_input("draft");
        app.handle_event(ctrl('u'));
        assert_eq!(app.session().input(), "");
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(ctrl('c'));
        assert!(app.should_quit());

        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(ctrl('c'));
        assert!(app.should_quit());
    }

    // ========== submission tests ==========

    #[test]
    fn test_submit_blank_queues_nothing() {
        let mut app = App::new(Theme::Dark).with_input("   \n ");
        app.handle_event(ctrl('s'));
        assert!(app.take_outgoing().is_none());
        assert!(!app.session().is_busy());
    }

    #[test]
    fn test_submit_queues_once_while_busy() {
        let mut app = App::new(Theme::Dark).with_input("12/22 report");
        app.handle_event(ctrl('s'));

        assert_eq!(app.take_outgoing().as_deref(), Some("12/22 report"));
        assert!(app.session().is_busy());

        app.handle_event(ctrl('s'));
        app.handle_event(key(KeyCode::Char('z')));
        assert!(app.take_outgoing().is_none());
        assert_eq!(app.session().input(), "12/22 report");
    }

    #[test]
    fn test_finish_success_shows_dashboard() {
        let app = make_ready_app();
        assert_eq!(app.session().view_mode(), ViewMode::Dashboard);
        assert_eq!(app.session().records().len(), 3);
        assert_eq!(app.current_tab, Tab::Overview);
        assert_eq!(app.session().input(), "");
    }

    #[test]
    fn test_finish_failure_stays_on_input() {
        let mut app = App::new(Theme::Dark).with_input("report");
        app.handle_event(ctrl('s'));
        app.take_outgoing();
        app.finish_submission(Err(ExtractError::TruncatedResponse));

        assert_eq!(app.session().view_mode(), ViewMode::Input);
        assert!(app.session().error().is_some());
        assert!(render_to_string(&app).contains("Analysis failed"));
    }

    #[test]
    fn test_tick_advances_spinner_only_when_busy() {
        let mut app = App::new(Theme::Dark).with_input("report");
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        app.handle_event(ctrl('s'));
        app.tick();
        assert_eq!(app.spinner_frame, 1);
    }

    // ========== dashboard navigation tests ==========

    #[test]
    fn test_q_quits_dashboard() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = make_ready_app();

        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Days);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Suggestions);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Overview);

        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::SHIFT,
        )));
        assert_eq!(app.current_tab, Tab::Suggestions);
    }

    #[test]
    fn test_number_key_navigation() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('2')));
        assert_eq!(app.current_tab, Tab::Days);
        app.handle_event(key(KeyCode::Char('3')));
        assert_eq!(app.current_tab, Tab::Suggestions);
        app.handle_event(key(KeyCode::Char('1')));
        assert_eq!(app.current_tab, Tab::Overview);
    }

    #[test]
    fn test_days_selection_keys() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('2')));

        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.session().selected_index(), Some(0));
        app.handle_event(key(KeyCode::Char('j')));
        assert_eq!(app.session().selected_index(), Some(1));
        app.handle_event(key(KeyCode::Char('k')));
        assert_eq!(app.session().selected_index(), Some(0));
    }

    #[test]
    fn test_suggestions_scroll_bounded() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('3')));

        for _ in 0..10 {
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.suggestions_scroll, 2);

        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.suggestions_scroll, 1);
    }

    #[test]
    fn test_input_and_escape_switch_views() {
        let mut app = make_ready_app();

        app.handle_event(key(KeyCode::Char('i')));
        assert_eq!(app.session().view_mode(), ViewMode::Input);

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.session().view_mode(), ViewMode::Dashboard);
    }

    #[test]
    fn test_escape_dismisses_error_first() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('i')));
        app.handle_event(key(KeyCode::Char('x')));
        app.handle_event(ctrl('s'));
        app.take_outgoing();
        app.finish_submission(Err(ExtractError::NoResults));
        assert!(render_to_string(&app).contains("Analysis failed"));

        app.handle_event(key(KeyCode::Esc));
        assert!(app.session().error().is_none());
        assert_eq!(app.session().view_mode(), ViewMode::Input);
        assert!(!render_to_string(&app).contains("Analysis failed"));

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.session().view_mode(), ViewMode::Dashboard);
    }

    #[test]
    fn test_records_kept_while_busy() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('i')));
        app.handle_event(key(KeyCode::Char('x')));
        app.handle_event(ctrl('s'));
        assert!(app.session().is_busy());

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.session().view_mode(), ViewMode::Input);

        app.session.set_view_mode(ViewMode::Dashboard);
        app.handle_event(key(KeyCode::Char('c')));
        assert!(app.session().pending().is_none());
        assert_eq!(app.session().records().len(), 3);
    }

    #[test]
    fn test_escape_without_records_stays_on_input() {
        let mut app = App::new(Theme::Dark);
        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.session().view_mode(), ViewMode::Input);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);

        // Keys other than ?/Esc are swallowed while help is open
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit());

        app.handle_event(key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    // ========== confirmation tests ==========

    #[test]
    fn test_remove_needs_selection_and_days_tab() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('x')));
        assert!(app.session().pending().is_none());

        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Char('x')));
        assert!(app.session().pending().is_none());

        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Delete));
        assert_eq!(app.session().pending(), Some(PendingAction::Remove(0)));
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('c')));
        assert_eq!(app.confirm_choice, ConfirmChoice::No);

        app.handle_event(key(KeyCode::Enter));
        assert!(app.session().pending().is_none());
        assert_eq!(app.session().records().len(), 3);
    }

    #[test]
    fn test_remove_confirmed_with_y() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Up)); // selects last
        app.handle_event(key(KeyCode::Char('x')));
        app.handle_event(key(KeyCode::Char('y')));

        assert_eq!(app.session().records().len(), 2);
        assert_eq!(app.session().selected_index(), Some(1));
    }

    #[test]
    fn test_clear_all_confirmed_returns_to_input() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.confirm_choice, ConfirmChoice::Yes);
        app.handle_event(key(KeyCode::Enter));

        assert!(app.session().records().is_empty());
        assert_eq!(app.session().view_mode(), ViewMode::Input);
        assert_eq!(app.confirm_choice, ConfirmChoice::No);
    }

    #[test]
    fn test_confirm_esc_cancels() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('c')));
        app.handle_event(key(KeyCode::Esc));
        assert!(app.session().pending().is_none());
        assert_eq!(app.session().view_mode(), ViewMode::Dashboard);
    }

    // ========== render tests ==========

    #[test]
    fn test_render_each_tab() {
        let mut app = make_ready_app();
        assert!(render_to_string(&app).contains("Days Entered"));

        app.handle_event(key(KeyCode::Char('2')));
        assert!(render_to_string(&app).contains("Day detail"));

        app.handle_event(key(KeyCode::Char('3')));
        assert!(render_to_string(&app).contains("Improvement Suggestions"));
    }

    #[test]
    fn test_render_confirm_popup() {
        let mut app = make_ready_app();
        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Char('x')));

        let content = render_to_string(&app);
        assert!(content.contains("Remove 12/22 from this session?"));
    }

    #[test]
    fn test_render_busy_input() {
        let mut app = App::new(Theme::Dark).with_input("report");
        app.handle_event(ctrl('s'));
        assert!(render_to_string(&app).contains("Analyzing reports..."));
    }
}
