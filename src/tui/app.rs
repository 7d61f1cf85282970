//! Preview application state and main event loop

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use super::activate::CellActivator;
use super::debug_log::DebugLogState;
use super::log_capture::LogBuffer;
use super::platform::{PlatformNotice, TerminalPlatform};
use super::transcript::{selected_option_count, TranscriptState};
use super::ui;
use crate::config::{Config, RenderContext};
use crate::dispatch::{EventSink, InteractionEvent, MessageRenderDispatcher};
use crate::models::{ChatMessage, ChatUser, ContentItem, RichElement};

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// Debug log lines moved per PageUp/PageDown.
const LOG_PAGE: usize = 5;

/// Application state
pub struct App {
    pub should_exit: bool,
    pub transcript: TranscriptState,
    pub ctx: RenderContext,
    pub platform: TerminalPlatform,
    notices: UnboundedReceiver<PlatformNotice>,
    sink: EventSink,
    events: UnboundedReceiver<InteractionEvent>,
    /// Sender of messages typed on the user's behalf.
    customer: ChatUser,
    pub status: Option<String>,
    pub status_is_error: bool,
    /// Link waiting in the share popup.
    pub share_url: Option<Url>,
    pub show_help: bool,
    pub debug_log: DebugLogState,
}

impl App {
    pub fn new(transcript: TranscriptState, config: &Config, logs: LogBuffer) -> Self {
        let (platform, notices) = TerminalPlatform::new(config.opener());
        let (sink, events) = EventSink::new();
        let customer = transcript
            .messages()
            .iter()
            .rev()
            .map(|m| &m.user)
            .find(|u| !u.is_agent())
            .cloned()
            .unwrap_or_else(|| ChatUser::customer("preview-customer", "You"));

        Self {
            should_exit: false,
            transcript,
            ctx: config.render_context(),
            platform,
            notices,
            sink,
            events,
            customer,
            status: None,
            status_is_error: false,
            share_url: None,
            show_help: false,
            debug_log: DebugLogState::new(logs),
        }
    }

    /// Handle input events
    pub fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(FRAME_DURATION_MS))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key(key_event.code);
                }
                Event::Resize(_, _) => {
                    // Redrawn on the next frame.
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }
        if self.share_url.is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                self.share_url = None;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('d') => self.debug_log.toggle(),
            KeyCode::PageUp => self.debug_log.scroll_up(LOG_PAGE),
            KeyCode::PageDown => self.debug_log.scroll_down(LOG_PAGE),
            KeyCode::Esc => self.status = None,
            KeyCode::Up | KeyCode::Char('k') => self.transcript.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.transcript.select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.transcript.select_previous_option(),
            KeyCode::Right | KeyCode::Char('l') => {
                let count = selected_option_count(&self.transcript, &self.platform);
                self.transcript.select_next_option(count);
            }
            KeyCode::Enter => self.activate_selected(),
            _ => {}
        }
    }

    /// Fire the selected option of the selected cell through the dispatcher.
    /// Cells without options toggle their date header instead.
    fn activate_selected(&mut self) {
        let Some(message) = self.transcript.selected_message() else {
            return;
        };
        let dispatcher = MessageRenderDispatcher::new(&self.platform);
        let mut activator = CellActivator::new(self.transcript.selected_option, &self.platform);
        dispatcher.render(
            &mut activator,
            message,
            self.transcript.selected_position(),
            &mut self.sink.callback(),
        );

        if !activator.fired() {
            self.transcript.toggle_date_header();
        }
        self.drain_channels();
    }

    /// Apply interaction events and platform notices produced since the last
    /// frame.
    pub fn drain_channels(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            tracing::info!(
                "Selected {:?} (text to send: {:?})",
                element_label(&event.element),
                event.text_to_send
            );
            match event.text_to_send.filter(|text| !text.is_empty()) {
                Some(text) => {
                    self.set_status(format!("Sent \"{}\"", text));
                    let reply =
                        ChatMessage::new(self.customer.clone(), Utc::now(), vec![ContentItem::Text(text)]);
                    self.transcript.push(reply);
                }
                None => self.set_status(format!("Selected {}", element_label(&event.element))),
            }
        }

        while let Ok(notice) = self.notices.try_recv() {
            match notice {
                PlatformNotice::Opened(url) => self.set_status(format!("Opened {}", url)),
                PlatformNotice::OpenFailed(url) => {
                    self.set_error(format!("Could not open {} (see log: d)", url))
                }
                PlatformNotice::Copied(url) => {
                    self.set_status(format!("Copied {} to clipboard", url))
                }
                PlatformNotice::Shared(url) => self.share_url = Some(url),
            }
        }
    }

    fn set_status(&mut self, status: String) {
        self.status = Some(status);
        self.status_is_error = false;
    }

    fn set_error(&mut self, status: String) {
        self.status = Some(status);
        self.status_is_error = true;
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

fn element_label(element: &RichElement) -> &str {
    match element {
        RichElement::Button(button) => &button.title,
        RichElement::Text(text) | RichElement::Title(text) => text,
        RichElement::File(file) => &file.friendly_name,
    }
}

/// Run the preview with panic-safe terminal restore
pub fn run(transcript: TranscriptState, config: &Config, logs: LogBuffer) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = catch_unwind(AssertUnwindSafe(|| {
        run_app(&mut terminal, App::new(transcript, config, logs))
    }));
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    tracing::info!(
        "Previewing {} messages from {}",
        app.transcript.messages().len(),
        app.transcript.header
    );

    while !app.should_exit {
        app.drain_channels();
        app.debug_log.refresh();
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mock;

    fn app_with_opener(opener: &str) -> App {
        let transcript = TranscriptState::new("mock", mock::mock_transcript().unwrap());
        let config = Config {
            opener: Some(opener.to_string()),
            ..Config::default()
        };
        App::new(transcript, &config, LogBuffer::new())
    }

    fn app() -> App {
        app_with_opener("true")
    }

    fn select(app: &mut App, index: usize) {
        app.transcript.selected = 0;
        for _ in 0..index {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.transcript.selected, index);
    }

    #[test]
    fn test_quick_reply_appends_customer_message() {
        let mut app = app();
        let before = app.transcript.messages().len();
        select(&mut app, 4);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Enter);

        let messages = app.transcript.messages();
        assert_eq!(messages.len(), before + 1);
        let last = messages.last().unwrap();
        assert!(!last.user.is_agent());
        assert_eq!(last.types, vec![ContentItem::Text("Replacement".to_string())]);
        assert_eq!(app.transcript.selected, before);
        assert_eq!(app.status.as_deref(), Some("Sent \"Replacement\""));
    }

    #[test]
    fn test_menu_selection_sends_nothing() {
        let mut app = app();
        let before = app.transcript.messages().len();
        select(&mut app, 8);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.transcript.messages().len(), before);
        assert!(app.status.as_deref().unwrap().starts_with("Selected"));
    }

    #[test]
    fn test_enter_on_text_toggles_date_header() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        let first = app.transcript.messages()[0].clone();
        assert!(app.transcript.shows_date_header(&first));
        app.handle_key(KeyCode::Enter);
        assert!(!app.transcript.shows_date_header(&first));
    }

    #[test]
    fn test_share_opens_popup_until_escape() {
        let mut app = app();
        select(&mut app, 3);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.share_url, Some(mock::link_preview_item().unwrap().url));

        // Popup swallows navigation.
        app.handle_key(KeyCode::Down);
        assert_eq!(app.transcript.selected, 3);
        app.handle_key(KeyCode::Esc);
        assert!(app.share_url.is_none());
    }

    #[test]
    fn test_open_result_reaches_status_line() {
        let mut app = app();
        select(&mut app, 3);
        app.handle_key(KeyCode::Enter);
        assert!(app.status.as_deref().unwrap().starts_with("Opened "));
        assert!(!app.status_is_error);

        let mut app = app_with_opener("false");
        select(&mut app, 3);
        app.handle_key(KeyCode::Enter);
        assert!(app.status.as_deref().unwrap().starts_with("Could not open "));
        assert!(app.status_is_error);
    }

    #[test]
    fn test_option_cursor_is_clamped() {
        let mut app = app();
        select(&mut app, 4);
        for _ in 0..5 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.transcript.selected_option, 1);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.transcript.selected_option, 0);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        app.handle_key(KeyCode::Char('?'));
        assert!(app.show_help);
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_exit);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_exit);
    }

    #[test]
    fn test_draws_into_test_backend() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = app();
        app.debug_log.toggle();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Chat Cells"));
        assert!(text.contains("mock"));
        assert!(text.contains("Log"));
    }
}
