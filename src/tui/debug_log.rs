//! Toggleable pane showing captured tracing output.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::log_capture::LogBuffer;

/// Scrollback kept by the pane (the capture buffer itself holds less).
const MAX_SCROLLBACK: usize = 1000;

pub struct DebugLogState {
    source: LogBuffer,
    lines: Vec<String>,
    pub visible: bool,
    /// Lines scrolled up from the newest entry.
    scroll_offset: usize,
}

impl DebugLogState {
    pub fn new(source: LogBuffer) -> Self {
        Self {
            source,
            lines: Vec::new(),
            visible: false,
            scroll_offset: 0,
        }
    }

    /// Pull newly captured lines; call once per frame.
    pub fn refresh(&mut self) {
        self.lines.extend(self.source.drain());
        let excess = self.lines.len().saturating_sub(MAX_SCROLLBACK);
        if excess > 0 {
            self.lines.drain(..excess);
            self.scroll_offset = self.scroll_offset.saturating_sub(excess);
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, n: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}

pub fn render(area: Rect, buf: &mut Buffer, state: &DebugLogState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Log ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 {
        return;
    }

    let end = state.lines.len().saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(inner.height as usize);
    let lines: Vec<Line> = state.lines[start..end]
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(level_color(l)))))
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

/// Pick a color from the level column of a fmt-layer line.
fn level_color(line: &str) -> Color {
    [
        (" ERROR ", Color::Red),
        (" WARN ", Color::Yellow),
        (" INFO ", Color::Green),
        (" DEBUG ", Color::DarkGray),
        (" TRACE ", Color::DarkGray),
    ]
    .into_iter()
    .find(|(level, _)| line.contains(level))
    .map_or(Color::White, |(_, color)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> DebugLogState {
        let source = LogBuffer::with_capacity(n.max(1));
        for i in 0..n {
            source.push(format!("2024-03-01T09:15:00Z  INFO line {}", i));
        }
        let mut state = DebugLogState::new(source);
        state.refresh();
        state
    }

    #[test]
    fn test_refresh_accumulates() {
        let state = filled(4);
        assert_eq!(state.lines.len(), 4);
    }

    #[test]
    fn test_scroll_clamps() {
        let mut state = filled(5);
        state.scroll_up(100);
        assert_eq!(state.scroll_offset, 4);
        state.scroll_down(3);
        assert_eq!(state.scroll_offset, 1);
        state.scroll_down(3);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_toggle_resets_scroll() {
        let mut state = filled(5);
        state.scroll_up(2);
        state.toggle();
        assert!(state.visible);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(level_color("ts ERROR boom"), Color::Red);
        assert_eq!(level_color("ts  WARN slow"), Color::Yellow);
        assert_eq!(level_color("ts DEBUG detail"), Color::DarkGray);
        assert_eq!(level_color("plain"), Color::White);
    }
}
