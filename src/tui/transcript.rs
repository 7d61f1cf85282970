//! Transcript pane: the conversation as painted cells, with a selected
//! message and a selected option inside it.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use uuid::Uuid;

use super::activate::CellActivator;
use super::cells::CellPainter;
use crate::config::RenderContext;
use crate::dispatch::{MessageRenderDispatcher, PlatformServices};
use crate::models::{group_positions, ChatMessage, MessageGroupPosition};

/// Columns taken by the selection gutter.
const GUTTER_WIDTH: usize = 2;

/// State for the transcript pane.
pub struct TranscriptState {
    /// Pane title (transcript file name or "mock transcript").
    pub header: String,
    messages: Vec<ChatMessage>,
    positions: Vec<MessageGroupPosition>,
    /// Index of the selected message.
    pub selected: usize,
    /// Option inside the selected message, in paint order.
    pub selected_option: usize,
    /// Vertical scroll offset in rendered lines.
    pub scroll_offset: usize,
    /// Messages the user asked to show the date header for.
    date_headers: HashSet<Uuid>,
}

impl TranscriptState {
    pub fn new(header: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        let positions = group_positions(&messages);
        Self {
            header: header.into(),
            messages,
            positions,
            selected: 0,
            selected_option: 0,
            scroll_offset: 0,
            date_headers: HashSet::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message and select it.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.positions = group_positions(&self.messages);
        self.selected = self.messages.len() - 1;
        self.selected_option = 0;
    }

    pub fn selected_message(&self) -> Option<&ChatMessage> {
        self.messages.get(self.selected)
    }

    pub fn selected_position(&self) -> MessageGroupPosition {
        self.positions.get(self.selected).copied().unwrap_or_default()
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.selected_option = 0;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.messages.len() {
            self.selected += 1;
            self.selected_option = 0;
        }
    }

    pub fn select_previous_option(&mut self) {
        self.selected_option = self.selected_option.saturating_sub(1);
    }

    /// Move to the next option, staying within the `option_count` the
    /// selected cell offers.
    pub fn select_next_option(&mut self, option_count: usize) {
        if self.selected_option + 1 < option_count {
            self.selected_option += 1;
        }
    }

    /// Show or hide the date header above the selected message.
    pub fn toggle_date_header(&mut self) {
        let Some(id) = self.selected_message().map(|m| m.id) else {
            return;
        };
        if !self.date_headers.remove(&id) {
            self.date_headers.insert(id);
        }
    }

    pub fn shows_date_header(&self, message: &ChatMessage) -> bool {
        self.date_headers.contains(&message.id)
    }
}

/// Number of selectable options the selected message offers.
pub fn selected_option_count(state: &TranscriptState, platform: &dyn PlatformServices) -> usize {
    let Some(message) = state.selected_message() else {
        return 0;
    };
    let dispatcher = MessageRenderDispatcher::new(platform);
    let mut counter = CellActivator::counter(platform);
    dispatcher.render(
        &mut counter,
        message,
        state.selected_position(),
        &mut |_, _| {},
    );
    counter.option_count()
}

/// Render the transcript pane into the given area.
pub fn render(
    area: Rect,
    buf: &mut Buffer,
    state: &mut TranscriptState,
    ctx: &RenderContext,
    platform: &dyn PlatformServices,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", state.header),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let (all_lines, msg_line_ranges) =
        build_lines(state, ctx, platform, inner.width as usize);
    let total_lines = all_lines.len();
    let visible_height = inner.height as usize;

    let scroll = compute_auto_scroll(
        state.scroll_offset,
        state.selected,
        &msg_line_ranges,
        visible_height,
        total_lines,
    );
    state.scroll_offset = scroll;

    for (row, line_idx) in (scroll..total_lines).take(visible_height).enumerate() {
        let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        Paragraph::new(all_lines[line_idx].clone()).render(line_area, buf);
    }

    if total_lines > visible_height {
        let indicator_x = inner.x + inner.width.saturating_sub(1);
        let style = Style::default().fg(Color::DarkGray);
        if scroll > 0 {
            let cell = &mut buf[(indicator_x, inner.y)];
            cell.set_char('^');
            cell.set_style(style);
        }
        if scroll + visible_height < total_lines {
            let bottom_y = inner.y + inner.height.saturating_sub(1);
            let cell = &mut buf[(indicator_x, bottom_y)];
            cell.set_char('v');
            cell.set_style(style);
        }
    }
}

/// Paint every message, returning the flat line buffer and the line range of
/// each message.
pub fn build_lines(
    state: &TranscriptState,
    ctx: &RenderContext,
    platform: &dyn PlatformServices,
    width: usize,
) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let dispatcher = MessageRenderDispatcher::new(platform);
    let cell_width = width.saturating_sub(GUTTER_WIDTH);
    let gutter_style = ctx.style.option(true);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut ranges: Vec<(usize, usize)> = Vec::with_capacity(state.messages.len());

    for (idx, (message, &position)) in state.messages.iter().zip(&state.positions).enumerate() {
        let start = lines.len();
        let is_selected = idx == state.selected;

        let mut painter = CellPainter::new(ctx, cell_width)
            .focused_option(is_selected.then_some(state.selected_option))
            .force_date_header(state.shows_date_header(message));
        // Painting never selects anything; activation goes through the app.
        dispatcher.render(&mut painter, message, position, &mut |_, _| {});

        for line in painter.into_lines() {
            let gutter = if is_selected {
                Span::styled("| ", gutter_style)
            } else {
                Span::raw("  ")
            };
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(gutter);
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }

        if position.ends_group() {
            lines.push(Line::from(""));
        }

        ranges.push((start, lines.len()));
    }

    (lines, ranges)
}

/// Compute scroll offset that keeps the selected message visible.
fn compute_auto_scroll(
    current_scroll: usize,
    selected: usize,
    ranges: &[(usize, usize)],
    visible_height: usize,
    total_lines: usize,
) -> usize {
    if ranges.is_empty() || total_lines <= visible_height {
        return 0;
    }

    let Some(&(sel_start, sel_end)) = ranges.get(selected) else {
        return current_scroll;
    };

    let mut scroll = current_scroll;

    // Taller than the viewport: show its start.
    if sel_end.saturating_sub(sel_start) >= visible_height {
        scroll = sel_start;
    } else {
        if sel_start < scroll {
            scroll = sel_start;
        }
        if sel_end > scroll + visible_height {
            scroll = sel_end.saturating_sub(visible_height);
        }
    }

    scroll.min(total_lines.saturating_sub(visible_height))
}
