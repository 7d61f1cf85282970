//! Message cells: paints each content type into terminal lines.
//!
//! Agent cells hug the left edge, customer cells the right edge; a spacer of
//! one tenth of the width is always kept on the opposite side.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;
use url::Url;

use super::activate::{custom_option_count, LinkAction, LINK_ACTIONS};
use crate::config::RenderContext;
use crate::dispatch::MessageRenderer;
use crate::models::{
    ChatMessage, ContentItem, CustomPayload, GalleryElement, LinkRef, ListPickerPayload, MediaRef,
    MenuElement, MessageGroupPosition, QuickRepliesPayload, RichButton, RichElement,
    RichLinkPayload, SurveyPayload,
};

/// Narrowest width we try to lay a cell out in.
const MIN_CELL_WIDTH: usize = 12;

/// Which media renderer produced a tile.
#[derive(Clone, Copy)]
enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    fn icon(self) -> &'static str {
        match self {
            MediaKind::Image => "[img]",
            MediaKind::Video => "[>]",
            MediaKind::Audio => "[~]",
        }
    }
}

/// Renderer that paints cells into a line buffer.
pub struct CellPainter<'a> {
    ctx: &'a RenderContext,
    width: usize,
    /// Highlighted option, when this cell has focus.
    focused_option: Option<usize>,
    /// Date header requested by the user on top of the grouping rules.
    force_date_header: bool,
    /// Selectable elements painted so far (same order as the activator).
    option_index: usize,
    lines: Vec<Line<'static>>,
}

impl<'a> CellPainter<'a> {
    pub fn new(ctx: &'a RenderContext, width: usize) -> Self {
        Self {
            ctx,
            width,
            focused_option: None,
            force_date_header: false,
            option_index: 0,
            lines: Vec::new(),
        }
    }

    pub fn focused_option(mut self, option: Option<usize>) -> Self {
        self.focused_option = option;
        self
    }

    pub fn force_date_header(mut self, force: bool) -> Self {
        self.force_date_header = force;
        self
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.lines
    }

    /// Columns available to cell content after the opposite-side spacer.
    fn content_width(&self) -> usize {
        self.width.saturating_sub(self.width / 10).max(MIN_CELL_WIDTH.min(self.width))
    }

    /// Push one row aligned to the sender's side.
    fn push_row(&mut self, message: &ChatMessage, spans: Vec<Span<'static>>) {
        let used: usize = spans.iter().map(|s| s.content.as_ref().width()).sum();
        let mut row = Vec::with_capacity(spans.len() + 2);
        if message.user.is_agent() {
            row.push(Span::raw(" "));
            row.extend(spans);
        } else {
            let pad = self.width.saturating_sub(used + 1);
            row.push(Span::raw(" ".repeat(pad)));
            row.extend(spans);
            row.push(Span::raw(" "));
        }
        self.lines.push(Line::from(row));
    }

    /// Style for the next selectable element, advancing the option counter.
    fn next_option_style(&mut self) -> Style {
        let focused = self.focused_option == Some(self.option_index);
        self.option_index += 1;
        self.ctx.style.option(focused)
    }

    fn push_date_header(&mut self, message: &ChatMessage) {
        let date = self.ctx.localization.format_date(&message.date);
        let pad = self.width.saturating_sub(date.width()) / 2;
        self.lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(date, self.ctx.style.secondary()),
        ]));
    }

    fn push_title(&mut self, message: &ChatMessage, title: &str) {
        let max = self.content_width().saturating_sub(2);
        for line in wrap_text(title, max) {
            let style = self.ctx.style.form_text().add_modifier(Modifier::BOLD);
            self.push_row(message, vec![Span::styled(line, style)]);
        }
    }

    fn push_body(&mut self, message: &ChatMessage, text: &str) {
        let max = self.content_width().saturating_sub(2);
        for line in wrap_text(text, max) {
            let style = self.ctx.style.form_text();
            self.push_row(message, vec![Span::styled(line, style)]);
        }
    }

    fn push_secondary(&mut self, message: &ChatMessage, text: &str) {
        let max = self.content_width().saturating_sub(2);
        let style = self.ctx.style.secondary();
        self.push_row(message, vec![Span::styled(truncate(text, max), style)]);
    }

    /// Buttons laid out as chips, wrapping onto new rows when needed.
    fn push_chips(&mut self, message: &ChatMessage, labels: &[String]) {
        let max = self.content_width().saturating_sub(2);
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0;

        for label in labels {
            let chip = truncate(&format!("[ {} ]", label), max);
            let chip_width = chip.width();
            if !row.is_empty() && row_width + 1 + chip_width > max {
                self.push_row(message, std::mem::take(&mut row));
                row_width = 0;
            }
            if !row.is_empty() {
                row.push(Span::raw(" "));
                row_width += 1;
            }
            let style = self.next_option_style();
            row.push(Span::styled(chip, style));
            row_width += chip_width;
        }

        if !row.is_empty() {
            self.push_row(message, row);
        }
    }

    fn push_element(&mut self, message: &ChatMessage, element: &RichElement) {
        match element {
            RichElement::Title(title) => self.push_title(message, title),
            RichElement::Text(text) => self.push_body(message, text),
            RichElement::Button(button) => self.push_chips(message, &[button.title.clone()]),
            RichElement::File(file) => {
                let max = self.content_width().saturating_sub(2);
                let style = self.next_option_style();
                let label = truncate(&format!("[file] {}", file.friendly_name), max);
                self.push_row(message, vec![Span::styled(label, style)]);
            }
        }
    }

    fn paint_media(&mut self, message: &ChatMessage, item: &MediaRef, kind: MediaKind, compact: bool) {
        let max = self.content_width().saturating_sub(2);
        let name_style = self.ctx.style.form_text().add_modifier(Modifier::BOLD);

        let label = truncate(&format!("{} {}", kind.icon(), item.friendly_name), max);
        self.push_row(message, vec![Span::styled(label, name_style)]);
        if compact {
            return;
        }

        let detail = match item.url.host_str() {
            Some(host) => format!("{} - {}", item.mime_type, host),
            None => item.mime_type.clone(),
        };
        self.push_secondary(message, &detail);
    }

    fn paint_link_row(&mut self, message: &ChatMessage, name: &str, url: &Url) {
        let max = self.content_width().saturating_sub(2);
        let style = self.ctx.style.form_text().add_modifier(Modifier::BOLD);
        self.push_row(
            message,
            vec![Span::styled(truncate(&format!("[link] {}", name), max), style)],
        );
        if let Some(host) = url.host_str() {
            self.push_secondary(message, host);
        }
    }

    fn end_cell(&mut self, message: &ChatMessage, position: MessageGroupPosition) {
        if position.ends_group() {
            let time = message.date.format("%H:%M").to_string();
            self.push_secondary(message, &time);
        }
    }
}

impl MessageRenderer for CellPainter<'_> {
    fn multi_attachment(&mut self, message: &ChatMessage) {
        if self.force_date_header {
            self.push_date_header(message);
        }
        let title = self.ctx.localization.attachments(message.types.len());
        self.push_secondary(message, &title);

        for item in &message.types {
            match item {
                ContentItem::Text(text) => self.push_body(message, text),
                ContentItem::Video(media) => self.video(message, media, true),
                ContentItem::Image(media) => self.image(message, media, true),
                ContentItem::Audio(media) => self.audio(message, media, true),
                ContentItem::LinkPreview(link) => {
                    self.paint_link_row(message, &link.friendly_name, &link.url)
                }
                ContentItem::RichContent(rich) => {
                    self.push_secondary(message, &format!("[{}]", rich.tag()))
                }
            }
        }
    }

    fn text(&mut self, message: &ChatMessage, text: &str, position: MessageGroupPosition) {
        if self.force_date_header {
            self.push_date_header(message);
        }
        if position.starts_group() && message.user.is_agent() {
            let style = self.ctx.style.secondary().add_modifier(Modifier::BOLD);
            self.push_row(message, vec![Span::styled(message.user.name.clone(), style)]);
        }

        let bubble = self.ctx.style.bubble(message.user.is_agent());
        let max = self.content_width().saturating_sub(2);
        let mut wrapped = wrap_text(text, max.saturating_sub(2));
        // Blank text still gets a bubble row.
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }
        let bubble_width = wrapped.iter().map(|l| l.width()).max().unwrap_or(0);
        for line in wrapped {
            let pad = bubble_width.saturating_sub(line.width());
            let content = format!(" {}{} ", line, " ".repeat(pad));
            self.push_row(message, vec![Span::styled(content, bubble)]);
        }

        self.end_cell(message, position);
    }

    fn video(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool) {
        self.paint_media(message, item, MediaKind::Video, is_multi_attachment);
    }

    fn image(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool) {
        self.paint_media(message, item, MediaKind::Image, is_multi_attachment);
    }

    fn audio(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool) {
        self.paint_media(message, item, MediaKind::Audio, is_multi_attachment);
    }

    fn link_preview(&mut self, message: &ChatMessage, item: &LinkRef, _open_link: &mut dyn FnMut(&Url)) {
        self.paint_link_row(message, &item.friendly_name, &item.url);

        let loc = &self.ctx.localization;
        let labels: Vec<String> = LINK_ACTIONS
            .iter()
            .map(|action| match action {
                LinkAction::Open => loc.common_open.clone(),
                LinkAction::Share => loc.common_share.clone(),
                LinkAction::Copy => loc.common_copy.clone(),
            })
            .collect();
        self.push_chips(message, &labels);
    }

    fn gallery(
        &mut self,
        message: &ChatMessage,
        elements: &[GalleryElement],
        _element_selected: &mut dyn FnMut(Option<String>, RichElement),
    ) {
        let total = elements.len();
        for (i, card) in elements.iter().enumerate() {
            let header = format!("-- {}/{} --", i + 1, total);
            self.push_secondary(message, &header);
            for element in card {
                self.push_element(message, element);
            }
        }
    }

    fn menu(
        &mut self,
        message: &ChatMessage,
        elements: &[MenuElement],
        _element_selected: &mut dyn FnMut(RichElement),
    ) {
        for element in elements {
            self.push_element(message, element);
        }
    }

    fn quick_replies(
        &mut self,
        message: &ChatMessage,
        item: &QuickRepliesPayload,
        _option_selected: &mut dyn FnMut(RichButton),
    ) {
        self.push_title(message, &item.title);
        let labels: Vec<String> = item.options.iter().map(|o| o.title.clone()).collect();
        self.push_chips(message, &labels);
    }

    fn list_picker(
        &mut self,
        message: &ChatMessage,
        item: &ListPickerPayload,
        _option_selected: &mut dyn FnMut(RichElement),
    ) {
        self.push_title(message, &item.title);
        if !item.text.is_empty() {
            self.push_body(message, &item.text);
        }

        let max = self.content_width().saturating_sub(2);
        for element in &item.elements {
            let label = match element {
                RichElement::Button(button) => button.title.clone(),
                RichElement::Text(text) | RichElement::Title(text) => text.clone(),
                RichElement::File(file) => file.friendly_name.clone(),
            };
            let style = self.next_option_style();
            self.push_row(
                message,
                vec![Span::styled(truncate(&format!("> {}", label), max), style)],
            );
        }
    }

    fn rich_link(&mut self, message: &ChatMessage, item: &RichLinkPayload, _open_link: &mut dyn FnMut(&Url)) {
        self.paint_media(message, &item.media, MediaKind::Image, true);
        self.paint_link_row(message, &item.title, &item.url);
        let open = self.ctx.localization.common_open.clone();
        self.push_chips(message, &[open]);
    }

    fn satisfaction_survey(
        &mut self,
        message: &ChatMessage,
        item: &SurveyPayload,
        _open_link: &mut dyn FnMut(&Url),
    ) {
        let title = item
            .title
            .clone()
            .unwrap_or_else(|| self.ctx.localization.survey_default_title.clone());
        self.push_title(message, &title);
        self.push_chips(message, &[item.button.title.clone()]);
    }

    fn custom(&mut self, message: &ChatMessage, item: &CustomPayload, _open_link: &mut dyn FnMut(&Url)) {
        let title = item
            .title
            .clone()
            .unwrap_or_else(|| self.ctx.localization.custom_default_title.clone());
        self.push_title(message, &title);

        if let Some(variables) = item.variables.as_object() {
            for (key, value) in variables {
                let value = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                self.push_secondary(message, &format!("{}: {}", key, value));
            }
        }

        if custom_option_count(item) > 0 {
            let open = self.ctx.localization.common_open.clone();
            self.push_chips(message, &[open]);
        }
    }
}

/// Truncate to `max` columns, marking the cut with `~`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    if max > 0 {
        out.push('~');
    }
    out
}

/// Word-wrap by display width: explicit newlines first, then long lines.
pub(super) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.width() <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let word = truncate(word, max_width);
            if current.is_empty() {
                current = word;
            } else if current.width() + 1 + word.width() <= max_width {
                current.push(' ');
                current.push_str(&word);
            } else {
                result.push(std::mem::replace(&mut current, word));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}
