//! Cell activation: turns "Enter on option N" into the cell's callback.
//!
//! The activator is a renderer that draws nothing. It walks the selectable
//! elements of a cell in the same order the painter draws them and fires the
//! callback of the targeted one, so user actions go through the exact same
//! dispatch as painting.

use url::Url;

use crate::dispatch::{MessageRenderer, PlatformServices};
use crate::models::{
    ChatMessage, CustomPayload, GalleryElement, LinkRef, ListPickerPayload, MediaRef, MenuElement,
    MessageGroupPosition, QuickRepliesPayload, RichButton, RichElement, RichLinkPayload,
    SurveyPayload,
};

/// Actions offered by a link preview, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Open,
    Share,
    Copy,
}

pub const LINK_ACTIONS: [LinkAction; 3] = [LinkAction::Open, LinkAction::Share, LinkAction::Copy];

/// Selectable elements of a gallery, flattened across cards.
pub fn gallery_options(elements: &[GalleryElement]) -> impl Iterator<Item = &RichElement> {
    elements.iter().flatten().filter(|e| e.is_selectable())
}

pub fn menu_options(elements: &[MenuElement]) -> impl Iterator<Item = &RichElement> {
    elements.iter().filter(|e| e.is_selectable())
}

/// Number of selectable options a custom payload offers (its link, if any).
pub fn custom_option_count(item: &CustomPayload) -> usize {
    usize::from(item.url.is_some())
}

/// Text a gallery reports with a selection: button titles only.
fn gallery_text(element: &RichElement) -> Option<String> {
    match element {
        RichElement::Button(button) => Some(button.title.clone()),
        RichElement::Text(_) | RichElement::Title(_) | RichElement::File(_) => None,
    }
}

/// Renderer that activates the `target`-th selectable element of a cell.
pub struct CellActivator<'a> {
    target: usize,
    platform: &'a dyn PlatformServices,
    seen: usize,
    fired: bool,
}

impl<'a> CellActivator<'a> {
    pub fn new(target: usize, platform: &'a dyn PlatformServices) -> Self {
        Self {
            target,
            platform,
            seen: 0,
            fired: false,
        }
    }

    /// An activator that only counts options and never fires.
    pub fn counter(platform: &'a dyn PlatformServices) -> Self {
        Self::new(usize::MAX, platform)
    }

    /// Whether a callback was invoked.
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Number of selectable elements walked over.
    pub fn option_count(&self) -> usize {
        self.seen
    }

    /// Account for `count` options; returns the local index of the target if
    /// it falls within them.
    fn hit(&mut self, count: usize) -> Option<usize> {
        let start = self.seen;
        self.seen += count;
        if (start..self.seen).contains(&self.target) {
            self.fired = true;
            Some(self.target - start)
        } else {
            None
        }
    }
}

impl MessageRenderer for CellActivator<'_> {
    fn multi_attachment(&mut self, _message: &ChatMessage) {}

    fn text(&mut self, _message: &ChatMessage, _text: &str, _position: MessageGroupPosition) {}

    fn video(&mut self, _message: &ChatMessage, _item: &MediaRef, _is_multi_attachment: bool) {}

    fn image(&mut self, _message: &ChatMessage, _item: &MediaRef, _is_multi_attachment: bool) {}

    fn audio(&mut self, _message: &ChatMessage, _item: &MediaRef, _is_multi_attachment: bool) {}

    fn link_preview(&mut self, _message: &ChatMessage, item: &LinkRef, open_link: &mut dyn FnMut(&Url)) {
        if let Some(i) = self.hit(LINK_ACTIONS.len()) {
            match LINK_ACTIONS[i] {
                LinkAction::Open => open_link(&item.url),
                LinkAction::Share => self.platform.share_url(&item.url),
                LinkAction::Copy => self.platform.copy_url(&item.url),
            }
        }
    }

    fn gallery(
        &mut self,
        _message: &ChatMessage,
        elements: &[GalleryElement],
        element_selected: &mut dyn FnMut(Option<String>, RichElement),
    ) {
        let options: Vec<&RichElement> = gallery_options(elements).collect();
        if let Some(i) = self.hit(options.len()) {
            element_selected(gallery_text(options[i]), options[i].clone());
        }
    }

    fn menu(
        &mut self,
        _message: &ChatMessage,
        elements: &[MenuElement],
        element_selected: &mut dyn FnMut(RichElement),
    ) {
        let options: Vec<&RichElement> = menu_options(elements).collect();
        if let Some(i) = self.hit(options.len()) {
            element_selected(options[i].clone());
        }
    }

    fn quick_replies(
        &mut self,
        _message: &ChatMessage,
        item: &QuickRepliesPayload,
        option_selected: &mut dyn FnMut(RichButton),
    ) {
        if let Some(i) = self.hit(item.options.len()) {
            option_selected(item.options[i].clone());
        }
    }

    fn list_picker(
        &mut self,
        _message: &ChatMessage,
        item: &ListPickerPayload,
        option_selected: &mut dyn FnMut(RichElement),
    ) {
        if let Some(i) = self.hit(item.elements.len()) {
            option_selected(item.elements[i].clone());
        }
    }

    fn rich_link(&mut self, _message: &ChatMessage, item: &RichLinkPayload, open_link: &mut dyn FnMut(&Url)) {
        if self.hit(1).is_some() {
            open_link(&item.url);
        }
    }

    fn satisfaction_survey(
        &mut self,
        _message: &ChatMessage,
        item: &SurveyPayload,
        open_link: &mut dyn FnMut(&Url),
    ) {
        if self.hit(1).is_some() {
            match &item.button.url {
                Some(url) => open_link(url),
                None => tracing::debug!("Survey button {:?} has no link", item.button.title),
            }
        }
    }

    fn custom(&mut self, _message: &ChatMessage, item: &CustomPayload, open_link: &mut dyn FnMut(&Url)) {
        if self.hit(custom_option_count(item)).is_some() {
            if let Some(url) = &item.url {
                open_link(url);
            }
        }
    }
}
