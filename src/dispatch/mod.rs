//! Message render dispatch.
//!
//! Picks the renderer for each content item of a message and wires the
//! interaction callbacks each renderer receives. Renderers themselves are
//! supplied by the caller through [`MessageRenderer`]; the terminal painter in
//! `tui::cells` is one implementation.

mod events;
mod platform;

pub use events::{EventSink, InteractionEvent};
pub use platform::{open_link, PlatformServices};

#[cfg(test)]
pub(crate) use platform::testing;

use url::Url;

use crate::models::{
    ChatMessage, ContentItem, CustomPayload, GalleryElement, LinkRef, ListPickerPayload,
    MediaRef, MenuElement, MessageGroupPosition, QuickRepliesPayload, RichButton, RichElement,
    RichLinkPayload, RichVariant, SurveyPayload,
};

/// Per-type renderers the dispatcher calls into.
///
/// Adding a content type means adding a method here and a match arm in
/// [`MessageRenderDispatcher::render`].
pub trait MessageRenderer {
    /// Whole message with more than one content item.
    fn multi_attachment(&mut self, message: &ChatMessage);

    fn text(&mut self, message: &ChatMessage, text: &str, position: MessageGroupPosition);

    fn video(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool);

    fn image(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool);

    fn audio(&mut self, message: &ChatMessage, item: &MediaRef, is_multi_attachment: bool);

    fn link_preview(&mut self, message: &ChatMessage, item: &LinkRef, open_link: &mut dyn FnMut(&Url));

    fn gallery(
        &mut self,
        message: &ChatMessage,
        elements: &[GalleryElement],
        element_selected: &mut dyn FnMut(Option<String>, RichElement),
    );

    fn menu(
        &mut self,
        message: &ChatMessage,
        elements: &[MenuElement],
        element_selected: &mut dyn FnMut(RichElement),
    );

    fn quick_replies(
        &mut self,
        message: &ChatMessage,
        item: &QuickRepliesPayload,
        option_selected: &mut dyn FnMut(RichButton),
    );

    fn list_picker(
        &mut self,
        message: &ChatMessage,
        item: &ListPickerPayload,
        option_selected: &mut dyn FnMut(RichElement),
    );

    fn rich_link(&mut self, message: &ChatMessage, item: &RichLinkPayload, open_link: &mut dyn FnMut(&Url));

    fn satisfaction_survey(
        &mut self,
        message: &ChatMessage,
        item: &SurveyPayload,
        open_link: &mut dyn FnMut(&Url),
    );

    fn custom(&mut self, message: &ChatMessage, item: &CustomPayload, open_link: &mut dyn FnMut(&Url));
}

/// Routes message content to renderers.
///
/// Holds no mutable state; the platform is only used for the default
/// open-link behaviour.
pub struct MessageRenderDispatcher<'p> {
    platform: &'p dyn PlatformServices,
}

impl<'p> MessageRenderDispatcher<'p> {
    pub fn new(platform: &'p dyn PlatformServices) -> Self {
        Self { platform }
    }

    /// Render one message.
    ///
    /// `on_rich_element_selected` receives `(text_to_send, element)` for every
    /// selection made inside rich content.
    pub fn render<R: MessageRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        message: &ChatMessage,
        position: MessageGroupPosition,
        on_rich_element_selected: &mut dyn FnMut(Option<String>, RichElement),
    ) {
        if message.types.is_empty() {
            tracing::debug!("Message {} has no content, nothing to render", message.id);
            return;
        }

        if message.is_multi_attachment() {
            renderer.multi_attachment(message);
            return;
        }

        let is_multi_attachment = message.is_multi_attachment();
        let mut default_open_link = |url: &Url| open_link(self.platform, url);

        for item in &message.types {
            match item {
                ContentItem::Text(text) => renderer.text(message, text, position),
                ContentItem::Video(media) => renderer.video(message, media, is_multi_attachment),
                ContentItem::Image(media) => renderer.image(message, media, is_multi_attachment),
                ContentItem::Audio(media) => renderer.audio(message, media, is_multi_attachment),
                ContentItem::LinkPreview(link) => {
                    renderer.link_preview(message, link, &mut default_open_link)
                }
                ContentItem::RichContent(content) => render_rich(
                    renderer,
                    message,
                    content,
                    on_rich_element_selected,
                    &mut default_open_link,
                ),
            }
        }
    }
}

fn render_rich<R: MessageRenderer + ?Sized>(
    renderer: &mut R,
    message: &ChatMessage,
    content: &RichVariant,
    on_rich_element_selected: &mut dyn FnMut(Option<String>, RichElement),
    open_link: &mut dyn FnMut(&Url),
) {
    match content {
        RichVariant::Gallery(elements) => {
            renderer.gallery(message, elements, on_rich_element_selected)
        }
        RichVariant::Menu(elements) => renderer.menu(message, elements, &mut |element: RichElement| {
            on_rich_element_selected(None, element)
        }),
        RichVariant::QuickReplies(item) => renderer.quick_replies(message, item, &mut |option: RichButton| {
            on_rich_element_selected(Some(option.title.clone()), RichElement::Button(option))
        }),
        RichVariant::ListPicker(item) => renderer.list_picker(message, item, &mut |option: RichElement| {
            on_rich_element_selected(Some(option.text_to_send()), option)
        }),
        RichVariant::RichLink(item) => renderer.rich_link(message, item, open_link),
        RichVariant::SatisfactionSurvey(item) => {
            renderer.satisfaction_survey(message, item, open_link)
        }
        RichVariant::Custom(item) => renderer.custom(message, item, open_link),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakePlatform;
    use super::*;
    use crate::models::mock;
    use chrono::Utc;

    /// One recorded renderer invocation.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        MultiAttachment,
        Text(String, MessageGroupPosition),
        Video(bool),
        Image(bool),
        Audio(bool),
        LinkPreview,
        Gallery,
        Menu,
        QuickReplies,
        ListPicker,
        RichLink,
        Survey,
        Custom,
    }

    impl Call {
        fn tag(&self) -> &'static str {
            match self {
                Call::MultiAttachment => "multiAttachment",
                Call::Text(..) => "text",
                Call::Video(_) => "video",
                Call::Image(_) => "image",
                Call::Audio(_) => "audio",
                Call::LinkPreview => "linkPreview",
                Call::Gallery => "gallery",
                Call::Menu => "menu",
                Call::QuickReplies => "quickReplies",
                Call::ListPicker => "listPicker",
                Call::RichLink => "richLink",
                Call::Survey => "satisfactionSurvey",
                Call::Custom => "custom",
            }
        }
    }

    /// Renderer that records calls and "taps" every interactive element once.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl MessageRenderer for Recorder {
        fn multi_attachment(&mut self, _message: &ChatMessage) {
            self.calls.push(Call::MultiAttachment);
        }

        fn text(&mut self, _message: &ChatMessage, text: &str, position: MessageGroupPosition) {
            self.calls.push(Call::Text(text.to_string(), position));
        }

        fn video(&mut self, _message: &ChatMessage, _item: &MediaRef, multi: bool) {
            self.calls.push(Call::Video(multi));
        }

        fn image(&mut self, _message: &ChatMessage, _item: &MediaRef, multi: bool) {
            self.calls.push(Call::Image(multi));
        }

        fn audio(&mut self, _message: &ChatMessage, _item: &MediaRef, multi: bool) {
            self.calls.push(Call::Audio(multi));
        }

        fn link_preview(
            &mut self,
            _message: &ChatMessage,
            item: &LinkRef,
            open_link: &mut dyn FnMut(&Url),
        ) {
            self.calls.push(Call::LinkPreview);
            open_link(&item.url);
        }

        fn gallery(
            &mut self,
            _message: &ChatMessage,
            elements: &[GalleryElement],
            element_selected: &mut dyn FnMut(Option<String>, RichElement),
        ) {
            self.calls.push(Call::Gallery);
            for element in elements.iter().flatten() {
                element_selected(Some("from gallery".to_string()), element.clone());
            }
        }

        fn menu(
            &mut self,
            _message: &ChatMessage,
            elements: &[MenuElement],
            element_selected: &mut dyn FnMut(RichElement),
        ) {
            self.calls.push(Call::Menu);
            for element in elements {
                element_selected(element.clone());
            }
        }

        fn quick_replies(
            &mut self,
            _message: &ChatMessage,
            item: &QuickRepliesPayload,
            option_selected: &mut dyn FnMut(RichButton),
        ) {
            self.calls.push(Call::QuickReplies);
            for option in &item.options {
                option_selected(option.clone());
            }
        }

        fn list_picker(
            &mut self,
            _message: &ChatMessage,
            item: &ListPickerPayload,
            option_selected: &mut dyn FnMut(RichElement),
        ) {
            self.calls.push(Call::ListPicker);
            for element in &item.elements {
                option_selected(element.clone());
            }
        }

        fn rich_link(
            &mut self,
            _message: &ChatMessage,
            item: &RichLinkPayload,
            open_link: &mut dyn FnMut(&Url),
        ) {
            self.calls.push(Call::RichLink);
            open_link(&item.url);
        }

        fn satisfaction_survey(
            &mut self,
            _message: &ChatMessage,
            item: &SurveyPayload,
            open_link: &mut dyn FnMut(&Url),
        ) {
            self.calls.push(Call::Survey);
            if let Some(url) = &item.button.url {
                open_link(url);
            }
        }

        fn custom(
            &mut self,
            _message: &ChatMessage,
            item: &CustomPayload,
            open_link: &mut dyn FnMut(&Url),
        ) {
            self.calls.push(Call::Custom);
            if let Some(url) = &item.url {
                open_link(url);
            }
        }
    }

    fn message(types: Vec<ContentItem>) -> ChatMessage {
        ChatMessage::new(mock::agent(), Utc::now(), types)
    }

    fn rich(variant: RichVariant) -> ChatMessage {
        message(vec![ContentItem::RichContent(variant)])
    }

    /// Dispatch `message` into a fresh recorder, returning calls and events.
    fn run(
        platform: &FakePlatform,
        message: &ChatMessage,
    ) -> (Vec<Call>, Vec<(Option<String>, RichElement)>) {
        let dispatcher = MessageRenderDispatcher::new(platform);
        let mut recorder = Recorder::default();
        let mut events = Vec::new();
        dispatcher.render(
            &mut recorder,
            message,
            MessageGroupPosition::Single,
            &mut |text, element| events.push((text, element)),
        );
        (recorder.calls, events)
    }

    #[test]
    fn test_multi_attachment_takes_container_path_only() {
        let platform = FakePlatform::openable();
        let msg = message(vec![
            ContentItem::Image(mock::media("a.jpg", "image/jpeg").unwrap()),
            ContentItem::Text("hi".to_string()),
        ]);

        let (calls, events) = run(&platform, &msg);
        assert_eq!(calls, vec![Call::MultiAttachment]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_single_image_is_not_multi_attachment() {
        let platform = FakePlatform::openable();
        let msg = message(vec![ContentItem::Image(
            mock::media("a.jpg", "image/jpeg").unwrap(),
        )]);

        let (calls, _) = run(&platform, &msg);
        assert_eq!(calls, vec![Call::Image(false)]);
    }

    #[test]
    fn test_text_receives_group_position() {
        let platform = FakePlatform::openable();
        let dispatcher = MessageRenderDispatcher::new(&platform);
        let mut recorder = Recorder::default();
        let msg = message(vec![ContentItem::Text("hello".to_string())]);

        dispatcher.render(
            &mut recorder,
            &msg,
            MessageGroupPosition::Inside,
            &mut |_, _| {},
        );

        assert_eq!(
            recorder.calls,
            vec![Call::Text("hello".to_string(), MessageGroupPosition::Inside)]
        );
    }

    #[test]
    fn test_single_item_selects_matching_renderer() {
        let platform = FakePlatform::default();
        let messages = mock::mock_transcript().unwrap();

        let mut checked = 0;
        for msg in messages.iter().filter(|m| m.types.len() == 1) {
            let (calls, _) = run(&platform, msg);
            assert_eq!(calls.len(), 1, "message {:?}", msg.types);
            assert_eq!(calls[0].tag(), msg.types[0].tag());
            checked += 1;
        }
        assert!(checked >= 12);
    }

    #[test]
    fn test_empty_message_renders_nothing() {
        let platform = FakePlatform::openable();
        let (calls, events) = run(&platform, &message(vec![]));
        assert!(calls.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_menu_selection_never_carries_text() {
        let platform = FakePlatform::default();
        let elements = vec![
            RichElement::Button(RichButton::new("Talk to billing")),
            RichElement::Text("Track my parcel".to_string()),
        ];
        let (calls, events) = run(&platform, &rich(RichVariant::Menu(elements.clone())));

        assert_eq!(calls, vec![Call::Menu]);
        assert_eq!(
            events,
            elements.into_iter().map(|e| (None, e)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_quick_reply_sends_option_title() {
        let platform = FakePlatform::default();
        let refund = RichButton::new("Refund");
        let (_, events) = run(
            &platform,
            &rich(RichVariant::QuickReplies(QuickRepliesPayload {
                title: "Refund or replacement?".to_string(),
                options: vec![refund.clone()],
            })),
        );

        assert_eq!(
            events,
            vec![(Some("Refund".to_string()), RichElement::Button(refund))]
        );
    }

    #[test]
    fn test_list_picker_derives_text_from_element_kind() {
        let platform = FakePlatform::default();
        let morning = RichElement::Button(RichButton::new("Tomorrow morning"));
        let yes = RichElement::Text("Yes".to_string());
        let (_, events) = run(
            &platform,
            &rich(RichVariant::ListPicker(ListPickerPayload {
                title: "Pick a slot".to_string(),
                text: String::new(),
                elements: vec![morning.clone(), yes.clone()],
            })),
        );

        assert_eq!(
            events,
            vec![
                (Some("Tomorrow morning".to_string()), morning),
                (Some(String::new()), yes),
            ]
        );
    }

    #[test]
    fn test_gallery_forwards_callback_unchanged() {
        let platform = FakePlatform::default();
        let card = vec![
            RichElement::Title("Kettle".to_string()),
            RichElement::Button(RichButton::new("Choose")),
        ];
        let (calls, events) = run(&platform, &rich(RichVariant::Gallery(vec![card.clone()])));

        assert_eq!(calls, vec![Call::Gallery]);
        assert_eq!(
            events,
            card.into_iter()
                .map(|e| (Some("from gallery".to_string()), e))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_link_types_use_default_open_link() {
        let messages = mock::mock_transcript().unwrap();
        let link_messages: Vec<&ChatMessage> = messages
            .iter()
            .filter(|m| {
                matches!(
                    m.types.as_slice(),
                    [ContentItem::LinkPreview(_)]
                        | [ContentItem::RichContent(
                            RichVariant::RichLink(_)
                                | RichVariant::SatisfactionSurvey(_)
                                | RichVariant::Custom(_)
                        )]
                )
            })
            .collect();
        assert_eq!(link_messages.len(), 4);

        let openable = FakePlatform::openable();
        for msg in &link_messages {
            run(&openable, msg);
        }
        assert_eq!(openable.opened.borrow().len(), 4);

        let closed = FakePlatform::default();
        for msg in &link_messages {
            run(&closed, msg);
        }
        assert!(closed.opened.borrow().is_empty());
    }
}
