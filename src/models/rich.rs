//! Rich content models: interactive widgets carried inside a message.

use serde::{Deserialize, Serialize};
use url::Url;

use super::message::MediaRef;

/// A tappable button inside rich content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichButton {
    pub title: String,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub postback: Option<String>,
}

impl RichButton {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            postback: None,
        }
    }
}

/// A sub-element of rich content; the thing reported back when selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "camelCase")]
pub enum RichElement {
    Button(RichButton),
    Text(String),
    Title(String),
    File(MediaRef),
}

impl RichElement {
    /// Text to send when this element is picked from a list picker.
    ///
    /// Only buttons carry a payload; every other element yields an empty
    /// string (not `None`, unlike menu selections).
    pub fn text_to_send(&self) -> String {
        match self {
            RichElement::Button(button) => button.title.clone(),
            RichElement::Text(_) | RichElement::Title(_) | RichElement::File(_) => String::new(),
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, RichElement::Button(_) | RichElement::File(_))
    }
}

/// One card of a gallery, made of ordered sub-elements.
pub type GalleryElement = Vec<RichElement>;

/// One entry of a menu.
pub type MenuElement = RichElement;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRepliesPayload {
    pub title: String,
    pub options: Vec<RichButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPickerPayload {
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub elements: Vec<RichElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichLinkPayload {
    pub title: String,
    pub url: Url,
    pub media: MediaRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPayload {
    #[serde(default)]
    pub title: Option<String>,
    pub button: RichButton,
}

/// Integrator-defined payload; `variables` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub variables: serde_json::Value,
}

/// A content item that is itself an interactive widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "camelCase")]
pub enum RichVariant {
    Gallery(Vec<GalleryElement>),
    Menu(Vec<MenuElement>),
    QuickReplies(QuickRepliesPayload),
    ListPicker(ListPickerPayload),
    RichLink(RichLinkPayload),
    SatisfactionSurvey(SurveyPayload),
    Custom(CustomPayload),
}

impl RichVariant {
    pub fn tag(&self) -> &'static str {
        match self {
            RichVariant::Gallery(_) => "gallery",
            RichVariant::Menu(_) => "menu",
            RichVariant::QuickReplies(_) => "quickReplies",
            RichVariant::ListPicker(_) => "listPicker",
            RichVariant::RichLink(_) => "richLink",
            RichVariant::SatisfactionSurvey(_) => "satisfactionSurvey",
            RichVariant::Custom(_) => "custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> MediaRef {
        MediaRef {
            url: Url::parse("https://cdn.example.com/a.pdf").unwrap(),
            friendly_name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_text_to_send_button_uses_title() {
        let element = RichElement::Button(RichButton::new("Yes please"));
        assert_eq!(element.text_to_send(), "Yes please");
    }

    #[test]
    fn test_text_to_send_is_empty_for_non_buttons() {
        for element in [
            RichElement::Text("Yes".to_string()),
            RichElement::Title("Pick one".to_string()),
            RichElement::File(file()),
        ] {
            assert_eq!(element.text_to_send(), "", "element: {:?}", element);
        }
    }

    #[test]
    fn test_rich_variant_json_shape() {
        let json = r#"{
            "type": "quickReplies",
            "item": {"title": "Continue?", "options": [{"title": "Yes"}, {"title": "No"}]}
        }"#;
        let variant: RichVariant = serde_json::from_str(json).unwrap();
        match variant {
            RichVariant::QuickReplies(payload) => {
                assert_eq!(payload.options.len(), 2);
                assert_eq!(payload.options[1].title, "No");
                assert!(payload.options[0].url.is_none());
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
