//! Message-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::rich::RichVariant;

/// Which side of the conversation a sender is on.
///
/// Only used to decide alignment: agents on the left, customers on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SenderRole {
    Agent,
    Customer,
}

/// Message sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub id: String,
    pub name: String,
    pub role: SenderRole,
}

impl ChatUser {
    pub fn agent(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: SenderRole::Agent,
        }
    }

    pub fn customer(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: SenderRole::Customer,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.role == SenderRole::Agent
    }
}

/// Reference to a media attachment (image, video, audio or file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: Url,
    pub friendly_name: String,
    pub mime_type: String,
}

/// Reference to a link shown as a preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRef {
    pub friendly_name: String,
    pub url: Url,
}

impl LinkRef {
    /// Secondary label derived from the target URL, if it has a host.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }
}

/// One renderable unit inside a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "camelCase")]
pub enum ContentItem {
    Text(String),
    Video(MediaRef),
    Image(MediaRef),
    Audio(MediaRef),
    LinkPreview(LinkRef),
    RichContent(RichVariant),
}

impl ContentItem {
    /// Short tag name, used in logs and plain-text output.
    pub fn tag(&self) -> &'static str {
        match self {
            ContentItem::Text(_) => "text",
            ContentItem::Video(_) => "video",
            ContentItem::Image(_) => "image",
            ContentItem::Audio(_) => "audio",
            ContentItem::LinkPreview(_) => "linkPreview",
            ContentItem::RichContent(rich) => rich.tag(),
        }
    }
}

/// Chat message.
///
/// `types` is in display order. A message with more than one item is drawn by
/// the multi-attachment container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user: ChatUser,
    pub date: DateTime<Utc>,
    pub types: Vec<ContentItem>,
}

impl ChatMessage {
    pub fn new(user: ChatUser, date: DateTime<Utc>, types: Vec<ContentItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            date,
            types,
        }
    }

    pub fn is_multi_attachment(&self) -> bool {
        self.types.len() > 1
    }
}
