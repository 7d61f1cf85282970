//! Built-in demo transcript covering every content type.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use url::{ParseError, Url};

use super::{
    ChatMessage, ChatUser, ContentItem, CustomPayload, LinkRef, ListPickerPayload, MediaRef,
    QuickRepliesPayload, RichButton, RichElement, RichLinkPayload, RichVariant, SurveyPayload,
};

pub fn agent() -> ChatUser {
    ChatUser::agent("agent-1", "Sarah Chen")
}

pub fn customer() -> ChatUser {
    ChatUser::customer("customer-1", "You")
}

pub fn media(name: &str, mime: &str) -> Result<MediaRef, ParseError> {
    Ok(MediaRef {
        url: Url::parse(&format!("https://cdn.example.com/media/{}", name))?,
        friendly_name: name.to_string(),
        mime_type: mime.to_string(),
    })
}

pub fn link_preview_item() -> Result<LinkRef, ParseError> {
    Ok(LinkRef {
        friendly_name: "Return policy".to_string(),
        url: Url::parse("https://help.example.com/returns")?,
    })
}

/// Demo transcript in display order.
pub fn mock_transcript() -> Result<Vec<ChatMessage>, ParseError> {
    let start: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 15, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let at = |minutes: i64| start + Duration::minutes(minutes);

    let agent = agent();
    let customer = customer();

    Ok(vec![
        ChatMessage::new(
            customer.clone(),
            at(0),
            vec![ContentItem::Text(
                "Hi! My order arrived damaged, can I return it?".to_string(),
            )],
        ),
        ChatMessage::new(
            customer.clone(),
            at(1),
            vec![
                ContentItem::Image(media("box-front.jpg", "image/jpeg")?),
                ContentItem::Image(media("box-side.jpg", "image/jpeg")?),
                ContentItem::Text("Here are some photos.".to_string()),
            ],
        ),
        ChatMessage::new(
            agent.clone(),
            at(3),
            vec![ContentItem::Text(
                "Sorry to hear that! You can return it for free.".to_string(),
            )],
        ),
        ChatMessage::new(
            agent.clone(),
            at(3),
            vec![ContentItem::LinkPreview(link_preview_item()?)],
        ),
        ChatMessage::new(
            agent.clone(),
            at(4),
            vec![ContentItem::RichContent(RichVariant::QuickReplies(
                QuickRepliesPayload {
                    title: "Would you like a refund or a replacement?".to_string(),
                    options: vec![RichButton::new("Refund"), RichButton::new("Replacement")],
                },
            ))],
        ),
        ChatMessage::new(
            customer.clone(),
            at(5),
            vec![ContentItem::Audio(media("voice-note.m4a", "audio/mp4")?)],
        ),
        ChatMessage::new(
            agent.clone(),
            at(6),
            vec![ContentItem::RichContent(RichVariant::ListPicker(
                ListPickerPayload {
                    title: "Pick a pickup slot".to_string(),
                    text: "Our courier can collect the parcel.".to_string(),
                    elements: vec![
                        RichElement::Button(RichButton::new("Tomorrow morning")),
                        RichElement::Button(RichButton::new("Tomorrow afternoon")),
                        RichElement::Text("Drop it off myself".to_string()),
                    ],
                },
            ))],
        ),
        ChatMessage::new(
            agent.clone(),
            at(7),
            vec![ContentItem::RichContent(RichVariant::Gallery(vec![
                vec![
                    RichElement::Title("Blue kettle".to_string()),
                    RichElement::Text("1.7 l, fast boil".to_string()),
                    RichElement::Button(RichButton::new("Choose blue")),
                ],
                vec![
                    RichElement::Title("Steel kettle".to_string()),
                    RichElement::Text("1.5 l, quiet".to_string()),
                    RichElement::Button(RichButton::new("Choose steel")),
                ],
            ]))],
        ),
        ChatMessage::new(
            agent.clone(),
            at(8),
            vec![ContentItem::RichContent(RichVariant::Menu(vec![
                RichElement::Title("Anything else?".to_string()),
                RichElement::Text("Track my parcel".to_string()),
                RichElement::Button(RichButton::new("Talk to billing")),
                RichElement::File(media("returns-label.pdf", "application/pdf")?),
            ]))],
        ),
        ChatMessage::new(
            agent.clone(),
            at(9),
            vec![ContentItem::Video(media("how-to-pack.mp4", "video/mp4")?)],
        ),
        ChatMessage::new(
            agent.clone(),
            at(9),
            vec![ContentItem::RichContent(RichVariant::RichLink(
                RichLinkPayload {
                    title: "Packing guide".to_string(),
                    url: Url::parse("https://help.example.com/packing")?,
                    media: media("packing.png", "image/png")?,
                },
            ))],
        ),
        ChatMessage::new(
            agent.clone(),
            at(10),
            vec![ContentItem::RichContent(RichVariant::Custom(CustomPayload {
                title: Some("Order #4821".to_string()),
                url: Some(Url::parse("https://shop.example.com/orders/4821")?),
                variables: json!({ "status": "return-requested" }),
            }))],
        ),
        ChatMessage::new(
            agent,
            at(12),
            vec![ContentItem::RichContent(RichVariant::SatisfactionSurvey(
                SurveyPayload {
                    title: Some("How did we do today?".to_string()),
                    button: RichButton {
                        title: "Rate this chat".to_string(),
                        url: Some(Url::parse("https://survey.example.com/s/91")?),
                        postback: None,
                    },
                },
            ))],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mock_transcript_covers_every_tag() {
        let tags: HashSet<&str> = mock_transcript()
            .unwrap()
            .iter()
            .flat_map(|m| m.types.iter().map(ContentItem::tag))
            .collect();
        for tag in [
            "text",
            "image",
            "video",
            "audio",
            "linkPreview",
            "gallery",
            "menu",
            "quickReplies",
            "listPicker",
            "richLink",
            "satisfactionSurvey",
            "custom",
        ] {
            assert!(tags.contains(tag), "missing {}", tag);
        }
    }

    #[test]
    fn test_mock_transcript_has_multi_attachment() {
        assert!(mock_transcript().unwrap().iter().any(|m| m.is_multi_attachment()));
    }
}
