use crate::record::{ContentType, NotificationKind, NotificationPayload};

///
/// Renders the human readable message of a notification from its
/// structured payload.
///
/// The message is derived, never stored: re-rendering after every
/// aggregated mutation keeps it consistent with the accumulated count
/// without a second store write.
///
pub fn render_message(kind: NotificationKind, payload: &NotificationPayload) -> String {
    match kind {
        NotificationKind::ContentCreated => render_content_created(payload),
        NotificationKind::FriendRequest => "You received a friend request".to_string(),
        NotificationKind::FriendAccepted => "Your friend request was accepted".to_string(),
    }
}

fn render_content_created(payload: &NotificationPayload) -> String {
    let noun = match payload.content_type {
        Some(ContentType::FlashcardDeck) => "flashcard deck",
        _ => "note",
    };

    if payload.count <= 1 {
        let title = payload.title.as_deref().unwrap_or("untitled");
        return match &payload.subject_name {
            Some(subject) => format!("New {noun} in {subject}: {title}"),
            None => format!("New {noun}: {title}"),
        };
    }

    let plural = match payload.content_type {
        Some(ContentType::FlashcardDeck) => "flashcard decks",
        _ => "notes",
    };
    match &payload.subject_name {
        Some(subject) => format!("{} new {plural} in {subject}", payload.count),
        None => format!("{} new {plural}", payload.count),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload(count: u32) -> NotificationPayload {
        NotificationPayload {
            content_type: Some(ContentType::Note),
            content_id: None,
            creator_id: None,
            title: Some("Derivatives".to_string()),
            subject_name: Some("Calculus".to_string()),
            count,
        }
    }

    #[test]
    fn single_note_message_uses_title() {
        let message = render_message(NotificationKind::ContentCreated, &payload(1));

        assert_eq!(message, "New note in Calculus: Derivatives");
    }

    #[test]
    fn aggregated_message_uses_count() {
        let message = render_message(NotificationKind::ContentCreated, &payload(5));

        assert_eq!(message, "5 new notes in Calculus");
    }

    #[test]
    fn flashcard_deck_message() {
        let mut payload = payload(2);
        payload.content_type = Some(ContentType::FlashcardDeck);

        let message = render_message(NotificationKind::ContentCreated, &payload);

        assert_eq!(message, "2 new flashcard decks in Calculus");
    }

    #[test]
    fn friend_request_message() {
        let message = render_message(NotificationKind::FriendRequest, &payload(1));

        assert_eq!(message, "You received a friend request");
    }
}
