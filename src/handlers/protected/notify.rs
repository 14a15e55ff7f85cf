use crate::database::models::NewNotification;
use crate::database::Store;

/// Best-effort notification fan-out. A failure is logged and swallowed so the
/// triggering request still succeeds.
pub async fn send(store: &dyn Store, notification: NewNotification) {
    let recipient = notification.user_id;
    let kind = notification.kind;

    match store.create_notification(&notification).await {
        Ok(created) => {
            tracing::debug!("Notification {} ({}) sent to {}", created.id, kind, recipient);
        }
        Err(e) => {
            tracing::error!("Failed to create {} notification for {}: {}", kind, recipient, e);
        }
    }
}

/// Name to show in notification text: the actor's display name if they have a profile.
pub async fn actor_name(store: &dyn Store, actor_id: uuid::Uuid) -> String {
    match store.get_profile(actor_id).await {
        Ok(Some(profile)) => profile.display_name,
        _ => "Someone".to_string(),
    }
}
