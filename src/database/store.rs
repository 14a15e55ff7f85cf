use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::*;

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Every query the handlers issue. Each method is a single round trip against
/// the backing database; ownership is decided by the caller unless the method
/// takes the owner id, in which case the lookup is scoped to that owner and a
/// foreign row reads as `NotFound`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Connectivity check for `/health`.
    async fn ping(&self) -> StoreResult<()>;

    // Users and profiles
    async fn upsert_user(&self, identity: &Identity) -> StoreResult<User>;
    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;
    async fn upsert_profile(&self, user_id: Uuid, input: &ProfileInput) -> StoreResult<Profile>;
    async fn list_roles(&self, user_id: Uuid) -> StoreResult<Vec<UserRole>>;
    async fn replace_roles(&self, user_id: Uuid, roles: &[String]) -> StoreResult<Vec<UserRole>>;
    async fn add_role(&self, user_id: Uuid, role: &str) -> StoreResult<UserRole>;
    async fn remove_role(&self, user_id: Uuid, role: &str) -> StoreResult<()>;

    // Gigs
    async fn list_gigs(&self, filter: &GigFilter, page: Page) -> StoreResult<(Vec<Gig>, i64)>;
    async fn create_gig(&self, owner_id: Uuid, gig: &NewGig) -> StoreResult<Gig>;
    async fn get_gig(&self, id: Uuid) -> StoreResult<Option<Gig>>;
    async fn update_gig(&self, id: Uuid, patch: &GigPatch) -> StoreResult<Gig>;
    async fn delete_gig(&self, id: Uuid) -> StoreResult<()>;

    // Crew availability
    async fn list_availability(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Availability>>;
    async fn create_availability(&self, user_id: Uuid, entry: &NewAvailability) -> StoreResult<Availability>;
    async fn get_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Availability>>;
    async fn update_availability(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AvailabilityPatch,
    ) -> StoreResult<Availability>;
    async fn delete_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    // Crew contacts
    async fn list_contacts(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        page: Page,
    ) -> StoreResult<(Vec<CrewContact>, i64)>;
    async fn create_contact(&self, owner_id: Uuid, contact: &NewContact) -> StoreResult<CrewContact>;
    async fn update_contact(&self, owner_id: Uuid, id: Uuid, patch: &ContactPatch) -> StoreResult<CrewContact>;
    async fn delete_contact(&self, owner_id: Uuid, id: Uuid) -> StoreResult<()>;

    // Collab posts
    async fn list_collab_posts(&self, filter: &CollabFilter, page: Page) -> StoreResult<(Vec<CollabPost>, i64)>;
    async fn create_collab_post(&self, owner_id: Uuid, post: &NewCollabPost) -> StoreResult<CollabPost>;
    async fn get_collab_post(&self, id: Uuid) -> StoreResult<Option<CollabPost>>;
    async fn update_collab_post(&self, id: Uuid, patch: &CollabPatch) -> StoreResult<CollabPost>;
    async fn delete_collab_post(&self, id: Uuid) -> StoreResult<()>;
    async fn list_collaborators(&self, post_id: Uuid) -> StoreResult<Vec<Collaborator>>;
    async fn add_collaborator(&self, post_id: Uuid, user_id: Uuid, role: Option<&str>) -> StoreResult<Collaborator>;
    async fn remove_collaborator(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    // Notifications
    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Page,
    ) -> StoreResult<(Vec<Notification>, i64)>;
    async fn unread_count(&self, user_id: Uuid) -> StoreResult<i64>;
    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification>;
    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> StoreResult<Notification>;
    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64>;
    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    // Slate
    async fn list_slate_posts(
        &self,
        author_id: Option<Uuid>,
        viewer: Option<Uuid>,
        page: Page,
    ) -> StoreResult<(Vec<SlatePost>, i64)>;
    async fn create_slate_post(&self, author_id: Uuid, post: &NewSlatePost) -> StoreResult<SlatePost>;
    async fn get_slate_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<SlatePost>>;
    async fn delete_slate_post(&self, id: Uuid) -> StoreResult<()>;
    async fn like_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<SlateLike>;
    async fn unlike_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()>;
}
