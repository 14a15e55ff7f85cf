use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::fields::same_tag;
use crate::database::models::page::slice_page;
use crate::database::models::*;
use crate::database::store::{Store, StoreResult};

/// Process-local `Store` used by the test suite and by development runs
/// without `DATABASE_URL`. Rows keep insertion order; "newest first" lists
/// walk the vectors backwards. Foreign keys and cascades are emulated where
/// the handlers can observe them.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, Profile>,
    roles: Vec<UserRole>,
    gigs: Vec<Gig>,
    availability: Vec<Availability>,
    contacts: Vec<CrewContact>,
    collab_posts: Vec<CollabPost>,
    collaborators: Vec<Collaborator>,
    notifications: Vec<Notification>,
    slate_posts: Vec<SlateRow>,
    slate_likes: Vec<SlateLike>,
}

#[derive(Clone)]
struct SlateRow {
    id: Uuid,
    author_id: Uuid,
    content: String,
    media_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl Tables {
    fn slate_view(&self, row: &SlateRow, viewer: Option<Uuid>) -> SlatePost {
        let likes = self.slate_likes.iter().filter(|l| l.post_id == row.id);
        let mut like_count = 0;
        let mut liked_by_me = false;
        for like in likes {
            like_count += 1;
            liked_by_me |= Some(like.user_id) == viewer;
        }
        SlatePost {
            id: row.id,
            author_id: row.author_id,
            content: row.content.clone(),
            media_url: row.media_url.clone(),
            created_at: row.created_at,
            like_count,
            liked_by_me,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Mirror of the SQL patch rule: blank clears, absent keeps.
fn apply_text(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        *target = if v.is_empty() { None } else { Some(v.clone()) };
    }
}

fn apply<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn not_found(message: &str) -> DatabaseError {
    DatabaseError::NotFound(message.to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn upsert_user(&self, identity: &Identity) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let user = tables.users.entry(identity.user_id).or_insert_with(|| User {
            id: identity.user_id,
            email: None,
            created_at: now,
            last_seen_at: now,
        });
        if identity.email.is_some() {
            user.email = identity.email.clone();
        }
        user.last_seen_at = now;
        Ok(user.clone())
    }

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, user_id: Uuid, input: &ProfileInput) -> StoreResult<Profile> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created_at = tables.profiles.get(&user_id).map_or(now, |p| p.created_at);
        let profile = Profile {
            user_id,
            display_name: input.display_name.clone(),
            bio: input.bio.clone(),
            location: input.location.clone(),
            avatar_url: input.avatar_url.clone(),
            website: input.website.clone(),
            skills: input.skills.clone(),
            created_at,
            updated_at: now,
        };
        tables.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn list_roles(&self, user_id: Uuid) -> StoreResult<Vec<UserRole>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn replace_roles(&self, user_id: Uuid, roles: &[String]) -> StoreResult<Vec<UserRole>> {
        let mut tables = self.tables.write().await;
        tables.roles.retain(|r| r.user_id != user_id);
        let now = Utc::now();
        let rows: Vec<UserRole> = roles
            .iter()
            .map(|role| UserRole {
                user_id,
                role: role.clone(),
                created_at: now,
            })
            .collect();
        tables.roles.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn add_role(&self, user_id: Uuid, role: &str) -> StoreResult<UserRole> {
        let mut tables = self.tables.write().await;
        if tables
            .roles
            .iter()
            .any(|r| r.user_id == user_id && same_tag(&r.role, role))
        {
            return Err(DatabaseError::Conflict("Role already added".to_string()));
        }
        let row = UserRole {
            user_id,
            role: role.to_string(),
            created_at: Utc::now(),
        };
        tables.roles.push(row.clone());
        Ok(row)
    }

    async fn remove_role(&self, user_id: Uuid, role: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.roles.len();
        tables
            .roles
            .retain(|r| !(r.user_id == user_id && same_tag(&r.role, role)));
        if tables.roles.len() == before {
            return Err(not_found("Role not found"));
        }
        Ok(())
    }

    async fn list_gigs(&self, filter: &GigFilter, page: Page) -> StoreResult<(Vec<Gig>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<Gig> = tables.gigs.iter().rev().filter(|g| filter.matches(g)).cloned().collect();
        Ok((slice_page(&matching, page), matching.len() as i64))
    }

    async fn create_gig(&self, owner_id: Uuid, gig: &NewGig) -> StoreResult<Gig> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let row = Gig {
            id: Uuid::new_v4(),
            owner_id,
            title: gig.title.clone(),
            description: gig.description.clone(),
            location: gig.location.clone(),
            role: gig.role.clone(),
            pay_rate: gig.pay_rate.clone(),
            gig_date: gig.gig_date,
            status: gig.status.unwrap_or(GigStatus::Open),
            created_at: now,
            updated_at: now,
        };
        tables.gigs.push(row.clone());
        Ok(row)
    }

    async fn get_gig(&self, id: Uuid) -> StoreResult<Option<Gig>> {
        Ok(self.tables.read().await.gigs.iter().find(|g| g.id == id).cloned())
    }

    async fn update_gig(&self, id: Uuid, patch: &GigPatch) -> StoreResult<Gig> {
        let mut tables = self.tables.write().await;
        let gig = tables
            .gigs
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found("Gig not found"))?;
        apply(&mut gig.title, &patch.title);
        apply_text(&mut gig.description, &patch.description);
        apply_text(&mut gig.location, &patch.location);
        apply_text(&mut gig.role, &patch.role);
        apply_text(&mut gig.pay_rate, &patch.pay_rate);
        if patch.gig_date.is_some() {
            gig.gig_date = patch.gig_date;
        }
        apply(&mut gig.status, &patch.status);
        gig.updated_at = Utc::now();
        Ok(gig.clone())
    }

    async fn delete_gig(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.gigs.len();
        tables.gigs.retain(|g| g.id != id);
        if tables.gigs.len() == before {
            return Err(not_found("Gig not found"));
        }
        Ok(())
    }

    async fn list_availability(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Availability>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Availability> = tables
            .availability
            .iter()
            .filter(|a| a.user_id == user_id && a.overlaps(from, to))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.start_date, a.created_at));
        Ok(rows)
    }

    async fn create_availability(&self, user_id: Uuid, entry: &NewAvailability) -> StoreResult<Availability> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let row = Availability {
            id: Uuid::new_v4(),
            user_id,
            start_date: entry.start_date,
            end_date: entry.end_date,
            status: entry.status.unwrap_or(AvailabilityStatus::Available),
            note: entry.note.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.availability.push(row.clone());
        Ok(row)
    }

    async fn get_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Availability>> {
        let tables = self.tables.read().await;
        Ok(tables
            .availability
            .iter()
            .find(|a| a.id == id && a.user_id == user_id)
            .cloned())
    }

    async fn update_availability(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AvailabilityPatch,
    ) -> StoreResult<Availability> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .availability
            .iter_mut()
            .find(|a| a.id == id && a.user_id == user_id)
            .ok_or_else(|| not_found("Availability entry not found"))?;
        apply(&mut entry.start_date, &patch.start_date);
        apply(&mut entry.end_date, &patch.end_date);
        apply(&mut entry.status, &patch.status);
        apply_text(&mut entry.note, &patch.note);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.availability.len();
        tables.availability.retain(|a| !(a.id == id && a.user_id == user_id));
        if tables.availability.len() == before {
            return Err(not_found("Availability entry not found"));
        }
        Ok(())
    }

    async fn list_contacts(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        page: Page,
    ) -> StoreResult<(Vec<CrewContact>, i64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<CrewContact> = tables
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id && c.matches(search))
            .cloned()
            .collect();
        matching.sort_by_key(|c| (c.name.to_lowercase(), c.created_at));
        Ok((slice_page(&matching, page), matching.len() as i64))
    }

    async fn create_contact(&self, owner_id: Uuid, contact: &NewContact) -> StoreResult<CrewContact> {
        let mut tables = self.tables.write().await;
        if let Some(linked) = contact.contact_user_id {
            if !tables.users.contains_key(&linked) {
                return Err(not_found("Linked user not found"));
            }
        }
        let row = CrewContact {
            id: Uuid::new_v4(),
            owner_id,
            contact_user_id: contact.contact_user_id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            role: contact.role.clone(),
            notes: contact.notes.clone(),
            created_at: Utc::now(),
        };
        tables.contacts.push(row.clone());
        Ok(row)
    }

    async fn update_contact(&self, owner_id: Uuid, id: Uuid, patch: &ContactPatch) -> StoreResult<CrewContact> {
        let mut tables = self.tables.write().await;
        let contact = tables
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.owner_id == owner_id)
            .ok_or_else(|| not_found("Contact not found"))?;
        apply(&mut contact.name, &patch.name);
        apply_text(&mut contact.email, &patch.email);
        apply_text(&mut contact.phone, &patch.phone);
        apply_text(&mut contact.role, &patch.role);
        apply_text(&mut contact.notes, &patch.notes);
        Ok(contact.clone())
    }

    async fn delete_contact(&self, owner_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.contacts.len();
        tables.contacts.retain(|c| !(c.id == id && c.owner_id == owner_id));
        if tables.contacts.len() == before {
            return Err(not_found("Contact not found"));
        }
        Ok(())
    }

    async fn list_collab_posts(&self, filter: &CollabFilter, page: Page) -> StoreResult<(Vec<CollabPost>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<CollabPost> = tables
            .collab_posts
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok((slice_page(&matching, page), matching.len() as i64))
    }

    async fn create_collab_post(&self, owner_id: Uuid, post: &NewCollabPost) -> StoreResult<CollabPost> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let row = CollabPost {
            id: Uuid::new_v4(),
            owner_id,
            title: post.title.clone(),
            description: post.description.clone(),
            project_type: post.project_type.clone(),
            roles_needed: post.roles_needed.clone(),
            status: CollabStatus::Open,
            created_at: now,
            updated_at: now,
        };
        tables.collab_posts.push(row.clone());
        Ok(row)
    }

    async fn get_collab_post(&self, id: Uuid) -> StoreResult<Option<CollabPost>> {
        Ok(self.tables.read().await.collab_posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_collab_post(&self, id: Uuid, patch: &CollabPatch) -> StoreResult<CollabPost> {
        let mut tables = self.tables.write().await;
        let post = tables
            .collab_posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Collab post not found"))?;
        apply(&mut post.title, &patch.title);
        apply_text(&mut post.description, &patch.description);
        apply_text(&mut post.project_type, &patch.project_type);
        apply(&mut post.roles_needed, &patch.roles_needed);
        apply(&mut post.status, &patch.status);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_collab_post(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.collab_posts.len();
        tables.collab_posts.retain(|p| p.id != id);
        if tables.collab_posts.len() == before {
            return Err(not_found("Collab post not found"));
        }
        tables.collaborators.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn list_collaborators(&self, post_id: Uuid) -> StoreResult<Vec<Collaborator>> {
        let tables = self.tables.read().await;
        Ok(tables
            .collaborators
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn add_collaborator(&self, post_id: Uuid, user_id: Uuid, role: Option<&str>) -> StoreResult<Collaborator> {
        let mut tables = self.tables.write().await;
        if !tables.collab_posts.iter().any(|p| p.id == post_id) {
            return Err(not_found("Collab post not found"));
        }
        if tables
            .collaborators
            .iter()
            .any(|c| c.post_id == post_id && c.user_id == user_id)
        {
            return Err(DatabaseError::Conflict("Already collaborating on this post".to_string()));
        }
        let row = Collaborator {
            post_id,
            user_id,
            role: role.map(str::to_string),
            joined_at: Utc::now(),
        };
        tables.collaborators.push(row.clone());
        Ok(row)
    }

    async fn remove_collaborator(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.collaborators.len();
        tables
            .collaborators
            .retain(|c| !(c.post_id == post_id && c.user_id == user_id));
        if tables.collaborators.len() == before {
            return Err(not_found("Not a collaborator on this post"));
        }
        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Page,
    ) -> StoreResult<(Vec<Notification>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<Notification> = tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || n.read_at.is_none()))
            .cloned()
            .collect();
        Ok((slice_page(&matching, page), matching.len() as i64))
    }

    async fn unread_count(&self, user_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.read_at.is_none())
            .count() as i64)
    }

    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        let mut tables = self.tables.write().await;
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            kind: notification.kind.to_string(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            link: notification.link.clone(),
            actor_id: notification.actor_id,
            read_at: None,
            created_at: Utc::now(),
        };
        tables.notifications.push(row.clone());
        Ok(row)
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> StoreResult<Notification> {
        let mut tables = self.tables.write().await;
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(|| not_found("Notification not found"))?;
        if notification.read_at.is_none() {
            notification.read_at = Some(Utc::now());
        }
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut updated = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && n.read_at.is_none())
        {
            notification.read_at = Some(now);
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.notifications.len();
        tables.notifications.retain(|n| !(n.id == id && n.user_id == user_id));
        if tables.notifications.len() == before {
            return Err(not_found("Notification not found"));
        }
        Ok(())
    }

    async fn list_slate_posts(
        &self,
        author_id: Option<Uuid>,
        viewer: Option<Uuid>,
        page: Page,
    ) -> StoreResult<(Vec<SlatePost>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<SlatePost> = tables
            .slate_posts
            .iter()
            .rev()
            .filter(|p| author_id.map_or(true, |a| p.author_id == a))
            .map(|p| tables.slate_view(p, viewer))
            .collect();
        Ok((slice_page(&matching, page), matching.len() as i64))
    }

    async fn create_slate_post(&self, author_id: Uuid, post: &NewSlatePost) -> StoreResult<SlatePost> {
        let mut tables = self.tables.write().await;
        let row = SlateRow {
            id: Uuid::new_v4(),
            author_id,
            content: post.content.clone(),
            media_url: post.media_url.clone(),
            created_at: Utc::now(),
        };
        tables.slate_posts.push(row.clone());
        Ok(tables.slate_view(&row, Some(author_id)))
    }

    async fn get_slate_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<SlatePost>> {
        let tables = self.tables.read().await;
        Ok(tables
            .slate_posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.slate_view(p, viewer)))
    }

    async fn delete_slate_post(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.slate_posts.len();
        tables.slate_posts.retain(|p| p.id != id);
        if tables.slate_posts.len() == before {
            return Err(not_found("Slate post not found"));
        }
        tables.slate_likes.retain(|l| l.post_id != id);
        Ok(())
    }

    async fn like_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<SlateLike> {
        let mut tables = self.tables.write().await;
        if !tables.slate_posts.iter().any(|p| p.id == post_id) {
            return Err(not_found("Slate post not found"));
        }
        if tables
            .slate_likes
            .iter()
            .any(|l| l.post_id == post_id && l.user_id == user_id)
        {
            return Err(DatabaseError::Conflict("Post already liked".to_string()));
        }
        let like = SlateLike {
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        tables.slate_likes.push(like.clone());
        Ok(like)
    }

    async fn unlike_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.slate_likes.len();
        tables
            .slate_likes
            .retain(|l| !(l.post_id == post_id && l.user_id == user_id));
        if tables.slate_likes.len() == before {
            return Err(not_found("Post not liked"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: Some("crew@set.io".to_string()),
            role: "authenticated".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_user_keeps_created_at() {
        let store = MemoryStore::new();
        let who = identity();
        let first = store.upsert_user(&who).await.unwrap();
        let second = store.upsert_user(&who).await.unwrap();
        assert_eq!(first.created_at, second.created_at);
        assert!(second.last_seen_at >= first.last_seen_at);
    }

    #[tokio::test]
    async fn gig_patch_clears_blank_columns() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let gig = store
            .create_gig(
                owner,
                &NewGig {
                    title: "1st AC".into(),
                    location: Some("Atlanta".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let patch = GigPatch {
            location: Some(String::new()),
            status: Some(GigStatus::Filled),
            ..Default::default()
        };
        let updated = store.update_gig(gig.id, &patch).await.unwrap();
        assert_eq!(updated.location, None);
        assert_eq!(updated.status, GigStatus::Filled);
        assert_eq!(updated.title, "1st AC");
    }

    #[tokio::test]
    async fn deleting_slate_post_drops_likes() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        let fan = Uuid::new_v4();
        let post = store
            .create_slate_post(
                author,
                &NewSlatePost {
                    content: "Golden hour".into(),
                    media_url: None,
                },
            )
            .await
            .unwrap();
        store.like_slate_post(post.id, fan).await.unwrap();

        let seen = store.get_slate_post(post.id, Some(fan)).await.unwrap().unwrap();
        assert_eq!(seen.like_count, 1);
        assert!(seen.liked_by_me);

        store.delete_slate_post(post.id).await.unwrap();
        assert!(matches!(
            store.like_slate_post(post.id, fan).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(store.tables.read().await.slate_likes.is_empty());
    }

    #[tokio::test]
    async fn private_rows_scoped_to_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let contact = store
            .create_contact(
                owner,
                &NewContact {
                    name: "Rita".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            store.delete_contact(stranger, contact.id).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(store.delete_contact(owner, contact.id).await.is_ok());
    }
}
