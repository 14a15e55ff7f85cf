use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::*;
use crate::database::store::{Store, StoreResult};

/// Optional text columns in PATCH statements: NULL param keeps the column,
/// an empty string clears it.
macro_rules! patch_col {
    ($col:literal, $n:literal) => {
        concat!($col, " = CASE WHEN $", $n, "::text IS NULL THEN ", $col, " ELSE NULLIF($", $n, ", '') END")
    };
}

const SLATE_COLUMNS: &str = r#"
    p.id, p.author_id, p.content, p.media_url, p.created_at,
    (SELECT COUNT(*) FROM slate_likes l WHERE l.post_id = p.id) AS like_count,
    EXISTS (SELECT 1 FROM slate_likes l WHERE l.post_id = p.id AND l.user_id = $1) AS liked_by_me
"#;

/// `Store` backed by PostgreSQL through a shared `sqlx` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%term%` for `ILIKE ... ESCAPE '\'`, with the term's own wildcards escaped
/// so search stays a literal substring match.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn expect_one(rows_affected: u64, message: &str) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(DatabaseError::NotFound(message.to_string()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_user(&self, identity: &Identity) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET email = COALESCE(EXCLUDED.email, users.email),
                    last_seen_at = now()
            RETURNING *
            "#,
        )
        .bind(identity.user_id)
        .bind(identity.email.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, user_id: Uuid, input: &ProfileInput) -> StoreResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO user_profiles (user_id, display_name, bio, location, avatar_url, website, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
                SET display_name = EXCLUDED.display_name,
                    bio = EXCLUDED.bio,
                    location = EXCLUDED.location,
                    avatar_url = EXCLUDED.avatar_url,
                    website = EXCLUDED.website,
                    skills = EXCLUDED.skills,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.display_name)
        .bind(input.bio.as_deref())
        .bind(input.location.as_deref())
        .bind(input.avatar_url.as_deref())
        .bind(input.website.as_deref())
        .bind(&input.skills)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn list_roles(&self, user_id: Uuid) -> StoreResult<Vec<UserRole>> {
        let roles = sqlx::query_as::<_, UserRole>(
            "SELECT * FROM user_roles WHERE user_id = $1 ORDER BY created_at, role",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn replace_roles(&self, user_id: Uuid, roles: &[String]) -> StoreResult<Vec<UserRole>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let mut out = Vec::with_capacity(roles.len());
        for role in roles {
            let row = sqlx::query_as::<_, UserRole>(
                "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) RETURNING *",
            )
            .bind(user_id)
            .bind(role)
            .fetch_one(&mut *tx)
            .await?;
            out.push(row);
        }

        tx.commit().await?;
        Ok(out)
    }

    async fn add_role(&self, user_id: Uuid, role: &str) -> StoreResult<UserRole> {
        sqlx::query_as::<_, UserRole>("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) RETURNING *")
            .bind(user_id)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(e).conflict_as("Role already added"))
    }

    async fn remove_role(&self, user_id: Uuid, role: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND lower(role) = lower($2)")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Role not found")
    }

    async fn list_gigs(&self, filter: &GigFilter, page: Page) -> StoreResult<(Vec<Gig>, i64)> {
        let search = filter.search.as_deref().map(like_pattern);
        const WHERE: &str = r#"
            WHERE ($1::text IS NULL
                   OR title ILIKE $1 ESCAPE '\'
                   OR description ILIKE $1 ESCAPE '\'
                   OR location ILIKE $1 ESCAPE '\')
              AND ($2::gig_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR lower(role) = lower($3))
              AND ($4::uuid IS NULL OR owner_id = $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM gigs {}", WHERE))
            .bind(search.as_deref())
            .bind(filter.status)
            .bind(filter.role.as_deref())
            .bind(filter.owner_id)
            .fetch_one(&self.pool)
            .await?;

        let gigs = sqlx::query_as::<_, Gig>(&format!(
            "SELECT * FROM gigs {} ORDER BY created_at DESC, id LIMIT $5 OFFSET $6",
            WHERE
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.role.as_deref())
        .bind(filter.owner_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((gigs, total))
    }

    async fn create_gig(&self, owner_id: Uuid, gig: &NewGig) -> StoreResult<Gig> {
        let row = sqlx::query_as::<_, Gig>(
            r#"
            INSERT INTO gigs (id, owner_id, title, description, location, role, pay_rate, gig_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'open'::gig_status))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&gig.title)
        .bind(gig.description.as_deref())
        .bind(gig.location.as_deref())
        .bind(gig.role.as_deref())
        .bind(gig.pay_rate.as_deref())
        .bind(gig.gig_date)
        .bind(gig.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_gig(&self, id: Uuid) -> StoreResult<Option<Gig>> {
        let gig = sqlx::query_as::<_, Gig>("SELECT * FROM gigs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(gig)
    }

    async fn update_gig(&self, id: Uuid, patch: &GigPatch) -> StoreResult<Gig> {
        let sql = format!(
            "UPDATE gigs SET title = COALESCE($2, title), {}, {}, {}, {}, \
             gig_date = COALESCE($7, gig_date), status = COALESCE($8, status), updated_at = now() \
             WHERE id = $1 RETURNING *",
            patch_col!("description", "3"),
            patch_col!("location", "4"),
            patch_col!("role", "5"),
            patch_col!("pay_rate", "6"),
        );

        sqlx::query_as::<_, Gig>(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.location.as_deref())
            .bind(patch.role.as_deref())
            .bind(patch.pay_rate.as_deref())
            .bind(patch.gig_date)
            .bind(patch.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Gig not found".to_string()))
    }

    async fn delete_gig(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM gigs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Gig not found")
    }

    async fn list_availability(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Availability>> {
        let rows = sqlx::query_as::<_, Availability>(
            r#"
            SELECT * FROM crew_availability
            WHERE user_id = $1
              AND ($2::date IS NULL OR end_date >= $2)
              AND ($3::date IS NULL OR start_date <= $3)
            ORDER BY start_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_availability(&self, user_id: Uuid, entry: &NewAvailability) -> StoreResult<Availability> {
        let row = sqlx::query_as::<_, Availability>(
            r#"
            INSERT INTO crew_availability (id, user_id, start_date, end_date, status, note)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'available'::availability_status), $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .bind(entry.status)
        .bind(entry.note.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Availability>> {
        let row = sqlx::query_as::<_, Availability>(
            "SELECT * FROM crew_availability WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_availability(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &AvailabilityPatch,
    ) -> StoreResult<Availability> {
        let sql = format!(
            "UPDATE crew_availability SET start_date = COALESCE($3, start_date), end_date = COALESCE($4, end_date), \
             status = COALESCE($5, status), {}, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING *",
            patch_col!("note", "6")
        );

        sqlx::query_as::<_, Availability>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(patch.start_date)
            .bind(patch.end_date)
            .bind(patch.status)
            .bind(patch.note.as_deref())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Availability entry not found".to_string()))
    }

    async fn delete_availability(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM crew_availability WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Availability entry not found")
    }

    async fn list_contacts(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        page: Page,
    ) -> StoreResult<(Vec<CrewContact>, i64)> {
        let search = search.map(like_pattern);
        const WHERE: &str = r#"
            WHERE owner_id = $1
              AND ($2::text IS NULL
                   OR name ILIKE $2 ESCAPE '\'
                   OR role ILIKE $2 ESCAPE '\'
                   OR email ILIKE $2 ESCAPE '\')
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM crew_contacts {}", WHERE))
            .bind(owner_id)
            .bind(search.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, CrewContact>(&format!(
            "SELECT * FROM crew_contacts {} ORDER BY lower(name), created_at LIMIT $3 OFFSET $4",
            WHERE
        ))
        .bind(owner_id)
        .bind(search.as_deref())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn create_contact(&self, owner_id: Uuid, contact: &NewContact) -> StoreResult<CrewContact> {
        let row = sqlx::query_as::<_, CrewContact>(
            r#"
            INSERT INTO crew_contacts (id, owner_id, contact_user_id, name, email, phone, role, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(contact.contact_user_id)
        .bind(&contact.name)
        .bind(contact.email.as_deref())
        .bind(contact.phone.as_deref())
        .bind(contact.role.as_deref())
        .bind(contact.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(e).not_found_as("Linked user not found"))?;
        Ok(row)
    }

    async fn update_contact(&self, owner_id: Uuid, id: Uuid, patch: &ContactPatch) -> StoreResult<CrewContact> {
        let sql = format!(
            "UPDATE crew_contacts SET name = COALESCE($3, name), {}, {}, {}, {} \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
            patch_col!("email", "4"),
            patch_col!("phone", "5"),
            patch_col!("role", "6"),
            patch_col!("notes", "7"),
        );

        sqlx::query_as::<_, CrewContact>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(patch.name.as_deref())
            .bind(patch.email.as_deref())
            .bind(patch.phone.as_deref())
            .bind(patch.role.as_deref())
            .bind(patch.notes.as_deref())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Contact not found".to_string()))
    }

    async fn delete_contact(&self, owner_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM crew_contacts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Contact not found")
    }

    async fn list_collab_posts(&self, filter: &CollabFilter, page: Page) -> StoreResult<(Vec<CollabPost>, i64)> {
        let search = filter.search.as_deref().map(like_pattern);
        const WHERE: &str = r#"
            WHERE ($1::text IS NULL
                   OR title ILIKE $1 ESCAPE '\'
                   OR description ILIKE $1 ESCAPE '\'
                   OR EXISTS (SELECT 1 FROM unnest(roles_needed) r WHERE r ILIKE $1 ESCAPE '\'))
              AND ($2::collab_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR owner_id = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM collab_posts {}", WHERE))
            .bind(search.as_deref())
            .bind(filter.status)
            .bind(filter.owner_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, CollabPost>(&format!(
            "SELECT * FROM collab_posts {} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5",
            WHERE
        ))
        .bind(search.as_deref())
        .bind(filter.status)
        .bind(filter.owner_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn create_collab_post(&self, owner_id: Uuid, post: &NewCollabPost) -> StoreResult<CollabPost> {
        let row = sqlx::query_as::<_, CollabPost>(
            r#"
            INSERT INTO collab_posts (id, owner_id, title, description, project_type, roles_needed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&post.title)
        .bind(post.description.as_deref())
        .bind(post.project_type.as_deref())
        .bind(&post.roles_needed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_collab_post(&self, id: Uuid) -> StoreResult<Option<CollabPost>> {
        let row = sqlx::query_as::<_, CollabPost>("SELECT * FROM collab_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_collab_post(&self, id: Uuid, patch: &CollabPatch) -> StoreResult<CollabPost> {
        let sql = format!(
            "UPDATE collab_posts SET title = COALESCE($2, title), {}, {}, \
             roles_needed = COALESCE($5, roles_needed), status = COALESCE($6, status), updated_at = now() \
             WHERE id = $1 RETURNING *",
            patch_col!("description", "3"),
            patch_col!("project_type", "4"),
        );

        sqlx::query_as::<_, CollabPost>(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.project_type.as_deref())
            .bind(patch.roles_needed.as_ref())
            .bind(patch.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Collab post not found".to_string()))
    }

    async fn delete_collab_post(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM collab_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Collab post not found")
    }

    async fn list_collaborators(&self, post_id: Uuid) -> StoreResult<Vec<Collaborator>> {
        let rows = sqlx::query_as::<_, Collaborator>(
            "SELECT * FROM collab_collaborators WHERE post_id = $1 ORDER BY joined_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_collaborator(&self, post_id: Uuid, user_id: Uuid, role: Option<&str>) -> StoreResult<Collaborator> {
        sqlx::query_as::<_, Collaborator>(
            "INSERT INTO collab_collaborators (post_id, user_id, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::from(e)
                .conflict_as("Already collaborating on this post")
                .not_found_as("Collab post not found")
        })
    }

    async fn remove_collaborator(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM collab_collaborators WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Not a collaborator on this post")
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Page,
    ) -> StoreResult<(Vec<Notification>, i64)> {
        const WHERE: &str = "WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM notifications {}", WHERE))
            .bind(user_id)
            .bind(unread_only)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications {} ORDER BY created_at DESC, id LIMIT $3 OFFSET $4",
            WHERE
        ))
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn unread_count(&self, user_id: Uuid) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn create_notification(&self, notification: &NewNotification) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, link, actor_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(&notification.title)
        .bind(notification.body.as_deref())
        .bind(notification.link.as_deref())
        .bind(notification.actor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> StoreResult<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET read_at = COALESCE(read_at, now())
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Notification not found".to_string()))
    }

    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE notifications SET read_at = now() WHERE user_id = $1 AND read_at IS NULL")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Notification not found")
    }

    async fn list_slate_posts(
        &self,
        author_id: Option<Uuid>,
        viewer: Option<Uuid>,
        page: Page,
    ) -> StoreResult<(Vec<SlatePost>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM slate_posts WHERE ($1::uuid IS NULL OR author_id = $1)")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, SlatePost>(&format!(
            "SELECT {} FROM slate_posts p WHERE ($2::uuid IS NULL OR p.author_id = $2) \
             ORDER BY p.created_at DESC, p.id LIMIT $3 OFFSET $4",
            SLATE_COLUMNS
        ))
        .bind(viewer)
        .bind(author_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn create_slate_post(&self, author_id: Uuid, post: &NewSlatePost) -> StoreResult<SlatePost> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO slate_posts (id, author_id, content, media_url) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(author_id)
            .bind(&post.content)
            .bind(post.media_url.as_deref())
            .execute(&self.pool)
            .await?;

        self.get_slate_post(id, Some(author_id))
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Slate post not found".to_string()))
    }

    async fn get_slate_post(&self, id: Uuid, viewer: Option<Uuid>) -> StoreResult<Option<SlatePost>> {
        let row = sqlx::query_as::<_, SlatePost>(&format!(
            "SELECT {} FROM slate_posts p WHERE p.id = $2",
            SLATE_COLUMNS
        ))
        .bind(viewer)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_slate_post(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM slate_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Slate post not found")
    }

    async fn like_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<SlateLike> {
        sqlx::query_as::<_, SlateLike>("INSERT INTO slate_likes (post_id, user_id) VALUES ($1, $2) RETURNING *")
            .bind(post_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::from(e)
                    .conflict_as("Post already liked")
                    .not_found_as("Slate post not found")
            })
    }

    async fn unlike_slate_post(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM slate_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), "Post not liked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("grip"), "%grip%");
        assert_eq!(like_pattern("G_ip"), r"%G\_ip%");
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
