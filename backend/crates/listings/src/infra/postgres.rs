//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, ListingPhotoId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{listing::Listing, listing_photo::ListingPhoto};
use crate::domain::repository::{ListingPhotoRepository, ListingQuery, ListingRepository};
use crate::domain::value_object::{
    Currency, ListingDescription, ListingStatus, ListingTitle, Price,
};
use crate::error::{ListingError, ListingResult};

#[derive(Clone)]
pub struct PgListingsRepository {
    pool: PgPool,
}

impl PgListingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LISTING_COLUMNS: &str = r#"
    listing_id,
    seller_id,
    title,
    description,
    price_minor_units,
    currency,
    status,
    category,
    condition,
    view_count,
    moderated_by,
    moderated_at,
    rejection_reason,
    created_at,
    updated_at
"#;

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ============================================================================
// Listing Repository Implementation
// ============================================================================

impl ListingRepository for PgListingsRepository {
    async fn create(&self, listing: &Listing) -> ListingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                listing_id,
                seller_id,
                title,
                description,
                price_minor_units,
                currency,
                status,
                category,
                condition,
                view_count,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(listing.listing_id.as_uuid())
        .bind(listing.seller_id.as_uuid())
        .bind(listing.title.as_str())
        .bind(listing.description.as_str())
        .bind(listing.price.minor_units())
        .bind(listing.currency.as_str())
        .bind(listing.status.id())
        .bind(&listing.category)
        .bind(&listing.condition)
        .bind(listing.view_count)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, listing_id: &ListingId) -> ListingResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE listing_id = $1"
        ))
        .bind(listing_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ListingRow::into_listing).transpose()
    }

    async fn list_active(&self, query: &ListingQuery) -> ListingResult<Vec<Listing>> {
        let rows = match &query.search {
            Some(search) => {
                sqlx::query_as::<_, ListingRow>(&format!(
                    r#"
                    SELECT {LISTING_COLUMNS} FROM listings
                    WHERE status = $1
                      AND (title ILIKE $2 OR description ILIKE $2)
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#
                ))
                .bind(ListingStatus::Active.id())
                .bind(like_pattern(search))
                .bind(query.limit)
                .bind(query.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ListingRow>(&format!(
                    r#"
                    SELECT {LISTING_COLUMNS} FROM listings
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(ListingStatus::Active.id())
                .bind(query.limit)
                .bind(query.offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(ListingRow::into_listing).collect()
    }

    async fn increment_view_count(&self, listing_id: &ListingId) -> ListingResult<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE listings SET view_count = view_count + 1
            WHERE listing_id = $1
            RETURNING view_count
            "#,
        )
        .bind(listing_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        count.ok_or(ListingError::NotFound)
    }

    async fn update_moderation(&self, listing: &Listing) -> ListingResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE listings SET
                status = $2,
                moderated_by = $3,
                moderated_at = $4,
                rejection_reason = $5,
                updated_at = $6
            WHERE listing_id = $1
            "#,
        )
        .bind(listing.listing_id.as_uuid())
        .bind(listing.status.id())
        .bind(listing.moderated_by.map(|id| id.into_uuid()))
        .bind(listing.moderated_at)
        .bind(&listing.rejection_reason)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ListingError::NotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Listing Photo Repository Implementation
// ============================================================================

impl ListingPhotoRepository for PgListingsRepository {
    async fn count_for_listing(&self, listing_id: &ListingId) -> ListingResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM listing_photos WHERE listing_id = $1")
                .bind(listing_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn find_for_listings(&self, listing_ids: &[ListingId]) -> ListingResult<Vec<ListingPhoto>> {
        if listing_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = listing_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query_as::<_, ListingPhotoRow>(
            r#"
            SELECT
                photo_id,
                listing_id,
                photo_url,
                display_order,
                thumbnail_data,
                file_size_bytes,
                original_filename,
                created_at
            FROM listing_photos
            WHERE listing_id = ANY($1)
            ORDER BY listing_id, display_order
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ListingPhotoRow::into_photo).collect())
    }

    async fn insert_many(
        &self,
        listing_id: &ListingId,
        photos: &[ListingPhoto],
        max_photos: usize,
    ) -> ListingResult<()> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent uploads to the same listing.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT listing_id FROM listings WHERE listing_id = $1 FOR UPDATE")
                .bind(listing_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(ListingError::NotFound);
        }

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM listing_photos WHERE listing_id = $1")
                .bind(listing_id.as_uuid())
                .fetch_one(&mut *tx)
                .await?;
        let existing = existing.max(0) as usize;
        if existing + photos.len() > max_photos {
            return Err(ListingError::TooManyPhotos {
                existing,
                max: max_photos,
            });
        }

        for photo in photos {
            sqlx::query(
                r#"
                INSERT INTO listing_photos (
                    photo_id,
                    listing_id,
                    photo_url,
                    display_order,
                    thumbnail_data,
                    file_size_bytes,
                    original_filename,
                    created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(photo.photo_id.as_uuid())
            .bind(photo.listing_id.as_uuid())
            .bind(&photo.photo_url)
            .bind(photo.display_order)
            .bind(&photo.thumbnail_data)
            .bind(photo.file_size_bytes)
            .bind(&photo.original_filename)
            .bind(photo.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ListingRow {
    listing_id: Uuid,
    seller_id: Uuid,
    title: String,
    description: String,
    price_minor_units: i64,
    currency: String,
    status: i16,
    category: Option<String>,
    condition: Option<String>,
    view_count: i64,
    moderated_by: Option<Uuid>,
    moderated_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self) -> ListingResult<Listing> {
        let status = ListingStatus::from_id(self.status).ok_or_else(|| {
            ListingError::Internal(format!("Unknown listing status id: {}", self.status))
        })?;

        Ok(Listing {
            listing_id: ListingId::from_uuid(self.listing_id),
            seller_id: UserId::from_uuid(self.seller_id),
            title: ListingTitle::from_db(self.title),
            description: ListingDescription::from_db(self.description),
            price: Price::from_db(self.price_minor_units),
            currency: Currency::from_db(self.currency),
            status,
            category: self.category,
            condition: self.condition,
            view_count: self.view_count,
            moderated_by: self.moderated_by.map(UserId::from_uuid),
            moderated_at: self.moderated_at,
            rejection_reason: self.rejection_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListingPhotoRow {
    photo_id: Uuid,
    listing_id: Uuid,
    photo_url: String,
    display_order: i32,
    thumbnail_data: Option<String>,
    file_size_bytes: Option<i64>,
    original_filename: Option<String>,
    created_at: DateTime<Utc>,
}

impl ListingPhotoRow {
    fn into_photo(self) -> ListingPhoto {
        ListingPhoto {
            photo_id: ListingPhotoId::from_uuid(self.photo_id),
            listing_id: ListingId::from_uuid(self.listing_id),
            photo_url: self.photo_url,
            display_order: self.display_order,
            thumbnail_data: self.thumbnail_data,
            file_size_bytes: self.file_size_bytes,
            original_filename: self.original_filename,
            created_at: self.created_at,
        }
    }
}
