//! Crate-level tests for listings
//!
//! Use cases and routes run against an in-memory repository and photo store.

#[cfg(test)]
mod support {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use kernel::id::{ListingId, UserId};
    use kernel::principal::{Principal, Role};

    use crate::domain::entity::listing::{Listing, NewListing};
    use crate::domain::entity::listing_photo::ListingPhoto;
    use crate::domain::photo::PhotoUpload;
    use crate::domain::repository::{ListingPhotoRepository, ListingQuery, ListingRepository};
    use crate::domain::value_object::{
        Currency, ListingDescription, ListingStatus, ListingTitle, Price,
    };
    use crate::error::{ListingError, ListingResult};
    use crate::infra::storage::{PhotoStorage, StorageError, object_key};

    pub const CDN: &str = "https://cdn.test/";

    pub fn principal(role: Role) -> Principal {
        Principal {
            user_id: UserId::new(),
            public_id: "pub-1".to_string(),
            role,
            identity_verified: true,
        }
    }

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    pub fn png_upload(name: &str) -> PhotoUpload {
        PhotoUpload {
            filename: Some(name.to_string()),
            content_type: Some("image/png".to_string()),
            bytes: png_bytes(64, 32),
        }
    }

    // ========================================================================
    // In-memory repository
    // ========================================================================

    #[derive(Clone, Default)]
    pub struct MemoryListingsRepository {
        listings: Arc<Mutex<Vec<Listing>>>,
        photos: Arc<Mutex<Vec<ListingPhoto>>>,
        fail_photo_inserts: Arc<AtomicBool>,
        /// Photos another request commits right before the next insert
        racing_photos: Arc<AtomicUsize>,
    }

    impl MemoryListingsRepository {
        /// Listing created `age_minutes` ago with the given status.
        pub fn seed(
            &self,
            seller_id: UserId,
            title: &str,
            description: &str,
            status: ListingStatus,
            age_minutes: i64,
        ) -> Listing {
            let mut listing = Listing::new(
                seller_id,
                NewListing {
                    title: ListingTitle::new(title).unwrap(),
                    description: ListingDescription::new(description).unwrap(),
                    price: Price::new(1500).unwrap(),
                    currency: Currency::default(),
                    category: None,
                    condition: None,
                },
            );
            listing.status = status;
            listing.created_at = Utc::now() - Duration::minutes(age_minutes);
            self.listings.lock().unwrap().push(listing.clone());
            listing
        }

        pub fn listing(&self, listing_id: &ListingId) -> Listing {
            self.listings
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.listing_id == *listing_id)
                .cloned()
                .unwrap()
        }

        pub fn listings(&self) -> Vec<Listing> {
            self.listings.lock().unwrap().clone()
        }

        pub fn photos(&self) -> Vec<ListingPhoto> {
            self.photos.lock().unwrap().clone()
        }

        pub fn add_photos(&self, listing_id: ListingId, count: usize) {
            let mut photos = self.photos.lock().unwrap();
            for order in 0..count {
                photos.push(ListingPhoto::new(
                    listing_id,
                    format!("{CDN}seed/{order}.jpg"),
                    order as i32,
                ));
            }
        }

        pub fn fail_photo_inserts(&self) {
            self.fail_photo_inserts.store(true, Ordering::SeqCst);
        }

        pub fn race_photo_inserts(&self, count: usize) {
            self.racing_photos.store(count, Ordering::SeqCst);
        }
    }

    impl ListingRepository for MemoryListingsRepository {
        async fn create(&self, listing: &Listing) -> ListingResult<()> {
            self.listings.lock().unwrap().push(listing.clone());
            Ok(())
        }

        async fn find_by_id(&self, listing_id: &ListingId) -> ListingResult<Option<Listing>> {
            let listings = self.listings.lock().unwrap();
            Ok(listings.iter().find(|l| l.listing_id == *listing_id).cloned())
        }

        async fn list_active(&self, query: &ListingQuery) -> ListingResult<Vec<Listing>> {
            let needle = query.search.as_ref().map(|s| s.to_lowercase());
            let mut active: Vec<Listing> = self
                .listings
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.status == ListingStatus::Active)
                .filter(|l| match &needle {
                    Some(needle) => {
                        l.title.as_str().to_lowercase().contains(needle)
                            || l.description.as_str().to_lowercase().contains(needle)
                    }
                    None => true,
                })
                .cloned()
                .collect();
            active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(active
                .into_iter()
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .collect())
        }

        async fn increment_view_count(&self, listing_id: &ListingId) -> ListingResult<i64> {
            let mut listings = self.listings.lock().unwrap();
            let listing = listings
                .iter_mut()
                .find(|l| l.listing_id == *listing_id)
                .ok_or(ListingError::NotFound)?;
            listing.view_count += 1;
            Ok(listing.view_count)
        }

        async fn update_moderation(&self, listing: &Listing) -> ListingResult<()> {
            let mut listings = self.listings.lock().unwrap();
            let slot = listings
                .iter_mut()
                .find(|l| l.listing_id == listing.listing_id)
                .ok_or(ListingError::NotFound)?;
            *slot = listing.clone();
            Ok(())
        }
    }

    impl ListingPhotoRepository for MemoryListingsRepository {
        async fn count_for_listing(&self, listing_id: &ListingId) -> ListingResult<i64> {
            let photos = self.photos.lock().unwrap();
            Ok(photos.iter().filter(|p| p.listing_id == *listing_id).count() as i64)
        }

        async fn find_for_listings(
            &self,
            listing_ids: &[ListingId],
        ) -> ListingResult<Vec<ListingPhoto>> {
            let mut found: Vec<ListingPhoto> = self
                .photos
                .lock()
                .unwrap()
                .iter()
                .filter(|p| listing_ids.contains(&p.listing_id))
                .cloned()
                .collect();
            found.sort_by_key(|p| p.display_order);
            Ok(found)
        }

        async fn insert_many(
            &self,
            listing_id: &ListingId,
            photos: &[ListingPhoto],
            max_photos: usize,
        ) -> ListingResult<()> {
            if self.fail_photo_inserts.load(Ordering::SeqCst) {
                return Err(ListingError::Internal("insert failed".to_string()));
            }
            let racing = self.racing_photos.swap(0, Ordering::SeqCst);
            if racing > 0 {
                self.add_photos(*listing_id, racing);
            }

            let mut stored = self.photos.lock().unwrap();
            let existing = stored.iter().filter(|p| p.listing_id == *listing_id).count();
            if existing + photos.len() > max_photos {
                return Err(ListingError::TooManyPhotos {
                    existing,
                    max: max_photos,
                });
            }
            stored.extend_from_slice(photos);
            Ok(())
        }
    }

    // ========================================================================
    // In-memory photo storage
    // ========================================================================

    #[derive(Default)]
    pub struct MemoryStorage {
        objects: Mutex<Vec<String>>,
        uploads: AtomicUsize,
        /// 0-based upload call that fails
        fail_on: Option<usize>,
    }

    impl MemoryStorage {
        pub fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Self::default()
            }
        }

        pub fn objects(&self) -> Vec<String> {
            self.objects.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PhotoStorage for MemoryStorage {
        async fn upload(&self, photo: &PhotoUpload, folder: &str) -> Result<String, StorageError> {
            let call = self.uploads.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(call) {
                return Err(StorageError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            let url = format!("{CDN}{}", object_key(folder, &photo.extension()));
            self.objects.lock().unwrap().push(url.clone());
            Ok(url)
        }

        async fn delete(&self, url: &str) -> bool {
            let mut objects = self.objects.lock().unwrap();
            let before = objects.len();
            objects.retain(|o| o != url);
            objects.len() != before
        }

        fn name(&self) -> &'static str {
            "memory"
        }
    }
}

#[cfg(test)]
mod create_tests {
    use std::sync::Arc;

    use kernel::principal::Role;

    use super::support::*;
    use crate::application::{CreateListingInput, CreateListingUseCase};
    use crate::domain::value_object::ListingStatus;
    use crate::error::ListingError;

    fn input(title: &str, price: i64) -> CreateListingInput {
        CreateListingInput {
            title: title.to_string(),
            description: "Barely used, pick up near the library".to_string(),
            price_minor_units: price,
            currency: None,
            category: Some("  books ".to_string()),
            condition: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_listing_starts_pending() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student);

        let listing = CreateListingUseCase::new(repo.clone())
            .execute(&seller, input("  Calculus textbook ", 5000))
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.seller_id, seller.user_id);
        assert_eq!(listing.title.as_str(), "Calculus textbook");
        assert_eq!(listing.currency.as_str(), "KZT");
        assert_eq!(listing.category.as_deref(), Some("books"));
        assert_eq!(listing.condition, None);
        assert_eq!(listing.view_count, 0);
        assert_eq!(repo.listings().len(), 1);
    }

    #[tokio::test]
    async fn test_create_listing_with_currency() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let mut req = input("Desk lamp", 2500);
        req.currency = Some("usd".to_string());

        let listing = CreateListingUseCase::new(repo)
            .execute(&principal(Role::Student), req)
            .await
            .unwrap();
        assert_eq!(listing.currency.as_str(), "USD");
    }

    #[tokio::test]
    async fn test_create_listing_rejects_invalid_input() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let use_case = CreateListingUseCase::new(repo.clone());
        let seller = principal(Role::Student);

        let cases = [
            input("   ", 100),
            input("Bike", 0),
            input("Bike", -5),
            input(&"x".repeat(121), 100),
            CreateListingInput {
                currency: Some("tenge".to_string()),
                ..input("Bike", 100)
            },
        ];
        for case in cases {
            let err = use_case.execute(&seller, case).await.unwrap_err();
            assert!(matches!(err, ListingError::Validation(_)), "{err:?}");
        }
        assert!(repo.listings().is_empty());
    }
}

#[cfg(test)]
mod catalogue_tests {
    use std::sync::Arc;

    use kernel::id::ListingId;
    use kernel::principal::Role;

    use super::support::*;
    use crate::application::{
        GetListingUseCase, ListListingsInput, ListListingsUseCase, ListingsConfig,
    };
    use crate::domain::value_object::ListingStatus;
    use crate::error::ListingError;

    fn list_input(search: Option<&str>) -> ListListingsInput {
        ListListingsInput {
            search: search.map(str::to_string),
            limit: None,
            offset: None,
        }
    }

    #[tokio::test]
    async fn test_only_active_listings_newest_first() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student).user_id;
        let old = repo.seed(seller, "Old chair", "Wooden", ListingStatus::Active, 30);
        let new = repo.seed(seller, "New chair", "Plastic", ListingStatus::Active, 1);
        repo.seed(seller, "Pending", "Waiting", ListingStatus::Pending, 2);
        repo.seed(seller, "Sold", "Gone", ListingStatus::Sold, 3);
        repo.seed(seller, "Rejected", "No", ListingStatus::Rejected, 4);

        let listings = ListListingsUseCase::new(repo, Arc::new(ListingsConfig::default()))
            .execute(list_input(None))
            .await
            .unwrap();

        let ids: Vec<ListingId> = listings.iter().map(|l| l.listing.listing_id).collect();
        assert_eq!(ids, vec![new.listing_id, old.listing_id]);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student).user_id;
        repo.seed(seller, "Mountain BIKE", "21 gears", ListingStatus::Active, 5);
        repo.seed(seller, "Helmet", "Fits any bike", ListingStatus::Active, 4);
        repo.seed(seller, "Kettle", "1.7 litres", ListingStatus::Active, 3);

        let use_case = ListListingsUseCase::new(repo, Arc::new(ListingsConfig::default()));

        let found = use_case.execute(list_input(Some(" bike "))).await.unwrap();
        assert_eq!(found.len(), 2);

        let all = use_case.execute(list_input(Some("   "))).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_paging_is_clamped() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student).user_id;
        for i in 0..5 {
            repo.seed(seller, &format!("Item {i}"), "Thing", ListingStatus::Active, i);
        }
        let config = ListingsConfig {
            max_page_size: 2,
            ..ListingsConfig::default()
        };
        let use_case = ListListingsUseCase::new(repo, Arc::new(config));

        let page = use_case
            .execute(ListListingsInput {
                search: None,
                limit: Some(1000),
                offset: Some(4),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].listing.title.as_str(), "Item 4");

        let first = use_case
            .execute(ListListingsInput {
                search: None,
                limit: Some(0),
                offset: Some(-3),
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].listing.title.as_str(), "Item 0");
    }

    #[tokio::test]
    async fn test_photos_attached_in_order() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student).user_id;
        let with = repo.seed(seller, "With photos", "x", ListingStatus::Active, 1);
        repo.seed(seller, "Without", "y", ListingStatus::Active, 2);
        repo.add_photos(with.listing_id, 3);

        let listings = ListListingsUseCase::new(repo, Arc::new(ListingsConfig::default()))
            .execute(list_input(None))
            .await
            .unwrap();

        let orders: Vec<i32> = listings[0].photos.iter().map(|p| p.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(listings[1].photos.is_empty());
    }

    #[tokio::test]
    async fn test_get_counts_views_from_others_only() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student);
        let buyer = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Lamp", "Bright", ListingStatus::Active, 1);
        let use_case = GetListingUseCase::new(repo.clone());

        let seen = use_case.execute(&buyer, listing.listing_id).await.unwrap();
        assert_eq!(seen.listing.view_count, 1);
        use_case.execute(&buyer, listing.listing_id).await.unwrap();

        let own = use_case.execute(&seller, listing.listing_id).await.unwrap();
        assert_eq!(own.listing.view_count, 2);
        assert_eq!(repo.listing(&listing.listing_id).view_count, 2);
    }

    #[tokio::test]
    async fn test_get_hides_unpublished_listings() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Lamp", "Bright", ListingStatus::Pending, 1);
        let use_case = GetListingUseCase::new(repo.clone());

        let err = use_case
            .execute(&principal(Role::Student), listing.listing_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound));

        assert!(use_case.execute(&seller, listing.listing_id).await.is_ok());
        assert!(
            use_case
                .execute(&principal(Role::Moderator), listing.listing_id)
                .await
                .is_ok()
        );
        assert_eq!(repo.listing(&listing.listing_id).view_count, 0);

        let err = use_case
            .execute(&seller, ListingId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound));
    }
}

#[cfg(test)]
mod upload_tests {
    use std::sync::Arc;

    use kernel::id::ListingId;
    use kernel::principal::Role;

    use super::support::*;
    use crate::application::{ListingsConfig, UploadPhotosUseCase};
    use crate::domain::photo::{PhotoError, PhotoUpload};
    use crate::domain::value_object::ListingStatus;
    use crate::error::ListingError;
    use crate::infra::storage::PhotoStorage;

    fn use_case(
        repo: &Arc<MemoryListingsRepository>,
        storage: &Arc<MemoryStorage>,
    ) -> UploadPhotosUseCase<MemoryListingsRepository> {
        let storage: Arc<dyn PhotoStorage> = storage.clone();
        UploadPhotosUseCase::new(repo.clone(), storage, Arc::new(ListingsConfig::default()))
    }

    #[tokio::test]
    async fn test_upload_stores_photos_with_thumbnails() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Pending, 1);
        repo.add_photos(listing.listing_id, 1);

        let uploaded = use_case(&repo, &storage)
            .execute(
                &seller,
                listing.listing_id,
                vec![png_upload("front.png"), png_upload("back.PNG")],
            )
            .await
            .unwrap();

        assert_eq!(uploaded.len(), 2);
        for photo in &uploaded {
            assert!(photo.url.starts_with(CDN));
            assert!(photo.url.ends_with(".png"));
            assert!(photo.thumbnail.as_deref().is_some_and(|t| !t.is_empty()));
        }
        assert_eq!(storage.objects().len(), 2);

        let mut photos = repo.photos();
        photos.sort_by_key(|p| p.display_order);
        assert_eq!(photos.len(), 3);
        assert_eq!(photos[1].display_order, 1);
        assert_eq!(photos[2].display_order, 2);
        assert_eq!(photos[1].original_filename.as_deref(), Some("front.png"));
        assert!(photos[1].file_size_bytes.is_some_and(|size| size > 0));
    }

    #[tokio::test]
    async fn test_upload_requires_photos_and_ownership() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);
        let use_case = use_case(&repo, &storage);

        let err = use_case
            .execute(&seller, listing.listing_id, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Validation(_)));

        let err = use_case
            .execute(&principal(Role::Admin), listing.listing_id, vec![png_upload("a.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotOwner));

        let err = use_case
            .execute(&seller, ListingId::new(), vec![png_upload("a.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound));

        assert!(storage.objects().is_empty());
    }

    #[tokio::test]
    async fn test_upload_enforces_photo_limit() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);
        repo.add_photos(listing.listing_id, 4);

        let err = use_case(&repo, &storage)
            .execute(
                &seller,
                listing.listing_id,
                vec![png_upload("a.png"), png_upload("b.png")],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::TooManyPhotos {
                existing: 4,
                max: 5
            }
        ));
        assert!(storage.objects().is_empty());
    }

    #[tokio::test]
    async fn test_upload_validates_every_file_first() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);

        let pdf = PhotoUpload {
            filename: Some("scan.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        };
        let err = use_case(&repo, &storage)
            .execute(&seller, listing.listing_id, vec![png_upload("a.png"), pdf])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::InvalidPhoto(PhotoError::UnsupportedType { .. })
        ));
        assert!(storage.objects().is_empty());
        assert!(repo.photos().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_image_uploads_nothing() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);

        let garbage = PhotoUpload {
            filename: Some("broken.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: b"definitely not a png".to_vec(),
        };
        let err = use_case(&repo, &storage)
            .execute(&seller, listing.listing_id, vec![png_upload("a.png"), garbage])
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::ImageProcessing(_)));
        assert!(storage.objects().is_empty());
        assert!(repo.photos().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_cleans_up_earlier_uploads() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::failing_on(1));
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);

        let err = use_case(&repo, &storage)
            .execute(
                &seller,
                listing.listing_id,
                vec![png_upload("a.png"), png_upload("b.png")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Storage(_)));
        assert_eq!(err.status_code().as_u16(), 502);
        assert!(storage.objects().is_empty());
        assert!(repo.photos().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_objects() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);
        repo.fail_photo_inserts();

        let err = use_case(&repo, &storage)
            .execute(&seller, listing.listing_id, vec![png_upload("a.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Internal(_)));
        assert!(storage.objects().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_upload_cannot_exceed_photo_limit() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Active, 1);
        repo.add_photos(listing.listing_id, 2);
        // Passes the early count (2 + 3 <= 5), then another request adds two.
        repo.race_photo_inserts(2);

        let err = use_case(&repo, &storage)
            .execute(
                &seller,
                listing.listing_id,
                vec![png_upload("a.png"), png_upload("b.png"), png_upload("c.png")],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::TooManyPhotos {
                existing: 4,
                max: 5
            }
        ));
        assert_eq!(err.status_code().as_u16(), 400);
        assert!(storage.objects().is_empty());
        assert_eq!(repo.photos().len(), 4);
    }
}

#[cfg(test)]
mod moderation_tests {
    use std::sync::Arc;

    use kernel::id::ListingId;
    use kernel::principal::Role;

    use super::support::*;
    use crate::application::ModerateListingUseCase;
    use crate::domain::entity::listing::ModerationDecision;
    use crate::domain::value_object::ListingStatus;
    use crate::error::ListingError;

    fn reject(reason: &str) -> ModerationDecision {
        ModerationDecision::Reject {
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn test_moderator_approves_pending_listing() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let moderator = principal(Role::Moderator);
        let listing = repo.seed(
            principal(Role::Student).user_id,
            "Bike",
            "Red",
            ListingStatus::Pending,
            1,
        );

        let moderated = ModerateListingUseCase::new(repo.clone())
            .execute(&moderator, listing.listing_id, ModerationDecision::Approve)
            .await
            .unwrap();

        assert_eq!(moderated.status, ListingStatus::Active);
        let stored = repo.listing(&listing.listing_id);
        assert_eq!(stored.status, ListingStatus::Active);
        assert_eq!(stored.moderated_by, Some(moderator.user_id));
        assert!(stored.moderated_at.is_some());
        assert_eq!(stored.rejection_reason, None);
    }

    #[tokio::test]
    async fn test_admin_rejects_with_reason() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let listing = repo.seed(
            principal(Role::Student).user_id,
            "Bike",
            "Red",
            ListingStatus::Active,
            1,
        );
        let use_case = ModerateListingUseCase::new(repo.clone());
        let admin = principal(Role::Admin);

        let err = use_case
            .execute(&admin, listing.listing_id, reject("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::Validation(_)));
        assert_eq!(repo.listing(&listing.listing_id).status, ListingStatus::Active);

        let rejected = use_case
            .execute(&admin, listing.listing_id, reject(" Prohibited item "))
            .await
            .unwrap();
        assert_eq!(rejected.status, ListingStatus::Rejected);
        assert_eq!(
            repo.listing(&listing.listing_id).rejection_reason.as_deref(),
            Some("Prohibited item")
        );
    }

    #[tokio::test]
    async fn test_moderation_needs_role_and_verified_identity() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Bike", "Red", ListingStatus::Pending, 1);
        let use_case = ModerateListingUseCase::new(repo.clone());

        let err = use_case
            .execute(&seller, listing.listing_id, ModerationDecision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotModerator));

        let mut unverified = principal(Role::Moderator);
        unverified.identity_verified = false;
        let err = use_case
            .execute(&unverified, listing.listing_id, ModerationDecision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::UnverifiedIdentity));

        assert_eq!(repo.listing(&listing.listing_id).status, ListingStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_transition_and_missing_listing() {
        let repo = Arc::new(MemoryListingsRepository::default());
        let listing = repo.seed(
            principal(Role::Student).user_id,
            "Bike",
            "Red",
            ListingStatus::Sold,
            1,
        );
        let use_case = ModerateListingUseCase::new(repo.clone());
        let moderator = principal(Role::Moderator);

        let err = use_case
            .execute(&moderator, listing.listing_id, ModerationDecision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ListingError::InvalidTransition {
                from: ListingStatus::Sold,
                to: ListingStatus::Active
            }
        ));

        let err = use_case
            .execute(&moderator, ListingId::new(), ModerationDecision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use axum::{Extension, Router};
    use kernel::principal::{Principal, Role};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::ListingsConfig;
    use crate::domain::value_object::ListingStatus;
    use crate::infra::storage::PhotoStorage;
    use crate::presentation::router::listings_router_generic;

    const BOUNDARY: &str = "MarketplaceBoundary7MA4YWxk";

    fn app(repo: &MemoryListingsRepository, storage: &Arc<MemoryStorage>, as_user: &Principal) -> Router {
        let storage: Arc<dyn PhotoStorage> = storage.clone();
        listings_router_generic(repo.clone(), storage, Arc::new(ListingsConfig::default()))
            .layer(Extension(as_user.clone()))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart_request(uri: &str, files: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (field, filename, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_listing() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let app = app(&repo, &storage, &seller);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({
                    "title": "Guitar",
                    "description": "Six strings",
                    "priceMinorUnits": 40000,
                    "category": "music"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["sellerId"], seller.user_id.to_string());
        assert_eq!(body["priceMinorUnits"], 40000);
        assert_eq!(body["currency"], "KZT");
        assert_eq!(body["photos"], serde_json::json!([]));
        assert!(body.get("rejectionReason").is_none());

        let id = body["id"].as_str().unwrap().to_string();
        let response = app.oneshot(get(&format!("/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "Guitar");
    }

    #[tokio::test]
    async fn test_create_validation_error_is_problem_json() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let app = app(&repo, &storage, &principal(Role::Student));

        let response = app
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({ "title": "", "description": "x", "priceMinorUnits": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["detail"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_catalogue_lists_active_only() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student).user_id;
        repo.seed(seller, "Visible kettle", "Steel", ListingStatus::Active, 1);
        repo.seed(seller, "Hidden kettle", "Steel", ListingStatus::Pending, 2);
        let app = app(&repo, &storage, &principal(Role::Student));

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Visible kettle");

        let response = app.oneshot(get("/?search=nothing&limit=5")).await.unwrap();
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_or_hidden_listing_is_404() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let hidden = repo.seed(
            principal(Role::Student).user_id,
            "Draft",
            "x",
            ListingStatus::Rejected,
            1,
        );
        let app = app(&repo, &storage, &principal(Role::Student));

        let response = app
            .clone()
            .oneshot(get(&format!("/{}", hidden.listing_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/not-a-uuid")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_multipart_photo_upload() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let seller = principal(Role::Student);
        let listing = repo.seed(seller.user_id, "Desk", "Oak", ListingStatus::Active, 1);
        let png = png_bytes(500, 250);

        let response = app(&repo, &storage, &seller)
            .oneshot(multipart_request(
                &format!("/{}/photos", listing.listing_id),
                &[
                    ("photos", "desk.png", png.as_slice()),
                    ("ignored", "other.png", png.as_slice()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let photos = body.as_array().unwrap();
        assert_eq!(photos.len(), 1);
        assert!(photos[0]["url"].as_str().unwrap().starts_with(CDN));
        assert!(photos[0]["thumbnail"].as_str().is_some());
        assert_eq!(repo.photos().len(), 1);
        assert_eq!(storage.objects().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_by_non_owner_is_forbidden() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let listing = repo.seed(
            principal(Role::Student).user_id,
            "Desk",
            "Oak",
            ListingStatus::Active,
            1,
        );
        let png = png_bytes(10, 10);

        let response = app(&repo, &storage, &principal(Role::Student))
            .oneshot(multipart_request(
                &format!("/{}/photos", listing.listing_id),
                &[("photos", "desk.png", png.as_slice())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(storage.objects().is_empty());
    }

    #[tokio::test]
    async fn test_moderation_route() {
        let repo = MemoryListingsRepository::default();
        let storage = Arc::new(MemoryStorage::default());
        let listing = repo.seed(
            principal(Role::Student).user_id,
            "Phone",
            "Cracked screen",
            ListingStatus::Pending,
            1,
        );
        let uri = format!("/{}/moderate", listing.listing_id);

        let response = app(&repo, &storage, &principal(Role::Student))
            .oneshot(json_request("POST", &uri, serde_json::json!({ "action": "approve" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let moderator_app = app(&repo, &storage, &principal(Role::Moderator));
        let response = moderator_app
            .clone()
            .oneshot(json_request(
                "POST",
                &uri,
                serde_json::json!({ "action": "reject", "reason": "Blurry photos" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["rejectionReason"], "Blurry photos");

        let response = moderator_app
            .oneshot(json_request("POST", &uri, serde_json::json!({ "action": "reject", "reason": "Again" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
