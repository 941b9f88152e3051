//! HTTP Handlers
//!
//! Every route sits behind the session middleware, which provides the
//! caller as `Extension<Principal>`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use kernel::id::ListingId;
use kernel::principal::Principal;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateListingInput, CreateListingUseCase, GetListingUseCase, ListListingsInput,
    ListListingsUseCase, ListingWithPhotos, ListingsConfig, ModerateListingUseCase,
    UploadPhotosUseCase,
};
use crate::domain::photo::PhotoUpload;
use crate::domain::repository::ListingsRepository;
use crate::error::{ListingError, ListingResult};
use crate::infra::storage::PhotoStorage;
use crate::presentation::dto::{
    CreateListingRequest, ListListingsQuery, ListingResponse, ModerateListingRequest,
    PhotoUploadResponse,
};

/// Multipart field carrying the files
pub const PHOTOS_FIELD: &str = "photos";

#[derive(Clone)]
pub struct ListingsAppState<R>
where
    R: ListingsRepository,
{
    pub repo: Arc<R>,
    pub storage: Arc<dyn PhotoStorage>,
    pub config: Arc<ListingsConfig>,
}

// ============================================================================
// Catalogue
// ============================================================================

/// GET /api/v1/listings
pub async fn list_listings<R>(
    State(state): State<ListingsAppState<R>>,
    Query(query): Query<ListListingsQuery>,
) -> ListingResult<Json<Vec<ListingResponse>>>
where
    R: ListingsRepository,
{
    let listings = ListListingsUseCase::new(state.repo.clone(), state.config.clone())
        .execute(ListListingsInput {
            search: query.search,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing<R>(
    State(state): State<ListingsAppState<R>>,
    Extension(principal): Extension<Principal>,
    Path(listing_id): Path<Uuid>,
) -> ListingResult<Json<ListingResponse>>
where
    R: ListingsRepository,
{
    let listing = GetListingUseCase::new(state.repo.clone())
        .execute(&principal, ListingId::from_uuid(listing_id))
        .await?;

    Ok(Json(ListingResponse::from(listing)))
}

// ============================================================================
// Seller
// ============================================================================

/// POST /api/v1/listings
pub async fn create_listing<R>(
    State(state): State<ListingsAppState<R>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateListingRequest>,
) -> ListingResult<impl IntoResponse>
where
    R: ListingsRepository,
{
    let listing = CreateListingUseCase::new(state.repo.clone())
        .execute(
            &principal,
            CreateListingInput {
                title: req.title,
                description: req.description,
                price_minor_units: req.price_minor_units,
                currency: req.currency,
                category: req.category,
                condition: req.condition,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ListingResponse::from(ListingWithPhotos {
            listing,
            photos: Vec::new(),
        })),
    ))
}

/// POST /api/v1/listings/{id}/photos (multipart, field `photos`)
pub async fn upload_photos<R>(
    State(state): State<ListingsAppState<R>>,
    Extension(principal): Extension<Principal>,
    Path(listing_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ListingResult<Json<Vec<PhotoUploadResponse>>>
where
    R: ListingsRepository,
{
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTOS_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        uploads.push(PhotoUpload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let uploaded = UploadPhotosUseCase::new(
        state.repo.clone(),
        state.storage.clone(),
        state.config.clone(),
    )
    .execute(&principal, ListingId::from_uuid(listing_id), uploads)
    .await?;

    Ok(Json(uploaded.into_iter().map(PhotoUploadResponse::from).collect()))
}

// ============================================================================
// Moderation
// ============================================================================

/// POST /api/v1/listings/{id}/moderate
pub async fn moderate_listing<R>(
    State(state): State<ListingsAppState<R>>,
    Extension(principal): Extension<Principal>,
    Path(listing_id): Path<Uuid>,
    Json(req): Json<ModerateListingRequest>,
) -> Result<Json<ListingResponse>, ListingError>
where
    R: ListingsRepository,
{
    let listing = ModerateListingUseCase::new(state.repo.clone())
        .execute(&principal, ListingId::from_uuid(listing_id), req.into_decision())
        .await?;

    Ok(Json(ListingResponse::from(ListingWithPhotos {
        listing,
        photos: Vec::new(),
    })))
}
