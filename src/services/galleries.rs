use std::path::Path;

use chrono::Utc;
use image::ImageReader;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::blob::BlobStore;
use crate::domain::gallery::{
    Gallery, GalleryNavigation, NewGalleryImage, cover_after_removal, dedupe_slug,
    image_storage_key, plan_image_reorder, suggest_slug,
};
use crate::domain::types::{AspectRatio, Bucket, GalleryId, GallerySlug};
use crate::dto::galleries::{GalleryDetailDto, GalleryDto, GalleryListDto, SlugAvailabilityDto};
use crate::forms::galleries::{
    GalleryFormPayload, ImageFormPayload, ReorderImagesFormPayload, UploadImagePayload,
};
use crate::repository::{CategoryReader, GalleryListQuery, GalleryReader, GalleryWriter};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the gallery listing endpoints.
#[derive(Deserialize, Debug, Default)]
pub struct GalleryListParams {
    pub bucket: Option<String>,
    pub page: Option<usize>,
}

fn gallery_page<R, B>(
    mut query: GalleryListQuery,
    params: GalleryListParams,
    repo: &R,
    blobs: &B,
) -> ServiceResult<GalleryListDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    if let Some(bucket) = params.bucket.as_deref().filter(|b| !b.trim().is_empty()) {
        let bucket = Bucket::try_from(bucket).map_err(|_| ServiceError::NotFound)?;
        query = query.bucket(bucket);
    }

    let page = params.page.unwrap_or(1).max(1);
    query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, galleries) = match repo.list_galleries(query) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list galleries: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut items = Vec::with_capacity(galleries.len());
    for gallery in galleries {
        let images = match gallery.cover_image_id {
            Some(_) => repo.list_gallery_images(gallery.id).unwrap_or_else(|e| {
                log::error!("Failed to list images of gallery {}: {e}", gallery.id);
                Vec::new()
            }),
            None => Vec::new(),
        };
        items.push(GalleryDto::new(gallery, &images, blobs));
    }

    Ok(GalleryListDto {
        total,
        page,
        galleries: items,
    })
}

fn load_gallery<R>(gallery_id: GalleryId, repo: &R) -> ServiceResult<Gallery>
where
    R: GalleryReader,
{
    match repo.get_gallery_by_id(gallery_id) {
        Ok(Some(gallery)) => Ok(gallery),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get gallery: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn load_detail<R, B>(gallery: Gallery, repo: &R, blobs: &B) -> ServiceResult<GalleryDetailDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    match repo.list_gallery_images(gallery.id) {
        Ok(images) => Ok(GalleryDetailDto::new(gallery, images, blobs)),
        Err(e) => {
            log::error!("Failed to list gallery images: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Checks that the referenced categories exist and match the gallery bucket.
fn check_navigation<R>(navigation: &GalleryNavigation, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let lookup = |id| match repo.get_category_by_id(id) {
        Ok(category) => Ok(category),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    };

    let invalid = |message: &str| Err(ServiceError::Form(message.to_string()));

    let primary = match navigation.primary_category_id {
        Some(id) => match lookup(id)? {
            Some(primary) if primary.is_primary() && primary.bucket == navigation.bucket => {
                Some(primary)
            }
            _ => return invalid("Primary category does not belong to the selected section"),
        },
        None => None,
    };

    if let Some(id) = navigation.secondary_category_id {
        let Some(primary) = primary else {
            return invalid("A secondary category requires a primary category");
        };
        match lookup(id)? {
            Some(secondary) if secondary.parent_id() == Some(primary.id) => {}
            _ => return invalid("Secondary category does not belong to the primary category"),
        }
    }

    Ok(())
}

fn unsupported_image(path: &Path, error: impl std::fmt::Display) -> ServiceError {
    log::warn!("Rejected upload {}: {error}", path.display());
    ServiceError::Form("Uploaded file is not a supported image".to_string())
}

/// Reads the image header and returns its aspect ratio and file extension.
fn read_image_header(path: &Path) -> ServiceResult<(AspectRatio, &'static str)> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unsupported_image(path, e))?;
    let extension = reader
        .format()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("bin");
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| unsupported_image(path, e))?;
    let ratio =
        AspectRatio::from_dimensions(width, height).map_err(|e| unsupported_image(path, e))?;

    Ok((ratio, extension))
}

/// All galleries, drafts included, newest first.
pub fn show_galleries<R, B>(
    params: GalleryListParams,
    user: &AuthenticatedUser,
    repo: &R,
    blobs: &B,
) -> ServiceResult<GalleryListDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    gallery_page(GalleryListQuery::default(), params, repo, blobs)
}

/// Published galleries for the public site, newest first.
pub fn list_published_galleries<R, B>(
    params: GalleryListParams,
    repo: &R,
    blobs: &B,
) -> ServiceResult<GalleryListDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    gallery_page(GalleryListQuery::default().published(), params, repo, blobs)
}

/// A published gallery with its ordered images. Drafts are not found.
pub fn get_published_gallery<R, B>(
    slug: &str,
    repo: &R,
    blobs: &B,
) -> ServiceResult<GalleryDetailDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    let slug = GallerySlug::new(slug).map_err(|_| ServiceError::NotFound)?;

    let gallery = match repo.get_gallery_by_slug(&slug) {
        Ok(Some(gallery)) if gallery.is_published => gallery,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get gallery by slug: {e}");
            return Err(ServiceError::Internal);
        }
    };

    load_detail(gallery, repo, blobs)
}

/// Gallery with its ordered images for the edit page.
pub fn show_gallery<R, B>(
    gallery_id: GalleryId,
    user: &AuthenticatedUser,
    repo: &R,
    blobs: &B,
) -> ServiceResult<GalleryDetailDto>
where
    R: GalleryReader,
    B: BlobStore + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(gallery_id, repo)?;
    load_detail(gallery, repo, blobs)
}

/// Reports whether `slug` is valid and still free.
pub fn check_slug<R>(
    slug: &str,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<SlugAvailabilityDto>
where
    R: GalleryReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let slug = GallerySlug::new(slug)?;
    match repo.slug_exists(&slug) {
        Ok(taken) => Ok(SlugAvailabilityDto {
            slug: slug.into_inner(),
            available: !taken,
        }),
        Err(e) => {
            log::error!("Failed to check slug: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates a gallery and returns its id, or `None` when storage failed.
///
/// An explicit slug must be free. Without one, a slug is derived from the
/// title (and optionally the year) and suffixed until it is unique.
pub fn create_gallery<R>(
    payload: GalleryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Option<GalleryId>>
where
    R: GalleryReader + GalleryWriter + CategoryReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    check_navigation(&payload.navigation, repo)?;

    let slug = match &payload.slug {
        Some(slug) => match repo.slug_exists(slug) {
            Ok(true) => return Err(ServiceError::Form("Slug already exists".to_string())),
            Ok(false) => slug.clone(),
            Err(e) => {
                log::error!("Failed to check slug: {e}");
                return Err(ServiceError::Internal);
            }
        },
        None => {
            let base = suggest_slug(&payload.title, payload.date, payload.with_year)?;
            let mut lookup_error = None;
            let slug = dedupe_slug(base, |candidate| match repo.slug_exists(candidate) {
                Ok(taken) => taken,
                Err(e) => {
                    lookup_error.get_or_insert(e);
                    false
                }
            });
            if let Some(e) = lookup_error {
                log::error!("Failed to check slug: {e}");
                return Err(ServiceError::Internal);
            }
            slug
        }
    };

    let gallery = payload.into_new_gallery(slug);
    match repo.create_gallery(&gallery) {
        Ok(created) => {
            log::info!("Created gallery {} '{}'", created.id, created.slug);
            Ok(Some(created.id))
        }
        Err(e) => {
            log::error!("Failed to create gallery: {e}");
            Ok(None)
        }
    }
}

/// Updates everything but the slug, which is fixed after creation.
pub fn update_gallery<R>(
    gallery_id: GalleryId,
    payload: GalleryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter + CategoryReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_gallery(gallery_id, repo)?;
    check_navigation(&payload.navigation, repo)?;

    match repo.update_gallery(gallery_id, &payload.into_update()) {
        Ok(_) => {
            log::info!("Updated gallery {gallery_id}");
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to update gallery: {e}");
            Ok(false)
        }
    }
}

/// Deletes a gallery, its image records and its stored files.
pub fn delete_gallery<R, B>(
    gallery_id: GalleryId,
    user: &AuthenticatedUser,
    repo: &R,
    blobs: &B,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter,
    B: BlobStore + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(gallery_id, repo)?;

    match repo.delete_gallery(gallery_id) {
        Ok(_) => {
            if let Err(e) = blobs.delete_prefix(&format!("galleries/{}", gallery.slug)) {
                log::error!("Failed to delete files of gallery '{}': {e}", gallery.slug);
            }
            log::info!("Deleted gallery {gallery_id} '{}'", gallery.slug);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete gallery: {e}");
            Ok(false)
        }
    }
}

/// Stores an uploaded image and appends it to the gallery.
///
/// The first image of a gallery without a cover becomes the cover.
pub fn upload_image<R, B>(
    payload: UploadImagePayload,
    file: &Path,
    user: &AuthenticatedUser,
    repo: &R,
    blobs: &B,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter,
    B: BlobStore + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(payload.gallery_id, repo)?;
    let (aspect_ratio, extension) = read_image_header(file)?;

    let object_name = format!("{}.{extension}", uuid::Uuid::new_v4());
    let storage_key = image_storage_key(&gallery.slug, &object_name);
    if let Err(e) = blobs.put_file(&storage_key, file) {
        log::error!("Failed to store image {storage_key}: {e}");
        return Ok(false);
    }

    let image = NewGalleryImage {
        gallery_id: gallery.id,
        storage_key: storage_key.clone(),
        aspect_ratio,
        caption: payload.caption,
        metadata: payload.metadata,
        created_at: Utc::now().naive_utc(),
    };

    let created = match repo.add_gallery_image(&image) {
        Ok(created) => created,
        Err(e) => {
            log::error!("Failed to add gallery image: {e}");
            if let Err(e) = blobs.delete(&storage_key) {
                log::error!("Failed to delete orphaned file {storage_key}: {e}");
            }
            return Ok(false);
        }
    };
    log::info!("Added image {} to gallery {}", created.id, gallery.id);

    if gallery.cover_image_id.is_none() {
        if let Err(e) = repo.set_gallery_cover(gallery.id, Some(created.id)) {
            log::error!("Failed to set gallery cover: {e}");
        }
    }

    Ok(true)
}

/// Removes an image. A removed cover is replaced by the first remaining image.
pub fn remove_image<R, B>(
    payload: ImageFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    blobs: &B,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter,
    B: BlobStore + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(payload.gallery_id, repo)?;
    let images = match repo.list_gallery_images(gallery.id) {
        Ok(images) => images,
        Err(e) => {
            log::error!("Failed to list gallery images: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let Some(image) = images.iter().find(|image| image.id == payload.image_id) else {
        return Err(ServiceError::NotFound);
    };

    if let Err(e) = repo.remove_gallery_image(gallery.id, image.id) {
        log::error!("Failed to remove gallery image: {e}");
        return Ok(false);
    }
    if let Err(e) = blobs.delete(&image.storage_key) {
        log::error!("Failed to delete file {}: {e}", image.storage_key);
    }

    let cover = cover_after_removal(gallery.cover_image_id, image.id, &images);
    if cover != gallery.cover_image_id {
        if let Err(e) = repo.set_gallery_cover(gallery.id, cover) {
            log::error!("Failed to update gallery cover: {e}");
            return Ok(false);
        }
    }

    log::info!("Removed image {} from gallery {}", image.id, gallery.id);
    Ok(true)
}

/// Makes an image of the gallery its cover.
pub fn set_cover<R>(
    payload: ImageFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(payload.gallery_id, repo)?;
    match repo.list_gallery_images(gallery.id) {
        Ok(images) if images.iter().any(|image| image.id == payload.image_id) => {}
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to list gallery images: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.set_gallery_cover(gallery.id, Some(payload.image_id)) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to set gallery cover: {e}");
            Ok(false)
        }
    }
}

/// Drag-end event inside a gallery: same contract as category reordering.
pub fn reorder_images<R>(
    payload: ReorderImagesFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: GalleryReader + GalleryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let gallery = load_gallery(payload.gallery_id, repo)?;
    let images = match repo.list_gallery_images(gallery.id) {
        Ok(images) => images,
        Err(e) => {
            log::error!("Failed to list gallery images: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !images.iter().any(|image| image.id == payload.active_id) {
        return Err(ServiceError::NotFound);
    }

    let Some(orders) = plan_image_reorder(&images, payload.active_id, payload.over_id) else {
        return Ok(true);
    };

    match repo.reorder_gallery_images(gallery.id, &orders) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to reorder gallery images: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};

    use super::*;
    use crate::blob::test::MemoryBlobStore;
    use crate::domain::gallery::{GalleryImage, Gear, ImageMetadata};
    use crate::domain::types::{CategoryId, GalleryTitle, ImageId, SortOrder};
    use crate::repository::test::TestRepository;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "test@example.com".into(),
            hub_id: 1,
            name: "Test".into(),
            roles: vec![SERVICE_ACCESS_ROLE.into()],
            exp: 0,
        }
    }

    fn navigation() -> GalleryNavigation {
        GalleryNavigation {
            bucket: Bucket::Travel,
            primary_category_id: None,
            secondary_category_id: None,
        }
    }

    fn payload(title: &str, slug: Option<&str>) -> GalleryFormPayload {
        GalleryFormPayload {
            title: GalleryTitle::new(title).unwrap(),
            slug: slug.map(|s| GallerySlug::new(s).unwrap()),
            with_year: false,
            description: String::new(),
            location: String::new(),
            date: NaiveDate::from_ymd_opt(2023, 7, 14).unwrap(),
            is_published: true,
            navigation: navigation(),
            gear: Gear::default(),
        }
    }

    fn gallery(id: i32, slug: &str, cover: Option<i32>) -> Gallery {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Gallery {
            id: GalleryId::new(id).unwrap(),
            slug: GallerySlug::new(slug).unwrap(),
            title: GalleryTitle::new(slug).unwrap(),
            description: String::new(),
            location: String::new(),
            date: NaiveDate::from_ymd_opt(2023, 1, id as u32).unwrap(),
            is_published: true,
            navigation: navigation(),
            gear: Gear::default(),
            cover_image_id: cover.map(|c| ImageId::new(c).unwrap()),
            created_at: now,
            updated_at: now,
        }
    }

    fn image(id: i32, gallery_id: i32, order: i32) -> GalleryImage {
        GalleryImage {
            id: ImageId::new(id).unwrap(),
            gallery_id: GalleryId::new(gallery_id).unwrap(),
            storage_key: format!("galleries/iceland/{id}.jpg"),
            aspect_ratio: AspectRatio::new(1.5).unwrap(),
            order: SortOrder::new(order).unwrap(),
            caption: None,
            metadata: ImageMetadata::default(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn image_payload(gallery_id: i32, image_id: i32) -> ImageFormPayload {
        ImageFormPayload {
            gallery_id: GalleryId::new(gallery_id).unwrap(),
            image_id: ImageId::new(image_id).unwrap(),
        }
    }

    #[test]
    fn generated_slug_is_deduplicated() {
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "iceland", None), gallery(2, "iceland-2", None)],
            vec![],
        );

        let id = create_gallery(payload("Iceland", None), &sample_user(), &repo)
            .unwrap()
            .unwrap();
        let created = repo.get_gallery_by_id(id).unwrap().unwrap();
        assert_eq!(created.slug, "iceland-3");
    }

    #[test]
    fn generated_slug_can_carry_the_year() {
        let repo = TestRepository::new();
        let mut with_year = payload("Iceland", None);
        with_year.with_year = true;

        let id = create_gallery(with_year, &sample_user(), &repo).unwrap().unwrap();
        let created = repo.get_gallery_by_id(id).unwrap().unwrap();
        assert_eq!(created.slug, "iceland-2023");
    }

    #[test]
    fn explicit_slug_must_be_free() {
        let repo = TestRepository::with_galleries(vec![gallery(1, "iceland", None)], vec![]);

        let result = create_gallery(payload("Iceland", Some("iceland")), &sample_user(), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn check_slug_reports_availability() {
        let repo = TestRepository::with_galleries(vec![gallery(1, "iceland", None)], vec![]);

        let taken = check_slug("iceland", &sample_user(), &repo).unwrap();
        assert!(!taken.available);
        let free = check_slug("norway", &sample_user(), &repo).unwrap();
        assert!(free.available);
        assert!(check_slug("Not A Slug", &sample_user(), &repo).is_err());
    }

    #[test]
    fn navigation_must_reference_matching_categories() {
        use crate::domain::tree::tests::category;

        let repo =
            TestRepository::with_categories(vec![category(1, "Landscape", Bucket::Stills, 0)]);
        let mut wrong_bucket = payload("Iceland", None);
        wrong_bucket.navigation.primary_category_id = Some(CategoryId::new(1).unwrap());

        let result = create_gallery(wrong_bucket, &sample_user(), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn public_listing_hides_drafts_newest_first() {
        let mut draft = gallery(3, "draft", None);
        draft.is_published = false;
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "older", None), gallery(2, "newer", None), draft],
            vec![],
        );
        let blobs = MemoryBlobStore::default();

        let list = list_published_galleries(GalleryListParams::default(), &repo, &blobs).unwrap();
        let slugs: Vec<&str> = list.galleries.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);
        assert_eq!(list.total, 2);

        assert!(matches!(
            get_published_gallery("draft", &repo, &blobs),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn first_upload_becomes_cover() {
        let repo = TestRepository::with_galleries(vec![gallery(1, "iceland", None)], vec![]);
        let blobs = MemoryBlobStore::default();

        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image::RgbImage::new(30, 20).save(file.path()).unwrap();

        let upload = UploadImagePayload {
            gallery_id: GalleryId::new(1).unwrap(),
            caption: Some("Skógafoss".to_string()),
            metadata: ImageMetadata::default(),
        };
        assert!(matches!(
            upload_image(upload, file.path(), &sample_user(), &repo, &blobs),
            Ok(true)
        ));

        let images = repo.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].aspect_ratio.get(), 1.5);
        assert_eq!(images[0].order, 0);
        assert!(images[0].storage_key.starts_with("galleries/iceland/"));
        assert!(images[0].storage_key.ends_with(".png"));
        assert_eq!(blobs.keys(), vec![images[0].storage_key.clone()]);

        let cover = repo.galleries()[0].cover_image_id;
        assert_eq!(cover, Some(images[0].id));
    }

    #[test]
    fn non_image_upload_is_rejected() {
        use std::io::Write;

        let repo = TestRepository::with_galleries(vec![gallery(1, "iceland", None)], vec![]);
        let blobs = MemoryBlobStore::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an image").unwrap();

        let upload = UploadImagePayload {
            gallery_id: GalleryId::new(1).unwrap(),
            caption: None,
            metadata: ImageMetadata::default(),
        };
        let result = upload_image(upload, file.path(), &sample_user(), &repo, &blobs);
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(blobs.keys().is_empty());
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn removing_cover_promotes_next_image() {
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "iceland", Some(10))],
            vec![image(10, 1, 0), image(11, 1, 1)],
        );
        let blobs = MemoryBlobStore::default();

        assert!(matches!(
            remove_image(image_payload(1, 10), &sample_user(), &repo, &blobs),
            Ok(true)
        ));
        assert_eq!(
            repo.galleries()[0].cover_image_id,
            Some(ImageId::new(11).unwrap())
        );

        assert!(matches!(
            remove_image(image_payload(1, 11), &sample_user(), &repo, &blobs),
            Ok(true)
        ));
        assert_eq!(repo.galleries()[0].cover_image_id, None);
    }

    #[test]
    fn cover_must_belong_to_gallery() {
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "iceland", None), gallery(2, "norway", None)],
            vec![image(10, 1, 0), image(20, 2, 0)],
        );

        assert!(matches!(
            set_cover(image_payload(1, 20), &sample_user(), &repo),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            set_cover(image_payload(1, 10), &sample_user(), &repo),
            Ok(true)
        ));
    }

    #[test]
    fn image_reorder_renumbers_gallery() {
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "iceland", None)],
            vec![image(10, 1, 0), image(11, 1, 1), image(12, 1, 2)],
        );
        let reorder = |active: i32, over: i32| ReorderImagesFormPayload {
            gallery_id: GalleryId::new(1).unwrap(),
            active_id: ImageId::new(active).unwrap(),
            over_id: ImageId::new(over).unwrap(),
        };

        assert!(matches!(
            reorder_images(reorder(11, 11), &sample_user(), &repo),
            Ok(true)
        ));
        assert_eq!(repo.write_count(), 0);

        assert!(matches!(
            reorder_images(reorder(12, 10), &sample_user(), &repo),
            Ok(true)
        ));
        let ids: Vec<i32> = repo
            .list_gallery_images(GalleryId::new(1).unwrap())
            .unwrap()
            .iter()
            .map(|i| i.id.get())
            .collect();
        assert_eq!(ids, vec![12, 10, 11]);
    }

    #[test]
    fn delete_removes_stored_files() {
        let repo = TestRepository::with_galleries(
            vec![gallery(1, "iceland", Some(10))],
            vec![image(10, 1, 0)],
        );
        let blobs = MemoryBlobStore::default();
        let source = tempfile::NamedTempFile::new().unwrap();
        blobs.put_file("galleries/iceland/10.jpg", source.path()).unwrap();
        blobs.put_file("galleries/iceland-2/11.jpg", source.path()).unwrap();

        assert!(matches!(
            delete_gallery(GalleryId::new(1).unwrap(), &sample_user(), &repo, &blobs),
            Ok(true)
        ));
        assert!(repo.galleries().is_empty());
        assert!(repo.images().is_empty());
        assert_eq!(blobs.keys(), vec!["galleries/iceland-2/11.jpg".to_string()]);
    }
}
