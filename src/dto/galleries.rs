use serde::Serialize;

use crate::blob::BlobStore;
use crate::domain::gallery::{Gallery, GalleryImage, Gear, ImageMetadata};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryImageDto {
    pub id: i32,
    pub url: String,
    pub aspect_ratio: f64,
    pub order: i32,
    pub caption: Option<String>,
    pub metadata: ImageMetadata,
    pub is_cover: bool,
}

impl GalleryImageDto {
    pub fn new<B>(image: GalleryImage, cover_image_id: Option<i32>, blobs: &B) -> Self
    where
        B: BlobStore + ?Sized,
    {
        Self {
            id: image.id.get(),
            url: blobs.url(&image.storage_key),
            aspect_ratio: image.aspect_ratio.get(),
            order: image.order.get(),
            caption: image.caption,
            metadata: image.metadata,
            is_cover: cover_image_id == Some(image.id.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryDto {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub is_published: bool,
    pub bucket: &'static str,
    pub primary_category_id: Option<i32>,
    pub secondary_category_id: Option<i32>,
    pub gear: Gear,
    pub cover_image_id: Option<i32>,
    pub cover_url: Option<String>,
}

impl GalleryDto {
    /// `images` may be any subset of the gallery images; the cover URL is
    /// resolved from it when present.
    pub fn new<B>(gallery: Gallery, images: &[GalleryImage], blobs: &B) -> Self
    where
        B: BlobStore + ?Sized,
    {
        let cover_url = gallery.cover_image_id.and_then(|cover| {
            images
                .iter()
                .find(|image| image.id == cover)
                .map(|image| blobs.url(&image.storage_key))
        });

        Self {
            id: gallery.id.get(),
            slug: gallery.slug.into_inner(),
            title: gallery.title.into_inner(),
            description: gallery.description,
            location: gallery.location,
            date: gallery.date.format("%Y-%m-%d").to_string(),
            is_published: gallery.is_published,
            bucket: gallery.navigation.bucket.as_str(),
            primary_category_id: gallery.navigation.primary_category_id.map(|id| id.get()),
            secondary_category_id: gallery.navigation.secondary_category_id.map(|id| id.get()),
            gear: gallery.gear,
            cover_image_id: gallery.cover_image_id.map(|id| id.get()),
            cover_url,
        }
    }
}

/// Gallery together with its ordered images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryDetailDto {
    pub gallery: GalleryDto,
    pub images: Vec<GalleryImageDto>,
}

impl GalleryDetailDto {
    pub fn new<B>(gallery: Gallery, images: Vec<GalleryImage>, blobs: &B) -> Self
    where
        B: BlobStore + ?Sized,
    {
        let cover = gallery.cover_image_id.map(|id| id.get());
        let gallery = GalleryDto::new(gallery, &images, blobs);
        let images = images
            .into_iter()
            .map(|image| GalleryImageDto::new(image, cover, blobs))
            .collect();
        Self { gallery, images }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryListDto {
    pub total: usize,
    pub page: usize,
    pub galleries: Vec<GalleryDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugAvailabilityDto {
    pub slug: String,
    pub available: bool,
}
