use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::gallery::{
    Gallery as DomainGallery, GalleryImage as DomainGalleryImage, GalleryNavigation,
    GalleryUpdate as DomainGalleryUpdate, Gear, ImageMetadata,
    NewGallery as DomainNewGallery, NewGalleryImage as DomainNewGalleryImage,
};
use crate::domain::types::{
    AspectRatio, Bucket, GallerySlug, GalleryTitle, SortOrder, TypeConstraintError,
};

fn encode_gear(gear: &Gear) -> Result<String, TypeConstraintError> {
    serde_json::to_string(gear)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("gear: {e}")))
}

fn decode_gear(value: &str) -> Result<Gear, TypeConstraintError> {
    serde_json::from_str(value)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("gear: {e}")))
}

/// Diesel model representing the `galleries` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::galleries)]
pub struct Gallery {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub gallery_date: NaiveDate,
    pub is_published: bool,
    pub bucket: String,
    pub primary_category_id: Option<i32>,
    pub secondary_category_id: Option<i32>,
    pub gear: String,
    pub cover_image_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Gallery`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::galleries)]
pub struct NewGallery {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub gallery_date: NaiveDate,
    pub is_published: bool,
    pub bucket: String,
    pub primary_category_id: Option<i32>,
    pub secondary_category_id: Option<i32>,
    pub gear: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Patchable gallery fields; `None` columns are written as NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::galleries, treat_none_as_null = true)]
pub struct GalleryChanges {
    pub title: String,
    pub description: String,
    pub location: String,
    pub gallery_date: NaiveDate,
    pub is_published: bool,
    pub bucket: String,
    pub primary_category_id: Option<i32>,
    pub secondary_category_id: Option<i32>,
    pub gear: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Gallery> for DomainGallery {
    type Error = TypeConstraintError;

    fn try_from(gallery: Gallery) -> Result<Self, Self::Error> {
        Ok(Self {
            id: gallery.id.try_into()?,
            slug: GallerySlug::new(gallery.slug)?,
            title: GalleryTitle::new(gallery.title)?,
            description: gallery.description,
            location: gallery.location,
            date: gallery.gallery_date,
            is_published: gallery.is_published,
            navigation: GalleryNavigation {
                bucket: Bucket::try_from(gallery.bucket)?,
                primary_category_id: gallery
                    .primary_category_id
                    .map(TryInto::try_into)
                    .transpose()?,
                secondary_category_id: gallery
                    .secondary_category_id
                    .map(TryInto::try_into)
                    .transpose()?,
            },
            gear: decode_gear(&gallery.gear)?,
            cover_image_id: gallery.cover_image_id.map(TryInto::try_into).transpose()?,
            created_at: gallery.created_at,
            updated_at: gallery.updated_at,
        })
    }
}

impl TryFrom<&DomainNewGallery> for NewGallery {
    type Error = TypeConstraintError;

    fn try_from(gallery: &DomainNewGallery) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: gallery.slug.as_str().to_string(),
            title: gallery.title.as_str().to_string(),
            description: gallery.description.clone(),
            location: gallery.location.clone(),
            gallery_date: gallery.date,
            is_published: gallery.is_published,
            bucket: gallery.navigation.bucket.as_str().to_string(),
            primary_category_id: gallery.navigation.primary_category_id.map(|id| id.get()),
            secondary_category_id: gallery.navigation.secondary_category_id.map(|id| id.get()),
            gear: encode_gear(&gallery.gear)?,
            created_at: gallery.created_at,
            updated_at: gallery.updated_at,
        })
    }
}

impl GalleryChanges {
    pub fn new(
        update: &DomainGalleryUpdate,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            title: update.title.as_str().to_string(),
            description: update.description.clone(),
            location: update.location.clone(),
            gallery_date: update.date,
            is_published: update.is_published,
            bucket: update.navigation.bucket.as_str().to_string(),
            primary_category_id: update.navigation.primary_category_id.map(|id| id.get()),
            secondary_category_id: update.navigation.secondary_category_id.map(|id| id.get()),
            gear: encode_gear(&update.gear)?,
            updated_at,
        })
    }
}

/// Diesel model representing the `gallery_images` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::gallery_images)]
pub struct GalleryImage {
    pub id: i32,
    pub gallery_id: i32,
    pub storage_key: String,
    pub aspect_ratio: f64,
    pub sort_order: i32,
    pub caption: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`GalleryImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::gallery_images)]
pub struct NewGalleryImage {
    pub gallery_id: i32,
    pub storage_key: String,
    pub aspect_ratio: f64,
    pub sort_order: i32,
    pub caption: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewGalleryImage {
    /// Row for `image` placed at `order` within its gallery.
    pub fn at_order(image: &DomainNewGalleryImage, order: SortOrder) -> Self {
        let metadata = image.metadata.clone();
        Self {
            gallery_id: image.gallery_id.get(),
            storage_key: image.storage_key.clone(),
            aspect_ratio: image.aspect_ratio.get(),
            sort_order: order.get(),
            caption: image.caption.clone(),
            camera: metadata.camera,
            lens: metadata.lens,
            aperture: metadata.aperture,
            shutter_speed: metadata.shutter_speed,
            iso: metadata.iso,
            focal_length: metadata.focal_length,
            created_at: image.created_at,
        }
    }
}

impl TryFrom<GalleryImage> for DomainGalleryImage {
    type Error = TypeConstraintError;

    fn try_from(image: GalleryImage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: image.id.try_into()?,
            gallery_id: image.gallery_id.try_into()?,
            storage_key: image.storage_key,
            aspect_ratio: AspectRatio::new(image.aspect_ratio)?,
            order: SortOrder::new(image.sort_order)?,
            caption: image.caption,
            metadata: ImageMetadata {
                camera: image.camera,
                lens: image.lens,
                aperture: image.aperture,
                shutter_speed: image.shutter_speed,
                iso: image.iso,
                focal_length: image.focal_length,
            },
            created_at: image.created_at,
        })
    }
}
