use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::tree::move_item;
use crate::domain::types::{
    AspectRatio, Bucket, CategoryId, GalleryId, GallerySlug, GalleryTitle, ImageId, SortOrder,
};

/// Where a gallery shows up in the public navigation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryNavigation {
    pub bucket: Bucket,
    pub primary_category_id: Option<CategoryId>,
    pub secondary_category_id: Option<CategoryId>,
}

/// Equipment used for a gallery.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gear {
    #[serde(default)]
    pub cameras: Vec<String>,
    #[serde(default)]
    pub lenses: Vec<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
}

impl Gear {
    /// Builds a gear list from comma or newline separated text fields.
    pub fn from_lists(cameras: &str, lenses: &str, accessories: &str) -> Self {
        Self {
            cameras: split_list(cameras),
            lenses: split_list(lenses),
            accessories: split_list(accessories),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Gallery record keyed by a unique slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gallery {
    pub id: GalleryId,
    pub slug: GallerySlug,
    pub title: GalleryTitle,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub is_published: bool,
    pub navigation: GalleryNavigation,
    pub gear: Gear,
    pub cover_image_id: Option<ImageId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Gallery`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGallery {
    pub slug: GallerySlug,
    pub title: GalleryTitle,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub is_published: bool,
    pub navigation: GalleryNavigation,
    pub gear: Gear,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable gallery fields. The slug is fixed once the gallery exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryUpdate {
    pub title: GalleryTitle,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub is_published: bool,
    pub navigation: GalleryNavigation,
    pub gear: Gear,
}

/// Optional technical details shown next to an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryImage {
    pub id: ImageId,
    pub gallery_id: GalleryId,
    /// Blob store key of the original upload.
    pub storage_key: String,
    pub aspect_ratio: AspectRatio,
    pub order: SortOrder,
    pub caption: Option<String>,
    pub metadata: ImageMetadata,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`GalleryImage`]; appended to the gallery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGalleryImage {
    pub gallery_id: GalleryId,
    pub storage_key: String,
    pub aspect_ratio: AspectRatio,
    pub caption: Option<String>,
    pub metadata: ImageMetadata,
    pub created_at: NaiveDateTime,
}

/// Slug candidate for a gallery without an explicit slug.
///
/// `with_year` appends the gallery year, e.g. `iceland-2023`.
pub fn suggest_slug(
    title: &GalleryTitle,
    date: NaiveDate,
    with_year: bool,
) -> Result<GallerySlug, crate::domain::types::TypeConstraintError> {
    let base = GallerySlug::from_text(title)?;
    if with_year {
        GallerySlug::new(format!("{base}-{}", date.year()))
    } else {
        Ok(base)
    }
}

/// First free variant of `base`: `base`, then `base-2`, `base-3`, ...
pub fn dedupe_slug<F>(base: GallerySlug, mut is_taken: F) -> GallerySlug
where
    F: FnMut(&GallerySlug) -> bool,
{
    if !is_taken(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = base.with_suffix(suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Blob key for an uploaded gallery image.
pub fn image_storage_key(slug: &GallerySlug, object_name: &str) -> String {
    format!("galleries/{slug}/{object_name}")
}

/// Cover to keep after `removed` is deleted from `images` (sorted by order).
///
/// A removed cover is replaced by the first remaining image.
pub fn cover_after_removal(
    current: Option<ImageId>,
    removed: ImageId,
    images: &[GalleryImage],
) -> Option<ImageId> {
    match current {
        Some(cover) if cover == removed => images
            .iter()
            .find(|image| image.id != removed)
            .map(|image| image.id),
        other => other,
    }
}

/// New `(id, order)` pairs after dragging `active` onto `over`.
///
/// `images` must be the full image list of one gallery. Returns `None` when
/// nothing must be written.
pub fn plan_image_reorder(
    images: &[GalleryImage],
    active: ImageId,
    over: ImageId,
) -> Option<Vec<(ImageId, SortOrder)>> {
    if active == over {
        return None;
    }

    let mut sorted: Vec<&GalleryImage> = images.iter().collect();
    sorted.sort_by_key(|image| (image.order, image.id));
    let mut ids: Vec<ImageId> = sorted.iter().map(|image| image.id).collect();

    let from = ids.iter().position(|id| *id == active)?;
    let to = ids.iter().position(|id| *id == over)?;
    move_item(&mut ids, from, to);

    Some(
        ids.into_iter()
            .enumerate()
            .map(|(index, id)| (id, SortOrder::from_index(index)))
            .collect(),
    )
}
