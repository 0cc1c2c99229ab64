use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::gallery::{GalleryNavigation, GalleryUpdate, Gear, ImageMetadata, NewGallery};
use crate::domain::types::{
    Bucket, GalleryId, GallerySlug, GalleryTitle, ImageId, TypeConstraintError,
};
use crate::forms::categories::optional_id;

pub(crate) fn checkbox(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim(), "on" | "true" | "yes" | "1"))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Deserialize, Validate)]
pub struct GalleryForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Explicit slug; ignored when editing.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_published: Option<String>,
    /// Append the gallery year to a generated slug.
    #[serde(default)]
    pub override_year: Option<String>,
    pub bucket: String,
    #[serde(default)]
    pub primary_category_id: Option<String>,
    #[serde(default)]
    pub secondary_category_id: Option<String>,
    #[serde(default)]
    pub cameras: String,
    #[serde(default)]
    pub lenses: String,
    #[serde(default)]
    pub accessories: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryFormPayload {
    pub title: GalleryTitle,
    pub slug: Option<GallerySlug>,
    pub with_year: bool,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub is_published: bool,
    pub navigation: GalleryNavigation,
    pub gear: Gear,
}

impl GalleryFormPayload {
    pub fn into_new_gallery(self, slug: GallerySlug) -> NewGallery {
        let now = Utc::now().naive_utc();
        NewGallery {
            slug,
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            is_published: self.is_published,
            navigation: self.navigation,
            gear: self.gear,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> GalleryUpdate {
        GalleryUpdate {
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            is_published: self.is_published,
            navigation: self.navigation,
            gear: self.gear,
        }
    }
}

#[derive(Debug, Error)]
pub enum GalleryFormError {
    #[error("Gallery form validation failed: {0}")]
    Validation(String),
    #[error("Gallery form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for GalleryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for GalleryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<GalleryForm> for GalleryFormPayload {
    type Error = GalleryFormError;

    fn try_from(value: GalleryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let slug = optional_text(value.slug).map(GallerySlug::new).transpose()?;

        Ok(Self {
            title: GalleryTitle::new(value.title)?,
            slug,
            with_year: checkbox(value.override_year.as_deref()),
            description: value.description.trim().to_string(),
            location: value.location.trim().to_string(),
            date: value.date,
            is_published: checkbox(value.is_published.as_deref()),
            navigation: GalleryNavigation {
                bucket: Bucket::try_from(value.bucket)?,
                primary_category_id: optional_id(
                    value.primary_category_id.as_deref(),
                    "primary_category_id",
                )?,
                secondary_category_id: optional_id(
                    value.secondary_category_id.as_deref(),
                    "secondary_category_id",
                )?,
            },
            gear: Gear::from_lists(&value.cameras, &value.lenses, &value.accessories),
        })
    }
}

/// Query parameters of the slug availability check.
#[derive(Debug, Deserialize)]
pub struct CheckSlugQuery {
    pub slug: String,
}

#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "25MB")]
    pub image: TempFile,
    pub caption: Option<Text<String>>,
    pub camera: Option<Text<String>>,
    pub lens: Option<Text<String>>,
    pub aperture: Option<Text<String>>,
    pub shutter_speed: Option<Text<String>>,
    pub iso: Option<Text<String>>,
    pub focal_length: Option<Text<String>>,
}

fn text_field(value: Option<Text<String>>) -> Option<String> {
    optional_text(value.map(|text| text.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadImagePayload {
    pub gallery_id: GalleryId,
    pub caption: Option<String>,
    pub metadata: ImageMetadata,
}

impl UploadImageForm {
    /// Splits the upload into the temporary file and its parsed text fields.
    pub fn into_parts(
        self,
        gallery_id: i32,
    ) -> Result<(TempFile, UploadImagePayload), ImageFormError> {
        let payload = UploadImagePayload {
            gallery_id: GalleryId::new(gallery_id)?,
            caption: text_field(self.caption),
            metadata: ImageMetadata {
                camera: text_field(self.camera),
                lens: text_field(self.lens),
                aperture: text_field(self.aperture),
                shutter_speed: text_field(self.shutter_speed),
                iso: text_field(self.iso),
                focal_length: text_field(self.focal_length),
            },
        };
        Ok((self.image, payload))
    }
}

#[derive(Deserialize, Validate)]
pub struct ImageForm {
    #[validate(range(min = 1))]
    pub image_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFormPayload {
    pub gallery_id: GalleryId,
    pub image_id: ImageId,
}

#[derive(Debug, Error)]
pub enum ImageFormError {
    #[error("Image form validation failed: {0}")]
    Validation(String),
    #[error("Image form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ImageFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ImageFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl ImageFormPayload {
    pub fn parse(gallery_id: i32, form: ImageForm) -> Result<Self, ImageFormError> {
        form.validate()?;
        Ok(Self {
            gallery_id: GalleryId::new(gallery_id)?,
            image_id: ImageId::new(form.image_id)?,
        })
    }
}

/// Drag-end event inside a gallery's image list.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderImagesForm {
    #[validate(range(min = 1))]
    pub active_id: i32,
    #[validate(range(min = 1))]
    pub over_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderImagesFormPayload {
    pub gallery_id: GalleryId,
    pub active_id: ImageId,
    pub over_id: ImageId,
}

impl ReorderImagesFormPayload {
    pub fn parse(gallery_id: i32, form: ReorderImagesForm) -> Result<Self, ImageFormError> {
        form.validate()?;
        Ok(Self {
            gallery_id: GalleryId::new(gallery_id)?,
            active_id: ImageId::new(form.active_id)?,
            over_id: ImageId::new(form.over_id)?,
        })
    }
}
