//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and ordering constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Slug contained characters outside `[a-z0-9-]`.
    #[error("{0} must contain only lowercase letters, numbers, and hyphens")]
    InvalidSlug(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(GalleryId, "Unique identifier for a gallery.", "gallery_id");
id_newtype!(ImageId, "Unique identifier for a gallery image.", "image_id");
id_newtype!(
    EquipmentId,
    "Unique identifier for an equipment item.",
    "equipment_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category display name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    GalleryTitle,
    "Gallery title enforcing non-empty values.",
    "title"
);
non_empty_string_newtype!(
    EquipmentName,
    "Equipment display name enforcing non-empty values.",
    "equipment name"
);

/// Position of a record among its siblings. Zero-based.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct SortOrder(i32);

impl SortOrder {
    /// Constructs a value that must be zero or greater.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("order"))
        }
    }

    /// Converts a list index into an order value, saturating at `i32::MAX`.
    pub fn from_index(index: usize) -> Self {
        Self(i32::try_from(index).unwrap_or(i32::MAX))
    }

    /// The order that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for SortOrder {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SortOrder> for i32 {
    fn from(value: SortOrder) -> Self {
        value.0
    }
}

impl PartialEq<i32> for SortOrder {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

/// Root bucket a category or gallery belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Stills,
    Travel,
    Aerial,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 3] = [Bucket::Stills, Bucket::Travel, Bucket::Aerial];

    /// String representation used in persistence and URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stills => "stills",
            Self::Travel => "travel",
            Self::Aerial => "aerial",
        }
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Bucket {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stills" => Ok(Self::Stills),
            "travel" => Ok(Self::Travel),
            "aerial" => Ok(Self::Aerial),
            other => Err(TypeConstraintError::InvalidValue(format!("bucket: {other}"))),
        }
    }
}

impl TryFrom<String> for Bucket {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Bucket> for String {
    fn from(value: Bucket) -> Self {
        value.as_str().to_string()
    }
}

/// Depth of a category inside its bucket.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Primary,
    Secondary,
}

impl CategoryKind {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "category type: {other}"
            ))),
        }
    }
}

/// Kind of an equipment item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Camera,
    Lens,
    Filter,
    Drone,
}

impl EquipmentKind {
    /// All kinds in display order.
    pub const ALL: [EquipmentKind; 4] = [
        EquipmentKind::Camera,
        EquipmentKind::Lens,
        EquipmentKind::Filter,
        EquipmentKind::Drone,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Lens => "lens",
            Self::Filter => "filter",
            Self::Drone => "drone",
        }
    }
}

impl Display for EquipmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for EquipmentKind {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "camera" => Ok(Self::Camera),
            "lens" => Ok(Self::Lens),
            "filter" => Ok(Self::Filter),
            "drone" => Ok(Self::Drone),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "equipment type: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for EquipmentKind {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// URL slug of a gallery: lowercase ASCII letters, digits and hyphens.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GallerySlug(String);

impl GallerySlug {
    /// Validates an explicit slug. The value is trimmed but not rewritten.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "slug")?;
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(TypeConstraintError::InvalidSlug("slug"));
        }
        Ok(Self(trimmed))
    }

    /// Builds a slug from free text, e.g. `"Iceland: Highlands"` → `iceland-highlands`.
    pub fn from_text(text: &str) -> Result<Self, TypeConstraintError> {
        Self::new(slugify(text))
    }

    /// Returns the slug with a numeric suffix, e.g. `iceland-2`.
    pub fn with_suffix(&self, suffix: usize) -> Self {
        Self(format!("{}-{suffix}", self.0))
    }

    /// Borrow the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned slug.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for GallerySlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for GallerySlug {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<&str> for GallerySlug {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Lowercases `text` and collapses every run of non-alphanumeric characters
/// into a single hyphen. Leading and trailing hyphens are dropped.
///
/// Only ASCII letters and digits survive, so the result is always a valid
/// [`GallerySlug`] body.
pub fn slugify(text: &str) -> String {
    hyphenate(text, |c| c.is_ascii_alphanumeric())
}

/// Like [`slugify`] but keeps letters and digits of any script, e.g.
/// `"Исландия Юг"` → `исландия-юг`. Used for navigation paths.
pub fn path_segment(text: &str) -> String {
    hyphenate(text, char::is_alphanumeric)
}

fn hyphenate(text: &str, keep: impl Fn(char) -> bool) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if keep(c) {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Width divided by height of an image; strictly positive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Constructs a strictly positive, finite ratio.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("aspect ratio"))
        }
    }

    /// Ratio of the given pixel dimensions.
    pub fn from_dimensions(width: u32, height: u32) -> Result<Self, TypeConstraintError> {
        if height == 0 {
            return Err(TypeConstraintError::NonPositiveNumber("image height"));
        }
        Self::new(f64::from(width) / f64::from(height))
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl TryFrom<f64> for AspectRatio {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_category_names() {
        let value = CategoryName::new("  Coastlines  ").unwrap();
        assert_eq!(value.as_str(), "Coastlines");
    }

    #[test]
    fn rejects_whitespace_only_names() {
        let err = CategoryName::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("category name"));
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = CategoryId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("category_id"));
    }

    #[test]
    fn sort_order_rejects_negative_values() {
        assert_eq!(
            SortOrder::new(-1).unwrap_err(),
            TypeConstraintError::NegativeNumber("order")
        );
        assert_eq!(SortOrder::from_index(3), 3);
    }

    #[test]
    fn parses_buckets_case_insensitively() {
        assert_eq!(Bucket::try_from(" Travel ").unwrap(), Bucket::Travel);
        assert!(Bucket::try_from("portraits").is_err());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Iceland: The Highlands!  "), "iceland-the-highlands");
        assert_eq!(slugify("Año 2023"), "a-o-2023");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn path_segment_keeps_non_ascii_letters() {
        assert_eq!(path_segment("Исландия"), "исландия");
        assert_eq!(path_segment("Año 2023!"), "año-2023");
        assert_eq!(path_segment("!!!"), "");
    }

    #[test]
    fn parses_equipment_kinds() {
        assert_eq!(EquipmentKind::try_from(" Lens ").unwrap(), EquipmentKind::Lens);
        assert!(matches!(
            EquipmentKind::try_from("tripod"),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }

    #[test]
    fn validates_slugs() {
        assert!(GallerySlug::new("iceland-2023").is_ok());
        assert_eq!(
            GallerySlug::new("Iceland").unwrap_err(),
            TypeConstraintError::InvalidSlug("slug")
        );
        assert_eq!(
            GallerySlug::from_text("!!").unwrap_err(),
            TypeConstraintError::EmptyString("slug")
        );
    }

    #[test]
    fn aspect_ratio_from_dimensions() {
        let ratio = AspectRatio::from_dimensions(3000, 2000).unwrap();
        assert_eq!(ratio.get(), 1.5);
        assert!(AspectRatio::from_dimensions(10, 0).is_err());
    }
}
