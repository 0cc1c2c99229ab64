use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Bucket, CategoryId, CategoryKind, CategoryName, SortOrder};

/// Position of a category inside its bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryLevel {
    /// First-level grouping directly under the bucket.
    Primary,
    /// Second-level grouping nested under a primary category.
    Secondary { parent_id: CategoryId },
}

impl CategoryLevel {
    pub const fn kind(self) -> CategoryKind {
        match self {
            Self::Primary => CategoryKind::Primary,
            Self::Secondary { .. } => CategoryKind::Secondary,
        }
    }

    pub const fn parent_id(self) -> Option<CategoryId> {
        match self {
            Self::Primary => None,
            Self::Secondary { parent_id } => Some(parent_id),
        }
    }
}

/// Set of categories over which `order` is a contiguous permutation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum SiblingGroup {
    /// Primaries of one bucket.
    Primary(Bucket),
    /// Secondaries of one primary.
    Secondary(CategoryId),
}

/// Node of the two-level category hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub bucket: Bucket,
    #[serde(flatten)]
    pub level: CategoryLevel,
    pub order: SortOrder,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn sibling_group(&self) -> SiblingGroup {
        match self.level {
            CategoryLevel::Primary => SiblingGroup::Primary(self.bucket),
            CategoryLevel::Secondary { parent_id } => SiblingGroup::Secondary(parent_id),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.level, CategoryLevel::Primary)
    }

    pub fn parent_id(&self) -> Option<CategoryId> {
        self.level.parent_id()
    }

    pub fn belongs_to(&self, group: SiblingGroup) -> bool {
        self.sibling_group() == group
    }
}

/// Data required to insert a new [`Category`].
///
/// The storage layer assigns `id` and appends the record to the end of its
/// sibling group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub bucket: Bucket,
    pub level: CategoryLevel,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    pub fn sibling_group(&self) -> SiblingGroup {
        match self.level {
            CategoryLevel::Primary => SiblingGroup::Primary(self.bucket),
            CategoryLevel::Secondary { parent_id } => SiblingGroup::Secondary(parent_id),
        }
    }
}
