use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::tree::{BucketNode, CategoryTree, PrimaryNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub bucket: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub parent_id: Option<i32>,
    pub order: i32,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self::from(&value)
    }
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            bucket: value.bucket.as_str(),
            kind: value.level.kind().as_str(),
            parent_id: value.parent_id().map(|id| id.get()),
            order: value.order.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryCategoryDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub secondaries: Vec<CategoryDto>,
}

impl From<PrimaryNode> for PrimaryCategoryDto {
    fn from(value: PrimaryNode) -> Self {
        Self {
            category: value.category.into(),
            secondaries: value.secondaries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketDto {
    pub bucket: &'static str,
    pub primaries: Vec<PrimaryCategoryDto>,
}

impl From<BucketNode> for BucketDto {
    fn from(value: BucketNode) -> Self {
        Self {
            bucket: value.bucket.as_str(),
            primaries: value.primaries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Admin view of the category hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTreeDto {
    pub buckets: Vec<BucketDto>,
    pub orphans: Vec<CategoryDto>,
}

impl From<CategoryTree> for CategoryTreeDto {
    fn from(value: CategoryTree) -> Self {
        Self {
            buckets: value.buckets.into_iter().map(Into::into).collect(),
            orphans: value.orphans.into_iter().map(Into::into).collect(),
        }
    }
}

impl CategoryTreeDto {
    /// Every primary category, used to pick a parent for a new secondary.
    pub fn primaries(&self) -> Vec<&CategoryDto> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.primaries.iter().map(|p| &p.category))
            .collect()
    }
}
