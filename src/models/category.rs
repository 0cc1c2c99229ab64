use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryLevel, NewCategory as DomainNewCategory,
};
use crate::domain::types::{Bucket, CategoryKind, CategoryName, SortOrder, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub bucket: String,
    pub kind: String,
    pub parent_id: Option<i32>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub bucket: String,
    pub kind: String,
    pub parent_id: Option<i32>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Row for `category` placed at `order` within its sibling group.
    pub fn at_order(category: &DomainNewCategory, order: SortOrder) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            bucket: category.bucket.as_str().to_string(),
            kind: category.level.kind().as_str().to_string(),
            parent_id: category.level.parent_id().map(|id| id.get()),
            sort_order: order.get(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        let level = match (CategoryKind::try_from(category.kind.as_str())?, category.parent_id) {
            (CategoryKind::Primary, _) => CategoryLevel::Primary,
            (CategoryKind::Secondary, Some(parent_id)) => CategoryLevel::Secondary {
                parent_id: parent_id.try_into()?,
            },
            (CategoryKind::Secondary, None) => {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "secondary category {} has no parent",
                    category.id
                )));
            }
        };

        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            bucket: Bucket::try_from(category.bucket)?,
            level,
            order: SortOrder::new(category.sort_order)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}
