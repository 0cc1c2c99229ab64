use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryLevel, NewCategory, SiblingGroup};
use crate::domain::types::{Bucket, CategoryId, CategoryKind, CategoryName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    /// `primary` or `secondary`.
    #[validate(length(min = 1))]
    pub kind: String,
    /// Root bucket; required for primaries.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Parent primary; required for secondaries.
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    /// Sibling group the new category is appended to.
    pub group: SiblingGroup,
}

impl AddCategoryFormPayload {
    /// Builds the record to insert. `bucket` is the root bucket of the group,
    /// which for secondaries comes from the parent.
    pub fn into_new_category(self, bucket: Bucket) -> NewCategory {
        let now = Utc::now().naive_utc();
        let level = match self.group {
            SiblingGroup::Primary(_) => CategoryLevel::Primary,
            SiblingGroup::Secondary(parent_id) => CategoryLevel::Secondary { parent_id },
        };
        NewCategory {
            name: self.name,
            bucket,
            level,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCategoryFormError {
    #[error("Add category form validation failed: {0}")]
    Validation(String),
    #[error("Add category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Parses an optional id field; blank form values count as absent.
pub(crate) fn optional_id(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<CategoryId>, TypeConstraintError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => {
            let id = raw
                .parse::<i32>()
                .map_err(|_| TypeConstraintError::InvalidValue(format!("{field}: {raw}")))?;
            Ok(Some(CategoryId::new(id)?))
        }
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = CategoryName::new(value.name)?;

        let group = match CategoryKind::try_from(value.kind.as_str())? {
            CategoryKind::Primary => {
                let bucket = value.bucket.unwrap_or_default();
                SiblingGroup::Primary(Bucket::try_from(bucket)?)
            }
            CategoryKind::Secondary => {
                match optional_id(value.parent_id.as_deref(), "parent_id")? {
                    Some(parent_id) => SiblingGroup::Secondary(parent_id),
                    None => {
                        return Err(AddCategoryFormError::Validation(
                            "secondary category requires a parent".to_string(),
                        ));
                    }
                }
            }
        };

        Ok(Self { name, group })
    }
}

#[derive(Deserialize, Validate)]
pub struct RenameCategoryForm {
    /// Filled from the URL path.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub category_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameCategoryFormPayload {
    pub category_id: CategoryId,
    pub name: CategoryName,
}

#[derive(Debug, Error)]
pub enum RenameCategoryFormError {
    #[error("Rename category form validation failed: {0}")]
    Validation(String),
    #[error("Rename category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RenameCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RenameCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RenameCategoryForm> for RenameCategoryFormPayload {
    type Error = RenameCategoryFormError;

    fn try_from(value: RenameCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
            name: CategoryName::new(value.name)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteCategoryForm {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub category_id: i32,
    /// Set by the confirmation dialog.
    #[serde(default)]
    pub confirm: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
}

#[derive(Debug, Error)]
pub enum DeleteCategoryFormError {
    #[error("Delete category form validation failed: {0}")]
    Validation(String),
    #[error("Delete category form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Deletion was not confirmed")]
    NotConfirmed,
}

impl From<ValidationErrors> for DeleteCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for DeleteCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<DeleteCategoryForm> for DeleteCategoryFormPayload {
    type Error = DeleteCategoryFormError;

    fn try_from(value: DeleteCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let confirmed = value
            .confirm
            .as_deref()
            .is_some_and(|v| matches!(v.trim(), "on" | "true" | "yes"));
        if !confirmed {
            return Err(DeleteCategoryFormError::NotConfirmed);
        }
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
        })
    }
}

/// Drag-end event: `active_id` was dropped onto `over_id`.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderCategoriesForm {
    #[validate(range(min = 1))]
    pub active_id: i32,
    #[validate(range(min = 1))]
    pub over_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderCategoriesFormPayload {
    pub active_id: CategoryId,
    pub over_id: CategoryId,
}

#[derive(Debug, Error)]
pub enum ReorderCategoriesFormError {
    #[error("Reorder form validation failed: {0}")]
    Validation(String),
    #[error("Reorder form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReorderCategoriesFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReorderCategoriesFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ReorderCategoriesForm> for ReorderCategoriesFormPayload {
    type Error = ReorderCategoriesFormError;

    fn try_from(value: ReorderCategoriesForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            active_id: CategoryId::new(value.active_id)?,
            over_id: CategoryId::new(value.over_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form(
        kind: &str,
        bucket: Option<&str>,
        parent_id: Option<&str>,
        name: &str,
    ) -> AddCategoryForm {
        AddCategoryForm {
            kind: kind.to_string(),
            bucket: bucket.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
            name: name.to_string(),
        }
    }

    #[test]
    fn primary_form_targets_bucket_group() {
        let payload: AddCategoryFormPayload =
            add_form("primary", Some("travel"), None, " Coastlines ")
                .try_into()
                .unwrap();
        assert_eq!(payload.name.as_str(), "Coastlines");
        assert_eq!(payload.group, SiblingGroup::Primary(Bucket::Travel));
    }

    #[test]
    fn secondary_form_requires_parent() {
        let payload: AddCategoryFormPayload = add_form("secondary", Some(""), Some("7"), "Iceland")
            .try_into()
            .unwrap();
        assert_eq!(
            payload.group,
            SiblingGroup::Secondary(CategoryId::new(7).unwrap())
        );

        let result: Result<AddCategoryFormPayload, _> =
            add_form("secondary", None, Some(""), "Iceland").try_into();
        assert!(matches!(result, Err(AddCategoryFormError::Validation(_))));
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let result: Result<AddCategoryFormPayload, _> =
            add_form("primary", Some("stills"), None, "   ").try_into();
        assert!(matches!(result, Err(AddCategoryFormError::TypeConstraint(_))));
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        let result: Result<AddCategoryFormPayload, _> =
            add_form("primary", Some("portraits"), None, "Faces").try_into();
        assert!(result.is_err());
    }

    #[test]
    fn delete_requires_confirmation() {
        let unconfirmed: Result<DeleteCategoryFormPayload, _> = DeleteCategoryForm {
            category_id: 3,
            confirm: None,
        }
        .try_into();
        assert!(matches!(
            unconfirmed,
            Err(DeleteCategoryFormError::NotConfirmed)
        ));

        let confirmed: DeleteCategoryFormPayload = DeleteCategoryForm {
            category_id: 3,
            confirm: Some("on".to_string()),
        }
        .try_into()
        .unwrap();
        assert_eq!(confirmed.category_id, 3);
    }

    #[test]
    fn reorder_rejects_non_positive_ids() {
        let result: Result<ReorderCategoriesFormPayload, _> = ReorderCategoriesForm {
            active_id: 0,
            over_id: 2,
        }
        .try_into();
        assert!(matches!(
            result,
            Err(ReorderCategoriesFormError::Validation(_))
        ));
    }
}
