use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::category::SiblingGroup;
use crate::domain::tree::{CategoryTree, plan_reorder};
use crate::domain::types::Bucket;
use crate::dto::categories::{CategoryDto, CategoryTreeDto};
use crate::feed::CategoryFeed;
use crate::forms::categories::{
    AddCategoryFormPayload, DeleteCategoryFormPayload, RenameCategoryFormPayload,
    ReorderCategoriesFormPayload,
};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter};

use super::{ServiceError, ServiceResult};

/// Categories grouped by bucket for the admin page.
pub fn show_categories<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<CategoryTreeDto>
where
    R: CategoryReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.list_categories(CategoryListQuery::default()) {
        Ok(categories) => Ok(CategoryTree::build(&categories).into()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Flat category list sorted ascending by `order`.
pub fn list_categories<R>(
    bucket: Option<Bucket>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let query = match bucket {
        Some(bucket) => CategoryListQuery::default().bucket(bucket),
        None => CategoryListQuery::default(),
    };

    match repo.list_categories(query) {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Appends a new category to the end of its sibling group.
///
/// Secondaries inherit the bucket of their parent, which must be an existing
/// primary category.
pub fn add_category<R>(
    payload: AddCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    feed: &CategoryFeed,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let bucket = match payload.group {
        SiblingGroup::Primary(bucket) => bucket,
        SiblingGroup::Secondary(parent_id) => match repo.get_category_by_id(parent_id) {
            Ok(Some(parent)) if parent.is_primary() => parent.bucket,
            Ok(Some(_)) => {
                return Err(ServiceError::Form(
                    "Parent must be a primary category".to_string(),
                ));
            }
            Ok(None) => return Err(ServiceError::NotFound),
            Err(e) => {
                log::error!("Failed to get parent category: {e}");
                return Err(ServiceError::Internal);
            }
        },
    };

    let category = payload.into_new_category(bucket);
    let result = match repo.create_category(&category) {
        Ok(created) => {
            log::info!(
                "Created {} category {} '{}' in {} at order {}",
                created.level.kind(),
                created.id,
                created.name,
                created.bucket,
                created.order
            );
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Ok(false)
        }
    };
    feed.refresh(repo);
    result
}

/// Replaces the display name of a category. `order` is untouched.
pub fn rename_category<R>(
    payload: RenameCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    feed: &CategoryFeed,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let result = match repo.rename_category(payload.category_id, &payload.name) {
        Ok(_) => {
            log::info!("Renamed category {} to '{}'", payload.category_id, payload.name);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to rename category: {e}");
            Ok(false)
        }
    };
    feed.refresh(repo);
    result
}

/// Deletes one category. Secondaries of a deleted primary stay in place as
/// orphans.
pub fn delete_category<R>(
    payload: DeleteCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    feed: &CategoryFeed,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.get_category_by_id(payload.category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let result = match repo.delete_category(payload.category_id) {
        Ok(_) => {
            log::info!("Deleted category {}", payload.category_id);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Ok(false)
        }
    };
    feed.refresh(repo);
    result
}

/// Applies a drag-end event: `active_id` takes the position of `over_id` in
/// its sibling group and the whole group is renumbered in one batch.
///
/// Dropping a category onto itself or outside its sibling group writes
/// nothing and succeeds.
pub fn reorder_categories<R>(
    payload: ReorderCategoriesFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    feed: &CategoryFeed,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let categories = match repo.list_categories(CategoryListQuery::default()) {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !categories.iter().any(|c| c.id == payload.active_id) {
        return Err(ServiceError::NotFound);
    }

    let Some(plan) = plan_reorder(&categories, payload.active_id, payload.over_id) else {
        log::debug!(
            "Ignoring drop of category {} onto {}",
            payload.active_id,
            payload.over_id
        );
        return Ok(true);
    };

    let result = match repo.reorder_categories(&plan.orders) {
        Ok(_) => {
            log::info!("Reordered {:?} as {:?}", plan.group, plan.ids());
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to reorder categories: {e}");
            Ok(false)
        }
    };
    feed.refresh(repo);
    result
}
