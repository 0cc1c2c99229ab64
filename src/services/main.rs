use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Serialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::tree::CategoryTree;
use crate::domain::types::Bucket;
use crate::repository::{CategoryListQuery, CategoryReader, GalleryListQuery, GalleryReader};

use super::{ServiceError, ServiceResult};

/// Per-bucket counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub bucket: &'static str,
    pub primaries: usize,
    pub secondaries: usize,
    pub galleries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub buckets: Vec<BucketSummary>,
    pub orphans: usize,
    pub galleries: usize,
    pub published: usize,
}

/// Core business logic for rendering the index page.
///
/// Counts categories and galleries per bucket. Repository errors are mapped
/// to `ServiceError::Internal` so that the route stays a thin wrapper.
pub fn show_index<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Dashboard>
where
    R: CategoryReader + GalleryReader,
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
    let tree = CategoryTree::build(&categories);

    let count = |query: GalleryListQuery| match repo.list_galleries(query) {
        Ok((total, _)) => Ok(total),
        Err(e) => {
            log::error!("Failed to count galleries: {e}");
            Err(ServiceError::Internal)
        }
    };

    let mut buckets = Vec::with_capacity(Bucket::ALL.len());
    for bucket in Bucket::ALL {
        let (primaries, secondaries) = tree.bucket(bucket).map_or((0, 0), |node| {
            let secondaries = node.primaries.iter().map(|p| p.secondaries.len()).sum();
            (node.primaries.len(), secondaries)
        });
        buckets.push(BucketSummary {
            bucket: bucket.as_str(),
            primaries,
            secondaries,
            galleries: count(GalleryListQuery::default().bucket(bucket))?,
        });
    }

    Ok(Dashboard {
        buckets,
        orphans: tree.orphans.len(),
        galleries: count(GalleryListQuery::default())?,
        published: count(GalleryListQuery::default().published())?,
    })
}
