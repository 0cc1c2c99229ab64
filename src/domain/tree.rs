//! Ordering rules for the category hierarchy.
//!
//! Everything here is pure: callers load the categories, ask for a plan and
//! hand the plan to the storage layer as one batch.

use serde::Serialize;

use crate::domain::category::{Category, SiblingGroup};
use crate::domain::types::{Bucket, CategoryId, SortOrder};

/// Moves the element at `from` so that it ends up at index `to`, shifting the
/// elements in between. Out-of-range indices leave the list untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Categories of `group`, sorted by `(order, id)`.
pub fn siblings(categories: &[Category], group: SiblingGroup) -> Vec<&Category> {
    let mut items: Vec<&Category> = categories.iter().filter(|c| c.belongs_to(group)).collect();
    items.sort_by_key(|c| (c.order, c.id));
    items
}

/// Order a new member of `group` gets: one past the current maximum.
pub fn next_order<I>(orders: I) -> SortOrder
where
    I: IntoIterator<Item = SortOrder>,
{
    orders
        .into_iter()
        .max()
        .map(SortOrder::next)
        .unwrap_or_default()
}

/// Batch of `order` assignments covering a whole sibling group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderPlan {
    pub group: SiblingGroup,
    pub orders: Vec<(CategoryId, SortOrder)>,
}

impl ReorderPlan {
    /// Identifiers in their new order.
    pub fn ids(&self) -> Vec<CategoryId> {
        self.orders.iter().map(|(id, _)| *id).collect()
    }
}

/// Computes the drag-end reorder of `active` onto `over`.
///
/// Returns `None` when nothing must be written: both ids are the same, the
/// dragged category is unknown, or the drop target is not a sibling of the
/// dragged category.
pub fn plan_reorder(
    categories: &[Category],
    active: CategoryId,
    over: CategoryId,
) -> Option<ReorderPlan> {
    if active == over {
        return None;
    }

    let group = categories.iter().find(|c| c.id == active)?.sibling_group();
    let mut ids: Vec<CategoryId> = siblings(categories, group).iter().map(|c| c.id).collect();

    let from = ids.iter().position(|id| *id == active)?;
    let to = ids.iter().position(|id| *id == over)?;
    move_item(&mut ids, from, to);

    Some(ReorderPlan {
        group,
        orders: ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id, SortOrder::from_index(index)))
            .collect(),
    })
}

/// Primary category with its secondaries.
#[derive(Debug, Clone, Serialize)]
pub struct PrimaryNode {
    pub category: Category,
    pub secondaries: Vec<Category>,
}

/// All primaries of one bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketNode {
    pub bucket: Bucket,
    pub primaries: Vec<PrimaryNode>,
}

/// Categories grouped the way the admin panel shows them.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    pub buckets: Vec<BucketNode>,
    /// Secondaries whose parent no longer exists or is not a primary.
    pub orphans: Vec<Category>,
}

impl CategoryTree {
    pub fn build(categories: &[Category]) -> Self {
        let buckets = Bucket::ALL
            .iter()
            .map(|bucket| BucketNode {
                bucket: *bucket,
                primaries: siblings(categories, SiblingGroup::Primary(*bucket))
                    .into_iter()
                    .map(|primary| PrimaryNode {
                        category: primary.clone(),
                        secondaries: siblings(categories, SiblingGroup::Secondary(primary.id))
                            .into_iter()
                            .cloned()
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let mut orphans: Vec<Category> = categories
            .iter()
            .filter(|c| match c.parent_id() {
                Some(parent_id) => !categories
                    .iter()
                    .any(|p| p.id == parent_id && p.is_primary()),
                None => false,
            })
            .cloned()
            .collect();
        orphans.sort_by_key(|c| (c.order, c.id));

        Self { buckets, orphans }
    }

    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketNode> {
        self.buckets.iter().find(|node| node.bucket == bucket)
    }
}
