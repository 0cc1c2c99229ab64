//! Public site navigation derived from the category tree.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::tree::CategoryTree;
use crate::domain::types::{Bucket, CategoryId, path_segment};

/// Link in the public navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: String,
    pub href: String,
    pub children: Vec<NavItem>,
}

/// Top-level menu entry for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub bucket: Bucket,
    pub href: String,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub sections: Vec<NavSection>,
}

impl Navigation {
    pub fn build(categories: &[Category]) -> Self {
        let tree = CategoryTree::build(categories);
        let sections = tree
            .buckets
            .into_iter()
            .map(|node| {
                let section_href = format!("/{}", node.bucket.as_str());
                let mut taken = HashSet::new();
                let items = node
                    .primaries
                    .into_iter()
                    .map(|primary| {
                        let segment =
                            unique_segment(&primary.category.name, primary.category.id, &mut taken);
                        let href = format!("{section_href}/{segment}");
                        let mut child_taken = HashSet::new();
                        let children = primary
                            .secondaries
                            .iter()
                            .map(|secondary| {
                                let segment =
                                    unique_segment(&secondary.name, secondary.id, &mut child_taken);
                                NavItem {
                                    name: secondary.name.to_string(),
                                    href: format!("{href}/{segment}"),
                                    children: vec![],
                                }
                            })
                            .collect();
                        NavItem {
                            name: primary.category.name.into_inner(),
                            href,
                            children,
                        }
                    })
                    .collect();
                NavSection {
                    bucket: node.bucket,
                    href: section_href,
                    items,
                }
            })
            .collect();

        Self { sections }
    }

    pub fn section(&self, bucket: Bucket) -> Option<&NavSection> {
        self.sections.iter().find(|s| s.bucket == bucket)
    }
}

/// Path segment for one menu entry, unique among its siblings.
///
/// Names without letters or digits fall back to the category id. A clash
/// with an earlier sibling gets the id appended.
fn unique_segment(name: &str, id: CategoryId, taken: &mut HashSet<String>) -> String {
    let mut segment = path_segment(name);
    if segment.is_empty() {
        segment = id.get().to_string();
    }
    while taken.contains(&segment) {
        segment = format!("{segment}-{}", id.get());
    }
    taken.insert(segment.clone());
    segment
}
