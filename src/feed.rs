//! Live category snapshots for subscribers.
//!
//! Every successful category mutation publishes the full sorted category list.
//! Subscribers replace their local state wholesale with each snapshot; there
//! are no partial updates to merge.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::category::Category;
use crate::domain::navigation::Navigation;
use crate::repository::{CategoryListQuery, CategoryReader};

/// Full category list as of one mutation.
pub type CategorySnapshot = Arc<Vec<Category>>;

/// Broadcast channel of category snapshots.
#[derive(Clone)]
pub struct CategoryFeed {
    sender: broadcast::Sender<CategorySnapshot>,
}

impl CategoryFeed {
    /// Creates a feed buffering up to `capacity` snapshots per slow subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receiver of every snapshot published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CategorySnapshot> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn publish(&self, categories: Vec<Category>) {
        // No receivers is fine.
        let _ = self.sender.send(Arc::new(categories));
    }

    /// Re-lists all categories and publishes them.
    ///
    /// A failed read is logged and nothing is published.
    pub fn refresh<R>(&self, repo: &R)
    where
        R: CategoryReader + ?Sized,
    {
        match repo.list_categories(CategoryListQuery::default()) {
            Ok(categories) => {
                log::debug!("Publishing snapshot of {} categories", categories.len());
                self.publish(categories);
            }
            Err(e) => log::error!("Failed to refresh category feed: {e}"),
        }
    }
}

/// Public navigation built from the latest category snapshot.
#[derive(Default)]
pub struct NavigationCache {
    navigation: RwLock<Navigation>,
}

impl NavigationCache {
    pub fn new(categories: &[Category]) -> Self {
        Self {
            navigation: RwLock::new(Navigation::build(categories)),
        }
    }

    /// Replaces the cached navigation with one built from `categories`.
    pub fn apply(&self, categories: &[Category]) {
        let navigation = Navigation::build(categories);
        match self.navigation.write() {
            Ok(mut guard) => *guard = navigation,
            Err(poisoned) => *poisoned.into_inner() = navigation,
        }
    }

    pub fn current(&self) -> Navigation {
        match self.navigation.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Keeps `cache` in sync with `feed` until the feed is dropped.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_navigation_sync(
    feed: &CategoryFeed,
    cache: Arc<NavigationCache>,
) -> tokio::task::JoinHandle<()> {
    let mut receiver = feed.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => cache.apply(&snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Navigation sync skipped {skipped} stale snapshots");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
