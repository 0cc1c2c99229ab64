use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::equipment::{EquipmentItem, EquipmentUpdate, NewEquipment};
use crate::domain::gallery::{Gallery, GalleryImage, GalleryUpdate, NewGallery, NewGalleryImage};
use crate::domain::types::{
    Bucket, CategoryId, CategoryName, EquipmentId, EquipmentKind, GalleryId, GallerySlug, ImageId,
    SortOrder,
};

pub mod category;
pub mod equipment;
pub mod gallery;
#[cfg(test)]
pub mod test;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Restrict to one root bucket.
    pub bucket: Option<Bucket>,
}

impl CategoryListQuery {
    pub fn bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = Some(bucket);
        self
    }
}

/// Query parameters for listing galleries.
#[derive(Debug, Clone, Default)]
pub struct GalleryListQuery {
    /// Restrict to one root bucket.
    pub bucket: Option<Bucket>,
    /// Hide drafts.
    pub published_only: bool,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl GalleryListQuery {
    pub fn bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = Some(bucket);
        self
    }
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters for listing equipment.
#[derive(Debug, Clone, Default)]
pub struct EquipmentListQuery {
    pub kind: Option<EquipmentKind>,
    /// Hide retired items.
    pub active_only: bool,
}

impl EquipmentListQuery {
    pub fn kind(mut self, kind: EquipmentKind) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn active(mut self) -> Self {
        self.active_only = true;
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories sorted ascending by `order`.
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category at the end of its sibling group.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace the display name; `order` is untouched.
    fn rename_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize>;
    /// Delete one category. Children are left in place.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
    /// Write every `(id, order)` pair in one transaction.
    fn reorder_categories(&self, orders: &[(CategoryId, SortOrder)]) -> RepositoryResult<usize>;
}

/// Read-only operations for galleries and their images.
pub trait GalleryReader {
    /// List galleries, newest first.
    fn list_galleries(&self, query: GalleryListQuery) -> RepositoryResult<(usize, Vec<Gallery>)>;
    fn get_gallery_by_id(&self, id: GalleryId) -> RepositoryResult<Option<Gallery>>;
    fn get_gallery_by_slug(&self, slug: &GallerySlug) -> RepositoryResult<Option<Gallery>>;
    /// Whether any gallery already uses `slug`.
    fn slug_exists(&self, slug: &GallerySlug) -> RepositoryResult<bool>;
    /// Images of a gallery sorted by `order`.
    fn list_gallery_images(&self, gallery_id: GalleryId) -> RepositoryResult<Vec<GalleryImage>>;
}

/// Write operations for galleries and their images.
pub trait GalleryWriter {
    fn create_gallery(&self, gallery: &NewGallery) -> RepositoryResult<Gallery>;
    fn update_gallery(&self, id: GalleryId, update: &GalleryUpdate) -> RepositoryResult<usize>;
    /// Delete a gallery together with its image records.
    fn delete_gallery(&self, id: GalleryId) -> RepositoryResult<usize>;
    /// Persist a new image at the end of the gallery order.
    fn add_gallery_image(&self, image: &NewGalleryImage) -> RepositoryResult<GalleryImage>;
    fn remove_gallery_image(&self, gallery_id: GalleryId, image_id: ImageId)
    -> RepositoryResult<usize>;
    /// Set or clear the cover image.
    fn set_gallery_cover(
        &self,
        gallery_id: GalleryId,
        image_id: Option<ImageId>,
    ) -> RepositoryResult<usize>;
    /// Write every `(id, order)` pair of one gallery in one transaction.
    fn reorder_gallery_images(
        &self,
        gallery_id: GalleryId,
        orders: &[(ImageId, SortOrder)],
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for the equipment inventory.
pub trait EquipmentReader {
    /// List items sorted by name.
    fn list_equipment(&self, query: EquipmentListQuery) -> RepositoryResult<Vec<EquipmentItem>>;
    fn get_equipment_by_id(&self, id: EquipmentId) -> RepositoryResult<Option<EquipmentItem>>;
}

/// Write operations for the equipment inventory.
pub trait EquipmentWriter {
    fn create_equipment(&self, item: &NewEquipment) -> RepositoryResult<EquipmentItem>;
    fn update_equipment(&self, id: EquipmentId, update: &EquipmentUpdate)
    -> RepositoryResult<usize>;
    /// Flip an item between active and retired.
    fn set_equipment_active(&self, id: EquipmentId, is_active: bool) -> RepositoryResult<usize>;
    fn delete_equipment(&self, id: EquipmentId) -> RepositoryResult<usize>;
}
