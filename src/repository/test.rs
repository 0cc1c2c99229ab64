use std::sync::Mutex;

use chrono::Utc;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::category::{Category, NewCategory};
use crate::domain::equipment::{EquipmentItem, EquipmentUpdate, NewEquipment};
use crate::domain::gallery::{Gallery, GalleryImage, GalleryUpdate, NewGallery, NewGalleryImage};
use crate::domain::tree::{next_order, siblings};
use crate::domain::types::{
    CategoryId, CategoryName, EquipmentId, GalleryId, GallerySlug, ImageId, SortOrder,
};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, EquipmentListQuery, EquipmentReader,
    EquipmentWriter, GalleryListQuery, GalleryReader, GalleryWriter,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    galleries: Vec<Gallery>,
    images: Vec<GalleryImage>,
    equipment: Vec<EquipmentItem>,
    last_id: i32,
    writes: usize,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// Simple in-memory repository used for unit tests.
///
/// Every write call is counted, including failed ones. A failing repository
/// rejects all writes after counting them; reads keep working.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
    fail_writes: bool,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let last_id = categories.iter().map(|c| c.id.get()).max().unwrap_or(0);
        Self {
            state: Mutex::new(State {
                categories,
                last_id,
                ..State::default()
            }),
            fail_writes: false,
        }
    }

    pub fn with_galleries(galleries: Vec<Gallery>, images: Vec<GalleryImage>) -> Self {
        let last_id = galleries
            .iter()
            .map(|g| g.id.get())
            .chain(images.iter().map(|i| i.id.get()))
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(State {
                galleries,
                images,
                last_id,
                ..State::default()
            }),
            fail_writes: false,
        }
    }

    pub fn with_equipment(equipment: Vec<EquipmentItem>) -> Self {
        let last_id = equipment.iter().map(|e| e.id.get()).max().unwrap_or(0);
        Self {
            state: Mutex::new(State {
                equipment,
                last_id,
                ..State::default()
            }),
            fail_writes: false,
        }
    }

    /// Makes every subsequent write fail with a storage error.
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Number of write calls received so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    /// Snapshot of the stored categories in insertion order.
    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn galleries(&self) -> Vec<Gallery> {
        self.state.lock().unwrap().galleries.clone()
    }

    pub fn images(&self) -> Vec<GalleryImage> {
        self.state.lock().unwrap().images.clone()
    }

    pub fn equipment(&self) -> Vec<EquipmentItem> {
        self.state.lock().unwrap().equipment.clone()
    }

    fn write<T>(&self, op: impl FnOnce(&mut State) -> T) -> RepositoryResult<T> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if self.fail_writes {
            return Err(RepositoryError::ValidationError(
                "storage unavailable".to_string(),
            ));
        }
        Ok(op(&mut state))
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        let mut items = self.categories();
        if let Some(bucket) = query.bucket {
            items.retain(|c| c.bucket == bucket);
        }
        items.sort_by_key(|c| (c.order, c.id));
        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.categories().into_iter().find(|c| c.id == id))
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        self.write(|state| {
            let order = next_order(
                siblings(&state.categories, category.sibling_group())
                    .iter()
                    .map(|c| c.order),
            );
            let created = Category {
                id: CategoryId::new(state.next_id()).unwrap(),
                name: category.name.clone(),
                bucket: category.bucket,
                level: category.level,
                order,
                created_at: category.created_at,
                updated_at: category.updated_at,
            };
            state.categories.push(created.clone());
            created
        })
    }

    fn rename_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for category in state.categories.iter_mut().filter(|c| c.id == id) {
                category.name = name.clone();
                category.updated_at = Utc::now().naive_utc();
                affected += 1;
            }
            affected
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        self.write(|state| {
            let before = state.categories.len();
            state.categories.retain(|c| c.id != id);
            before - state.categories.len()
        })
    }

    fn reorder_categories(&self, orders: &[(CategoryId, SortOrder)]) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for (id, order) in orders {
                for category in state.categories.iter_mut().filter(|c| c.id == *id) {
                    category.order = *order;
                    affected += 1;
                }
            }
            affected
        })
    }
}

impl GalleryReader for TestRepository {
    fn list_galleries(&self, query: GalleryListQuery) -> RepositoryResult<(usize, Vec<Gallery>)> {
        let mut items = self.galleries();
        if let Some(bucket) = query.bucket {
            items.retain(|g| g.navigation.bucket == bucket);
        }
        if query.published_only {
            items.retain(|g| g.is_published);
        }
        items.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        let total = items.len();
        if let Some(pagination) = query.pagination {
            let skip = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(skip)
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_gallery_by_id(&self, id: GalleryId) -> RepositoryResult<Option<Gallery>> {
        Ok(self.galleries().into_iter().find(|g| g.id == id))
    }

    fn get_gallery_by_slug(&self, slug: &GallerySlug) -> RepositoryResult<Option<Gallery>> {
        Ok(self.galleries().into_iter().find(|g| &g.slug == slug))
    }

    fn slug_exists(&self, slug: &GallerySlug) -> RepositoryResult<bool> {
        Ok(self.galleries().iter().any(|g| &g.slug == slug))
    }

    fn list_gallery_images(&self, gallery_id: GalleryId) -> RepositoryResult<Vec<GalleryImage>> {
        let mut images: Vec<GalleryImage> = self
            .images()
            .into_iter()
            .filter(|i| i.gallery_id == gallery_id)
            .collect();
        images.sort_by_key(|i| (i.order, i.id));
        Ok(images)
    }
}

impl GalleryWriter for TestRepository {
    fn create_gallery(&self, gallery: &NewGallery) -> RepositoryResult<Gallery> {
        self.write(|state| {
            let created = Gallery {
                id: GalleryId::new(state.next_id()).unwrap(),
                slug: gallery.slug.clone(),
                title: gallery.title.clone(),
                description: gallery.description.clone(),
                location: gallery.location.clone(),
                date: gallery.date,
                is_published: gallery.is_published,
                navigation: gallery.navigation,
                gear: gallery.gear.clone(),
                cover_image_id: None,
                created_at: gallery.created_at,
                updated_at: gallery.updated_at,
            };
            state.galleries.push(created.clone());
            created
        })
    }

    fn update_gallery(&self, id: GalleryId, update: &GalleryUpdate) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for gallery in state.galleries.iter_mut().filter(|g| g.id == id) {
                gallery.title = update.title.clone();
                gallery.description = update.description.clone();
                gallery.location = update.location.clone();
                gallery.date = update.date;
                gallery.is_published = update.is_published;
                gallery.navigation = update.navigation;
                gallery.gear = update.gear.clone();
                affected += 1;
            }
            affected
        })
    }

    fn delete_gallery(&self, id: GalleryId) -> RepositoryResult<usize> {
        self.write(|state| {
            state.images.retain(|i| i.gallery_id != id);
            let before = state.galleries.len();
            state.galleries.retain(|g| g.id != id);
            before - state.galleries.len()
        })
    }

    fn add_gallery_image(&self, image: &NewGalleryImage) -> RepositoryResult<GalleryImage> {
        self.write(|state| {
            let order = next_order(
                state
                    .images
                    .iter()
                    .filter(|i| i.gallery_id == image.gallery_id)
                    .map(|i| i.order),
            );
            let created = GalleryImage {
                id: ImageId::new(state.next_id()).unwrap(),
                gallery_id: image.gallery_id,
                storage_key: image.storage_key.clone(),
                aspect_ratio: image.aspect_ratio,
                order,
                caption: image.caption.clone(),
                metadata: image.metadata.clone(),
                created_at: image.created_at,
            };
            state.images.push(created.clone());
            created
        })
    }

    fn remove_gallery_image(
        &self,
        gallery_id: GalleryId,
        image_id: ImageId,
    ) -> RepositoryResult<usize> {
        self.write(|state| {
            let before = state.images.len();
            state
                .images
                .retain(|i| !(i.id == image_id && i.gallery_id == gallery_id));
            before - state.images.len()
        })
    }

    fn set_gallery_cover(
        &self,
        gallery_id: GalleryId,
        image_id: Option<ImageId>,
    ) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for gallery in state.galleries.iter_mut().filter(|g| g.id == gallery_id) {
                gallery.cover_image_id = image_id;
                affected += 1;
            }
            affected
        })
    }

    fn reorder_gallery_images(
        &self,
        gallery_id: GalleryId,
        orders: &[(ImageId, SortOrder)],
    ) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for (id, order) in orders {
                for image in state
                    .images
                    .iter_mut()
                    .filter(|i| i.id == *id && i.gallery_id == gallery_id)
                {
                    image.order = *order;
                    affected += 1;
                }
            }
            affected
        })
    }
}

impl EquipmentReader for TestRepository {
    fn list_equipment(&self, query: EquipmentListQuery) -> RepositoryResult<Vec<EquipmentItem>> {
        let mut items = self.equipment();
        if let Some(kind) = query.kind {
            items.retain(|e| e.kind == kind);
        }
        if query.active_only {
            items.retain(|e| e.is_active);
        }
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    fn get_equipment_by_id(&self, id: EquipmentId) -> RepositoryResult<Option<EquipmentItem>> {
        Ok(self.equipment().into_iter().find(|e| e.id == id))
    }
}

impl EquipmentWriter for TestRepository {
    fn create_equipment(&self, item: &NewEquipment) -> RepositoryResult<EquipmentItem> {
        self.write(|state| {
            let created = EquipmentItem {
                id: EquipmentId::new(state.next_id()).unwrap(),
                name: item.name.clone(),
                brand: item.brand.clone(),
                model: item.model.clone(),
                kind: item.kind,
                specs: item.specs.clone(),
                notes: item.notes.clone(),
                date_acquired: item.date_acquired,
                is_active: item.is_active,
                created_at: item.created_at,
                updated_at: item.updated_at,
            };
            state.equipment.push(created.clone());
            created
        })
    }

    fn update_equipment(
        &self,
        id: EquipmentId,
        update: &EquipmentUpdate,
    ) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for item in state.equipment.iter_mut().filter(|e| e.id == id) {
                item.name = update.name.clone();
                item.brand = update.brand.clone();
                item.model = update.model.clone();
                item.kind = update.kind;
                item.specs = update.specs.clone();
                item.notes = update.notes.clone();
                item.date_acquired = update.date_acquired;
                item.is_active = update.is_active;
                item.updated_at = Utc::now().naive_utc();
                affected += 1;
            }
            affected
        })
    }

    fn set_equipment_active(&self, id: EquipmentId, is_active: bool) -> RepositoryResult<usize> {
        self.write(|state| {
            let mut affected = 0;
            for item in state.equipment.iter_mut().filter(|e| e.id == id) {
                item.is_active = is_active;
                affected += 1;
            }
            affected
        })
    }

    fn delete_equipment(&self, id: EquipmentId) -> RepositoryResult<usize> {
        self.write(|state| {
            let before = state.equipment.len();
            state.equipment.retain(|e| e.id != id);
            before - state.equipment.len()
        })
    }
}
