use chrono::Utc;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::gallery::{Gallery, GalleryImage, GalleryUpdate, NewGallery, NewGalleryImage};
use crate::domain::tree::next_order;
use crate::domain::types::{GalleryId, GallerySlug, ImageId, SortOrder};
use crate::models::gallery::{
    Gallery as DbGallery, GalleryChanges, GalleryImage as DbGalleryImage,
    NewGallery as DbNewGallery, NewGalleryImage as DbNewGalleryImage,
};
use crate::repository::{DieselRepository, GalleryListQuery, GalleryReader, GalleryWriter};

impl GalleryReader for DieselRepository {
    fn list_galleries(&self, query: GalleryListQuery) -> RepositoryResult<(usize, Vec<Gallery>)> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = galleries::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(bucket) = query.bucket {
                items = items.filter(galleries::bucket.eq(bucket.as_str()));
            }
            if query.published_only {
                items = items.filter(galleries::is_published.eq(true));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order((galleries::gallery_date.desc(), galleries::id.desc()))
            .load::<DbGallery>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Gallery>, _>>()?;

        Ok((total, items))
    }

    fn get_gallery_by_id(&self, id: GalleryId) -> RepositoryResult<Option<Gallery>> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let gallery = galleries::table
            .filter(galleries::id.eq(id.get()))
            .first::<DbGallery>(&mut conn)
            .optional()?;

        let gallery = gallery.map(TryInto::try_into).transpose()?;
        Ok(gallery)
    }

    fn get_gallery_by_slug(&self, slug: &GallerySlug) -> RepositoryResult<Option<Gallery>> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let gallery = galleries::table
            .filter(galleries::slug.eq(slug.as_str()))
            .first::<DbGallery>(&mut conn)
            .optional()?;

        let gallery = gallery.map(TryInto::try_into).transpose()?;
        Ok(gallery)
    }

    fn slug_exists(&self, slug: &GallerySlug) -> RepositoryResult<bool> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            galleries::table.filter(galleries::slug.eq(slug.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn list_gallery_images(&self, gallery_id: GalleryId) -> RepositoryResult<Vec<GalleryImage>> {
        use crate::schema::gallery_images;

        let mut conn = self.conn()?;

        let images = gallery_images::table
            .filter(gallery_images::gallery_id.eq(gallery_id.get()))
            .order((gallery_images::sort_order.asc(), gallery_images::id.asc()))
            .load::<DbGalleryImage>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<GalleryImage>, _>>()?;

        Ok(images)
    }
}

impl GalleryWriter for DieselRepository {
    fn create_gallery(&self, gallery: &NewGallery) -> RepositoryResult<Gallery> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(galleries::table)
            .values(DbNewGallery::try_from(gallery)?)
            .get_result::<DbGallery>(&mut conn)?;

        let created: Gallery = created.try_into()?;
        Ok(created)
    }

    fn update_gallery(&self, id: GalleryId, update: &GalleryUpdate) -> RepositoryResult<usize> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let changes = GalleryChanges::new(update, Utc::now().naive_utc())?;
        let affected = diesel::update(galleries::table.filter(galleries::id.eq(id.get())))
            .set(changes)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_gallery(&self, id: GalleryId) -> RepositoryResult<usize> {
        use crate::schema::{galleries, gallery_images};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(gallery_images::table.filter(gallery_images::gallery_id.eq(id.get())))
                .execute(conn)?;

            diesel::delete(galleries::table.filter(galleries::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }

    fn add_gallery_image(&self, image: &NewGalleryImage) -> RepositoryResult<GalleryImage> {
        use crate::schema::gallery_images;

        let mut conn = self.conn()?;

        let created = conn.transaction(|conn| {
            let orders = gallery_images::table
                .filter(gallery_images::gallery_id.eq(image.gallery_id.get()))
                .select(gallery_images::sort_order)
                .load::<i32>(conn)?
                .into_iter()
                .map(SortOrder::new)
                .collect::<Result<Vec<_>, _>>()?;

            let created = diesel::insert_into(gallery_images::table)
                .values(DbNewGalleryImage::at_order(image, next_order(orders)))
                .get_result::<DbGalleryImage>(conn)?;
            Ok::<_, RepositoryError>(created)
        })?;

        let created: GalleryImage = created.try_into()?;
        Ok(created)
    }

    fn remove_gallery_image(
        &self,
        gallery_id: GalleryId,
        image_id: ImageId,
    ) -> RepositoryResult<usize> {
        use crate::schema::gallery_images;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            gallery_images::table
                .filter(gallery_images::id.eq(image_id.get()))
                .filter(gallery_images::gallery_id.eq(gallery_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_gallery_cover(
        &self,
        gallery_id: GalleryId,
        image_id: Option<ImageId>,
    ) -> RepositoryResult<usize> {
        use crate::schema::galleries;

        let mut conn = self.conn()?;

        let affected = diesel::update(galleries::table.filter(galleries::id.eq(gallery_id.get())))
            .set((
                galleries::cover_image_id.eq(image_id.map(|id| id.get())),
                galleries::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn reorder_gallery_images(
        &self,
        gallery_id: GalleryId,
        orders: &[(ImageId, SortOrder)],
    ) -> RepositoryResult<usize> {
        use crate::schema::gallery_images;

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            let mut affected = 0;
            for (id, order) in orders {
                affected += diesel::update(
                    gallery_images::table
                        .filter(gallery_images::id.eq(id.get()))
                        .filter(gallery_images::gallery_id.eq(gallery_id.get())),
                )
                .set(gallery_images::sort_order.eq(order.get()))
                .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(affected)
        })?;

        Ok(affected)
    }
}
