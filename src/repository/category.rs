use chrono::Utc;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::category::{Category, CategoryLevel, NewCategory};
use crate::domain::tree::next_order;
use crate::domain::types::{CategoryId, CategoryKind, CategoryName, SortOrder};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(bucket) = query.bucket {
            items = items.filter(categories::bucket.eq(bucket.as_str()));
        }

        let items = items
            .order((categories::sort_order.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let created = conn.transaction(|conn| {
            let siblings = match category.level {
                CategoryLevel::Primary => categories::table
                    .select(categories::sort_order)
                    .filter(categories::kind.eq(CategoryKind::Primary.as_str()))
                    .filter(categories::bucket.eq(category.bucket.as_str()))
                    .into_boxed::<diesel::sqlite::Sqlite>(),
                CategoryLevel::Secondary { parent_id } => categories::table
                    .select(categories::sort_order)
                    .filter(categories::kind.eq(CategoryKind::Secondary.as_str()))
                    .filter(categories::parent_id.eq(parent_id.get()))
                    .into_boxed::<diesel::sqlite::Sqlite>(),
            };

            let orders = siblings
                .load::<i32>(conn)?
                .into_iter()
                .map(SortOrder::new)
                .collect::<Result<Vec<_>, _>>()?;

            let created = diesel::insert_into(categories::table)
                .values(DbNewCategory::at_order(category, next_order(orders)))
                .get_result::<DbCategory>(conn)?;
            Ok::<_, RepositoryError>(created)
        })?;

        let created: Category = created.try_into()?;
        Ok(created)
    }

    fn rename_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set((
                categories::name.eq(name.as_str()),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn reorder_categories(&self, orders: &[(CategoryId, SortOrder)]) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let affected = conn.transaction(|conn| {
            let mut affected = 0;
            for (id, order) in orders {
                affected += diesel::update(categories::table.filter(categories::id.eq(id.get())))
                    .set((
                        categories::sort_order.eq(order.get()),
                        categories::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(affected)
        })?;

        Ok(affected)
    }
}
