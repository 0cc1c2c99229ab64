use chrono::Utc;
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::equipment::{EquipmentItem, EquipmentUpdate, NewEquipment};
use crate::domain::types::EquipmentId;
use crate::models::equipment::{
    EquipmentChanges, EquipmentItem as DbEquipmentItem, NewEquipment as DbNewEquipment,
};
use crate::repository::{DieselRepository, EquipmentListQuery, EquipmentReader, EquipmentWriter};

impl EquipmentReader for DieselRepository {
    fn list_equipment(&self, query: EquipmentListQuery) -> RepositoryResult<Vec<EquipmentItem>> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let mut items = equipment::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(kind) = query.kind {
            items = items.filter(equipment::kind.eq(kind.as_str()));
        }
        if query.active_only {
            items = items.filter(equipment::is_active.eq(true));
        }

        let items = items
            .order((equipment::name.asc(), equipment::id.asc()))
            .load::<DbEquipmentItem>(&mut conn)?;

        let items = items
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<EquipmentItem>, _>>()?;
        Ok(items)
    }

    fn get_equipment_by_id(&self, id: EquipmentId) -> RepositoryResult<Option<EquipmentItem>> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let item = equipment::table
            .filter(equipment::id.eq(id.get()))
            .first::<DbEquipmentItem>(&mut conn)
            .optional()?;

        let item = item.map(TryInto::try_into).transpose()?;
        Ok(item)
    }
}

impl EquipmentWriter for DieselRepository {
    fn create_equipment(&self, item: &NewEquipment) -> RepositoryResult<EquipmentItem> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(equipment::table)
            .values(DbNewEquipment::try_from(item)?)
            .get_result::<DbEquipmentItem>(&mut conn)?;

        let created: EquipmentItem = created.try_into()?;
        Ok(created)
    }

    fn update_equipment(
        &self,
        id: EquipmentId,
        update: &EquipmentUpdate,
    ) -> RepositoryResult<usize> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let changes = EquipmentChanges::new(update, Utc::now().naive_utc())?;
        let affected = diesel::update(equipment::table.filter(equipment::id.eq(id.get())))
            .set(changes)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_equipment_active(&self, id: EquipmentId, is_active: bool) -> RepositoryResult<usize> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let affected = diesel::update(equipment::table.filter(equipment::id.eq(id.get())))
            .set((
                equipment::is_active.eq(is_active),
                equipment::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_equipment(&self, id: EquipmentId) -> RepositoryResult<usize> {
        use crate::schema::equipment;

        let mut conn = self.conn()?;

        let affected = diesel::delete(equipment::table.filter(equipment::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
