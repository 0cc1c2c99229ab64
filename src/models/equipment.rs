use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::equipment::{
    EquipmentItem as DomainEquipmentItem, EquipmentUpdate as DomainEquipmentUpdate,
    NewEquipment as DomainNewEquipment, Specs,
};
use crate::domain::types::{EquipmentKind, EquipmentName, TypeConstraintError};

fn encode_specs(specs: &Specs) -> Result<String, TypeConstraintError> {
    serde_json::to_string(specs)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("specs: {e}")))
}

fn decode_specs(value: &str) -> Result<Specs, TypeConstraintError> {
    serde_json::from_str(value)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("specs: {e}")))
}

/// Diesel model representing the `equipment` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::equipment)]
pub struct EquipmentItem {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub kind: String,
    pub specs: String,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`EquipmentItem`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::equipment)]
pub struct NewEquipment {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub kind: String,
    pub specs: String,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full replacement of the editable columns; a cleared date is written as NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::equipment, treat_none_as_null = true)]
pub struct EquipmentChanges {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub kind: String,
    pub specs: String,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<EquipmentItem> for DomainEquipmentItem {
    type Error = TypeConstraintError;

    fn try_from(item: EquipmentItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            name: EquipmentName::new(item.name)?,
            brand: item.brand,
            model: item.model,
            kind: EquipmentKind::try_from(item.kind)?,
            specs: decode_specs(&item.specs)?,
            notes: item.notes,
            date_acquired: item.date_acquired,
            is_active: item.is_active,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl TryFrom<&DomainNewEquipment> for NewEquipment {
    type Error = TypeConstraintError;

    fn try_from(item: &DomainNewEquipment) -> Result<Self, Self::Error> {
        Ok(Self {
            name: item.name.as_str().to_string(),
            brand: item.brand.clone(),
            model: item.model.clone(),
            kind: item.kind.as_str().to_string(),
            specs: encode_specs(&item.specs)?,
            notes: item.notes.clone(),
            date_acquired: item.date_acquired,
            is_active: item.is_active,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl EquipmentChanges {
    pub fn new(
        update: &DomainEquipmentUpdate,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            name: update.name.as_str().to_string(),
            brand: update.brand.clone(),
            model: update.model.clone(),
            kind: update.kind.as_str().to_string(),
            specs: encode_specs(&update.specs)?,
            notes: update.notes.clone(),
            date_acquired: update.date_acquired,
            is_active: update.is_active,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn row(kind: &str, specs: &str) -> EquipmentItem {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        EquipmentItem {
            id: 1,
            name: "Travel zoom".into(),
            brand: "Fujifilm".into(),
            model: "XF 16-80mm".into(),
            kind: kind.into(),
            specs: specs.into(),
            notes: String::new(),
            date_acquired: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_into_domain_item() {
        let item: DomainEquipmentItem = row("lens", r#"{"mount":"X"}"#).try_into().unwrap();
        assert_eq!(item.kind, EquipmentKind::Lens);
        assert_eq!(item.specs.get("mount"), Some("X"));
        assert_eq!(item.label(), "Fujifilm XF 16-80mm");
    }

    #[test]
    fn unknown_kind_or_bad_specs_are_rejected() {
        let unknown: Result<DomainEquipmentItem, _> = row("tripod", "{}").try_into();
        assert!(unknown.is_err());
        let broken: Result<DomainEquipmentItem, _> = row("lens", "[1, 2]").try_into();
        assert!(matches!(broken, Err(TypeConstraintError::InvalidValue(_))));
    }
}
