use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::equipment::{EquipmentUpdate, NewEquipment, Specs};
use crate::domain::types::{EquipmentId, EquipmentKind, EquipmentName, TypeConstraintError};
use crate::forms::galleries::checkbox;

#[derive(Deserialize, Validate)]
pub struct EquipmentForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    /// `camera`, `lens`, `filter` or `drone`.
    pub kind: String,
    /// `key: value` lines.
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub notes: String,
    /// `YYYY-MM-DD`; blank means unknown.
    #[serde(default)]
    pub date_acquired: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentFormPayload {
    pub name: EquipmentName,
    pub brand: String,
    pub model: String,
    pub kind: EquipmentKind,
    pub specs: Specs,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
}

impl EquipmentFormPayload {
    pub fn into_new_equipment(self) -> NewEquipment {
        let now = Utc::now().naive_utc();
        NewEquipment {
            name: self.name,
            brand: self.brand,
            model: self.model,
            kind: self.kind,
            specs: self.specs,
            notes: self.notes,
            date_acquired: self.date_acquired,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> EquipmentUpdate {
        EquipmentUpdate {
            name: self.name,
            brand: self.brand,
            model: self.model,
            kind: self.kind,
            specs: self.specs,
            notes: self.notes,
            date_acquired: self.date_acquired,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Error)]
pub enum EquipmentFormError {
    #[error("Equipment form validation failed: {0}")]
    Validation(String),
    #[error("Equipment form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Deletion was not confirmed")]
    NotConfirmed,
}

impl From<ValidationErrors> for EquipmentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for EquipmentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, TypeConstraintError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| TypeConstraintError::InvalidValue(format!("date_acquired: {raw}"))),
    }
}

impl TryFrom<EquipmentForm> for EquipmentFormPayload {
    type Error = EquipmentFormError;

    fn try_from(value: EquipmentForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: EquipmentName::new(value.name)?,
            brand: value.brand.trim().to_string(),
            model: value.model.trim().to_string(),
            kind: EquipmentKind::try_from(value.kind)?,
            specs: Specs::parse(&value.specs)?,
            notes: value.notes.trim().to_string(),
            date_acquired: optional_date(value.date_acquired.as_deref())?,
            is_active: checkbox(value.is_active.as_deref()),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteEquipmentForm {
    /// Filled from the URL path.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub equipment_id: i32,
    #[serde(default)]
    pub confirm: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteEquipmentFormPayload {
    pub equipment_id: EquipmentId,
}

impl TryFrom<DeleteEquipmentForm> for DeleteEquipmentFormPayload {
    type Error = EquipmentFormError;

    fn try_from(value: DeleteEquipmentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        if !checkbox(value.confirm.as_deref()) {
            return Err(EquipmentFormError::NotConfirmed);
        }
        Ok(Self {
            equipment_id: EquipmentId::new(value.equipment_id)?,
        })
    }
}
