//! Camera bag inventory: bodies, lenses, filters and drones.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EquipmentId, EquipmentKind, EquipmentName, TypeConstraintError};

/// Free-form technical specs such as `mount: X` or `weight: 557 g`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Specs(BTreeMap<String, String>);

impl Specs {
    /// Parses `key: value` lines. Blank lines are skipped and a repeated key
    /// keeps its last value.
    pub fn parse(text: &str) -> Result<Self, TypeConstraintError> {
        let mut specs = BTreeMap::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once(':') else {
                return Err(TypeConstraintError::InvalidValue(format!("spec line: {line}")));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(TypeConstraintError::EmptyString("spec name"));
            }
            specs.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self(specs))
    }

    /// Inverse of [`Specs::parse`], one `key: value` pair per line.
    pub fn to_lines(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentItem {
    pub id: EquipmentId,
    pub name: EquipmentName,
    pub brand: String,
    pub model: String,
    pub kind: EquipmentKind,
    pub specs: Specs,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    /// Retired gear stays in the inventory but is flagged inactive.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl EquipmentItem {
    /// Brand and model joined for display, e.g. `Fujifilm X-T5`.
    pub fn label(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }
}

/// Data required to insert a new [`EquipmentItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEquipment {
    pub name: EquipmentName,
    pub brand: String,
    pub model: String,
    pub kind: EquipmentKind,
    pub specs: Specs,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable fields of an [`EquipmentItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentUpdate {
    pub name: EquipmentName,
    pub brand: String,
    pub model: String,
    pub kind: EquipmentKind,
    pub specs: Specs,
    pub notes: String,
    pub date_acquired: Option<NaiveDate>,
    pub is_active: bool,
}

/// Items grouped per kind in [`EquipmentKind::ALL`] order. Every kind is
/// present, even when empty. Items within a kind are sorted by name.
pub fn group_by_kind(items: &[EquipmentItem]) -> Vec<(EquipmentKind, Vec<&EquipmentItem>)> {
    EquipmentKind::ALL
        .iter()
        .map(|kind| {
            let mut group: Vec<&EquipmentItem> =
                items.iter().filter(|item| item.kind == *kind).collect();
            group.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.id.cmp(&b.id))
            });
            (*kind, group)
        })
        .collect()
}
