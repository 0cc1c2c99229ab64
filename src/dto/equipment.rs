use serde::Serialize;

use crate::domain::equipment::{EquipmentItem, group_by_kind};
use crate::domain::types::EquipmentKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentDto {
    pub id: i32,
    pub name: String,
    pub label: String,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Specs as editable `key: value` lines.
    pub specs: String,
    pub notes: String,
    pub date_acquired: Option<String>,
    pub is_active: bool,
}

impl From<&EquipmentItem> for EquipmentDto {
    fn from(value: &EquipmentItem) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            label: value.label(),
            brand: value.brand.clone(),
            model: value.model.clone(),
            kind: value.kind.as_str(),
            specs: value.specs.to_lines(),
            notes: value.notes.clone(),
            date_acquired: value.date_acquired.map(|d| d.format("%Y-%m-%d").to_string()),
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentGroupDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub items: Vec<EquipmentDto>,
    pub active: usize,
}

/// Admin view of the inventory, one group per equipment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentInventoryDto {
    pub groups: Vec<EquipmentGroupDto>,
    pub kinds: Vec<&'static str>,
}

impl From<&[EquipmentItem]> for EquipmentInventoryDto {
    fn from(items: &[EquipmentItem]) -> Self {
        let groups = group_by_kind(items)
            .into_iter()
            .map(|(kind, items)| EquipmentGroupDto {
                kind: kind.as_str(),
                active: items.iter().filter(|i| i.is_active).count(),
                items: items.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self {
            groups,
            kinds: EquipmentKind::ALL.iter().map(|k| k.as_str()).collect(),
        }
    }
}
