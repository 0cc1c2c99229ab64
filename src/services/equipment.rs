use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::EquipmentId;
use crate::dto::equipment::EquipmentInventoryDto;
use crate::forms::equipment::{DeleteEquipmentFormPayload, EquipmentFormPayload};
use crate::repository::{EquipmentListQuery, EquipmentReader, EquipmentWriter};

use super::{ServiceError, ServiceResult};

fn load_item<R>(id: EquipmentId, repo: &R) -> ServiceResult<EquipmentItem>
where
    R: EquipmentReader,
{
    match repo.get_equipment_by_id(id) {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get equipment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Inventory grouped by equipment type for the admin page.
pub fn show_equipment<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<EquipmentInventoryDto>
where
    R: EquipmentReader,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.list_equipment(EquipmentListQuery::default()) {
        Ok(items) => Ok(EquipmentInventoryDto::from(items.as_slice())),
        Err(e) => {
            log::error!("Failed to list equipment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_equipment<R>(
    payload: EquipmentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: EquipmentWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.create_equipment(&payload.into_new_equipment()) {
        Ok(created) => {
            log::info!("Added {} {} '{}'", created.kind, created.id, created.name);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create equipment: {e}");
            Ok(false)
        }
    }
}

/// Replaces every editable field of an item.
pub fn update_equipment<R>(
    equipment_id: EquipmentId,
    payload: EquipmentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: EquipmentReader + EquipmentWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    load_item(equipment_id, repo)?;

    match repo.update_equipment(equipment_id, &payload.into_update()) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update equipment: {e}");
            Ok(false)
        }
    }
}

/// Flips an item between active and retired.
pub fn toggle_equipment<R>(
    equipment_id: EquipmentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: EquipmentReader + EquipmentWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let item = load_item(equipment_id, repo)?;

    match repo.set_equipment_active(equipment_id, !item.is_active) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update equipment status: {e}");
            Ok(false)
        }
    }
}

pub fn delete_equipment<R>(
    payload: DeleteEquipmentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: EquipmentReader + EquipmentWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let item = load_item(payload.equipment_id, repo)?;

    match repo.delete_equipment(payload.equipment_id) {
        Ok(_) => {
            log::info!("Deleted {} {} '{}'", item.kind, item.id, item.name);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete equipment: {e}");
            Ok(false)
        }
    }
}
