use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::EquipmentId;
use crate::forms::equipment::{
    DeleteEquipmentForm, DeleteEquipmentFormPayload, EquipmentForm, EquipmentFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::equipment::{
    add_equipment as add_equipment_service, delete_equipment as delete_equipment_service,
    show_equipment as show_equipment_service, toggle_equipment as toggle_equipment_service,
    update_equipment as update_equipment_service,
};
use crate::services::{ServiceError, with_form};

const EQUIPMENT_PAGE: &str = "/admin/equipment";

fn finish_mutation(
    result: Result<bool, ServiceError>,
    success: &str,
    failure: &str,
    action: &str,
) -> HttpResponse {
    match result {
        Ok(true) => FlashMessage::success(success).send(),
        Ok(false) => FlashMessage::error(failure).send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Equipment not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(EQUIPMENT_PAGE)
}

#[get("/admin/equipment")]
pub async fn show_equipment(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_equipment_service(&user, repo.get_ref()) {
        Ok(inventory) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "equipment",
                &server_config.auth_service_url,
            );
            context.insert("inventory", &inventory);
            render_template(&tera, "equipment/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render equipment page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/equipment")]
pub async fn add_equipment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EquipmentForm>,
) -> impl Responder {
    finish_mutation(
        with_form(form, |payload: EquipmentFormPayload| {
            add_equipment_service(payload, &user, repo.get_ref())
        }),
        "Equipment added.",
        "Failed to add equipment.",
        "add equipment",
    )
}

#[post("/admin/equipment/{equipment_id}/update")]
pub async fn update_equipment(
    equipment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EquipmentForm>,
) -> impl Responder {
    let result = EquipmentId::new(equipment_id.into_inner())
        .map_err(|_| ServiceError::NotFound)
        .and_then(|id| {
            with_form(form, |payload: EquipmentFormPayload| {
                update_equipment_service(id, payload, &user, repo.get_ref())
            })
        });

    finish_mutation(
        result,
        "Equipment updated.",
        "Failed to update equipment.",
        "update equipment",
    )
}

#[post("/admin/equipment/{equipment_id}/toggle")]
pub async fn toggle_equipment(
    equipment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let result = EquipmentId::new(equipment_id.into_inner())
        .map_err(|_| ServiceError::NotFound)
        .and_then(|id| toggle_equipment_service(id, &user, repo.get_ref()));

    finish_mutation(
        result,
        "Equipment status updated.",
        "Failed to update equipment status.",
        "toggle equipment",
    )
}

#[post("/admin/equipment/{equipment_id}/delete")]
pub async fn delete_equipment(
    equipment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(mut form): web::Form<DeleteEquipmentForm>,
) -> impl Responder {
    form.equipment_id = equipment_id.into_inner();

    finish_mutation(
        with_form(form, |payload: DeleteEquipmentFormPayload| {
            delete_equipment_service(payload, &user, repo.get_ref())
        }),
        "Equipment deleted.",
        "Failed to delete equipment.",
        "delete equipment",
    )
}
