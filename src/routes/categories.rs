use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::types::Bucket;
use crate::feed::CategoryFeed;
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, DeleteCategoryForm, DeleteCategoryFormPayload,
    RenameCategoryForm, RenameCategoryFormPayload, ReorderCategoriesForm,
    ReorderCategoriesFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, with_form};
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    rename_category as rename_category_service, reorder_categories as reorder_categories_service,
    show_categories as show_categories_service,
};

const CATEGORIES_PAGE: &str = "/admin/categories";

/// Flashes the outcome of a category mutation and redirects back to the list.
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
        Err(ServiceError::NotFound) => FlashMessage::error("Category not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(CATEGORIES_PAGE)
}

#[get("/admin/categories")]
pub async fn show_categories(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(&user, repo.get_ref()) {
        Ok(tree) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "categories",
                &server_config.auth_service_url,
            );
            context.insert("primaries", &tree.primaries());
            context.insert("tree", &tree);
            context.insert(
                "buckets",
                &Bucket::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>(),
            );
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    feed: web::Data<CategoryFeed>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    finish_mutation(
        with_form(form, |payload: AddCategoryFormPayload| {
            add_category_service(payload, &user, repo.get_ref(), feed.get_ref())
        }),
        "Category added.",
        "Failed to add category.",
        "add category",
    )
}

#[post("/admin/categories/{category_id}/rename")]
pub async fn rename_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    feed: web::Data<CategoryFeed>,
    web::Form(mut form): web::Form<RenameCategoryForm>,
) -> impl Responder {
    form.category_id = category_id.into_inner();
    finish_mutation(
        with_form(form, |payload: RenameCategoryFormPayload| {
            rename_category_service(payload, &user, repo.get_ref(), feed.get_ref())
        }),
        "Category renamed.",
        "Failed to rename category.",
        "rename category",
    )
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    feed: web::Data<CategoryFeed>,
    web::Form(mut form): web::Form<DeleteCategoryForm>,
) -> impl Responder {
    form.category_id = category_id.into_inner();
    finish_mutation(
        with_form(form, |payload: DeleteCategoryFormPayload| {
            delete_category_service(payload, &user, repo.get_ref(), feed.get_ref())
        }),
        "Category deleted.",
        "Failed to delete category.",
        "delete category",
    )
}

/// Drag-end fallback for browsers without scripting.
#[post("/admin/categories/reorder")]
pub async fn reorder_categories(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    feed: web::Data<CategoryFeed>,
    web::Form(form): web::Form<ReorderCategoriesForm>,
) -> impl Responder {
    finish_mutation(
        with_form(form, |payload: ReorderCategoriesFormPayload| {
            reorder_categories_service(payload, &user, repo.get_ref(), feed.get_ref())
        }),
        "Order saved.",
        "Failed to save order.",
        "reorder categories",
    )
}
