use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::{Context, Tera};

use crate::blob::LocalBlobStore;
use crate::domain::types::Bucket;
use crate::forms::galleries::{
    CheckSlugQuery, GalleryForm, GalleryFormPayload, ImageForm, ImageFormPayload,
    ReorderImagesForm, ReorderImagesFormPayload, UploadImageForm,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::categories::show_categories as show_categories_service;
use crate::services::galleries::{
    GalleryListParams, check_slug as check_slug_service, create_gallery as create_gallery_service,
    delete_gallery as delete_gallery_service, remove_image as remove_image_service,
    reorder_images as reorder_images_service, set_cover as set_cover_service,
    show_galleries as show_galleries_service, show_gallery as show_gallery_service,
    update_gallery as update_gallery_service, upload_image as upload_image_service,
};

const GALLERIES_PAGE: &str = "/admin/galleries";

fn gallery_page(gallery_id: i32) -> String {
    format!("{GALLERIES_PAGE}/{gallery_id}")
}

/// Flashes the outcome of a gallery mutation and redirects to `redirect_to`.
fn finish_mutation(
    result: Result<bool, ServiceError>,
    success: &str,
    failure: &str,
    redirect_to: &str,
) -> HttpResponse {
    match result {
        Ok(true) => FlashMessage::success(success).send(),
        Ok(false) => FlashMessage::error(failure).send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Gallery or image not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }

    redirect(redirect_to)
}

/// Adds the category tree used by the navigation selects of the edit form.
fn insert_categories(
    context: &mut Context,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
) -> Result<(), ServiceError> {
    let tree = show_categories_service(user, repo)?;
    context.insert("tree", &tree);
    context.insert(
        "buckets",
        &Bucket::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>(),
    );
    Ok(())
}

#[get("/admin/galleries")]
pub async fn show_galleries(
    params: web::Query<GalleryListParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_galleries_service(params.into_inner(), &user, repo.get_ref(), blobs.get_ref()) {
        Ok(list) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "galleries",
                &server_config.auth_service_url,
            );
            context.insert("galleries", &list.galleries);
            context.insert("total", &list.total);
            context.insert("page", &list.page);
            render_template(&tera, "galleries/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render galleries page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/galleries/new")]
pub async fn new_gallery(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        &user,
        "galleries",
        &server_config.auth_service_url,
    );

    match insert_categories(&mut context, &user, repo.get_ref()) {
        Ok(()) => render_template(&tera, "galleries/edit.html", &context),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render new gallery page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/galleries/check-slug")]
pub async fn check_slug(
    params: web::Query<CheckSlugQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match check_slug_service(&params.slug, &user, repo.get_ref()) {
        Ok(availability) => HttpResponse::Ok().json(availability),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::TypeConstraint(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to check slug: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/galleries")]
pub async fn create_gallery(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<GalleryForm>,
) -> impl Responder {
    let payload: GalleryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("{GALLERIES_PAGE}/new"));
        }
    };

    match create_gallery_service(payload, &user, repo.get_ref()) {
        Ok(Some(gallery_id)) => {
            FlashMessage::success("Gallery created.").send();
            redirect(&gallery_page(gallery_id.get()))
        }
        Ok(None) => {
            FlashMessage::error("Failed to create gallery.").send();
            redirect(&format!("{GALLERIES_PAGE}/new"))
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Internal) => HttpResponse::InternalServerError().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("{GALLERIES_PAGE}/new"))
        }
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            redirect(&format!("{GALLERIES_PAGE}/new"))
        }
    }
}

#[get("/admin/galleries/{gallery_id}")]
pub async fn show_gallery(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let gallery_id = match gallery_id.into_inner().try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let detail = match show_gallery_service(gallery_id, &user, repo.get_ref(), blobs.get_ref()) {
        Ok(detail) => detail,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => return HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render gallery page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "galleries",
        &server_config.auth_service_url,
    );
    context.insert("gallery", &detail.gallery);
    context.insert("images", &detail.images);

    match insert_categories(&mut context, &user, repo.get_ref()) {
        Ok(()) => render_template(&tera, "galleries/edit.html", &context),
        Err(err) => {
            log::error!("Failed to render gallery page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/galleries/{gallery_id}")]
pub async fn update_gallery(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<GalleryForm>,
) -> impl Responder {
    let raw_id = gallery_id.into_inner();
    let redirect_to = gallery_page(raw_id);

    let payload: GalleryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&redirect_to);
        }
    };
    let gallery_id = match raw_id.try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    finish_mutation(
        update_gallery_service(gallery_id, payload, &user, repo.get_ref()),
        "Gallery saved.",
        "Failed to save gallery.",
        &redirect_to,
    )
}

#[post("/admin/galleries/{gallery_id}/delete")]
pub async fn delete_gallery(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
) -> impl Responder {
    let gallery_id = match gallery_id.into_inner().try_into() {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    finish_mutation(
        delete_gallery_service(gallery_id, &user, repo.get_ref(), blobs.get_ref()),
        "Gallery deleted.",
        "Failed to delete gallery.",
        GALLERIES_PAGE,
    )
}

#[post("/admin/galleries/{gallery_id}/images")]
pub async fn upload_image(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let raw_id = gallery_id.into_inner();
    let redirect_to = gallery_page(raw_id);

    let (file, payload) = match form.into_parts(raw_id) {
        Ok(parts) => parts,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&redirect_to);
        }
    };

    finish_mutation(
        upload_image_service(
            payload,
            file.file.path(),
            &user,
            repo.get_ref(),
            blobs.get_ref(),
        ),
        "Image uploaded.",
        "Failed to upload image.",
        &redirect_to,
    )
}

#[post("/admin/galleries/{gallery_id}/images/remove")]
pub async fn remove_image(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
    web::Form(form): web::Form<ImageForm>,
) -> impl Responder {
    let raw_id = gallery_id.into_inner();
    let redirect_to = gallery_page(raw_id);

    let payload = match ImageFormPayload::parse(raw_id, form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&redirect_to);
        }
    };

    finish_mutation(
        remove_image_service(payload, &user, repo.get_ref(), blobs.get_ref()),
        "Image removed.",
        "Failed to remove image.",
        &redirect_to,
    )
}

#[post("/admin/galleries/{gallery_id}/cover")]
pub async fn set_cover(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ImageForm>,
) -> impl Responder {
    let raw_id = gallery_id.into_inner();
    let redirect_to = gallery_page(raw_id);

    let payload = match ImageFormPayload::parse(raw_id, form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&redirect_to);
        }
    };

    finish_mutation(
        set_cover_service(payload, &user, repo.get_ref()),
        "Cover updated.",
        "Failed to update cover.",
        &redirect_to,
    )
}

#[post("/admin/galleries/{gallery_id}/images/reorder")]
pub async fn reorder_images(
    gallery_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ReorderImagesForm>,
) -> impl Responder {
    let raw_id = gallery_id.into_inner();
    let redirect_to = gallery_page(raw_id);

    let payload = match ReorderImagesFormPayload::parse(raw_id, form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&redirect_to);
        }
    };

    finish_mutation(
        reorder_images_service(payload, &user, repo.get_ref()),
        "Order saved.",
        "Failed to save order.",
        &redirect_to,
    )
}
