use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;
use serde_json::json;

use crate::blob::LocalBlobStore;
use crate::domain::types::Bucket;
use crate::feed::{CategoryFeed, NavigationCache};
use crate::forms::categories::{ReorderCategoriesForm, ReorderCategoriesFormPayload};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, with_form};
use crate::services::categories::{list_categories, reorder_categories};
use crate::services::galleries::{
    GalleryListParams, get_published_gallery, list_published_galleries,
};

#[derive(Deserialize, Debug)]
struct ApiV1CategoriesQueryParams {
    bucket: Option<String>,
}

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/categories")]
pub async fn api_v1_categories(
    params: web::Query<ApiV1CategoriesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let bucket = match params.bucket.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(raw) => match Bucket::try_from(raw) {
            Ok(bucket) => Some(bucket),
            Err(e) => return HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
        },
        None => None,
    };

    match list_categories(bucket, &user, repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(err, "list categories"),
    }
}

/// Drag-end event. Responds with the full category list after the write.
#[post("/v1/categories/reorder")]
pub async fn api_v1_categories_reorder(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    feed: web::Data<CategoryFeed>,
    web::Json(form): web::Json<ReorderCategoriesForm>,
) -> impl Responder {
    let result = with_form(form, |payload: ReorderCategoriesFormPayload| {
        reorder_categories(payload, &user, repo.get_ref(), feed.get_ref())
    });

    match result {
        Ok(true) => match list_categories(None, &user, repo.get_ref()) {
            Ok(categories) => HttpResponse::Ok().json(categories),
            Err(err) => error_response(err, "list categories"),
        },
        Ok(false) => HttpResponse::ServiceUnavailable()
            .json(json!({ "error": "Failed to save order." })),
        Err(err) => error_response(err, "reorder categories"),
    }
}

#[get("/v1/navigation")]
pub async fn api_v1_navigation(navigation: web::Data<NavigationCache>) -> impl Responder {
    HttpResponse::Ok().json(navigation.current())
}

#[get("/v1/galleries")]
pub async fn api_v1_galleries(
    params: web::Query<GalleryListParams>,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
) -> impl Responder {
    match list_published_galleries(params.into_inner(), repo.get_ref(), blobs.get_ref()) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(err) => error_response(err, "list galleries"),
    }
}

#[get("/v1/galleries/{slug}")]
pub async fn api_v1_gallery(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
    blobs: web::Data<LocalBlobStore>,
) -> impl Responder {
    match get_published_gallery(&slug, repo.get_ref(), blobs.get_ref()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => error_response(err, "get gallery"),
    }
}
