use std::sync::Arc;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use pushkind_common::db::establish_connection_pool;
use pushkind_common::models::config::CommonServerConfig;
use tera::Tera;

use pushkind_folio::blob::LocalBlobStore;
use pushkind_folio::feed::{CategoryFeed, NavigationCache, spawn_navigation_sync};
use pushkind_folio::models::config::ServerConfig;
use pushkind_folio::repository::{CategoryListQuery, CategoryReader, DieselRepository};
use pushkind_folio::routes::api::{
    api_v1_categories, api_v1_categories_reorder, api_v1_gallery, api_v1_galleries,
    api_v1_navigation,
};
use pushkind_folio::routes::categories::{
    add_category, delete_category, rename_category, reorder_categories, show_categories,
};
use pushkind_folio::routes::equipment::{
    add_equipment, delete_equipment, show_equipment, toggle_equipment, update_equipment,
};
use pushkind_folio::routes::galleries::{
    check_slug, create_gallery, delete_gallery, new_gallery, remove_image, reorder_images,
    set_cover, show_galleries, show_gallery, update_gallery, upload_image,
};
use pushkind_folio::routes::main::{index, not_assigned};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if server_config.secret.len() < 64 {
        log::error!("Secret must be at least 64 bytes long");
        std::process::exit(1);
    }
    let secret_key = Key::from(server_config.secret.as_bytes());

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&format!("{}/**/*", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let categories = match repo.list_categories(CategoryListQuery::default()) {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to load categories: {e}");
            std::process::exit(1);
        }
    };
    let feed = CategoryFeed::new(server_config.feed_capacity);
    let navigation = Arc::new(NavigationCache::new(&categories));
    spawn_navigation_sync(&feed, navigation.clone());

    let blobs = LocalBlobStore::new(&server_config.upload_dir, "/media");
    if let Err(e) = std::fs::create_dir_all(blobs.root()) {
        log::error!("Failed to create upload directory: {e}");
        std::process::exit(1);
    }

    let common_config = CommonServerConfig {
        auth_service_url: server_config.auth_service_url.clone(),
        secret: server_config.secret.clone(),
    };

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting server at {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        App::new()
            .wrap(message_framework)
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/media", blobs.root()))
            .service(
                web::scope("/api")
                    .service(api_v1_categories)
                    .service(api_v1_categories_reorder)
                    .service(api_v1_navigation)
                    .service(api_v1_galleries)
                    .service(api_v1_gallery),
            )
            .service(index)
            .service(not_assigned)
            .service(show_categories)
            .service(add_category)
            .service(reorder_categories)
            .service(rename_category)
            .service(delete_category)
            .service(show_equipment)
            .service(add_equipment)
            .service(update_equipment)
            .service(toggle_equipment)
            .service(delete_equipment)
            .service(show_galleries)
            .service(new_gallery)
            .service(check_slug)
            .service(create_gallery)
            .service(show_gallery)
            .service(update_gallery)
            .service(delete_gallery)
            .service(upload_image)
            .service(remove_image)
            .service(set_cover)
            .service(reorder_images)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(feed.clone()))
            .app_data(web::Data::from(navigation.clone()))
            .app_data(web::Data::new(blobs.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
