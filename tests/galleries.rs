use chrono::{NaiveDate, Utc};
use pushkind_folio::domain::gallery::{
    GalleryNavigation, GalleryUpdate, Gear, ImageMetadata, NewGallery, NewGalleryImage,
};
use pushkind_folio::domain::types::{
    AspectRatio, Bucket, GalleryId, GallerySlug, GalleryTitle, SortOrder,
};
use pushkind_folio::repository::{
    DieselRepository, GalleryListQuery, GalleryReader, GalleryWriter,
};

mod common;

fn new_gallery(slug: &str, date: (i32, u32, u32), published: bool) -> NewGallery {
    let now = Utc::now().naive_utc();
    NewGallery {
        slug: GallerySlug::new(slug).expect("valid slug"),
        title: GalleryTitle::new(slug).expect("valid title"),
        description: String::new(),
        location: "Reykjavík".to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        is_published: published,
        navigation: GalleryNavigation {
            bucket: Bucket::Travel,
            primary_category_id: None,
            secondary_category_id: None,
        },
        gear: Gear::from_lists("Nikon Z8", "24-70mm", ""),
        created_at: now,
        updated_at: now,
    }
}

fn new_image(gallery_id: GalleryId, name: &str) -> NewGalleryImage {
    NewGalleryImage {
        gallery_id,
        storage_key: format!("galleries/iceland/{name}.jpg"),
        aspect_ratio: AspectRatio::new(1.5).unwrap(),
        caption: None,
        metadata: ImageMetadata {
            camera: Some("Nikon Z8".to_string()),
            ..ImageMetadata::default()
        },
        created_at: Utc::now().naive_utc(),
    }
}

#[test]
fn gallery_round_trips_gear_and_slug() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_gallery(&new_gallery("iceland", (2023, 7, 14), true))
        .expect("should create gallery");
    let slug = GallerySlug::new("iceland").unwrap();

    assert!(repo.slug_exists(&slug).unwrap());
    assert!(!repo.slug_exists(&GallerySlug::new("norway").unwrap()).unwrap());

    let loaded = repo.get_gallery_by_slug(&slug).unwrap().expect("gallery");
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.gear.cameras, vec!["Nikon Z8"]);
    assert_eq!(loaded.navigation.bucket, Bucket::Travel);
}

#[test]
fn duplicate_slug_is_rejected_by_storage() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_gallery(&new_gallery("iceland", (2023, 7, 14), true))
        .unwrap();
    assert!(
        repo.create_gallery(&new_gallery("iceland", (2024, 1, 1), true))
            .is_err()
    );
}

#[test]
fn listing_is_newest_first_and_filters_drafts() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    repo.create_gallery(&new_gallery("older", (2021, 5, 1), true))
        .unwrap();
    repo.create_gallery(&new_gallery("newer", (2024, 2, 1), true))
        .unwrap();
    repo.create_gallery(&new_gallery("draft", (2025, 1, 1), false))
        .unwrap();

    let (total, all) = repo.list_galleries(GalleryListQuery::default()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(all[0].slug, "draft");

    let (total, published) = repo
        .list_galleries(GalleryListQuery::default().published().paginate(1, 1))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].slug, "newer");

    let (total, _) = repo
        .list_galleries(GalleryListQuery::default().bucket(Bucket::Aerial))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn images_append_and_reorder_within_gallery() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let gallery = repo
        .create_gallery(&new_gallery("iceland", (2023, 7, 14), true))
        .unwrap();

    let first = repo.add_gallery_image(&new_image(gallery.id, "a")).unwrap();
    let second = repo.add_gallery_image(&new_image(gallery.id, "b")).unwrap();
    assert_eq!((first.order.get(), second.order.get()), (0, 1));
    assert_eq!(second.metadata.camera.as_deref(), Some("Nikon Z8"));

    repo.reorder_gallery_images(
        gallery.id,
        &[
            (second.id, SortOrder::new(0).unwrap()),
            (first.id, SortOrder::new(1).unwrap()),
        ],
    )
    .unwrap();

    let ids: Vec<_> = repo
        .list_gallery_images(gallery.id)
        .unwrap()
        .into_iter()
        .map(|image| image.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn update_keeps_slug_and_delete_removes_images() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let gallery = repo
        .create_gallery(&new_gallery("iceland", (2023, 7, 14), true))
        .unwrap();
    let image = repo.add_gallery_image(&new_image(gallery.id, "a")).unwrap();
    repo.set_gallery_cover(gallery.id, Some(image.id)).unwrap();

    let update = GalleryUpdate {
        title: GalleryTitle::new("Iceland Highlands").unwrap(),
        description: "Ring road".to_string(),
        location: gallery.location.clone(),
        date: gallery.date,
        is_published: false,
        navigation: gallery.navigation,
        gear: Gear::default(),
    };
    assert_eq!(repo.update_gallery(gallery.id, &update).unwrap(), 1);

    let loaded = repo.get_gallery_by_id(gallery.id).unwrap().unwrap();
    assert_eq!(loaded.slug, "iceland");
    assert_eq!(loaded.title.as_str(), "Iceland Highlands");
    assert!(!loaded.is_published);
    assert_eq!(loaded.cover_image_id, Some(image.id));

    assert_eq!(repo.remove_gallery_image(gallery.id, image.id).unwrap(), 1);
    repo.add_gallery_image(&new_image(gallery.id, "b")).unwrap();
    assert_eq!(repo.delete_gallery(gallery.id).unwrap(), 1);
    assert!(repo.get_gallery_by_id(gallery.id).unwrap().is_none());
    assert!(repo.list_gallery_images(gallery.id).unwrap().is_empty());
}
