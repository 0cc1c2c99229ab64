use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use pushkind_folio::domain::equipment::{EquipmentUpdate, NewEquipment, Specs};
use pushkind_folio::domain::types::{EquipmentKind, EquipmentName};
use pushkind_folio::repository::{
    DieselRepository, EquipmentListQuery, EquipmentReader, EquipmentWriter,
};
use pushkind_folio::schema::equipment;

mod common;

fn new_item(name: &str, kind: EquipmentKind) -> NewEquipment {
    let now = Utc::now().naive_utc();
    NewEquipment {
        name: EquipmentName::new(name).expect("valid equipment name"),
        brand: "Fujifilm".into(),
        model: String::new(),
        kind,
        specs: Specs::parse("mount: X").expect("valid specs"),
        notes: String::new(),
        date_acquired: NaiveDate::from_ymd_opt(2023, 5, 2),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn names(repo: &DieselRepository, query: EquipmentListQuery) -> Vec<String> {
    repo.list_equipment(query)
        .expect("should list equipment")
        .into_iter()
        .map(|item| item.name.into_inner())
        .collect()
}

#[test]
fn created_items_round_trip_with_specs() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_equipment(&new_item("Main body", EquipmentKind::Camera))
        .expect("should create equipment");
    let loaded = repo
        .get_equipment_by_id(created.id)
        .expect("should load equipment")
        .expect("item exists");

    assert_eq!(loaded, created);
    assert_eq!(loaded.specs.get("mount"), Some("X"));
    assert_eq!(loaded.date_acquired, NaiveDate::from_ymd_opt(2023, 5, 2));
}

#[test]
fn listing_filters_by_kind_and_status() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_equipment(&new_item("Wide prime", EquipmentKind::Lens))
        .unwrap();
    let zoom = repo
        .create_equipment(&new_item("Tele zoom", EquipmentKind::Lens))
        .unwrap();
    repo.create_equipment(&new_item("Body", EquipmentKind::Camera))
        .unwrap();
    repo.set_equipment_active(zoom.id, false).unwrap();

    assert_eq!(
        names(&repo, EquipmentListQuery::default()),
        vec!["Body", "Tele zoom", "Wide prime"]
    );
    assert_eq!(
        names(&repo, EquipmentListQuery::default().kind(EquipmentKind::Lens)),
        vec!["Tele zoom", "Wide prime"]
    );
    assert_eq!(
        names(
            &repo,
            EquipmentListQuery::default()
                .kind(EquipmentKind::Lens)
                .active()
        ),
        vec!["Wide prime"]
    );
}

#[test]
fn update_clears_date_and_delete_removes() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let created = repo
        .create_equipment(&new_item("Mini", EquipmentKind::Drone))
        .unwrap();

    let update = EquipmentUpdate {
        name: EquipmentName::new("Mini 4 Pro").unwrap(),
        brand: "DJI".into(),
        model: "Mini 4 Pro".into(),
        kind: EquipmentKind::Drone,
        specs: Specs::default(),
        notes: "Spare props in the bag".into(),
        date_acquired: None,
        is_active: true,
    };
    assert_eq!(repo.update_equipment(created.id, &update).unwrap(), 1);

    let loaded = repo.get_equipment_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.label(), "DJI Mini 4 Pro");
    assert_eq!(loaded.date_acquired, None);
    assert!(loaded.specs.is_empty());

    assert_eq!(repo.delete_equipment(created.id).unwrap(), 1);
    assert!(repo.get_equipment_by_id(created.id).unwrap().is_none());
    assert_eq!(repo.delete_equipment(created.id).unwrap(), 0);
}

#[test]
fn unknown_kind_is_rejected_by_the_table() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("connection");

    let result = diesel::insert_into(equipment::table)
        .values((equipment::name.eq("Legs"), equipment::kind.eq("tripod")))
        .execute(&mut conn);
    assert!(result.is_err());
}
