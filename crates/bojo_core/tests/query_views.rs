use bojo_core::db::open_db_in_memory;
use bojo_core::query::views::filter_marker;
use bojo_core::{
    recent, resolve_display_number, upcoming, DisplayList, ItemState, ItemStore, Marker, NewItem,
    RangeError, Signifier, SqliteItemStore,
};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const NOW: i64 = 1_750_000_000_000;

#[test]
fn upcoming_excludes_unscheduled_past_and_completed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    store.create(&NewItem::new("A")).unwrap();
    store
        .create(&NewItem::new("B").with_schedule(Some(NOW - DAY_MS)))
        .unwrap();
    let c = store
        .create(&NewItem::new("C").with_schedule(Some(NOW + DAY_MS)))
        .unwrap();

    let shown = upcoming(&store.list_all().unwrap(), NOW);
    assert_eq!(shown, vec![c.clone()]);

    store.set_state(c.id, ItemState::Complete).unwrap();
    assert!(upcoming(&store.list_all().unwrap(), NOW).is_empty());
}

#[test]
fn upcoming_includes_now_and_sorts_by_time_then_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let later = store
        .create(&NewItem::new("later").with_schedule(Some(NOW + 2 * DAY_MS)))
        .unwrap();
    let tie_a = store
        .create(&NewItem::new("tie a").with_schedule(Some(NOW + DAY_MS)))
        .unwrap();
    let at_now = store
        .create(&NewItem::new("at now").with_schedule(Some(NOW)))
        .unwrap();
    let tie_b = store
        .create(&NewItem::new("tie b").with_schedule(Some(NOW + DAY_MS)))
        .unwrap();

    let ids: Vec<i64> = upcoming(&store.list_all().unwrap(), NOW)
        .iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![at_now.id, tie_a.id, tie_b.id, later.id]);
}

#[test]
fn upcoming_keeps_non_complete_states() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    store
        .create(
            &NewItem::new("dinner")
                .with_state(ItemState::Event)
                .with_schedule(Some(NOW + 1)),
        )
        .unwrap();
    store
        .create(
            &NewItem::new("skipped")
                .with_state(ItemState::Irrelevant)
                .with_schedule(Some(NOW + 2)),
        )
        .unwrap();

    assert_eq!(upcoming(&store.list_all().unwrap(), NOW).len(), 2);
}

#[test]
fn recent_returns_last_n_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    let first = store.create(&NewItem::new("first")).unwrap();
    let second = store.create(&NewItem::new("second")).unwrap();
    let third = store.create(&NewItem::new("third")).unwrap();
    let items = store.list_all().unwrap();

    let shown = recent(&items, 2);
    assert_eq!(shown, vec![second.clone(), third.clone()]);

    let list = DisplayList::flat("Recent items", shown);
    assert_eq!(resolve_display_number(&list.item_ids(), 1), Ok(second.id));
    assert_eq!(list.resolve(2), Ok(third.id));
    assert_eq!(
        list.resolve(3),
        Err(RangeError {
            requested: 3,
            len: 2
        })
    );

    assert_eq!(recent(&items, 10), vec![first, second, third]);
    assert!(recent(&items, 0).is_empty());
}

#[test]
fn recent_on_empty_store_is_empty() {
    assert!(recent(&[], 5).is_empty());
}

#[test]
fn filter_marker_selects_by_axis() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteItemStore::try_new(&conn).unwrap();

    store
        .create(&NewItem::new("note").with_state(ItemState::Note))
        .unwrap();
    store
        .create(&NewItem::new("urgent").with_signifier(Some(Signifier::Priority)))
        .unwrap();
    let items = store.list_all().unwrap();

    assert_eq!(
        filter_marker(&items, Marker::State(ItemState::Note))[0].description,
        "note"
    );
    assert_eq!(
        filter_marker(&items, Marker::Signifier(Signifier::Priority))[0].description,
        "urgent"
    );
    assert_eq!(filter_marker(&items, Marker::Clear).len(), 2);
}
