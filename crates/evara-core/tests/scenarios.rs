//! End-to-end planner scenarios against the in-memory and libSQL stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use evara_core::assistant::respond;
use evara_core::models::{
    ChecklistDraft, EventDraft, GuestDraft, GuestPatch, RecordDefaults, VendorDraft,
};
use evara_core::store::FailureMode;
use evara_core::views::{
    apply_filter, group_by_category, partition_events, service_type_facets, split_by_filter,
    CompletionFilter, GuestStats, RsvpFilter,
};
use evara_core::{
    ChecklistItem, Event, Guest, LibSqlStore, ListSync, LoadOutcome, MemoryStore, RecordStore,
    SyncPhase, Vendor, WriteOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn doc(value: Value) -> evara_core::Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn guest_draft(name: &str) -> GuestDraft {
    GuestDraft {
        guest_name: name.to_string(),
        ..GuestDraft::default()
    }
}

#[tokio::test]
async fn plus_one_flag_tracks_name_on_every_write() {
    let store = Arc::new(MemoryStore::new());
    let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
    guests.load().await;

    let created = guests
        .create(GuestDraft {
            plus_one_name: Some(String::new()),
            ..guest_draft("Alex")
        })
        .unwrap();
    let id = created.id().clone();
    assert!(!guests.get(&id).unwrap().has_plus_one);
    assert_eq!(created.settle().await, WriteOutcome::Persisted);

    let updated = guests
        .update(
            &id,
            GuestPatch {
                plus_one_name: Some("Sam".to_string()),
                ..GuestPatch::default()
            },
        )
        .unwrap();
    let guest = guests.get(&id).unwrap();
    assert!(guest.has_plus_one);
    assert_eq!(guest.plus_one_name.as_deref(), Some("Sam"));
    assert_eq!(updated.settle().await, WriteOutcome::Persisted);

    let stored = store.documents("guestlist");
    assert_eq!(stored[0].get("hasPlusOne"), Some(&json!(true)));
}

#[tokio::test]
async fn events_load_sorted_and_partition_around_now() {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        "weddingevents",
        vec![
            doc(json!({"_id": "a", "eventTitle": "Reception", "eventDateTime": "2099-01-01T10:00"})),
            doc(json!({"_id": "b", "eventTitle": "Engagement", "eventDateTime": "2000-01-01T10:00"})),
        ],
    );
    let events: ListSync<Event, _> = ListSync::new(Arc::clone(&store));
    assert_eq!(events.load().await, LoadOutcome::Loaded(2));

    let items = events.items();
    let order: Vec<&str> = items.iter().map(|event| event.id.as_str()).collect();
    assert_eq!(order, vec!["b", "a"]);

    let now: DateTime<Utc> = "2026-10-19T12:00:00Z".parse().unwrap();
    let partition = partition_events(&items, now);
    assert_eq!(partition.upcoming.len(), 1);
    assert_eq!(partition.upcoming[0].id.as_str(), "a");
    assert_eq!(partition.past.len(), 1);
    assert_eq!(partition.past[0].id.as_str(), "b");
}

#[tokio::test]
async fn created_event_is_placed_by_date_with_default_image() {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        "weddingevents",
        vec![
            doc(json!({"_id": "early", "eventDateTime": "2000-01-01T10:00"})),
            doc(json!({"_id": "late", "eventDateTime": "2099-01-01T10:00"})),
        ],
    );
    let defaults = RecordDefaults {
        vendor_image: None,
        event_image: Some("https://img.example.com/event.png".to_string()),
    };
    let events: ListSync<Event, _> = ListSync::with_defaults(Arc::clone(&store), defaults);
    events.load().await;

    let pending = events
        .create(EventDraft {
            event_title: "Rehearsal".to_string(),
            event_date_time: "2050-06-01T18:00".to_string(),
            ..EventDraft::default()
        })
        .unwrap();
    let items = events.items();
    let titles: Vec<Option<&str>> = items.iter().map(|e| e.event_title.as_deref()).collect();
    assert_eq!(titles, vec![None, Some("Rehearsal"), None]);
    assert_eq!(
        items[1].event_image.as_deref(),
        Some("https://img.example.com/event.png")
    );
    assert_eq!(pending.settle().await, WriteOutcome::Persisted);
}

#[tokio::test]
async fn failed_create_is_visible_then_gone() {
    let store = Arc::new(MemoryStore::new());
    let vendors: ListSync<Vendor, _> = ListSync::new(Arc::clone(&store));
    vendors.load().await;
    store.set_failure_mode(FailureMode::RejectWrites);

    let pending = vendors
        .create(VendorDraft {
            vendor_name: "Bloom & Co".to_string(),
            service_type: "Florist".to_string(),
            ..VendorDraft::default()
        })
        .unwrap();
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors.phase(), SyncPhase::Mutating);

    assert_eq!(pending.settle().await, WriteOutcome::Reverted);
    assert!(vendors.is_empty());
    assert_eq!(vendors.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn reconciliation_is_idempotent_when_writes_succeed() {
    let store = Arc::new(MemoryStore::new());
    let tasks: ListSync<ChecklistItem, _> = ListSync::new(Arc::clone(&store));
    tasks.load().await;

    let mut pending = Vec::new();
    for (name, category) in [("Book venue", "Venue"), ("Taste cakes", "Food"), ("Pick DJ", "")] {
        pending.push(
            tasks
                .create(ChecklistDraft {
                    task_name: name.to_string(),
                    category: Some(category.to_string()),
                    ..ChecklistDraft::default()
                })
                .unwrap(),
        );
    }
    for write in pending {
        assert_eq!(write.settle().await, WriteOutcome::Persisted);
    }
    let first = tasks.items()[2].id.clone();
    assert_eq!(
        tasks.toggle_complete(&first).unwrap().settle().await,
        WriteOutcome::Persisted
    );

    let optimistic = tasks.items();
    tasks.load().await;
    let mut reloaded = tasks.items();
    // The store lists in insertion order; the optimistic list is newest first
    reloaded.reverse();
    assert_eq!(reloaded, optimistic);

    let done = apply_filter(&optimistic, &CompletionFilter::Completed);
    assert_eq!(done.len(), 1);
    assert!(done[0].is_completed());
    assert_eq!(done[0].status().label(), "Completed");

    let groups = group_by_category(&optimistic);
    let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
    assert_eq!(names, vec!["General", "Food", "Venue"]);
}

#[tokio::test]
async fn toggling_twice_restores_pending_everywhere() {
    let store = Arc::new(MemoryStore::new());
    let tasks: ListSync<ChecklistItem, _> = ListSync::new(Arc::clone(&store));
    tasks.load().await;
    let created = tasks
        .create(ChecklistDraft {
            task_name: "Send invites".to_string(),
            ..ChecklistDraft::default()
        })
        .unwrap();
    let id = created.id().clone();
    created.settle().await;

    tasks.toggle_complete(&id).unwrap().settle().await;
    tasks.toggle_complete(&id).unwrap().settle().await;

    let item = tasks.get(&id).unwrap();
    assert!(!item.is_completed());
    let stored = &store.documents("weddingchecklist")[0];
    assert_eq!(stored.get("isCompleted"), Some(&json!(false)));
    assert_eq!(stored.get("status"), Some(&json!("Pending")));
}

#[tokio::test]
async fn guest_views_over_synced_list() {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        "guestlist",
        vec![
            doc(json!({"_id": "1", "guestName": "Alex", "rsvpStatus": "Confirmed", "hasPlusOne": true, "plusOneName": "Sam"})),
            doc(json!({"_id": "2", "guestName": "Blair", "rsvpStatus": "declined"})),
            doc(json!({"_id": "3", "guestName": "Casey"})),
        ],
    );
    let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
    guests.load().await;
    let items = guests.items();

    let stats = GuestStats::tally(&items);
    assert_eq!((stats.total, stats.confirmed, stats.declined), (3, 1, 1));
    assert_eq!(stats.plus_ones, 1);

    let filter: RsvpFilter = "DECLINED".parse().unwrap();
    let (declined, others) = split_by_filter(&items, &filter);
    assert_eq!(declined.len() + others.len(), items.len());
    assert_eq!(declined[0].name(), "Blair");
}

#[tokio::test]
async fn vendor_facets_follow_first_seen_order() {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        "vendordirectory",
        vec![
            doc(json!({"_id": "1", "vendorName": "Lens", "serviceType": "Photography"})),
            doc(json!({"_id": "2", "vendorName": "Feast", "serviceType": "Catering"})),
            doc(json!({"_id": "3", "vendorName": "Snap", "serviceType": "Photography"})),
        ],
    );
    let vendors: ListSync<Vendor, _> = ListSync::new(Arc::clone(&store));
    vendors.load().await;
    assert_eq!(
        service_type_facets(&vendors.items()),
        vec!["Photography", "Catering"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn libsql_store_backs_a_synchronizer() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        LibSqlStore::open_path(dir.path().join("planner.db"), None)
            .await
            .unwrap(),
    );
    let guests: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
    guests.load().await;

    let alex = guests.create(guest_draft("Alex")).unwrap();
    let blair = guests.create(guest_draft("Blair")).unwrap();
    let alex_id = alex.id().clone();
    assert_eq!(alex.settle().await, WriteOutcome::Persisted);
    assert_eq!(blair.settle().await, WriteOutcome::Persisted);
    assert_eq!(guests.delete(&alex_id).unwrap().settle().await, WriteOutcome::Persisted);

    let fresh: ListSync<Guest, _> = ListSync::new(Arc::clone(&store));
    assert_eq!(fresh.load().await, LoadOutcome::Loaded(1));
    let remaining = fresh.items();
    assert_eq!(remaining[0].name(), "Blair");
    assert!(remaining[0].created_date.is_some());
    assert_eq!(store.list_all("guestlist").await.unwrap().len(), 1);
}

#[test]
fn venue_question_gets_venue_guidance() {
    assert_eq!(
        respond("What venue should I pick?"),
        "Choosing the perfect venue:\n\nConsider these factors:\n• Guest capacity\n• Location accessibility\n• Indoor/outdoor options\n• Available dates\n• Included amenities\n• Backup plans for weather\n\nVenue types:\n• Ballrooms - Classic, climate-controlled\n• Gardens - Natural beauty, seasonal\n• Barns - Rustic charm, flexible\n• Beaches - Romantic, weather-dependent\n• Historic sites - Unique character\n\nWhat type of atmosphere are you envisioning?"
    );
}
