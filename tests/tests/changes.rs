use tests::{prelude::*, Fixture, RecordingListener};

use peakascent::RowChange;
use peakascent_core::driver::Operation;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn one_notification_per_session() {
    let mut f = Fixture::project();

    f.db.begin_changing_data();
    assert!(f.db.currently_accepting_changes());

    f.db.add_record(&Country {
        name: "Switzerland".into(),
        ..Country::default()
    })
    .unwrap();
    f.db.add_record(&Hiker {
        name: "Dana".into(),
        ..Hiker::default()
    })
    .unwrap();
    f.db.add_record(&Country {
        name: "Italy".into(),
        ..Country::default()
    })
    .unwrap();
    f.db.add_record(&Range {
        name: "Pyrenees".into(),
        continent: 2,
        ..Range::default()
    })
    .unwrap();

    // Nothing is announced before the session ends
    assert!(f.listener.notifications().is_empty());
    f.db.finish_changing_data();
    assert!(!f.db.currently_accepting_changes());

    let changes = f.listener.single();
    let added = |index| RowChange {
        index: BufferRowIndex::new(index),
        added: true,
    };

    assert_eq!(changes.rows_for(countries::TABLE), [added(2), added(3)]);
    assert_eq!(changes.rows_for(hikers::TABLE), [added(3)]);
    assert_eq!(changes.rows_for(ranges::TABLE), [added(1)]);
    assert_eq!(changes.rows_added_or_removed.len(), 3);
    assert_eq!(
        changes.changed_columns,
        BTreeSet::from([
            countries::ID,
            countries::NAME,
            hikers::ID,
            hikers::NAME,
            ranges::ID,
            ranges::NAME,
            ranges::CONTINENT,
        ])
    );
}

#[test]
fn every_listener_hears_each_session_once() {
    let mut f = Fixture::project();
    let second = RecordingListener::new();
    let second_id = f.db.register_listener(Arc::new(second.clone()));
    let zugspitze = f.ids.zugspitze();

    f.db.change_data(|db| db.update_cell(peaks::TABLE, zugspitze, peaks::HEIGHT, 2963i64))
        .unwrap();
    assert_eq!(f.listener.notifications().len(), 1);
    assert_eq!(second.notifications().len(), 1);

    assert!(f.db.unregister_listener(second_id));
    assert!(!f.db.unregister_listener(second_id));

    f.db.change_data(|db| db.update_cell(peaks::TABLE, zugspitze, peaks::HEIGHT, 2962i64))
        .unwrap();
    assert_eq!(f.listener.notifications().len(), 2);
    assert_eq!(second.notifications().len(), 1);
}

#[test]
fn sessions_without_changes_stay_silent() {
    let mut f = Fixture::project();

    f.db.begin_changing_data();
    f.db.finish_changing_data();

    assert!(f.listener.notifications().is_empty());
}

#[test]
#[should_panic(expected = "inside a change session")]
fn mutations_need_a_session() {
    let mut f = Fixture::project();
    let _ = f.db.update_cell(peaks::TABLE, f.ids.zugspitze(), peaks::HEIGHT, 1i64);
}

#[test]
#[should_panic(expected = "already open")]
fn sessions_do_not_nest() {
    let mut f = Fixture::project();
    f.db.begin_changing_data();
    f.db.begin_changing_data();
}

#[test]
fn failed_session_still_reports_what_happened() {
    let mut f = Fixture::project();

    let err = f
        .db
        .change_data(|db| {
            db.add_record(&Hiker {
                name: "Dana".into(),
                ..Hiker::default()
            })?;
            // Hikers need a name
            db.add_row(hikers::TABLE, vec![])
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "column `Hikers.name` requires a value");
    assert!(!f.db.currently_accepting_changes());
    assert_eq!(f.listener.single().rows_for(hikers::TABLE).len(), 1);
}

#[test]
fn bulk_edit_marks_columns_only() {
    let mut f = Fixture::project();
    let table = f.db.normal(peaks::TABLE);
    let indices = [f.ids.zugspitze(), f.ids.nebelhorn()]
        .map(|key| table.get_buffer_index_for_primary_key(key).unwrap());

    f.db.change_data(|db| db.update_rows(peaks::TABLE, &indices, vec![(peaks::VOLCANO, true.into())]))
        .unwrap();

    let changes = f.listener.single();
    assert_eq!(changes.changed_columns, BTreeSet::from([peaks::VOLCANO]));
    assert!(changes.rows_added_or_removed.is_empty());
    assert!(changes.affects(peaks::TABLE, &BTreeSet::from([peaks::VOLCANO])));
    assert_eq!(f.log.count(|op| matches!(op, Operation::Update(_))), 1);

    f.db.init_buffers(|_| {}).unwrap();
    let volcanoes = f
        .db
        .normal(peaks::TABLE)
        .pair_id_with(peaks::VOLCANO)
        .into_iter()
        .filter(|(_, volcano)| *volcano == Value::Bool(true))
        .map(|(key, _)| key)
        .collect::<Vec<_>>();
    assert_eq!(volcanoes, [f.ids.zugspitze(), f.ids.nebelhorn()]);
}

#[test]
fn rejected_writes_change_nothing() {
    let mut f = Fixture::project();
    let zugspitze = f.ids.zugspitze();

    f.db.begin_changing_data();

    let err = f
        .db
        .update_cell(peaks::TABLE, zugspitze, peaks::HEIGHT, "very high")
        .unwrap_err();
    assert_eq!(err.to_string(), "writing `Peaks.height`: cannot convert String value to Integer");

    let err = f
        .db
        .update_cell(peaks::TABLE, zugspitze, peaks::ID, ValidItemId::new(50))
        .unwrap_err();
    assert_eq!(err.to_string(), "primary key `Peaks.peakID` cannot be written");

    let err = f
        .db
        .update_cell(peaks::TABLE, ValidItemId::new(50), peaks::NAME, "Nowhere")
        .unwrap_err();
    assert!(err.is_record_not_found());

    let err = f
        .db
        .update_cell(peaks::TABLE, zugspitze, peaks::NAME, Value::Null)
        .unwrap_err();
    assert_eq!(err.to_string(), "column `Peaks.name` does not accept NULL");

    f.db.finish_changing_data();

    assert!(f.log.is_empty());
    assert!(f.listener.notifications().is_empty());
}
