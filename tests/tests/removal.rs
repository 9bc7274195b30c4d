use tests::{prelude::*, Fixture};

use peakascent::RowChange;
use peakascent_core::driver::Operation;
use pretty_assertions::assert_eq;

fn removed(index: usize) -> RowChange {
    RowChange {
        index: BufferRowIndex::new(index),
        added: false,
    }
}

#[test]
fn remove_one_row() {
    let mut f = Fixture::project();
    let nebelhorn = f.ids.nebelhorn();

    f.db.change_data(|db| db.remove_row(peaks::TABLE, nebelhorn))
        .unwrap();

    let check = |db: &Database| {
        let table = db.normal(peaks::TABLE);
        assert!(table.get_buffer_index_for_primary_key(nebelhorn).is_none());
        assert_eq!(table.row_count(), 3);
        assert_eq!(db.normal(regions::TABLE).row_count(), 3);
    };

    check(&f.db);

    let changes = f.listener.single();
    assert_eq!(changes.rows_for(peaks::TABLE), [removed(1)]);
    assert_eq!(changes.rows_added_or_removed.len(), 1);
    assert_eq!(f.log.count(|op| matches!(op, Operation::Delete(_))), 1);

    f.db.init_buffers(|_| {}).unwrap();
    check(&f.db);
}

#[test]
fn remove_row_does_not_cascade() {
    let mut f = Fixture::project();
    let zugspitze = f.ids.zugspitze();

    // Ascents still point at the peak, so the store refuses
    assert!(f
        .db
        .change_data(|db| db.remove_row(peaks::TABLE, zugspitze))
        .is_err());

    assert!(f
        .db
        .normal(peaks::TABLE)
        .get_buffer_index_for_primary_key(zugspitze)
        .is_some());
    let table = f.db.normal(ascents::TABLE);
    assert_eq!(table.find_rows(ascents::PEAK_ID, &Value::Id(zugspitze)).len(), 2);
    assert!(f.listener.notifications().is_empty());
}

#[test]
fn remove_matching_rows_by_reference() {
    let mut f = Fixture::project();
    let a1 = f.ids.a1();

    let count = f
        .db
        .change_data(|db| db.remove_matching_rows(photos::ASCENT_ID, a1))
        .unwrap();
    assert_eq!(count, 2);

    let check = |db: &Database| {
        assert_eq!(db.normal(photos::TABLE).row_count(), 1);
        assert!(db
            .table(photos::TABLE)
            .find_rows(photos::ASCENT_ID, &Value::Id(a1))
            .is_empty());
        assert!(db
            .normal(ascents::TABLE)
            .get_buffer_index_for_primary_key(a1)
            .is_some());
    };

    check(&f.db);

    // Highest index first
    let changes = f.listener.single();
    assert_eq!(changes.rows_for(photos::TABLE), [removed(1), removed(0)]);
    assert!(changes.rows_for(ascents::TABLE).is_empty());

    f.db.init_buffers(|_| {}).unwrap();
    check(&f.db);
}

#[test]
fn remove_matching_rows_checks_the_value_type() {
    let mut f = Fixture::project();
    let a1 = f.ids.a1();

    f.db.begin_changing_data();

    // The store would match these loosely
    let err = f
        .db
        .remove_matching_rows(peaks::HEIGHT, "2224")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "writing `Peaks.height`: cannot convert String value to Integer"
    );
    assert!(f
        .db
        .remove_matching_rows(photos::ASCENT_ID, a1.get())
        .is_err());
    assert!(f.db.remove_matching_rows(peaks::VOLCANO, 0i64).is_err());

    f.db.finish_changing_data();

    assert!(f.log.is_empty());
    assert!(f.listener.notifications().is_empty());

    f.db.init_buffers(|_| {}).unwrap();
    assert_eq!(f.db.normal(peaks::TABLE).row_count(), 4);
    assert_eq!(f.db.normal(photos::TABLE).row_count(), 3);
}

#[test]
fn remove_matching_pairs() {
    let mut f = Fixture::project();
    let ben = f.ids.ben();

    let count = f
        .db
        .change_data(|db| db.remove_matching_pairs(participated::HIKER_ID, ben))
        .unwrap();
    assert_eq!(count, 2);

    let check = |db: &Database, f: &Fixture| {
        let participated = db.associative(participated::TABLE);
        assert_eq!(participated.row_count(), 2);
        assert_eq!(participated.get_number_of_matching_rows(participated::HIKER_ID, ben), 0);
        assert_eq!(
            participated.get_matching_entries(participated::ASCENT_ID, f.ids.a1()),
            BTreeSet::from([f.ids.anna()])
        );
        assert_eq!(db.normal(hikers::TABLE).row_count(), 3);
        assert_eq!(db.normal(ascents::TABLE).row_count(), 4);
    };

    check(&f.db, &f);

    let changes = f.listener.single();
    assert_eq!(changes.rows_for(participated::TABLE), [removed(2), removed(1)]);
    assert!(changes.rows_for(hikers::TABLE).is_empty());

    f.db.init_buffers(|_| {}).unwrap();
    check(&f.db, &f);
}
