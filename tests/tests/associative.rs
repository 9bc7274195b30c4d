use tests::{id, prelude::*, Fixture};

use peakascent_core::driver::Operation;
use pretty_assertions::assert_eq;

#[test]
fn relations_are_symmetric() {
    let f = Fixture::project();
    let participated = f.db.associative(participated::TABLE);

    for ascent in f.db.normal(ascents::TABLE).primary_keys() {
        for hiker in f.db.normal(hikers::TABLE).primary_keys() {
            assert_eq!(
                participated
                    .get_matching_entries(participated::ASCENT_ID, ascent)
                    .contains(&hiker),
                participated
                    .get_matching_entries(participated::HIKER_ID, hiker)
                    .contains(&ascent),
                "ascent {ascent}, hiker {hiker}"
            );
        }
    }

    assert_eq!(
        participated.get_matching_entries(participated::ASCENT_ID, f.ids.a1()),
        BTreeSet::from([f.ids.anna(), f.ids.ben()])
    );
    assert_eq!(participated.get_number_of_matching_rows(participated::HIKER_ID, f.ids.ben()), 2);
    assert_eq!(participated.get_number_of_matching_rows(participated::HIKER_ID, id(99)), 0);
}

#[test]
fn key_column_lookups() {
    let f = Fixture::project();
    let participated = f.db.associative(participated::TABLE);

    assert_eq!(
        participated.key_columns(),
        [participated::ASCENT_ID, participated::HIKER_ID]
    );
    assert_eq!(
        participated.get_other_column(participated::ASCENT_ID),
        participated::HIKER_ID
    );
    assert_eq!(
        participated.get_own_column_referencing(hikers::ID),
        Some(participated::HIKER_ID)
    );
    assert_eq!(participated.get_own_column_referencing(peaks::ID), None);
    assert_eq!(
        participated.traverse_associative_relation(ascents::ID),
        Some(hikers::TABLE)
    );
    assert_eq!(participated.traverse_associative_relation(peaks::ID), None);
}

#[test]
fn duplicate_pairs_are_not_added() {
    let mut f = Fixture::project();

    f.db.begin_changing_data();
    let added = f
        .db
        .add_pair(participated::TABLE, f.ids.a1(), f.ids.anna())
        .unwrap();
    f.db.finish_changing_data();

    assert_eq!(added, None);
    assert!(f.log.is_empty());
    assert!(f.listener.notifications().is_empty());
    assert_eq!(f.db.table(participated::TABLE).row_count(), 4);
}

#[test]
fn adding_and_removing_pairs() {
    let mut f = Fixture::project();
    let (a4, clara) = (f.ids.a4(), f.ids.clara());

    f.db.change_data(|db| {
        assert!(db.add_pair(participated::TABLE, a4, clara)?.is_some());
        assert!(db.remove_pair(participated::TABLE, a4, clara)?);
        assert!(!db.remove_pair(participated::TABLE, a4, clara)?);
        Ok(())
    })
    .unwrap();

    let changes = f.listener.single();
    let rows = changes.rows_for(participated::TABLE);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].added);
    assert!(!rows[1].added);
    assert_eq!(f.db.table(participated::TABLE).row_count(), 4);
}

#[test]
fn replacing_an_ascents_hikers() {
    let mut f = Fixture::project();
    let a1 = f.ids.a1();
    let hikers = BTreeSet::from([f.ids.ben(), f.ids.clara()]);

    f.db.change_data(|db| db.set_ascent_hikers(a1, &hikers)).unwrap();

    let participated = f.db.associative(participated::TABLE);
    assert_eq!(
        participated.get_matching_entries(participated::ASCENT_ID, a1),
        hikers
    );

    // Only Anna went and only Clara came
    assert_eq!(f.log.count(|op| matches!(op, Operation::Delete(_))), 1);
    assert_eq!(f.log.count(|op| matches!(op, Operation::Insert(_))), 1);

    let changes = f.listener.single();
    assert_eq!(changes.rows_for(participated::TABLE).len(), 2);
    assert!(changes
        .changed_columns
        .is_superset(&BTreeSet::from([participated::ASCENT_ID, participated::HIKER_ID])));

    // The store agrees with the buffer
    f.db.init_buffers(|_| {}).unwrap();
    assert_eq!(
        f.db.associative(participated::TABLE)
            .get_matching_entries(participated::ASCENT_ID, a1),
        hikers
    );
}

#[test]
fn clearing_an_ascents_hikers() {
    let mut f = Fixture::project();
    let a1 = f.ids.a1();

    f.db.change_data(|db| db.set_ascent_hikers(a1, &BTreeSet::new()))
        .unwrap();

    let participated = f.db.associative(participated::TABLE);
    assert!(participated
        .get_matching_entries(participated::ASCENT_ID, a1)
        .is_empty());
    assert_eq!(participated.row_count(), 2);
}
