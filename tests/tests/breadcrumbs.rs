use tests::{prelude::*, Fixture};

use peakascent::schema::TableId;
use pretty_assertions::assert_eq;

fn item_tables(db: &Database) -> Vec<TableId> {
    db.schema()
        .normal_tables()
        .filter(|table| !table.meta)
        .map(|table| table.id)
        .collect()
}

fn rows(db: &Database, table: TableId) -> impl Iterator<Item = BufferRowIndex> {
    (0..db.table(table).row_count()).map(BufferRowIndex::new)
}

#[test]
fn same_table_is_identity() {
    let f = Fixture::project();

    for table in item_tables(&f.db) {
        let crumbs = f.db.get_breadcrumbs_for(table, table);
        assert!(crumbs.is_empty());

        for row in rows(&f.db, table) {
            assert_eq!(crumbs.evaluate(&f.db, row), BTreeSet::from([row]));
        }
    }
}

#[test]
fn concatenated_breadcrumbs_match_stepwise_evaluation() {
    let f = Fixture::project();
    let tables = item_tables(&f.db);

    for &a in &tables {
        for &b in &tables {
            for &c in &tables {
                let ab = f.db.get_breadcrumbs_for(a, b);
                let bc = f.db.get_breadcrumbs_for(b, c);
                let joined = ab.clone() + bc.clone();

                for row in rows(&f.db, a) {
                    let stepwise = ab
                        .evaluate(&f.db, row)
                        .into_iter()
                        .flat_map(|middle| bc.evaluate(&f.db, middle))
                        .collect::<BTreeSet<_>>();

                    assert_eq!(joined.evaluate(&f.db, row), stepwise, "{a:?} -> {b:?} -> {c:?}");
                }
            }
        }
    }
}

#[test]
fn forward_chains_reach_at_most_one_row() {
    let f = Fixture::project();
    let tables = item_tables(&f.db);
    let mut forward_chains = 0;

    for &start in &tables {
        for &target in &tables {
            let crumbs = f.db.get_breadcrumbs_for(start, target);
            if !crumbs.is_forward_only() {
                continue;
            }
            forward_chains += 1;

            for row in rows(&f.db, start) {
                let all = crumbs.evaluate(&f.db, row);
                let single = crumbs.evaluate_as_forward_chain(&f.db, row);

                assert!(all.len() <= 1);
                assert_eq!(single, all.first().copied());
            }
        }
    }

    // Ascents -> Peaks -> Regions -> Countries and friends
    assert!(forward_chains > tables.len());
}

#[test]
fn ascent_leads_to_its_country() {
    let f = Fixture::example();

    let start = f
        .db
        .normal(ascents::TABLE)
        .get_buffer_index_for_primary_key(f.ids.a1())
        .unwrap();
    let countries = f.db.related_rows(ascents::TABLE, start, countries::TABLE);

    let keys = countries
        .iter()
        .map(|index| f.db.normal(countries::TABLE).get_primary_key_at(*index))
        .collect::<Vec<_>>();
    assert_eq!(keys, [f.ids.germany()]);

    let crumbs = f.db.get_breadcrumbs_for(ascents::TABLE, countries::TABLE);
    assert!(crumbs.is_forward_only());
    assert_eq!(crumbs.len(), 3);
    assert_eq!(crumbs.evaluate_as_forward_chain(&f.db, start), countries.first().copied());
}

#[test]
fn missing_reference_ends_the_path() {
    let f = Fixture::project();
    let start = f
        .db
        .normal(ascents::TABLE)
        .get_buffer_index_for_primary_key(f.ids.a4())
        .unwrap();

    let crumbs = f.db.get_breadcrumbs_for(ascents::TABLE, countries::TABLE);
    assert!(crumbs.evaluate(&f.db, start).is_empty());
    assert_eq!(crumbs.evaluate_as_forward_chain(&f.db, start), None);
}

#[test]
fn many_to_many_paths() {
    let f = Fixture::project();
    let peaks = f.db.normal(peaks::TABLE);
    let ben = f
        .db
        .normal(hikers::TABLE)
        .get_buffer_index_for_primary_key(f.ids.ben())
        .unwrap();

    let crumbs = f.db.get_breadcrumbs_for(hikers::TABLE, peaks::TABLE);
    assert!(!crumbs.is_forward_only());
    assert!(crumbs.goes_via(participated::TABLE));
    assert!(crumbs.get_column_set().contains(&participated::HIKER_ID));

    // Ben climbed Zugspitze twice
    let zugspitze = peaks.get_buffer_index_for_primary_key(f.ids.zugspitze()).unwrap();
    assert_eq!(crumbs.evaluate(&f.db, ben), BTreeSet::from([zugspitze]));
    assert_eq!(crumbs.evaluate_for_stats(&f.db, &[ben]), [zugspitze, zugspitze]);
}

#[test]
fn stats_evaluation_keeps_duplicates() {
    let f = Fixture::project();
    let peaks = f.db.normal(peaks::TABLE);
    let starts = [f.ids.zugspitze(), f.ids.nebelhorn(), f.ids.wildspitze()]
        .map(|key| peaks.get_buffer_index_for_primary_key(key).unwrap());

    let crumbs = f.db.get_breadcrumbs_for(peaks::TABLE, countries::TABLE);
    let countries = crumbs
        .evaluate_for_stats(&f.db, &starts)
        .into_iter()
        .map(|index| f.db.normal(countries::TABLE).get_primary_key_at(index))
        .collect::<Vec<_>>();

    assert_eq!(
        countries,
        [f.ids.germany(), f.ids.germany(), f.ids.austria()]
    );

    let named = crumbs.evaluate_for_stats_with(&f.db, &starts[..1], countries::NAME);
    assert_eq!(named[0].1, Value::from("Germany"));
}

#[test]
fn paths_to_the_same_table_through_other_tables() {
    let f = Fixture::project();

    // Ascents of the same trip: not the identity, which is reserved for
    // the empty chain.
    let there = f.db.get_breadcrumbs_for(trips::TABLE, ascents::TABLE);
    let back = f.db.get_breadcrumbs_for(ascents::TABLE, trips::TABLE);
    let crumbs = there.clone() + back.clone();
    let summer = f
        .db
        .normal(trips::TABLE)
        .get_buffer_index_for_primary_key(f.ids.summer())
        .unwrap();

    assert_eq!(crumbs.evaluate(&f.db, summer), BTreeSet::from([summer]));
    assert_eq!(crumbs.evaluate_for_stats(&f.db, &[summer]), [summer, summer]);
}
