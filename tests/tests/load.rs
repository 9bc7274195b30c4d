use tests::{prelude::*, LoggingDriver};

use peakascent::{db::load_in_background, LoadProgress};
use peakascent_core::{
    driver::{Driver, Operation},
    schema::peak_ascent,
};
use peakascent_driver_sqlite::{Connection, Sqlite};
use pretty_assertions::assert_eq;

/// A store holding a schema and five countries, written without a database.
fn seeded_store() -> Connection {
    let schema = peak_ascent::schema().unwrap();
    let mut connection = Connection::in_memory().unwrap();

    for table in schema.tables() {
        connection
            .exec(&schema, Operation::CreateTable(table.id))
            .unwrap();
    }

    for name in ["Germany", "Austria", "Italy", "France", "Switzerland"] {
        connection
            .exec(
                &schema,
                Operation::insert(countries::TABLE, [(countries::NAME, Value::from(name))]),
            )
            .unwrap();
    }

    connection
}

#[tokio::test]
async fn background_load_reports_progress() {
    tests::init_logging();

    let mut builder = Database::builder();
    builder.driver(seeded_store()).progress_step(2);

    let mut loading = load_in_background(builder);

    let mut events = vec![];
    while let Some(event) = loading.progress.recv().await {
        events.push(event);
    }

    let db = loading.finish().await.unwrap();

    let countries = events
        .iter()
        .filter(|event| event.table == countries::TABLE)
        .map(|event| (event.loaded, event.total))
        .collect::<Vec<_>>();
    assert_eq!(countries, [(2, 5), (4, 5), (5, 5)]);

    // Every other table is empty and reports once
    for table in db.schema().tables() {
        if table.id == countries::TABLE {
            continue;
        }
        let reported = events
            .iter()
            .filter(|event| event.table == table.id)
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(
            reported,
            [LoadProgress {
                table: table.id,
                loaded: 0,
                total: 0,
            }]
        );
    }

    // Tables load in declaration order
    let order = events.iter().map(|event| event.table).collect::<Vec<_>>();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);

    assert_eq!(db.normal(countries::TABLE).row_count(), 5);
    assert_eq!(
        db.get_record::<Country>(db.normal(countries::TABLE).get_primary_key_at(BufferRowIndex::new(4)))
            .unwrap()
            .name,
        "Switzerland"
    );

    // Not created through the builder, so no version was recorded
    assert_eq!(db.setting("version"), None);
}

#[tokio::test]
async fn background_load_failure() {
    let mut builder = Database::builder();
    builder.url("mysql://localhost/peaks");

    let err = load_in_background(builder).finish().await.unwrap_err();
    assert!(err.is_invalid_connection_url());
}

#[test]
fn builder_needs_a_store() {
    let err = Database::builder().build().unwrap_err();
    assert!(err.is_invalid_connection_url());

    let err = Database::builder()
        .url("postgres://localhost/peaks")
        .build()
        .unwrap_err();
    assert!(err.is_invalid_connection_url());
}

#[test]
fn open_by_url() {
    let db = Database::builder()
        .url("sqlite::memory:")
        .create_schema(true)
        .build()
        .unwrap();

    assert_eq!(db.url(), "sqlite::memory:");
    assert!(db.tables().all(|table| table.row_count() == 0 || table.id() == settings::TABLE));
}

#[test]
fn opening_without_tables_fails() {
    assert!(Database::builder().url("sqlite::memory:").build().is_err());
}

#[test]
fn reload_matches_store() {
    let mut db = Database::builder()
        .driver(seeded_store())
        .build()
        .unwrap();

    let mut events = vec![];
    db.init_buffers(|event| events.push(event)).unwrap();

    assert_eq!(events.len(), db.schema().tables().len());
    assert_eq!(db.normal(countries::TABLE).row_count(), 5);
}

#[test]
fn failed_reload_keeps_every_buffer() {
    tests::init_logging();

    let path = std::env::temp_dir().join(format!("peakascent-reload-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite:{}", path.display());

    let mut writer = Database::builder()
        .url(&url)
        .create_schema(true)
        .build()
        .unwrap();

    let driver = LoggingDriver::new(Sqlite::new(&url).unwrap().connect().unwrap());
    let fail_on = driver.fail_on_handle();
    let mut reader = Database::builder().driver(driver).build().unwrap();

    writer
        .change_data(|db| {
            db.add_record(&Country {
                name: "Germany".into(),
                ..Country::default()
            })
        })
        .unwrap();

    // Countries load before photos
    *fail_on.lock().unwrap() =
        Some(|op| matches!(op, Operation::Count(table) if *table == photos::TABLE));
    assert!(reader.init_buffers(|_| {}).is_err());
    assert_eq!(reader.normal(countries::TABLE).row_count(), 0);

    *fail_on.lock().unwrap() = None;
    reader.init_buffers(|_| {}).unwrap();
    assert_eq!(reader.normal(countries::TABLE).row_count(), 1);

    drop((writer, reader));
    let _ = std::fs::remove_file(&path);
}
