use crate::{init_logging, ExecLog, LoggingDriver, RecordingListener};

use chrono::NaiveDate;
use peakascent::{
    record::{Ascent, Country, Hiker, Peak, Photo, Range, Region, Trip},
    Database, DeletePolicy, ValidItemId,
};
use peakascent_driver_sqlite::Connection;
use std::{collections::BTreeSet, sync::Arc};

/// An in-memory project with a logging driver and a recording listener.
///
/// The log is cleared and the listener registered after seeding, so tests
/// only see what they do themselves.
pub struct Fixture {
    pub db: Database,
    pub log: ExecLog,
    pub listener: RecordingListener,
    pub ids: Ids,
}

macro_rules! ids {
    ( $( $( #[$doc:meta] )* $name:ident ),* $(,)? ) => {
        /// Primary keys of the seeded rows.
        #[derive(Debug, Default, Clone)]
        pub struct Ids {
            $( $( #[$doc] )* $name: Option<ValidItemId>, )*
        }

        impl Ids {
            $(
                $( #[$doc] )*
                ///
                /// # Panics
                ///
                /// Panics if the fixture did not seed this row.
                pub fn $name(&self) -> ValidItemId {
                    match self.$name {
                        Some(id) => id,
                        None => panic!(concat!("`", stringify!($name), "` was not seeded")),
                    }
                }
            )*
        }
    };
}

ids! {
    germany,
    austria,
    alps,
    allgaeu,
    oetztal,
    zugspitze,
    nebelhorn,
    wildspitze,
    lone_peak,
    summer,
    anna,
    ben,
    clara,
    /// Zugspitze on 2020-07-19 with Anna and Ben, two photos
    a1,
    /// Zugspitze again, with Ben
    a2,
    /// Wildspitze with Clara, one photo
    a3,
    /// No peak, no hikers
    a4,
}

impl Fixture {
    pub fn empty(policy: DeletePolicy) -> Fixture {
        init_logging();

        let driver = LoggingDriver::new(Connection::in_memory().unwrap());
        let log = ExecLog::new(driver.ops_log_handle(), driver.fail_on_handle());

        let mut db = Database::builder()
            .driver(driver)
            .create_schema(true)
            .delete_policy(policy)
            .build()
            .unwrap();

        let listener = RecordingListener::new();
        db.register_listener(Arc::new(listener.clone()));
        log.clear();

        Fixture {
            db,
            log,
            listener,
            ids: Ids::default(),
        }
    }

    /// Germany, the Alps, Allgäu, Zugspitze and one ascent of it.
    pub fn example() -> Fixture {
        Self::seeded(DeletePolicy::Cascade, |db, ids| {
            ids.germany = Some(db.add_record(&country("Germany"))?);
            ids.alps = Some(db.add_record(&Range {
                name: "Alps".into(),
                continent: 2,
                ..Range::default()
            })?);
            ids.allgaeu = Some(db.add_record(&region("Allgäu", ids.alps, ids.germany))?);
            ids.zugspitze = Some(db.add_record(&peak("Zugspitze", 2962, ids.allgaeu))?);
            ids.a1 = Some(db.add_record(&Ascent {
                title: Some("A1".into()),
                peak_id: ids.zugspitze.into(),
                date: NaiveDate::from_ymd_opt(2020, 7, 19),
                ..Ascent::default()
            })?);
            Ok(())
        })
    }

    pub fn project() -> Fixture {
        Self::project_with(DeletePolicy::Cascade)
    }

    /// Two countries, three regions, four peaks, a trip, three hikers and
    /// four ascents; see [`Ids`].
    pub fn project_with(policy: DeletePolicy) -> Fixture {
        Self::seeded(policy, |db, ids| {
            ids.germany = Some(db.add_record(&country("Germany"))?);
            ids.austria = Some(db.add_record(&country("Austria"))?);
            ids.alps = Some(db.add_record(&Range {
                name: "Alps".into(),
                continent: 2,
                ..Range::default()
            })?);
            ids.allgaeu = Some(db.add_record(&region("Allgäu", ids.alps, ids.germany))?);
            db.add_record(&region("Wetterstein", ids.alps, ids.germany))?;
            ids.oetztal = Some(db.add_record(&region("Ötztal Alps", ids.alps, ids.austria))?);

            ids.zugspitze = Some(db.add_record(&peak("Zugspitze", 2962, ids.allgaeu))?);
            ids.nebelhorn = Some(db.add_record(&peak("Nebelhorn", 2224, ids.allgaeu))?);
            ids.wildspitze = Some(db.add_record(&peak("Wildspitze", 3768, ids.oetztal))?);
            ids.lone_peak = Some(db.add_record(&peak("Lone peak", 1000, None))?);

            ids.summer = Some(db.add_record(&Trip {
                name: "Summer".into(),
                start_date: NaiveDate::from_ymd_opt(2020, 7, 18),
                end_date: NaiveDate::from_ymd_opt(2020, 7, 25),
                ..Trip::default()
            })?);

            ids.anna = Some(db.add_record(&hiker("Anna"))?);
            ids.ben = Some(db.add_record(&hiker("Ben"))?);
            ids.clara = Some(db.add_record(&hiker("Clara"))?);

            ids.a1 = Some(db.add_ascent(&Ascent {
                title: Some("A1".into()),
                peak_id: ids.zugspitze.into(),
                date: NaiveDate::from_ymd_opt(2020, 7, 19),
                trip_id: ids.summer.into(),
                hiker_ids: hikers([ids.anna, ids.ben]),
                photos: vec![photo("second.jpg", 2), photo("first.jpg", 1)],
                ..Ascent::default()
            })?);
            ids.a2 = Some(db.add_ascent(&Ascent {
                title: Some("A2".into()),
                peak_id: ids.zugspitze.into(),
                date: NaiveDate::from_ymd_opt(2021, 8, 1),
                hiker_ids: hikers([ids.ben]),
                ..Ascent::default()
            })?);
            ids.a3 = Some(db.add_ascent(&Ascent {
                title: Some("A3".into()),
                peak_id: ids.wildspitze.into(),
                date: NaiveDate::from_ymd_opt(2020, 7, 22),
                trip_id: ids.summer.into(),
                hiker_ids: hikers([ids.clara]),
                photos: vec![photo("summit.jpg", 1)],
                ..Ascent::default()
            })?);
            ids.a4 = Some(db.add_ascent(&Ascent {
                title: Some("A4".into()),
                ..Ascent::default()
            })?);
            Ok(())
        })
    }

    fn seeded(
        policy: DeletePolicy,
        seed: impl FnOnce(&mut Database, &mut Ids) -> peakascent::Result<()>,
    ) -> Fixture {
        let mut fixture = Self::empty(policy);
        let mut ids = Ids::default();

        fixture
            .db
            .change_data(|db| seed(db, &mut ids))
            .unwrap();

        fixture.ids = ids;
        fixture.log.clear();
        fixture.listener.clear();
        fixture
    }
}

fn country(name: &str) -> Country {
    Country {
        name: name.into(),
        ..Country::default()
    }
}

fn region(name: &str, range: Option<ValidItemId>, country: Option<ValidItemId>) -> Region {
    Region {
        name: name.into(),
        range_id: range.into(),
        country_id: country.into(),
        ..Region::default()
    }
}

fn peak(name: &str, height: i64, region: Option<ValidItemId>) -> Peak {
    Peak {
        name: name.into(),
        height: Some(height),
        region_id: region.into(),
        ..Peak::default()
    }
}

fn hiker(name: &str) -> Hiker {
    Hiker {
        name: name.into(),
        ..Hiker::default()
    }
}

fn photo(filepath: &str, sort_index: i64) -> Photo {
    Photo {
        filepath: filepath.into(),
        sort_index,
        ..Photo::default()
    }
}

fn hikers<const N: usize>(ids: [Option<ValidItemId>; N]) -> BTreeSet<ValidItemId> {
    ids.into_iter().flatten().collect()
}
