//! Table layout of a PeakAscentLogger project file.
//!
//! Table IDs follow declaration order in [`TABLES`] and column IDs follow
//! declaration order within each table; the constants in the per-table
//! modules rely on that.

use super::{Builder, ColumnDef, ColumnId, DataType, Schema, TableDef, TableId};
use crate::Result;

pub const HIKE_KINDS: &[&str] = &[
    "Outdoor hike",
    "Snow hike",
    "Ski tour",
    "Via ferrata",
    "Climbing",
    "Mountaineering",
];

pub const CONTINENTS: &[&str] = &[
    "None specified",
    "Africa",
    "Europe",
    "Asia",
    "North America",
    "South America",
    "Oceania",
    "Antarctica",
];

pub const DIFFICULTY_SYSTEMS: &[&str] = &[
    "None",
    "SAC hiking scale",
    "UIAA",
    "Via ferrata (Hüsler)",
    "Ski touring (Blachère)",
];

pub const TABLES: [TableDef; 10] = [
    TableDef::normal(
        "Ascents",
        "Ascents",
        &[
            ColumnDef::primary_key("ascentID"),
            ColumnDef::new("title", "Title", DataType::String).nullable(),
            ColumnDef::foreign_key("peakID", "Peak", "Peaks").nullable(),
            ColumnDef::new("date", "Date", DataType::Date).nullable(),
            ColumnDef::new("perDayIndex", "Index on day", DataType::Integer),
            ColumnDef::new("time", "Time", DataType::Time).nullable(),
            ColumnDef::new("elevationGain", "Elevation gain", DataType::Integer).nullable(),
            ColumnDef::new("hikeKind", "Kind of hike", DataType::Enum).with_enum_names(HIKE_KINDS),
            ColumnDef::new("traverse", "Traverse", DataType::Bit),
            ColumnDef::new("difficultySystem", "Difficulty system", DataType::DualEnum)
                .with_enum_names(DIFFICULTY_SYSTEMS),
            ColumnDef::new("difficultyGrade", "Difficulty grade", DataType::DualEnum),
            ColumnDef::foreign_key("tripID", "Trip", "Trips").nullable(),
            ColumnDef::new("description", "Description", DataType::String).nullable(),
        ],
    ),
    TableDef::normal(
        "Peaks",
        "Peaks",
        &[
            ColumnDef::primary_key("peakID"),
            ColumnDef::new("name", "Name", DataType::String),
            ColumnDef::new("height", "Height", DataType::Integer).nullable(),
            ColumnDef::new("volcano", "Volcano", DataType::Bit),
            ColumnDef::foreign_key("regionID", "Region", "Regions").nullable(),
            ColumnDef::new("mapsLink", "Google Maps link", DataType::String).nullable(),
            ColumnDef::new("earthLink", "Google Earth link", DataType::String).nullable(),
            ColumnDef::new("wikiLink", "Wikipedia link", DataType::String).nullable(),
        ],
    ),
    TableDef::normal(
        "Trips",
        "Trips",
        &[
            ColumnDef::primary_key("tripID"),
            ColumnDef::new("name", "Name", DataType::String),
            ColumnDef::new("startDate", "Start date", DataType::Date).nullable(),
            ColumnDef::new("endDate", "End date", DataType::Date).nullable(),
            ColumnDef::new("description", "Description", DataType::String).nullable(),
        ],
    ),
    TableDef::normal(
        "Hikers",
        "Hikers",
        &[
            ColumnDef::primary_key("hikerID"),
            ColumnDef::new("name", "Name", DataType::String),
        ],
    ),
    TableDef::normal(
        "Regions",
        "Regions",
        &[
            ColumnDef::primary_key("regionID"),
            ColumnDef::new("name", "Name", DataType::String),
            ColumnDef::foreign_key("rangeID", "Mountain range", "Ranges").nullable(),
            ColumnDef::foreign_key("countryID", "Country", "Countries").nullable(),
        ],
    ),
    TableDef::normal(
        "Ranges",
        "Mountain ranges",
        &[
            ColumnDef::primary_key("rangeID"),
            ColumnDef::new("name", "Name", DataType::String),
            ColumnDef::new("continent", "Continent", DataType::Enum).with_enum_names(CONTINENTS),
        ],
    ),
    TableDef::normal(
        "Countries",
        "Countries",
        &[
            ColumnDef::primary_key("countryID"),
            ColumnDef::new("name", "Name", DataType::String),
        ],
    ),
    TableDef::normal(
        "Photos",
        "Photos",
        &[
            ColumnDef::primary_key("photoID"),
            ColumnDef::foreign_key("ascentID", "Ascent", "Ascents"),
            ColumnDef::new("sortIndex", "Sort index", DataType::Integer),
            ColumnDef::new("filepath", "File path", DataType::String),
            ColumnDef::new("description", "Description", DataType::String).nullable(),
        ],
    ),
    TableDef::associative(
        "Participated",
        "Participated",
        &[
            ColumnDef::primary_foreign_key("ascentID", "Ascents"),
            ColumnDef::primary_foreign_key("hikerID", "Hikers"),
        ],
    ),
    TableDef::normal(
        "ProjectSettings",
        "Project settings",
        &[
            ColumnDef::primary_key("settingID"),
            ColumnDef::new("settingKey", "Key", DataType::String),
            ColumnDef::new("settingValue", "Value", DataType::String).nullable(),
        ],
    )
    .meta(),
];

/// Builds the project schema.
pub fn schema() -> Result<Schema> {
    Builder::new().tables(TABLES).build()
}

macro_rules! columns {
    (@col $index:expr; ) => {};
    (@col $index:expr; $name:ident $(, $rest:ident )* ) => {
        pub const $name: ColumnId = ColumnId::new(TABLE, $index);
        columns!(@col $index + 1usize; $( $rest ),*);
    };
    ( $table:literal; $( $name:ident ),+ $(,)? ) => {
        pub const TABLE: TableId = TableId($table);
        columns!(@col 0usize; $( $name ),+);
    };
}

pub mod ascents {
    use super::*;
    columns!(0; ID, TITLE, PEAK_ID, DATE, PER_DAY_INDEX, TIME, ELEVATION_GAIN, HIKE_KIND,
        TRAVERSE, DIFFICULTY_SYSTEM, DIFFICULTY_GRADE, TRIP_ID, DESCRIPTION);
}

pub mod peaks {
    use super::*;
    columns!(1; ID, NAME, HEIGHT, VOLCANO, REGION_ID, MAPS_LINK, EARTH_LINK, WIKI_LINK);
}

pub mod trips {
    use super::*;
    columns!(2; ID, NAME, START_DATE, END_DATE, DESCRIPTION);
}

pub mod hikers {
    use super::*;
    columns!(3; ID, NAME);
}

pub mod regions {
    use super::*;
    columns!(4; ID, NAME, RANGE_ID, COUNTRY_ID);
}

pub mod ranges {
    use super::*;
    columns!(5; ID, NAME, CONTINENT);
}

pub mod countries {
    use super::*;
    columns!(6; ID, NAME);
}

pub mod photos {
    use super::*;
    columns!(7; ID, ASCENT_ID, SORT_INDEX, FILEPATH, DESCRIPTION);
}

pub mod participated {
    use super::*;
    columns!(8; ASCENT_ID, HIKER_ID);
}

pub mod settings {
    use super::*;
    columns!(9; ID, KEY, VALUE);
}
