use super::{cell, Record};

use chrono::{NaiveDate, NaiveTime};
use peakascent_core::{
    schema::{
        peak_ascent::{ascents, hikers, photos},
        ColumnId, TableId,
    },
    ItemId, Result, ValidItemId, Value,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ascent {
    pub id: ItemId,
    pub title: Option<String>,
    pub peak_id: ItemId,
    pub date: Option<NaiveDate>,
    /// Position among the ascents of the same day
    pub per_day_index: i64,
    pub time: Option<NaiveTime>,
    pub elevation_gain: Option<i64>,
    pub hike_kind: i64,
    pub traverse: bool,
    pub difficulty_system: i64,
    pub difficulty_grade: i64,
    pub trip_id: ItemId,
    pub description: Option<String>,

    /// Hikers who took part, from the participation table
    pub hiker_ids: BTreeSet<ValidItemId>,

    /// Photos of this ascent, ordered by sort index
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Photo {
    pub id: ItemId,
    pub ascent_id: ItemId,
    pub sort_index: i64,
    pub filepath: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hiker {
    pub id: ItemId,
    pub name: String,
}

impl Record for Ascent {
    const TABLE: TableId = ascents::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    /// Leaves `hiker_ids` and `photos` empty; they live in other tables.
    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, ascents::ID).as_item_id(),
            title: cell(row, ascents::TITLE).to_opt_string()?,
            peak_id: cell(row, ascents::PEAK_ID).as_item_id(),
            date: cell(row, ascents::DATE).to_opt_date()?,
            per_day_index: cell(row, ascents::PER_DAY_INDEX).to_i64()?,
            time: cell(row, ascents::TIME).to_opt_time()?,
            elevation_gain: cell(row, ascents::ELEVATION_GAIN).to_opt_i64()?,
            hike_kind: cell(row, ascents::HIKE_KIND).to_i64()?,
            traverse: cell(row, ascents::TRAVERSE).to_bool()?,
            difficulty_system: cell(row, ascents::DIFFICULTY_SYSTEM).to_i64()?,
            difficulty_grade: cell(row, ascents::DIFFICULTY_GRADE).to_i64()?,
            trip_id: cell(row, ascents::TRIP_ID).as_item_id(),
            description: cell(row, ascents::DESCRIPTION).to_opt_string()?,
            hiker_ids: BTreeSet::new(),
            photos: vec![],
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (ascents::TITLE, self.title.clone().into()),
            (ascents::PEAK_ID, self.peak_id.into()),
            (ascents::DATE, self.date.into()),
            (ascents::PER_DAY_INDEX, self.per_day_index.into()),
            (ascents::TIME, self.time.into()),
            (ascents::ELEVATION_GAIN, self.elevation_gain.into()),
            (ascents::HIKE_KIND, self.hike_kind.into()),
            (ascents::TRAVERSE, self.traverse.into()),
            (ascents::DIFFICULTY_SYSTEM, self.difficulty_system.into()),
            (ascents::DIFFICULTY_GRADE, self.difficulty_grade.into()),
            (ascents::TRIP_ID, self.trip_id.into()),
            (ascents::DESCRIPTION, self.description.clone().into()),
        ]
    }
}

impl Record for Photo {
    const TABLE: TableId = photos::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, photos::ID).as_item_id(),
            ascent_id: cell(row, photos::ASCENT_ID).as_item_id(),
            sort_index: cell(row, photos::SORT_INDEX).to_i64()?,
            filepath: cell(row, photos::FILEPATH).to_string_value()?,
            description: cell(row, photos::DESCRIPTION).to_opt_string()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (photos::ASCENT_ID, self.ascent_id.into()),
            (photos::SORT_INDEX, self.sort_index.into()),
            (photos::FILEPATH, self.filepath.clone().into()),
            (photos::DESCRIPTION, self.description.clone().into()),
        ]
    }
}

impl Record for Hiker {
    const TABLE: TableId = hikers::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, hikers::ID).as_item_id(),
            name: cell(row, hikers::NAME).to_string_value()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![(hikers::NAME, self.name.clone().into())]
    }
}
