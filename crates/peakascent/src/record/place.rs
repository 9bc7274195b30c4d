use super::{cell, Record};

use peakascent_core::{
    schema::{
        peak_ascent::{countries, peaks, ranges, regions},
        ColumnId, TableId,
    },
    ItemId, Result, Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peak {
    pub id: ItemId,
    pub name: String,
    /// Meters above sea level
    pub height: Option<i64>,
    pub volcano: bool,
    pub region_id: ItemId,
    pub maps_link: Option<String>,
    pub earth_link: Option<String>,
    pub wiki_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub id: ItemId,
    pub name: String,
    pub range_id: ItemId,
    pub country_id: ItemId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    pub id: ItemId,
    pub name: String,
    /// Index into [`CONTINENTS`](peakascent_core::schema::peak_ascent::CONTINENTS)
    pub continent: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    pub id: ItemId,
    pub name: String,
}

impl Record for Peak {
    const TABLE: TableId = peaks::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, peaks::ID).as_item_id(),
            name: cell(row, peaks::NAME).to_string_value()?,
            height: cell(row, peaks::HEIGHT).to_opt_i64()?,
            volcano: cell(row, peaks::VOLCANO).to_bool()?,
            region_id: cell(row, peaks::REGION_ID).as_item_id(),
            maps_link: cell(row, peaks::MAPS_LINK).to_opt_string()?,
            earth_link: cell(row, peaks::EARTH_LINK).to_opt_string()?,
            wiki_link: cell(row, peaks::WIKI_LINK).to_opt_string()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (peaks::NAME, self.name.clone().into()),
            (peaks::HEIGHT, self.height.into()),
            (peaks::VOLCANO, self.volcano.into()),
            (peaks::REGION_ID, self.region_id.into()),
            (peaks::MAPS_LINK, self.maps_link.clone().into()),
            (peaks::EARTH_LINK, self.earth_link.clone().into()),
            (peaks::WIKI_LINK, self.wiki_link.clone().into()),
        ]
    }
}

impl Record for Region {
    const TABLE: TableId = regions::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, regions::ID).as_item_id(),
            name: cell(row, regions::NAME).to_string_value()?,
            range_id: cell(row, regions::RANGE_ID).as_item_id(),
            country_id: cell(row, regions::COUNTRY_ID).as_item_id(),
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (regions::NAME, self.name.clone().into()),
            (regions::RANGE_ID, self.range_id.into()),
            (regions::COUNTRY_ID, self.country_id.into()),
        ]
    }
}

impl Record for Range {
    const TABLE: TableId = ranges::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, ranges::ID).as_item_id(),
            name: cell(row, ranges::NAME).to_string_value()?,
            continent: cell(row, ranges::CONTINENT).to_i64()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (ranges::NAME, self.name.clone().into()),
            (ranges::CONTINENT, self.continent.into()),
        ]
    }
}

impl Record for Country {
    const TABLE: TableId = countries::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, countries::ID).as_item_id(),
            name: cell(row, countries::NAME).to_string_value()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![(countries::NAME, self.name.clone().into())]
    }
}
