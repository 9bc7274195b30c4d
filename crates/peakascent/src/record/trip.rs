use super::{cell, Record};

use chrono::NaiveDate;
use peakascent_core::{
    schema::{peak_ascent::trips, ColumnId, TableId},
    ItemId, Result, Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trip {
    pub id: ItemId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl Trip {
    /// Length in days, counting both ends. `None` unless both dates are set
    /// and in order.
    pub fn days(&self) -> Option<i64> {
        let days = (self.end_date? - self.start_date?).num_days() + 1;
        (days > 0).then_some(days)
    }
}

impl Record for Trip {
    const TABLE: TableId = trips::TABLE;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_row(row: &[Value]) -> Result<Self> {
        Ok(Self {
            id: cell(row, trips::ID).as_item_id(),
            name: cell(row, trips::NAME).to_string_value()?,
            start_date: cell(row, trips::START_DATE).to_opt_date()?,
            end_date: cell(row, trips::END_DATE).to_opt_date()?,
            description: cell(row, trips::DESCRIPTION).to_opt_string()?,
        })
    }

    fn to_pairs(&self) -> Vec<(ColumnId, Value)> {
        vec![
            (trips::NAME, self.name.clone().into()),
            (trips::START_DATE, self.start_date.into()),
            (trips::END_DATE, self.end_date.into()),
            (trips::DESCRIPTION, self.description.clone().into()),
        ]
    }
}
