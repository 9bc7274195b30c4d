use super::Database;
use crate::{
    record::{Ascent, Country, Hiker, Peak, Photo, Range, Record, Region, Trip},
    table::Table,
};

use peakascent_core::{
    bail,
    schema::peak_ascent::{participated, photos},
    BufferRowIndex, Error, Result, ValidItemId, Value,
};
use std::collections::BTreeSet;

impl Database {
    /// Reads row `index` of `R`'s table.
    pub fn get_record_at<R: Record>(&self, index: BufferRowIndex) -> Result<R> {
        R::from_row(self.table(R::TABLE).row(index))
    }

    pub fn get_record<R: Record>(&self, key: ValidItemId) -> Result<R> {
        let table = self.normal(R::TABLE);

        match table.get_buffer_index_for_primary_key(key) {
            Some(index) => self.get_record_at(index),
            None => Err(Error::record_not_found(format!(
                "table={} key={key}",
                table.name()
            ))),
        }
    }

    /// The ascent at `index`, with its hikers and photos.
    pub fn get_ascent_at(&self, index: BufferRowIndex) -> Result<Ascent> {
        let mut ascent: Ascent = self.get_record_at(index)?;
        let id = ascent.id.force_valid();

        ascent.hiker_ids = self
            .associative(participated::TABLE)
            .get_matching_entries(participated::ASCENT_ID, id);

        let photo_table = self.table(photos::TABLE);
        ascent.photos = photo_table
            .find_rows(photos::ASCENT_ID, &Value::Id(id))
            .into_iter()
            .map(|index| self.get_record_at::<Photo>(index))
            .collect::<Result<_>>()?;
        ascent.photos.sort_by_key(|photo| photo.sort_index);

        Ok(ascent)
    }

    pub fn get_peak_at(&self, index: BufferRowIndex) -> Result<Peak> {
        self.get_record_at(index)
    }

    pub fn get_trip_at(&self, index: BufferRowIndex) -> Result<Trip> {
        self.get_record_at(index)
    }

    pub fn get_hiker_at(&self, index: BufferRowIndex) -> Result<Hiker> {
        self.get_record_at(index)
    }

    pub fn get_region_at(&self, index: BufferRowIndex) -> Result<Region> {
        self.get_record_at(index)
    }

    pub fn get_range_at(&self, index: BufferRowIndex) -> Result<Range> {
        self.get_record_at(index)
    }

    pub fn get_country_at(&self, index: BufferRowIndex) -> Result<Country> {
        self.get_record_at(index)
    }

    pub fn get_photo_at(&self, index: BufferRowIndex) -> Result<Photo> {
        self.get_record_at(index)
    }

    /// Inserts `record` as a new row and returns its primary key. The
    /// record's own `id` is ignored.
    pub fn add_record<R: Record>(&mut self, record: &R) -> Result<ValidItemId> {
        let index = self.add_row(R::TABLE, record.to_pairs())?;
        Ok(self.normal(R::TABLE).get_primary_key_at(index))
    }

    /// Overwrites the row `record.id()` points to.
    pub fn update_record<R: Record>(&mut self, record: &R) -> Result<()> {
        let Some(key) = record.id().as_valid() else {
            bail!("cannot update a record without a primary key");
        };

        self.update_row(R::TABLE, key, record.to_pairs())
    }

    /// Inserts an ascent together with its hikers and photos. Photos are
    /// linked to the new ascent whatever their `ascent_id` says.
    pub fn add_ascent(&mut self, ascent: &Ascent) -> Result<ValidItemId> {
        let id = self.add_record(ascent)?;
        self.set_ascent_hikers(id, &ascent.hiker_ids)?;

        for photo in &ascent.photos {
            let photo = Photo {
                ascent_id: id.into(),
                ..photo.clone()
            };
            self.add_record(&photo)?;
        }

        Ok(id)
    }

    /// Makes `hikers` the exact set of participants of `ascent`.
    pub fn set_ascent_hikers(
        &mut self,
        ascent: ValidItemId,
        hikers: &BTreeSet<ValidItemId>,
    ) -> Result<()> {
        self.set_matching_entries(participated::ASCENT_ID, ascent, hikers)
    }
}
