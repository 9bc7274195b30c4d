use chrono::{NaiveDate, NaiveTime};
use peakascent_core::{
    schema::{Column, DataType},
    Error, Result, ValidItemId, Value as CoreValue,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts the SQLite value at `index` within a row to a core value,
    /// guided by the declared type of `column`.
    pub fn from_sql(row: &Row, index: usize, column: &Column) -> Result<Self> {
        let value: SqlValue = row
            .get(index)
            .map_err(Error::driver_operation_failed)?;

        let core_value = match (value, column.ty) {
            (SqlValue::Null, _) => CoreValue::Null,
            (SqlValue::Integer(value), DataType::Id) => {
                // Legacy files store 0 for "no reference"
                ValidItemId::try_new(value).map_or(CoreValue::Null, CoreValue::Id)
            }
            (SqlValue::Integer(value), DataType::Bit) => CoreValue::Bool(value != 0),
            (SqlValue::Integer(value), DataType::Integer | DataType::Enum | DataType::DualEnum) => {
                CoreValue::Integer(value)
            }
            (SqlValue::Text(value), DataType::String) => CoreValue::String(value),
            (SqlValue::Text(value), DataType::Date) => {
                CoreValue::Date(NaiveDate::parse_from_str(&value, DATE_FORMAT)?)
            }
            (SqlValue::Text(value), DataType::Time) => CoreValue::Time(parse_time(&value)?),
            (value, _) => {
                return Err(Error::type_conversion(
                    CoreValue::String(format!("{value:?}")),
                    column.ty.name(),
                ))
            }
        };

        Ok(Value(core_value))
    }
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(Error::from)
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use CoreValue::*;

        match &self.0 {
            Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Integer(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Id(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(v.get()))),
            Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Date(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(DATE_FORMAT).to_string(),
            ))),
            Time(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIME_FORMAT).to_string(),
            ))),
        }
    }
}
