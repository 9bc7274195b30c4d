use crate::{Error, ItemId, Result, ValidItemId};

use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// One cell of a buffered row.
///
/// Enum and dual-enum columns store their variant index as an `Integer`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// Absent value of a nullable column
    #[default]
    Null,

    /// Signed integer, also used for enum indices
    Integer(i64),

    /// A present row reference (primary or foreign key)
    Id(ValidItemId),

    /// Boolean flag
    Bool(bool),

    /// Text
    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, as used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Integer(_) => "Integer",
            Self::Id(_) => "ID",
            Self::Bool(_) => "Bit",
            Self::String(_) => "String",
            Self::Date(_) => "Date",
            Self::Time(_) => "Time",
        }
    }

    /// Interprets the cell as a row reference. `Null` and illegal integers
    /// are the invalid ID.
    pub fn as_item_id(&self) -> ItemId {
        match self {
            Self::Id(id) => ItemId::Valid(*id),
            Self::Integer(n) => ItemId::new(*n),
            _ => ItemId::Invalid,
        }
    }

    pub fn to_valid_id(&self) -> Result<ValidItemId> {
        self.as_item_id()
            .as_valid()
            .ok_or_else(|| Error::type_conversion(self.clone(), "ValidItemId"))
    }

    pub fn to_i64(&self) -> Result<i64> {
        match self {
            Self::Integer(v) => Ok(*v),
            Self::Id(id) => Ok(id.get()),
            _ => Err(Error::type_conversion(self.clone(), "i64")),
        }
    }

    pub fn to_opt_i64(&self) -> Result<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            _ => self.to_i64().map(Some),
        }
    }

    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(Error::type_conversion(self.clone(), "bool")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_string_value(&self) -> Result<String> {
        self.as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::type_conversion(self.clone(), "String"))
    }

    pub fn to_opt_string(&self) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            _ => self.to_string_value().map(Some),
        }
    }

    pub fn to_opt_date(&self) -> Result<Option<NaiveDate>> {
        match self {
            Self::Null => Ok(None),
            Self::Date(v) => Ok(Some(*v)),
            _ => Err(Error::type_conversion(self.clone(), "Date")),
        }
    }

    pub fn to_opt_time(&self) -> Result<Option<NaiveTime>> {
        match self {
            Self::Null => Ok(None),
            Self::Time(v) => Ok(Some(*v)),
            _ => Err(Error::type_conversion(self.clone(), "Time")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Id(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
        }
    }
}

macro_rules! impl_from {
    ( $( $ty:ty => $variant:ident ),+ ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from!(
    i64 => Integer,
    bool => Bool,
    String => String,
    NaiveDate => Date,
    NaiveTime => Time,
    ValidItemId => Id
);

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<ItemId> for Value {
    fn from(value: ItemId) -> Self {
        match value {
            ItemId::Valid(id) => Self::Id(id),
            ItemId::Invalid => Self::Null,
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
