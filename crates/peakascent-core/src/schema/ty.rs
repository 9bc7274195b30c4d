use crate::Value;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    /// Primary or foreign key
    Id,
    /// Index into a fixed list of names
    Enum,
    /// One half of a pair of enum columns that are edited together
    DualEnum,
    Bit,
    String,
    Date,
    Time,
}

impl DataType {
    /// Whether a non-null `value` may be stored in a column of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Enum | Self::DualEnum, Value::Integer(v)) => *v >= 0,
            (Self::Id, Value::Id(_)) => true,
            (Self::Bit, Value::Bool(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Date, Value::Date(_)) => true,
            (Self::Time, Value::Time(_)) => true,
            _ => false,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Id => "ID",
            Self::Enum => "Enum",
            Self::DualEnum => "DualEnum",
            Self::Bit => "Bit",
            Self::String => "String",
            Self::Date => "Date",
            Self::Time => "Time",
        }
    }

    /// Storage type used when creating the backing table.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Integer | Self::Id | Self::Enum | Self::DualEnum | Self::Bit => "INTEGER",
            Self::String | Self::Date | Self::Time => "TEXT",
        }
    }
}
