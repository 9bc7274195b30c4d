use crate::ItemId;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Number of rows counted or affected
    Count(u64),

    /// Primary key assigned to an inserted row; invalid for tables without
    /// a single integer key
    Inserted(ItemId),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn into_count(self) -> u64 {
        match self {
            Self::Count(count) => count,
            Self::Inserted(_) => 1,
        }
    }

    pub fn into_inserted(self) -> ItemId {
        match self {
            Self::Inserted(id) => id,
            Self::Count(_) => ItemId::Invalid,
        }
    }
}
