use std::fmt;

/// Lowest value a row's primary key may take.
pub const LOWEST_LEGAL_ID: i64 = 1;

/// A reference to a row that may be absent.
///
/// Absence is a first-class state: a nullable foreign key cell with no
/// value, or a lookup that found nothing. Two invalid IDs compare equal, a
/// valid ID never equals an invalid one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ItemId {
    #[default]
    Invalid,
    Valid(ValidItemId),
}

/// A row reference that is known to be present.
///
/// Constructing one from an illegal value panics, so holding a
/// `ValidItemId` is proof that the check already happened.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidItemId(i64);

/// Position of a row in a table's in-memory buffer.
///
/// Only meaningful until the next row is added to or removed from that
/// table. Use the primary key for anything that has to survive a mutation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferRowIndex(usize);

impl ItemId {
    pub fn new(id: i64) -> Self {
        match ValidItemId::try_new(id) {
            Some(valid) => Self::Valid(valid),
            None => Self::Invalid,
        }
    }

    pub fn from_option(id: Option<i64>) -> Self {
        id.map(Self::new).unwrap_or_default()
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub const fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the raw integer.
    ///
    /// # Panics
    ///
    /// Panics if the ID is invalid.
    #[track_caller]
    pub fn get(&self) -> i64 {
        self.force_valid().get()
    }

    /// # Panics
    ///
    /// Panics if the ID is invalid.
    #[track_caller]
    pub fn force_valid(&self) -> ValidItemId {
        match self {
            Self::Valid(valid) => *valid,
            Self::Invalid => panic!("called `force_valid` on an invalid ItemId"),
        }
    }

    pub fn as_valid(&self) -> Option<ValidItemId> {
        match self {
            Self::Valid(valid) => Some(*valid),
            Self::Invalid => None,
        }
    }

    pub fn as_option(&self) -> Option<i64> {
        self.as_valid().map(|valid| valid.get())
    }
}

impl From<ValidItemId> for ItemId {
    fn from(value: ValidItemId) -> Self {
        Self::Valid(value)
    }
}

impl From<Option<ValidItemId>> for ItemId {
    fn from(value: Option<ValidItemId>) -> Self {
        value.map(Self::Valid).unwrap_or_default()
    }
}

impl From<Option<i64>> for ItemId {
    fn from(value: Option<i64>) -> Self {
        Self::from_option(value)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(valid) => write!(fmt, "ItemId({})", valid.0),
            Self::Invalid => fmt.write_str("ItemId(invalid)"),
        }
    }
}

impl ValidItemId {
    /// # Panics
    ///
    /// Panics if `id` is lower than [`LOWEST_LEGAL_ID`].
    #[track_caller]
    pub fn new(id: i64) -> Self {
        match Self::try_new(id) {
            Some(valid) => valid,
            None => panic!("{id} is not a legal item ID"),
        }
    }

    pub const fn try_new(id: i64) -> Option<Self> {
        if id >= LOWEST_LEGAL_ID {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ValidItemId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ValidItemId({})", self.0)
    }
}

impl fmt::Display for ValidItemId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, fmt)
    }
}

impl BufferRowIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for BufferRowIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Debug for BufferRowIndex {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "BufferRowIndex({})", self.0)
    }
}

impl fmt::Display for BufferRowIndex {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, fmt)
    }
}
