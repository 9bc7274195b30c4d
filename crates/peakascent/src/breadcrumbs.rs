mod matrix;
pub use matrix::BreadcrumbMatrix;

use crate::{Database, Table};

use peakascent_core::{
    schema::{ColumnId, TableId},
    BufferRowIndex, Schema, Value,
};
use std::{collections::BTreeSet, fmt, ops::Add};

/// One join hop: a foreign key column and the primary key it references.
///
/// Forward hops go from the table holding the foreign key to the table
/// holding the primary key and reach at most one row. Backward hops go the
/// other way and may reach any number of rows.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breadcrumb {
    first: ColumnId,
    second: ColumnId,
    forward: bool,
}

/// A connected chain of breadcrumbs leading from one table to another.
///
/// The empty chain is the identity: it leads from a table to itself.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Breadcrumbs {
    crumbs: Vec<Breadcrumb>,
}

impl Breadcrumb {
    /// # Panics
    ///
    /// Panics unless one column is a foreign key referencing the other.
    pub fn new(schema: &Schema, first: ColumnId, second: ColumnId) -> Self {
        let forward = if schema.column(first).references == Some(second) {
            true
        } else if schema.column(second).references == Some(first) {
            false
        } else {
            panic!("{first:?} and {second:?} are not a foreign key / primary key pair");
        };

        Self {
            first,
            second,
            forward,
        }
    }

    pub fn first_column(&self) -> ColumnId {
        self.first
    }

    pub fn second_column(&self) -> ColumnId {
        self.second
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn is_backward(&self) -> bool {
        !self.forward
    }

    pub fn departure_table(&self) -> TableId {
        self.first.table
    }

    pub fn arrival_table(&self) -> TableId {
        self.second.table
    }

    /// Rows of the arrival table reached from `row` of the departure table.
    fn step(&self, db: &Database, row: BufferRowIndex) -> Vec<BufferRowIndex> {
        let key = db.table(self.departure_table()).cell(row, self.first);

        if self.forward {
            let Some(key) = key.as_item_id().as_valid() else {
                return vec![];
            };

            db.normal(self.arrival_table())
                .get_buffer_index_for_primary_key(key)
                .into_iter()
                .collect()
        } else {
            if key.is_null() {
                return vec![];
            }

            db.table(self.arrival_table()).find_rows(self.second, key)
        }
    }
}

impl fmt::Debug for Breadcrumb {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.forward { "->" } else { "<-" };
        write!(fmt, "{:?} {arrow} {:?}", self.first, self.second)
    }
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(crumbs: Vec<Breadcrumb>) -> Self {
        crumbs
            .into_iter()
            .fold(Self::new(), |chain, crumb| chain + crumb)
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> + '_ {
        self.crumbs.iter()
    }

    /// The table the chain departs from, or `None` for the identity.
    pub fn start_table(&self) -> Option<TableId> {
        self.crumbs.first().map(Breadcrumb::departure_table)
    }

    /// The table the chain arrives at, or `None` for the identity.
    pub fn target_table(&self) -> Option<TableId> {
        self.crumbs.last().map(Breadcrumb::arrival_table)
    }

    /// True iff every hop is forward, so evaluation reaches at most one row.
    pub fn is_forward_only(&self) -> bool {
        self.crumbs.iter().all(Breadcrumb::is_forward)
    }

    /// All columns the chain reads.
    pub fn get_column_set(&self) -> BTreeSet<ColumnId> {
        self.crumbs
            .iter()
            .flat_map(|crumb| [crumb.first, crumb.second])
            .collect()
    }

    /// True iff some hop departs from or arrives at `table`.
    pub fn goes_via(&self, table: TableId) -> bool {
        self.crumbs
            .iter()
            .any(|crumb| crumb.departure_table() == table || crumb.arrival_table() == table)
    }

    /// Rows of the target table related to `start`.
    ///
    /// Paths that hit a missing reference end without a result. Rows reached
    /// through several paths appear once.
    pub fn evaluate(&self, db: &Database, start: BufferRowIndex) -> BTreeSet<BufferRowIndex> {
        let mut current = BTreeSet::from([start]);

        for crumb in &self.crumbs {
            current = current
                .into_iter()
                .flat_map(|row| crumb.step(db, row))
                .collect();

            if current.is_empty() {
                break;
            }
        }

        current
    }

    /// Evaluates a forward-only chain to its single result.
    ///
    /// # Panics
    ///
    /// Panics if the chain contains a backward hop.
    pub fn evaluate_as_forward_chain(
        &self,
        db: &Database,
        start: BufferRowIndex,
    ) -> Option<BufferRowIndex> {
        assert!(
            self.is_forward_only(),
            "evaluate_as_forward_chain called on a chain with backward hops"
        );

        self.crumbs.iter().try_fold(start, |row, crumb| {
            let next = crumb.step(db, row);
            debug_assert!(next.len() <= 1);
            next.first().copied()
        })
    }

    /// Evaluates a batch of start rows, keeping one result per path.
    ///
    /// Unlike [`Breadcrumbs::evaluate`], duplicates are preserved: a target
    /// row reached through two paths appears twice.
    pub fn evaluate_for_stats(
        &self,
        db: &Database,
        starts: &[BufferRowIndex],
    ) -> Vec<BufferRowIndex> {
        let mut current = starts.to_vec();

        for crumb in &self.crumbs {
            current = current
                .into_iter()
                .flat_map(|row| crumb.step(db, row))
                .collect();
        }

        current
    }

    /// Like [`Breadcrumbs::evaluate_for_stats`], but also reports the value
    /// of `column` in each reached row.
    pub fn evaluate_for_stats_with(
        &self,
        db: &Database,
        starts: &[BufferRowIndex],
        column: ColumnId,
    ) -> Vec<(BufferRowIndex, Value)> {
        let table = db.table(column.table);

        self.evaluate_for_stats(db, starts)
            .into_iter()
            .map(|row| (row, table.cell(row, column).clone()))
            .collect()
    }
}

impl Add for Breadcrumbs {
    type Output = Breadcrumbs;

    /// # Panics
    ///
    /// Panics unless `self` arrives where `rhs` departs.
    fn add(mut self, rhs: Breadcrumbs) -> Breadcrumbs {
        if let (Some(target), Some(start)) = (self.target_table(), rhs.start_table()) {
            assert_eq!(
                target, start,
                "cannot join breadcrumbs arriving at {target:?} with breadcrumbs departing from {start:?}"
            );
        }

        self.crumbs.extend(rhs.crumbs);
        self
    }
}

impl Add<Breadcrumb> for Breadcrumbs {
    type Output = Breadcrumbs;

    fn add(self, rhs: Breadcrumb) -> Breadcrumbs {
        self + Breadcrumbs { crumbs: vec![rhs] }
    }
}

impl fmt::Debug for Breadcrumbs {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(&self.crumbs).finish()
    }
}
