use super::{Breadcrumb, Breadcrumbs};

use peakascent_core::{schema::TableId, Schema};
use tracing::debug;

/// Cached breadcrumbs between every ordered pair of normal tables.
///
/// Paths may step through associative tables but never start or end in one.
/// Among all paths between two tables, the one with the fewest hops wins,
/// then the one with the fewest backward hops. Remaining ties go to the path
/// discovered first, so the result only depends on the schema's declaration
/// order.
#[derive(Debug)]
pub struct BreadcrumbMatrix {
    /// Indexed by start table, then target table.
    paths: Vec<Vec<Option<Breadcrumbs>>>,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cost {
    hops: usize,
    backward: usize,
}

impl BreadcrumbMatrix {
    pub fn compute(schema: &Schema) -> Self {
        let edges = edges(schema);
        let num_tables = schema.tables().len();

        let mut paths = vec![vec![None; num_tables]; num_tables];

        for start in schema.normal_tables() {
            let reached = shortest_paths(num_tables, start.id, &edges);

            for target in schema.normal_tables() {
                paths[start.id.0][target.id.0] = reached[target.id.0]
                    .as_ref()
                    .map(|(_, crumbs)| crumbs.clone());
            }
        }

        debug!(edges = edges.len(), "computed breadcrumb matrix");

        Self { paths }
    }

    /// Breadcrumbs leading from `start` to `target`.
    ///
    /// # Panics
    ///
    /// Panics if either table is not a normal table, or the two are not
    /// connected.
    pub fn get(&self, start: TableId, target: TableId) -> &Breadcrumbs {
        match self.try_get(start, target) {
            Some(crumbs) => crumbs,
            None => panic!("no breadcrumbs from {start:?} to {target:?}"),
        }
    }

    pub fn try_get(&self, start: TableId, target: TableId) -> Option<&Breadcrumbs> {
        self.paths.get(start.0)?.get(target.0)?.as_ref()
    }
}

/// Every FK/PK hop between non-meta tables, in both directions.
fn edges(schema: &Schema) -> Vec<Breadcrumb> {
    let mut edges = vec![];

    for table in schema.tables().iter().filter(|table| !table.meta) {
        for column in table.foreign_key_columns() {
            let Some(target) = column.references else {
                continue;
            };

            edges.push(Breadcrumb::new(schema, column.id, target));
            edges.push(Breadcrumb::new(schema, target, column.id));
        }
    }

    edges
}

fn shortest_paths(
    num_tables: usize,
    start: TableId,
    edges: &[Breadcrumb],
) -> Vec<Option<(Cost, Breadcrumbs)>> {
    let mut reached: Vec<Option<(Cost, Breadcrumbs)>> = vec![None; num_tables];
    reached[start.0] = Some((
        Cost {
            hops: 0,
            backward: 0,
        },
        Breadcrumbs::new(),
    ));

    // Every edge costs at least one hop, so this settles after at most
    // `num_tables` rounds.
    loop {
        let mut changed = false;

        for edge in edges {
            let Some((cost, crumbs)) = &reached[edge.departure_table().0] else {
                continue;
            };

            let candidate = Cost {
                hops: cost.hops + 1,
                backward: cost.backward + usize::from(edge.is_backward()),
            };

            let arrival = edge.arrival_table().0;
            let improves = match &reached[arrival] {
                Some((existing, _)) => candidate < *existing,
                None => true,
            };

            if improves {
                let crumbs = crumbs.clone() + *edge;
                reached[arrival] = Some((candidate, crumbs));
                changed = true;
            }
        }

        if !changed {
            return reached;
        }
    }
}
