/// Runtime configuration of a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Config {
    /// How `remove_rows` treats rows holding a non-nullable reference to a
    /// deleted row.
    pub delete_policy: DeletePolicy,

    /// Rows between two progress events while loading a table.
    pub progress_step: usize,
}

/// Handling of non-nullable references to rows being deleted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the referencing rows too, recursively.
    #[default]
    Cascade,

    /// Refuse the deletion.
    Restrict,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::default(),
            progress_step: 100,
        }
    }
}
