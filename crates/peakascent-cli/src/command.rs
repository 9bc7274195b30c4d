mod related;
pub use related::RelatedCommand;

mod summary;
pub(crate) use summary::summary;

mod what_if;
pub use what_if::WhatIfCommand;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the number of rows in every table
    Summary,

    /// List the items of one table related to an item of another
    Related(RelatedCommand),

    /// Show what deleting items would do to the rest of the project
    WhatIf(WhatIfCommand),
}
