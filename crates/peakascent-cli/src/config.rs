use clap::Args;
use peakascent::DeletePolicy;

/// Options shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct Config {
    /// Refuse deletions that would delete dependent rows
    #[arg(long, global = true)]
    pub restrict: bool,

    /// Rows between progress messages while loading
    #[arg(long, global = true, default_value_t = 1000)]
    pub progress_step: usize,

    /// Create missing tables in the project file
    #[arg(long, global = true)]
    pub create: bool,
}

impl Config {
    /// The engine configuration these options describe.
    pub fn engine(&self) -> peakascent::Config {
        peakascent::Config {
            delete_policy: if self.restrict {
                DeletePolicy::Restrict
            } else {
                DeletePolicy::Cascade
            },
            progress_step: self.progress_step.max(1),
        }
    }
}
