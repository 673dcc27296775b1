pub mod coverage;
pub mod dataset;
pub mod error;
pub mod paths;
pub mod reconcile;
pub mod status;

pub use coverage::{roster_coverage, roster_coverage_file, RosterCoverage};
pub use error::{MatchError, Result};
pub use reconcile::{reconcile_file, AnnotatedRow, ReconcileStats, Reconciler, RosterSpec};
pub use status::{
    build_status_set, load_status_set, resolve_strategy, ColumnStrategy, LoadedStatus,
    StatusReport, StatusSet, StatusSource,
};
