pub mod chart;
pub mod dashboard;
pub mod facets;
pub mod labels;
pub mod logging;
pub mod renderer;
pub mod snapshot;
pub mod summary;
pub mod timerange;
pub mod tuples;
