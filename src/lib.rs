pub mod aggregation;
pub mod calendar;
pub mod config;
pub mod correlation;
pub mod efficiency;
pub mod match_store;
pub mod model;
pub mod numeric;
pub mod outliers;
pub mod report_export;
pub mod reports;
pub mod streaks;
pub mod summary;
