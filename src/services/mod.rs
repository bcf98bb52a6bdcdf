pub mod render_service;
pub mod schedule_service;
pub mod stats_service;
