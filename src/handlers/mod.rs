pub mod backend_health_handler;
pub mod recalculation_handler;
