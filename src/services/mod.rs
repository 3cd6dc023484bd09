pub mod jornada_selector;
pub mod recalculation_service;
pub mod scheduler;

pub use jornada_selector::JornadaActivitySelector;
pub use recalculation_service::RecalculationService;
pub use scheduler::SchedulerService;
