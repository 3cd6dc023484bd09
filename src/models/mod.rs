pub mod common;
pub mod jornada;
pub mod recalculation;
