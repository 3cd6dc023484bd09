pub mod jornada_queries;
pub mod memory_store;
pub mod store;

pub use jornada_queries::JornadaQueries;
pub use memory_store::InMemoryStore;
pub use store::{ScoringStore, StoreError};
