// Service exports
pub mod generator;
pub mod memory;
pub mod postgres;
pub mod schedule;
pub mod store;

pub use generator::{MatchGenerator, ShowSweepReport, SweepError, SweepSummary};
pub use memory::InMemoryStore;
pub use postgres::PostgresClient;
pub use store::{MatchStore, StoreError, UpsertOutcome};
