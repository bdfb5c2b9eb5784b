pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::{NewParticipant, RaffleStore, RaffleStoreClient, StoreResponse};
