// Running statistics over completed analyses, persisted in a key-value store.

pub mod aggregator;
pub mod handlers;
pub mod record;
pub mod store;
