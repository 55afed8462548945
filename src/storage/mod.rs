pub mod cache;
pub mod history;
pub mod keys;

pub use cache::CacheStore;
pub use history::HistoryStore;
