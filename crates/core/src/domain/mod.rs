pub mod detail;
pub mod entry;
pub mod page;
pub mod provider;
pub mod search;
