mod client;
mod wire;

pub use client::{CatalogClient, DEFAULT_BASE_URL, PAGE_SIZE};
