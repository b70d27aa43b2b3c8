//! Storage layer - settings repositories

pub mod file;
pub mod memory;

pub use file::JsonFileSettingsRepository;
pub use memory::InMemorySettingsRepository;
