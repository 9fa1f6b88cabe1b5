// Adapters layer: concrete implementations of the domain ports.

pub mod menu;
pub mod storage;

pub use menu::{Menu, MenuCatalog};
pub use storage::{InMemoryOrderStore, JsonFileOrderStore};
