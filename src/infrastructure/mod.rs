pub mod container;
pub mod database;
pub mod external_services;
pub mod vector_store;

// Re-export commonly used items
pub use container::AppContainer;
