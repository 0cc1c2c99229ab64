//! Domain entities and value types shared by the persistence and server layers.

pub mod category;
pub mod equipment;
pub mod gallery;
pub mod navigation;
pub mod tree;
pub mod types;
