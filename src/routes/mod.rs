pub mod api;
pub mod categories;
pub mod equipment;
pub mod galleries;
pub mod main;
