pub mod categories;
pub mod equipment;
pub mod galleries;
