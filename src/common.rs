pub mod error;
pub mod fonts;
pub mod format;
