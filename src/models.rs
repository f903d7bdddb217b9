pub mod export;
pub mod invoice;
pub mod preview;
