pub mod adjustment;
pub mod counting;
pub mod document;
pub mod estimate;
pub mod label;
pub mod settings;
