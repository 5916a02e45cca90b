pub mod badge;
pub mod dto;
pub mod progress;
pub mod state;
