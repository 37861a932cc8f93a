pub mod event;
pub mod history;
pub mod saved;
