pub mod demo;
pub mod engine;
pub mod handlers;
