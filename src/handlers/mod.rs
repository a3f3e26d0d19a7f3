//! Turn processing

pub mod turn_handler;

pub use turn_handler::TurnProcessor;
