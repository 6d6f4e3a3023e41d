pub mod time;
pub mod simulation;
