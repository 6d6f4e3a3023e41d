pub mod effects;
pub mod orbit;
pub mod belt;
