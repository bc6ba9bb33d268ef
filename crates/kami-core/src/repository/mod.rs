pub mod paper;
pub mod release;
