pub mod peg;

pub use peg::*;
