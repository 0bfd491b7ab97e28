pub mod burn_reserve;
pub mod initialize;
pub mod mint_to;
pub mod redeem;

pub use burn_reserve::*;
pub use initialize::*;
pub use mint_to::*;
pub use redeem::*;
