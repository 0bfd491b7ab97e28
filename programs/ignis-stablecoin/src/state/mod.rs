pub mod asset;
pub mod coin_state;
pub mod program_authority;
pub mod stablecoin_state;

pub use asset::*;
pub use coin_state::*;
pub use program_authority::*;
pub use stablecoin_state::*;
