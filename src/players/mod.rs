pub mod base;
pub mod opening;
pub mod random;

pub use base::BasePlayer;
pub use opening::OpeningPlayer;
pub use random::RandomPlayer;
