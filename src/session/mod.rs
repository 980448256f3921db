pub mod input;
pub mod result;
pub mod state;
pub mod stats;

pub use state::SessionState;
