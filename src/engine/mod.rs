pub mod achievements;
pub mod rewards;
pub mod scoring;
pub mod skip;

pub use skip::SkipMask;
