pub mod textgrid_reader;

pub use textgrid_reader::{read_alignment_tier, TierSelector};
