pub mod identity;
pub mod pipeline;
