pub mod benchmark;
pub mod rearrange;
