pub mod allocation;
pub mod cli;
pub mod data;
