pub mod boolean;
pub mod sweep;
