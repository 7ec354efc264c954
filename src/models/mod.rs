pub mod identity;
pub mod interview;
