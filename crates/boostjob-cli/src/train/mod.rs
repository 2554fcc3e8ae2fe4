pub mod driver;
pub mod input;
