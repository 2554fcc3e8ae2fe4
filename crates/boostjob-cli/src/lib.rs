pub mod cli;
pub mod train;
pub mod util;
