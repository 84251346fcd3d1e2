pub mod chainlink;
pub mod mock;
pub mod resolver;
