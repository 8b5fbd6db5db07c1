mod health;
mod search;

pub use health::cmd_health;
pub use search::cmd_search;
