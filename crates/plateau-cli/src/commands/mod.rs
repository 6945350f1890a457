//! Command implementations.

pub mod compare;
pub mod init_config;
pub mod run;
pub mod select;
pub mod strategies;

pub use self::compare::execute_compare;
pub use self::init_config::execute_init_config;
pub use self::run::execute_run;
pub use self::select::execute_select;
pub use self::strategies::execute_strategies;
