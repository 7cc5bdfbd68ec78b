//! Command implementations.

pub mod config;
pub mod run;
pub mod show;
pub mod vocab;

pub use self::config::execute_config;
pub use self::run::{execute_run, run_batch, select_documents};
pub use self::show::execute_show;
pub use self::vocab::execute_vocab;
