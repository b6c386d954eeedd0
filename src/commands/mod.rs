pub mod config;
pub mod init;
pub mod report;

pub use config::handle_config;
pub use init::handle_init;
pub use report::handle_report;
