//! Command implementations for the modpack CLI

mod init;
mod pack;

pub use init::run_init;
pub use pack::run_pack;
