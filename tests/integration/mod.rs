//! Integration tests for the modpack CLI

mod helpers;
mod test_init;
mod test_pack;
