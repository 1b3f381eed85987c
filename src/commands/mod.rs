//! One module per row of the external interface table: each owns the
//! parsing of its own arguments into a typed outcome and the process exit
//! code the host's hook configuration is documented to interpret.

pub mod collaborators;
pub mod config_cmd;
pub mod hook;
pub mod skip;
pub mod validate;
pub mod version;
