//! CLI subcommand implementations.

pub mod animals;
pub mod history;
pub mod overview;
pub mod record;
pub mod settings;
pub mod status;
pub mod util;
