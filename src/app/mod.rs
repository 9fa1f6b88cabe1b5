// App layer: wires config, adapters and core together for the CLI.

#[cfg(feature = "cli")]
pub mod commands;
pub mod render;
