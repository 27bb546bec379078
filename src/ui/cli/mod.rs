pub mod cli;
pub mod cli_commands;
