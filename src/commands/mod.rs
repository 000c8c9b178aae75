pub mod file_commands;
