pub mod assembler;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod display;
pub mod error;
pub mod inference;
pub mod io;
pub mod prompt;
pub mod remote;
pub mod resolve;
pub mod util;
