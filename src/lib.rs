#[allow(non_snake_case)]
pub mod Reactions;
pub mod cli;
pub mod settings;
