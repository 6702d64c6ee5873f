pub mod collision;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod level;
pub mod objects;
pub mod renderer;
pub mod session;
pub mod snake;
pub mod sound;
pub mod state_machine;
pub mod terminal_runtime;
pub mod ui;
