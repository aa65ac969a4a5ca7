pub mod health;
pub mod notices;
pub mod settings;
pub mod threads;
pub mod workspaces;
