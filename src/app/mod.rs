pub mod autoplay;
pub mod plugin;
pub mod presentation;
pub mod session;
