mod app;
mod components;
pub mod markup;
mod state;
pub mod view;

pub use app::ChatApp;
