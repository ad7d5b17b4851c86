pub mod bootstrap;
pub mod handler;

pub use bootstrap::render_bootstrap_module;
pub use handler::{handle_bootstrap_script, handle_web_config};
