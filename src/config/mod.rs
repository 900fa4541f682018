/// Main configuration module.
/// 
/// Re-exports submodules for editor, cache and server configuration.
pub mod editor;
pub mod cache;
pub mod server;
