pub mod backend;
pub mod logging;
pub mod window;
