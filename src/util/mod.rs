pub mod err;
pub mod logging;
