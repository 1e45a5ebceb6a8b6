mod not_found;
mod panic;

pub use not_found::not_found_handler;
pub use panic::panic_handler;
