pub mod stop_event;
pub mod time;

pub use stop_event::*;
pub use time::*;
