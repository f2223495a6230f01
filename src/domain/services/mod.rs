pub mod actions;
mod app_state;
pub mod events;
mod message_list;
pub mod normalizer;
mod scroll;

pub use app_state::*;
pub use message_list::*;
pub use scroll::*;
