mod action;
mod chat_request;
mod event;
mod loading;
mod message;
mod role;
mod textarea;
mod transport;

pub use action::*;
pub use chat_request::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use role::*;
pub use textarea::*;
pub use transport::*;
