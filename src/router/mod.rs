mod current_folder;
mod dispatcher;
mod event;
mod ingest;
mod selection;
mod session;
mod transport;

pub use current_folder::CurrentFolder;
pub use current_folder::Destination;
pub use dispatcher::Router;
pub use event::ChatId;
pub use event::Command;
pub use event::Event;
pub use event::FileArrival;
pub use event::MediaKind;
pub use session::Resolution;
pub use session::SessionCache;
pub use session::Token;
pub use transport::Choice;
pub use transport::Transport;
pub use transport::TransportError;
