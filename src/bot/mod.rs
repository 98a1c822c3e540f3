pub mod dispatcher;
pub mod transport;

pub use dispatcher::{classify, Dispatcher, Inbound};
pub use transport::ChatTransport;
