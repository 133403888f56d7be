//! Task protocol client, settings and shared error types

mod config;
mod error;
mod protocol;
mod retry;
pub mod transport;

pub use config::{Settings, TASK_TIMEOUT};
pub use error::ProtocolError;
pub use protocol::{Envelope, NoInput, Task, TaskClient};
pub use retry::Backoff;
pub use transport::{Body, Exchange, HttpTransport, Method, Transport};
