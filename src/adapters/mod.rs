// Adapters layer: concrete implementations of the domain ports (http, session storage, notifications).

pub mod http;
pub mod notify;
pub mod session_file;
