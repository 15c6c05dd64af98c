//! Networking: a thin wrapper over `reqwest` that fetches documents into a
//! fully buffered [`Response`].

mod fetch;
mod response;

pub use fetch::{build_client, fetch};
pub use response::Response;
