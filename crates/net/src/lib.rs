//! Lammasu Resource Loading
//!
//! Scheme-dispatching fetch client and cancellable fetch tasks for the view.

mod client;
mod error;
mod fetch;
mod resources;
mod response;

pub use client::{ClientConfig, HttpClient};
pub use error::{NetError, NetResult};
pub use fetch::{spawn_fetch, FetchHandle};
pub use resources::ERROR_PAGE_URL;
pub use response::{Headers, Response};
