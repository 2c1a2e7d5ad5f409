//! Time-windowed footage retrieval from networked cameras.
//!
//! For each selected device: acquire a federated session token, resolve the
//! time-windowed DASH manifest, append the init and numbered segments of each
//! track to a file, and combine video with audio when the camera has an
//! associated audio gateway. Devices run in a bounded worker pool.

pub mod config;
pub mod logging;

pub mod api;
pub mod control;
pub mod downloader;
pub mod error;
pub mod http;
pub mod manifest;
pub mod model;
pub mod mux;
pub mod pipeline;
pub mod retry;
pub mod scheduler;
pub mod storage;
pub mod url_model;
pub mod window;

pub use error::FootageError;
