pub mod client;

pub use client::{ImageHostClient, upload_all};
