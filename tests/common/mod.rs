#![allow(dead_code)]

pub mod fake;
pub mod helpers;
pub mod server;

pub use fake::{FakeTransport, RecordedRequest};
pub use helpers::*;
pub use server::{config_for, OneShotServer, ReceivedRequest};
