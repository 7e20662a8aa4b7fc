//! Presentation layer for the product inventory manager.
//!
//! # Overview
//! [`Session`] is the controller: a state machine over the product list, the
//! add draft, the edit buffer and the delete confirmation. It performs no
//! I/O. User actions emit [`Pending`] requests built by the core client; the
//! host executes each one and feeds the response back through
//! [`Session::apply`], which may emit the follow-up list reload.
//!
//! The binary in `main.rs` is one such host: a line-oriented terminal front
//! end executing requests with ureq.

pub mod render;
pub mod session;

pub use session::{Draft, Mode, Op, Pending, Session};
