//! Provider specific [`ClientWrapper`](crate::client_wrapper::ClientWrapper) implementations.
//!
//! Each submodule offers a concrete client for one of the three conversation
//! roles while conforming to the uniform transport contract.

pub mod common;

pub mod claude;
pub mod gemini;
pub mod openai;
