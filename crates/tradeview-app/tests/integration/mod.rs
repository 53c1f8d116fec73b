//! Integration tests for tradeview-app.
//!
//! These tests verify the interaction between components:
//! - Socket.IO handshake and heartbeat against a scripted server
//! - Push events rendered into the shared page

pub mod common;
