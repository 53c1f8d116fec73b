// Each test binary uses a different part of the mock.
#![allow(dead_code)]

pub mod mock_socketio;
