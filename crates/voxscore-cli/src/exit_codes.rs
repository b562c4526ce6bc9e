//! Unified exit codes for the voxscore CLI.
//! These codes are part of the public contract.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_UNSCORED: i32 = 1; // Recovery exhausted; raw-text artifact written
pub const EXIT_PRECONDITION: i32 = 2; // Missing credential, missing file, unsupported format
pub const EXIT_GATEWAY: i32 = 3; // Remote call failed (transport/auth/quota/timeout)
