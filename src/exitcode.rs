//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Any handled failure
pub const FAILURE: i32 = 1;
