/// Standard Unix exit codes for the linkbox CLI.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error - invalid arguments, missing database, rejected input, etc.
pub const USAGE: i32 = 64;

/// A remote linkbox server could not be reached
pub const UNAVAILABLE: i32 = 69;
