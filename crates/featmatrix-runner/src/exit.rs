// Exit codes for CI triage
pub const EXIT_SUCCESS: i32 = 0;
/// A build failed with a status that cannot be passed through unchanged.
pub const EXIT_BUILD_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_LAUNCH_FAILURE: i32 = 3;

/// Codes only the harness itself may exit with; a build reporting one of
/// these is normalized to [`EXIT_BUILD_FAILURE`].
pub const RESERVED_EXIT_CODES: [i32; 2] = [EXIT_CONFIG_ERROR, EXIT_LAUNCH_FAILURE];
