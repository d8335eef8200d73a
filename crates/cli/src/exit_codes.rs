//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `payload-report` exit codes.
//! CI jobs branch on them, so they are part of the shell contract.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 1    | General error (unspecified)                                |
//! | 2    | Usage error (bad args, unreadable settings)                |
//! | 3    | Empty report: batches loaded but nothing was reported      |
//! | 4    | No input batches                                           |
//! | 5    | An output file could not be written                        |
//! | 6    | Changed payloads could not be listed from the pull request |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or a settings file that does not parse.
pub const EXIT_USAGE: u8 = 2;

/// Batches were loaded but the merged report came out empty.
pub const EXIT_EMPTY_REPORT: u8 = 3;

/// Nothing to process: no paths given, none discovered, or none loaded.
pub const EXIT_NO_BATCHES: u8 = 4;

/// A report, combined report or snapshot file could not be written.
pub const EXIT_WRITE: u8 = 5;

/// The pull request file listing failed (missing env, HTTP error).
pub const EXIT_PR_DISCOVERY: u8 = 6;
