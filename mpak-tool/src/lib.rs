//! Packages mod content folders into distributable archives.
//!
//! Every eligible top-level directory under the workspace root is zipped into
//! one archive named after the folder (spaces become underscores). Folders
//! whose name starts with `!` are treated as staging areas and skipped.

pub mod fs_utils;
pub mod naming;
pub mod packaging;
pub mod process;
pub mod sink;
