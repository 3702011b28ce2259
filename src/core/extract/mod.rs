//! Archive and descriptor extraction
//!
//! - [`archive`] - unpack a tar or tar.gz into the download workspace
//! - [`descriptor`] - find and parse the scene descriptor

pub mod archive;
pub mod descriptor;

pub use archive::extract;
pub use descriptor::{find_descriptor, parse_descriptor, parse_descriptor_str};
