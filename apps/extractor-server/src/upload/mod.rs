//! Upload Module
//!
//! Receives files from the process endpoint and rejects anything that is not
//! an acceptable PDF before it reaches the parser:
//! - size ceiling (413)
//! - filename and extension allow-list (400)
//! - magic-byte MIME sniffing against the allow-list and the declared type (400)

pub mod types;
pub mod validation;

pub use types::{Upload, ValidationError};
pub use validation::validate_upload;
