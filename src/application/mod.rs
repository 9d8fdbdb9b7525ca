//! Application layer
//!
//! Use cases that hand invoice payloads to a rendering backend and turn the
//! outcome into a PDF artifact or a tagged export error.

pub mod invoice;
