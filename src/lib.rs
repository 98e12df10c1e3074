//! classroom-screenshot: screen-capture core for classroom monitoring
//!
//! This library grabs the primary display, optionally rescales it by area
//! averaging, and encodes it as JPEG or PNG into an in-memory buffer ready
//! for transport or disk persistence. [`screenshot::ScreenShot`] is the
//! entry point; the display provider and the file writer are injectable.

pub mod capture;
pub mod error;
pub mod model;
pub mod screenshot;
pub mod util;

pub use screenshot::ScreenShot;
