//! Keyword-style automation driver for the SAP GUI scripting engine.
//!
//! The driver exposes the flat set of actions test scripts need (click,
//! type, read value, assert value, navigate) and translates them into
//! calls against the window tree the scripting engine publishes.
//! Scripting must be enabled on the GUI side for any of this to work.
//!
//! ## Connecting
//!
//! Make sure the login pad is running, then connect with
//! [`SapGuiDriver::connect_to_session`]. From there, either
//! [`SapGuiDriver::open_connection`] opens a fresh connection from the
//! login pad or [`SapGuiDriver::connect_to_existing_connection`] attaches
//! to one that is already open.
//!
//! ## Locating elements
//!
//! Elements are addressed by their full hierarchical id starting at the
//! window, for example `wnd[0]/tbar[1]/btn[8]`. Identifiers are resolved
//! fresh on every keyword; nothing is cached, because the live tree may
//! change between calls.
//!
//! ## Screenshots on error
//!
//! Failures that indicate a test defect capture a screenshot before the
//! error surfaces. This is on by default; use
//! [`SapGuiDriver::disable_screenshots_on_error`] to switch it off, or
//! configure it up front through [`DriverConfig`].

pub mod backend;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod screenshot;
pub mod vkey;

mod session;

pub use config::DriverConfig;
pub use control::ControlType;
pub use driver::SapGuiDriver;
pub use error::{AssertionKind, Result, SapError};
pub use screenshot::{ScreenCapture, ScreenshotSink};
