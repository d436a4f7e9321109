//! # Event Bus Module
//!
//! Publish/subscribe channel that decouples the drawing session, the
//! synthesizer and the motion sink from whatever host renders or logs them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flatdraw_core::event_bus::{event_bus, AppEvent, CaptureEvent, EventCategory, EventFilter};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::only([EventCategory::Capture]),
//!     |event| println!("{}", event.description()),
//! );
//!
//! event_bus().publish(AppEvent::Capture(CaptureEvent::SessionReset));
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
