//! Typed lifecycle events, dispatcher and dispatch observer.

pub mod definitions;
pub mod dispatcher;
pub mod observer;

pub use definitions::{EventContext, EventSurface, LifecycleEvent};
pub use dispatcher::{DispatchReport, EventDispatcher, HookOutcome};
pub use observer::{DispatchObserver, LoggingObserver};
