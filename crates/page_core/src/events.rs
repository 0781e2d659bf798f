//! Typed page events dispatched to the controller's named handlers.

use dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

/// Host-side page events. One dispatch per event; handlers run to
/// completion before the next event is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Page structure exists; triggers the one-time startup pass.
    Loaded,
    KeyPress { target: NodeId, key: Key },
    KeyDown { key: Key },
    Click { target: NodeId },
    Submit { form: NodeId },
}
