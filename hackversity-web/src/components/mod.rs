pub(crate) mod confirm_dialog;
pub(crate) mod message_bubble;

// Re-export components for convenience
pub use confirm_dialog::DialogHandle;
pub use message_bubble::{Bubble, MessageBubble};
