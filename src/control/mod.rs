//! Control-path plumbing.
//!
//! Discrete messages (floats, ints, bangs, attributes) are produced on a
//! control thread and applied to an object between audio blocks. With the
//! `rtrb` feature, [`shared::SharedNode`] wraps any [`SignalNode`] behind a
//! lock-free single-producer/single-consumer queue so the two threads never
//! contend.
//!
//! [`SignalNode`]: crate::graph::node::SignalNode

pub mod message;
#[cfg(feature = "rtrb")]
pub mod shared;

pub use message::{Attribute, ControlMessage, MessageReceiver};
#[cfg(feature = "rtrb")]
pub use shared::{ControlHandle, SharedNode};

use crate::graph::node::SignalNode;

/// Apply one message to `node`.
pub fn dispatch<N: SignalNode + ?Sized>(node: &mut N, message: ControlMessage) {
    match message {
        ControlMessage::Float { inlet, value } => node.float(inlet, value),
        ControlMessage::Int { inlet, value } => node.int(inlet, value),
        ControlMessage::Bang { inlet } => node.bang(inlet),
        ControlMessage::Attribute(attribute) => {
            let _ = node.set_attribute(attribute);
        }
    }
}

/// Apply every pending message from `rx` to `node`.
pub fn drain<N, R>(node: &mut N, rx: &mut R)
where
    N: SignalNode + ?Sized,
    R: MessageReceiver + ?Sized,
{
    while let Some(message) = rx.pop() {
        dispatch(node, message);
    }
}
