use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    control::{drain, Attribute, ControlMessage},
    graph::node::{DspSetup, SignalNode},
};

pub const CONTROL_QUEUE_SIZE: usize = 256;

/// Control-thread side of a [`SharedNode`].
pub struct ControlHandle {
    tx: Producer<ControlMessage>,
}

impl ControlHandle {
    /// Queue a message. Returns `false` (and drops it) if the queue is full.
    pub fn send(&mut self, message: ControlMessage) -> bool {
        self.tx.push(message).is_ok()
    }

    pub fn float(&mut self, inlet: usize, value: f64) -> bool {
        self.send(ControlMessage::Float { inlet, value })
    }

    pub fn int(&mut self, inlet: usize, value: i64) -> bool {
        self.send(ControlMessage::Int { inlet, value })
    }

    pub fn bang(&mut self, inlet: usize) -> bool {
        self.send(ControlMessage::Bang { inlet })
    }

    pub fn attribute(&mut self, attribute: Attribute) -> bool {
        self.send(ControlMessage::Attribute(attribute))
    }

    /// Free slots left in the queue.
    pub fn capacity_left(&self) -> usize {
        self.tx.slots()
    }
}

/// Audio-thread side: a node that applies queued messages at the start of
/// every block.
pub struct SharedNode<N: SignalNode> {
    node: N,
    rx: Consumer<ControlMessage>,
}

impl<N: SignalNode> SharedNode<N> {
    pub fn new(node: N) -> (Self, ControlHandle) {
        let (tx, rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE_SIZE);

        let handle = ControlHandle { tx };
        let shared = Self { node, rx };

        (shared, handle)
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// Direct access for work that is not queued, such as table loads. The
    /// caller must not race `perform`.
    pub fn node_mut(&mut self) -> &mut N {
        &mut self.node
    }

    pub fn into_inner(self) -> N {
        self.node
    }
}

impl<N: SignalNode> SignalNode for SharedNode<N> {
    fn inlet_count(&self) -> usize {
        self.node.inlet_count()
    }

    fn dsp_setup(&mut self, setup: &DspSetup) {
        self.node.dsp_setup(setup);
    }

    fn perform(&mut self, inputs: &[&[f64]], out: &mut [f64]) {
        drain(&mut self.node, &mut self.rx);
        self.node.perform(inputs, out);
    }

    fn float(&mut self, inlet: usize, value: f64) {
        self.node.float(inlet, value);
    }

    fn int(&mut self, inlet: usize, value: i64) {
        self.node.int(inlet, value);
    }

    fn bang(&mut self, inlet: usize) {
        self.node.bang(inlet);
    }

    fn set_attribute(&mut self, attribute: Attribute) -> bool {
        self.node.set_attribute(attribute)
    }
}
