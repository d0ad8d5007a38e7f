/// One decoded control-channel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// The exact sentinel line: stop reading and shut down cleanly.
    Terminate,
    /// Ordered work-unit ids to run, capped at the configured batch size.
    Batch(Vec<String>),
}
