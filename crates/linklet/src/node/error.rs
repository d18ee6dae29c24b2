/// Errors raised while assigning this process a node ID.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    /// An explicitly configured node ID does not fit the layout's node field.
    #[error("configured node id {node_id} exceeds the layout maximum {max}")]
    OutOfRange { node_id: u64, max: u64 },
}
