/// Why the host should drop every piece of state derived from the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadReason {
    BranchCheckedOut { branch: String },
}

/// Emitted after a successful checkout. Whether the host restarts or clears its caches is up to
/// the implementation.
pub trait ReloadSignal: Send + Sync {
    fn request_reload(&self, reason: ReloadReason);
}
