use embedgate_domain::EmbedInstance;

/// Lifecycle state of one tab.
#[derive(Debug, Clone, Default)]
pub(super) enum TabState {
    #[default]
    Uninitialized,
    Pending,
    /// The attempt passed its generation check and called the SDK.
    Connecting,
    Instantiated(EmbedInstance),
    Failed,
}

impl TabState {
    pub(super) fn phase(&self) -> TabPhase {
        match self {
            Self::Uninitialized => TabPhase::Uninitialized,
            Self::Pending | Self::Connecting => TabPhase::Pending,
            Self::Instantiated(_) => TabPhase::Instantiated,
            Self::Failed => TabPhase::Failed,
        }
    }
}

/// Per-tab bookkeeping. `generation` identifies the latest attempt started.
#[derive(Debug, Clone, Default)]
pub(super) struct TabEntry {
    pub(super) state: TabState,
    pub(super) generation: u64,
}

impl TabEntry {
    /// Moves the tab to `Pending` and returns the new attempt's generation.
    pub(super) fn begin_attempt(&mut self) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.state = TabState::Pending;
        self.generation
    }
}

/// Observable lifecycle phase of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPhase {
    /// Nothing fetched or created yet.
    Uninitialized,
    /// URL fetch or connect in flight.
    Pending,
    /// Widget connected; the anchor is retained while hidden.
    Instantiated,
    /// Last attempt failed; the next selection retries.
    Failed,
}

/// Outcome of selecting a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSelection {
    /// The existing instance was reused; only visibility changed.
    Reused,
    /// An attempt is already in flight; nothing new was started.
    AlreadyPending,
    /// A new attempt fetched and connected the widget.
    Instantiated,
    /// A new attempt failed; the container stays empty.
    Failed,
    /// A newer attempt superseded this one; its result was dropped.
    Superseded,
}
