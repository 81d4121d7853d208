use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use embedgate_core::{AppError, AppResult};
use embedgate_domain::{EmbedInstance, EmbedTarget, MountPoint, ResourceKey};
use tracing::{debug, info, warn};

use super::ports::{EmbedBuildRequest, EmbedSdk, EmbedSource, EmbedSurface, SignedUrlSource};
use super::state::{TabEntry, TabPhase, TabSelection, TabState};

/// CSS class applied to every embed frame.
pub const EMBED_CLASS_NAME: &str = "looker-embed";

/// Whether a tab fetches a signed URL first or lets the SDK authenticate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedSourceMode {
    /// Fetch a signed URL, then construct the widget with it.
    #[default]
    SignedUrl,
    /// Construct the widget by resource id without a prior fetch.
    ById,
}

/// One selectable tab bound to one mount point.
#[derive(Debug, Clone)]
pub struct EmbedTab {
    /// Tab key.
    pub key: ResourceKey,
    /// Embedded resource.
    pub target: EmbedTarget,
    /// Anchor that owns the widget.
    pub mount: MountPoint,
    /// How the widget is sourced.
    pub source_mode: EmbedSourceMode,
}

enum Plan {
    Reuse,
    Wait,
    Attempt(u64),
}

#[derive(Debug, Default)]
struct HostState {
    active: Option<ResourceKey>,
    entries: HashMap<ResourceKey, TabEntry>,
}

/// Single owner of the per-tab embed instances of one page.
///
/// The state lock is never held across an await, so a pending tab does not
/// block selection of the others.
pub struct EmbedHostController {
    tabs: Vec<EmbedTab>,
    signed_urls: Arc<dyn SignedUrlSource>,
    sdk: Arc<dyn EmbedSdk>,
    surface: Arc<dyn EmbedSurface>,
    state: Mutex<HostState>,
}

impl EmbedHostController {
    /// Creates a controller for the given tabs.
    ///
    /// Keys and mount points must be unique so that each anchor has at most
    /// one owner.
    pub fn new(
        tabs: Vec<EmbedTab>,
        signed_urls: Arc<dyn SignedUrlSource>,
        sdk: Arc<dyn EmbedSdk>,
        surface: Arc<dyn EmbedSurface>,
    ) -> AppResult<Self> {
        let mut keys = HashSet::new();
        let mut mounts = HashSet::new();
        for tab in &tabs {
            if !keys.insert(tab.key.clone()) {
                return Err(AppError::Validation(format!(
                    "duplicate embed tab key '{}'",
                    tab.key
                )));
            }
            if !mounts.insert(tab.mount.clone()) {
                return Err(AppError::Validation(format!(
                    "mount point '{}' is bound to more than one tab",
                    tab.mount.selector()
                )));
            }
        }

        let entries = tabs
            .iter()
            .map(|tab| (tab.key.clone(), TabEntry::default()))
            .collect();

        Ok(Self {
            tabs,
            signed_urls,
            sdk,
            surface,
            state: Mutex::new(HostState {
                active: None,
                entries,
            }),
        })
    }

    /// Selects a tab: shows its anchor, hides the others, and materializes
    /// the widget if the tab is `Uninitialized` or `Failed`.
    pub async fn select_tab(&self, key: &ResourceKey) -> AppResult<TabSelection> {
        self.activate(key, false).await
    }

    /// Like [`Self::select_tab`], but also restarts a tab stuck fetching its
    /// signed URL.
    ///
    /// The superseded attempt keeps running, but it never reaches the SDK and
    /// its result is dropped. A tab whose widget is already connecting is left
    /// alone so the mount point never gets a second widget.
    pub async fn retry_tab(&self, key: &ResourceKey) -> AppResult<TabSelection> {
        self.activate(key, true).await
    }

    /// Returns the currently selected tab, if any.
    pub fn active_tab(&self) -> AppResult<Option<ResourceKey>> {
        Ok(self.lock_state()?.active.clone())
    }

    /// Returns the lifecycle phase of a tab.
    pub fn tab_phase(&self, key: &ResourceKey) -> AppResult<TabPhase> {
        let state = self.lock_state()?;
        state
            .entries
            .get(key)
            .map(|entry| entry.state.phase())
            .ok_or_else(|| unknown_tab(key))
    }

    /// Returns the live instance of a tab, if it has been materialized.
    pub fn instance(&self, key: &ResourceKey) -> AppResult<Option<EmbedInstance>> {
        let state = self.lock_state()?;
        let entry = state.entries.get(key).ok_or_else(|| unknown_tab(key))?;
        Ok(match &entry.state {
            TabState::Instantiated(instance) => Some(instance.clone()),
            _ => None,
        })
    }

    async fn activate(&self, key: &ResourceKey, supersede_pending: bool) -> AppResult<TabSelection> {
        let tab = self.tab(key)?;

        let plan = {
            let mut state = self.lock_state()?;
            state.active = Some(key.clone());
            let entry = state
                .entries
                .get_mut(key)
                .ok_or_else(|| unknown_tab(key))?;

            match entry.state {
                TabState::Instantiated(ref instance) => {
                    debug!(
                        tab = %key,
                        handle = instance.handle().as_str(),
                        "reusing live embed instance"
                    );
                    Plan::Reuse
                }
                TabState::Pending if !supersede_pending => {
                    debug!(tab = %key, "embed attempt already in flight");
                    Plan::Wait
                }
                TabState::Connecting => {
                    debug!(tab = %key, "embed widget is connecting");
                    Plan::Wait
                }
                TabState::Uninitialized | TabState::Failed | TabState::Pending => {
                    Plan::Attempt(entry.begin_attempt())
                }
            }
        };

        self.show_only(key);

        match plan {
            Plan::Reuse => Ok(TabSelection::Reused),
            Plan::Wait => Ok(TabSelection::AlreadyPending),
            Plan::Attempt(generation) => self.run_attempt(tab, generation).await,
        }
    }

    async fn run_attempt(&self, tab: &EmbedTab, generation: u64) -> AppResult<TabSelection> {
        let source = match self.resolve_source(tab).await {
            Ok(source) => source,
            Err(error) => return self.finish_attempt(tab, generation, Err(error)),
        };

        // Past this point the attempt owns the mount point; a stale attempt
        // must not reach the SDK.
        if !self.claim_connect(tab, generation)? {
            return Ok(TabSelection::Superseded);
        }

        let outcome = self.connect(tab, source).await;
        self.finish_attempt(tab, generation, outcome)
    }

    async fn resolve_source(&self, tab: &EmbedTab) -> AppResult<EmbedSource> {
        match tab.source_mode {
            EmbedSourceMode::SignedUrl => {
                let signed = self.signed_urls.fetch_signed_url(&tab.target).await?;
                info!(tab = %tab.key, url = signed.url(), "received signed embed url");
                Ok(EmbedSource::SignedUrl(signed))
            }
            EmbedSourceMode::ById => Ok(EmbedSource::ById(tab.target.clone())),
        }
    }

    fn claim_connect(&self, tab: &EmbedTab, generation: u64) -> AppResult<bool> {
        let mut state = self.lock_state()?;
        let entry = state
            .entries
            .get_mut(&tab.key)
            .ok_or_else(|| unknown_tab(&tab.key))?;

        if entry.generation != generation {
            warn!(
                tab = %tab.key,
                generation,
                latest_generation = entry.generation,
                "skipping connect of superseded embed attempt"
            );
            return Ok(false);
        }

        entry.state = TabState::Connecting;
        Ok(true)
    }

    async fn connect(&self, tab: &EmbedTab, source: EmbedSource) -> AppResult<EmbedInstance> {
        let handle = self
            .sdk
            .connect(EmbedBuildRequest {
                source,
                mount: tab.mount.clone(),
                class_name: EMBED_CLASS_NAME.to_owned(),
                theme: tab.target.modifiers().theme().map(str::to_owned),
            })
            .await?;

        info!(
            tab = %tab.key,
            mount = %tab.mount.selector(),
            handle = handle.as_str(),
            "embed connected"
        );
        Ok(EmbedInstance::new(handle, tab.mount.clone()))
    }

    fn finish_attempt(
        &self,
        tab: &EmbedTab,
        generation: u64,
        outcome: AppResult<EmbedInstance>,
    ) -> AppResult<TabSelection> {
        let mut state = self.lock_state()?;
        let entry = state
            .entries
            .get_mut(&tab.key)
            .ok_or_else(|| unknown_tab(&tab.key))?;

        if entry.generation != generation {
            warn!(
                tab = %tab.key,
                generation,
                latest_generation = entry.generation,
                "dropping result of superseded embed attempt"
            );
            return Ok(TabSelection::Superseded);
        }

        match outcome {
            Ok(instance) => {
                entry.state = TabState::Instantiated(instance);
                Ok(TabSelection::Instantiated)
            }
            Err(error) => {
                warn!(tab = %tab.key, generation, %error, "embed attempt failed");
                entry.state = TabState::Failed;
                Ok(TabSelection::Failed)
            }
        }
    }

    fn show_only(&self, key: &ResourceKey) {
        for tab in &self.tabs {
            self.surface.set_visible(&tab.mount, tab.key == *key);
        }
    }

    fn tab(&self, key: &ResourceKey) -> AppResult<&EmbedTab> {
        self.tabs
            .iter()
            .find(|tab| tab.key == *key)
            .ok_or_else(|| unknown_tab(key))
    }

    fn lock_state(&self) -> AppResult<MutexGuard<'_, HostState>> {
        self.state
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock embed host state: {error}")))
    }
}

fn unknown_tab(key: &ResourceKey) -> AppError {
    AppError::NotFound(format!("embed tab '{key}' is not registered"))
}
