//! Voice command registry
//!
//! Maps spoken phrases to zero-argument actions. Matching is a case-folded
//! substring scan of the transcript, so "please take a screenshot now" still
//! triggers "screenshot".

/// A registered zero-argument action
type Action = Box<dyn Fn() + Send>;

struct CommandEntry {
    phrase: String,
    action: Action,
}

/// Registry of voice command phrases and their actions
///
/// Populated once during setup, before listening starts; dispatch runs on the
/// cycle thread, so actions must confine themselves to thread-safe state.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action for a phrase, replacing any existing entry
    ///
    /// Phrases are normalized to lowercase; an empty phrase is rejected
    /// because it would match every transcript.
    pub fn register(&mut self, phrase: &str, action: impl Fn() + Send + 'static) {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            tracing::warn!("ignoring empty command phrase");
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.phrase == phrase) {
            entry.action = Box::new(action);
        } else {
            self.entries.push(CommandEntry {
                phrase,
                action: Box::new(action),
            });
        }
    }

    /// Dispatch a transcript against the registered phrases
    ///
    /// Invokes the action of the longest phrase contained case-insensitively
    /// in the transcript (ties fall back to registration order) and returns
    /// the matched phrase. At most one action runs per call. `None` means no
    /// phrase matched, which is a no-op outcome, not an error.
    pub fn dispatch(&self, transcript: &str) -> Option<&str> {
        let normalized = transcript.to_lowercase();

        let mut matched: Option<&CommandEntry> = None;
        for entry in &self.entries {
            if normalized.contains(&entry.phrase)
                && matched.is_none_or(|best| entry.phrase.len() > best.phrase.len())
            {
                matched = Some(entry);
            }
        }

        match matched {
            Some(entry) => {
                tracing::info!(phrase = %entry.phrase, "executing command");
                (entry.action)();
                Some(&entry.phrase)
            }
            None => {
                tracing::debug!(transcript = %transcript, "no matching command");
                None
            }
        }
    }

    /// Number of registered phrases
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
