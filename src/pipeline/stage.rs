use std::fmt;
use tracing::debug;

/// Where a pipeline run currently is.
///
/// ```text
/// Idle → Grounding (grounded requests only) → Formatting → Parsed → Done
///                     └──────────────┴──────────────┴──────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Grounding,
    Formatting,
    Parsed,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Grounding => "grounding",
            Self::Formatting => "formatting",
            Self::Parsed => "parsed",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may follow `self`.
    pub fn can_advance_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        match (self, next) {
            (Idle, Grounding) | (Idle, Formatting) => true,
            (Grounding, Formatting) => true,
            (Formatting, Parsed) => true,
            (Parsed, Done) => true,
            (Grounding | Formatting | Parsed, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records the stages one run passes through.
#[derive(Debug)]
pub(crate) struct StageTracker {
    operation: &'static str,
    history: Vec<PipelineStage>,
}

impl StageTracker {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            history: vec![PipelineStage::Idle],
        }
    }

    pub(crate) fn current(&self) -> PipelineStage {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineStage::Idle)
    }

    pub(crate) fn advance(&mut self, next: PipelineStage) {
        let from = self.current();
        debug_assert!(
            from.can_advance_to(next),
            "illegal pipeline transition {} -> {}",
            from,
            next
        );
        debug!(
            operation = self.operation,
            from = from.as_str(),
            to = next.as_str(),
            "pipeline stage"
        );
        self.history.push(next);
    }

    pub(crate) fn into_history(self) -> Vec<PipelineStage> {
        self.history
    }
}
