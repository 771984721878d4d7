use std::collections::HashSet;

/// Kinds of background work the UI can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Fetch,
    Download,
    Save,
}

impl JobKind {
    pub fn describe(self) -> &'static str {
        match self {
            JobKind::Fetch => "fetch",
            JobKind::Download => "download",
            JobKind::Save => "save",
        }
    }

    /// A fetch replaces the session a download works from, and a save reads
    /// the temp area a download writes to.
    fn conflicts_with(self, other: JobKind) -> bool {
        matches!(
            (self, other),
            (JobKind::Fetch, JobKind::Download)
                | (JobKind::Download, JobKind::Fetch)
                | (JobKind::Download, JobKind::Save)
                | (JobKind::Save, JobKind::Download)
        )
    }
}

/// Single-flight bookkeeping: at most one job per kind, and never two
/// conflicting jobs at the same time.
#[derive(Debug, Default)]
pub struct JobTracker {
    running: HashSet<JobKind>,
}

impl JobTracker {
    pub fn can_start(&self, kind: JobKind) -> bool {
        !self.running.contains(&kind) && !self.running.iter().any(|r| kind.conflicts_with(*r))
    }

    /// Marks `kind` as running. Returns false if it may not start now.
    pub fn try_start(&mut self, kind: JobKind) -> bool {
        if !self.can_start(kind) {
            tracing::debug!(job = kind.describe(), running = ?self.running, "job refused");
            return false;
        }
        self.running.insert(kind)
    }

    pub fn finish(&mut self, kind: JobKind) {
        self.running.remove(&kind);
    }

    pub fn is_running(&self, kind: JobKind) -> bool {
        self.running.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_per_kind() {
        let mut jobs = JobTracker::default();
        assert!(jobs.try_start(JobKind::Fetch));
        assert!(!jobs.try_start(JobKind::Fetch));
        jobs.finish(JobKind::Fetch);
        assert!(jobs.try_start(JobKind::Fetch));
    }

    #[test]
    fn test_download_excludes_fetch_and_save() {
        let mut jobs = JobTracker::default();
        assert!(jobs.try_start(JobKind::Download));
        assert!(!jobs.can_start(JobKind::Fetch));
        assert!(!jobs.can_start(JobKind::Save));
        jobs.finish(JobKind::Download);
        assert!(jobs.can_start(JobKind::Fetch));
        assert!(jobs.can_start(JobKind::Save));
    }

    #[test]
    fn test_fetch_and_save_may_overlap() {
        let mut jobs = JobTracker::default();
        assert!(jobs.try_start(JobKind::Save));
        assert!(jobs.try_start(JobKind::Fetch));
        assert!(!jobs.can_start(JobKind::Download));
        assert!(jobs.is_running(JobKind::Save));
    }
}
