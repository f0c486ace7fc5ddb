/// Click budget tracking for the load-more loop.
///
/// Invariant: `clicks_performed <= max_clicks`, monotonically increasing,
/// never reset within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    clicks_performed: u32,
    max_clicks: u32,
}

impl PaginationState {
    pub fn new(max_clicks: u32) -> Self {
        Self {
            clicks_performed: 0,
            max_clicks,
        }
    }

    pub fn clicks_performed(&self) -> u32 {
        self.clicks_performed
    }

    pub fn max_clicks(&self) -> u32 {
        self.max_clicks
    }

    pub fn budget_exhausted(&self) -> bool {
        self.clicks_performed >= self.max_clicks
    }

    /// Record one activation. Returns `false` without counting if the
    /// budget is already spent.
    pub fn record_click(&mut self) -> bool {
        if self.budget_exhausted() {
            return false;
        }
        self.clicks_performed += 1;
        true
    }
}
