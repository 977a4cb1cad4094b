/// Render counters for one pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Calls to `request_render`
    pub requests: u64,

    /// Requests dropped because no document was loaded or the page was out of range
    pub ignored: u64,

    /// Requests parked in the pending slot while busy
    pub coalesced: u64,

    /// Rasterizations started
    pub passes: u64,

    /// Rasterizations that failed
    pub failures: u64,

    /// Parked requests that no longer applied when their turn came
    pub dropped: u64,
}
