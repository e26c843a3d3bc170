//! Builder for `Reader` construction knobs (spec §5 "Reader").

#[derive(Clone, Debug, Default)]
pub struct ReaderOptions {
    /// Force legacy (v1-4, block-based) parsing even if the file claims a
    /// newer version — mostly useful for recovering a truncated/corrupt
    /// file header.
    pub force_legacy: bool,
    /// Skip the trailer's record index and scan records sequentially
    /// instead. Slower, but tolerates a missing/corrupt trailer.
    pub ignore_trailer_index: bool,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_legacy(mut self, v: bool) -> Self {
        self.force_legacy = v;
        self
    }

    pub fn ignore_trailer_index(mut self, v: bool) -> Self {
        self.ignore_trailer_index = v;
        self
    }
}
