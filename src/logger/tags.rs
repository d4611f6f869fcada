/// Log tags identify the subsystem a message comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Cache,
    Index,
    Blobs,
}

impl LogTag {
    /// Key used for per-tag debug enablement
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Cache => "cache",
            LogTag::Index => "index",
            LogTag::Blobs => "blobs",
        }
    }

    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Cache => "CACHE",
            LogTag::Index => "INDEX",
            LogTag::Blobs => "BLOBS",
        }
    }
}
