//! Task identity reporting.
//!
//! Every response carries the identifier of the task that served it, so
//! students can watch requests land on different replicas sharing one volume.

const UNKNOWN_TASK: &str = "unknown";

/// Source of the task identifier.
#[derive(Debug, Clone, Default)]
pub struct TaskIdentity {
    configured: Option<String>,
}

impl TaskIdentity {
    /// Create an identity source. A configured id always wins over the host.
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Current task identifier.
    ///
    /// Read on every call; the host name is not cached.
    pub fn current(&self) -> String {
        resolve(
            self.configured.as_deref(),
            std::env::var("HOSTNAME").ok(),
            system_hostname,
        )
    }
}

/// Host name as reported by the kernel (`uname`).
fn system_hostname() -> Option<String> {
    Some(gethostname::gethostname().to_string_lossy().into_owned())
}

fn resolve(
    configured: Option<&str>,
    env_hostname: Option<String>,
    system: impl FnOnce() -> Option<String>,
) -> String {
    if let Some(id) = configured {
        return id.to_string();
    }

    [env_hostname, system()]
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_TASK.to_string())
}
