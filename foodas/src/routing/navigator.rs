use parking_lot::Mutex;
use std::fmt;
use tracing::debug;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";
/// Where unauthorized users and unmatched paths land
pub const DEFAULT_PATH: &str = "/";
/// Where a login without a remembered destination lands
pub const POST_LOGIN_PATH: &str = "/dashboard";

/// A navigation target, optionally remembering where the user was headed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }

    pub fn login() -> Self {
        Self::new(LOGIN_PATH)
    }

    /// Login view that returns to `from` after a successful sign-in
    pub fn login_from(from: impl Into<String>) -> Self {
        Self {
            path: LOGIN_PATH.to_string(),
            from: Some(from.into()),
        }
    }

    pub fn is_login(&self) -> bool {
        self.path == LOGIN_PATH
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} (from {})", self.path, from),
            None => f.write_str(&self.path),
        }
    }
}

/// Seam between the core and whatever renders views
pub trait Navigator: Send + Sync {
    /// Move to `location`; `replace` overwrites the current history entry.
    fn navigate(&self, location: Location, replace: bool);
}

/// In-memory history stack
#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<Location>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![Location::new(path)]),
        }
    }

    pub fn current(&self) -> Option<Location> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Navigator for MemoryHistory {
    fn navigate(&self, location: Location, replace: bool) {
        debug!("Navigating to {} (replace: {})", location, replace);
        let mut entries = self.entries.lock();
        if replace {
            entries.pop();
        }
        entries.push(location);
    }
}
