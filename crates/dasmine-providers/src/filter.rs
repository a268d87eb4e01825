/// Account RDS uses for its own housekeeping connections
pub const DEFAULT_ADMIN_USER: &str = "rdsadmin";

/// Which activity events the normalizer drops before anything else sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub skip_admin_user: bool,
    pub admin_user: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            skip_admin_user: true,
            admin_user: DEFAULT_ADMIN_USER.to_string(),
        }
    }
}

impl EventFilter {
    /// Filter that keeps every user's activity
    pub fn keep_all() -> Self {
        Self {
            skip_admin_user: false,
            ..Self::default()
        }
    }

    pub fn excludes_user(&self, db_user: &str) -> bool {
        self.skip_admin_user && db_user == self.admin_user
    }
}
