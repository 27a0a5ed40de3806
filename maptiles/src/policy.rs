//! Tile server usage policy.
//!
//! Public tile servers publish usage rules: how many parallel connections a
//! client may open, whether area (bulk) downloads or preventive caching are
//! tolerated, and what the client must send as its user agent. A
//! [`TileSourcePolicy`] carries those rules alongside each tile source so the
//! rendering client can honour them.

use std::fmt;
use std::ops::BitOr;

/// User agent sent when the application does not configure one.
pub const DEFAULT_USER_AGENT: &str = "maptiles";

/// Policy flag bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolicyFlags(u8);

impl PolicyFlags {
    pub const NONE: PolicyFlags = PolicyFlags(0);
    /// Bulk (area) download is not allowed.
    pub const NO_BULK: PolicyFlags = PolicyFlags(1);
    /// Preventive caching is not allowed.
    pub const NO_PREVENTIVE: PolicyFlags = PolicyFlags(2);
    /// Requests must carry a non-empty, non-default user agent.
    pub const USER_AGENT_MEANINGFUL: PolicyFlags = PolicyFlags(4);
    /// The user agent must be sanitized before use.
    pub const USER_AGENT_NORMALIZED: PolicyFlags = PolicyFlags(8);

    /// All named flags with their configuration names.
    pub const NAMED: [(&'static str, PolicyFlags); 4] = [
        ("no_bulk", Self::NO_BULK),
        ("no_preventive", Self::NO_PREVENTIVE),
        ("user_agent_meaningful", Self::USER_AGENT_MEANINGFUL),
        ("user_agent_normalized", Self::USER_AGENT_NORMALIZED),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        PolicyFlags(bits & 0x0F)
    }

    pub const fn contains(self, other: PolicyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Looks up a flag by its configuration name.
    pub fn from_name(name: &str) -> Option<PolicyFlags> {
        Self::NAMED
            .iter()
            .find(|(flag_name, _)| *flag_name == name)
            .map(|(_, flag)| *flag)
    }

    /// Configuration names of the flags that are set.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for PolicyFlags {
    type Output = PolicyFlags;

    fn bitor(self, rhs: PolicyFlags) -> PolicyFlags {
        PolicyFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for PolicyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// Usage policy attached to a tile source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSourcePolicy {
    max_concurrent_downloads: u8,
    flags: PolicyFlags,
}

impl Default for TileSourcePolicy {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 0,
            flags: PolicyFlags::NONE,
        }
    }
}

impl TileSourcePolicy {
    /// Creates a policy. A connection limit of 0 means "no stated limit".
    pub const fn new(max_concurrent_downloads: u8, flags: PolicyFlags) -> Self {
        Self {
            max_concurrent_downloads,
            flags,
        }
    }

    pub fn max_concurrent_downloads(&self) -> u8 {
        self.max_concurrent_downloads
    }

    pub fn flags(&self) -> PolicyFlags {
        self.flags
    }

    pub fn accepts_bulk_download(&self) -> bool {
        !self.flags.contains(PolicyFlags::NO_BULK)
    }

    pub fn accepts_preventive_download(&self) -> bool {
        !self.flags.contains(PolicyFlags::NO_PREVENTIVE)
    }

    pub fn requires_meaningful_user_agent(&self) -> bool {
        self.flags.contains(PolicyFlags::USER_AGENT_MEANINGFUL)
    }

    pub fn normalizes_user_agent(&self) -> bool {
        self.flags.contains(PolicyFlags::USER_AGENT_NORMALIZED)
    }

    /// Returns false when the server requires a meaningful agent and `user_agent`
    /// is blank or the library default.
    pub fn accepts_user_agent(&self, user_agent: &str) -> bool {
        if !self.requires_meaningful_user_agent() {
            return true;
        }
        let trimmed = user_agent.trim();
        !trimmed.is_empty() && trimmed != DEFAULT_USER_AGENT
    }

    /// Sanitizes `user_agent` when the policy asks for it.
    ///
    /// Trims surrounding whitespace and replaces anything outside printable
    /// ASCII with `_`.
    pub fn normalize_user_agent(&self, user_agent: &str) -> String {
        if !self.normalizes_user_agent() {
            return user_agent.to_string();
        }
        user_agent
            .trim()
            .chars()
            .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> TileSourcePolicy {
        TileSourcePolicy::new(
            2,
            PolicyFlags::NO_BULK
                | PolicyFlags::NO_PREVENTIVE
                | PolicyFlags::USER_AGENT_MEANINGFUL
                | PolicyFlags::USER_AGENT_NORMALIZED,
        )
    }

    #[test]
    fn test_flag_bits() {
        let flags = PolicyFlags::NO_BULK | PolicyFlags::USER_AGENT_NORMALIZED;
        assert_eq!(flags.bits(), 9);
        assert!(flags.contains(PolicyFlags::NO_BULK));
        assert!(!flags.contains(PolicyFlags::NO_PREVENTIVE));
        assert_eq!(PolicyFlags::from_bits(0xFF).bits(), 0x0F);
    }

    #[test]
    fn test_flag_names() {
        assert_eq!(
            PolicyFlags::from_name("no_preventive"),
            Some(PolicyFlags::NO_PREVENTIVE)
        );
        assert_eq!(PolicyFlags::from_name("NO_BULK"), None);
        assert_eq!(
            strict().flags().to_string(),
            "no_bulk, no_preventive, user_agent_meaningful, user_agent_normalized"
        );
        assert_eq!(PolicyFlags::NONE.to_string(), "none");
    }

    #[test]
    fn test_default_policy_allows_everything() {
        let policy = TileSourcePolicy::default();
        assert!(policy.accepts_bulk_download());
        assert!(policy.accepts_preventive_download());
        assert!(policy.accepts_user_agent(""));
        assert_eq!(policy.normalize_user_agent(" raw\tagent "), " raw\tagent ");
    }

    #[test]
    fn test_strict_policy() {
        let policy = strict();
        assert_eq!(policy.max_concurrent_downloads(), 2);
        assert!(!policy.accepts_bulk_download());
        assert!(!policy.accepts_preventive_download());
    }

    #[test]
    fn test_meaningful_user_agent() {
        let policy = strict();
        assert!(!policy.accepts_user_agent(""));
        assert!(!policy.accepts_user_agent("   "));
        assert!(!policy.accepts_user_agent(DEFAULT_USER_AGENT));
        assert!(policy.accepts_user_agent("meshmap/2.1 (contact@example.com)"));
    }

    #[test]
    fn test_normalize_user_agent() {
        let policy = strict();
        assert_eq!(policy.normalize_user_agent("  app/1.0\n"), "app/1.0");
        assert_eq!(policy.normalize_user_agent("café/1\tx"), "caf_/1_x");
    }
}
