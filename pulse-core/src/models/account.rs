use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    X,
}

impl Platform {
    /// All platforms, in canonical order.
    pub const ALL: [Platform; 4] = [
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Instagram,
        Platform::X,
    ];

    /// Stable storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::X => "x",
        }
    }

    /// Parse a stable storage name back into a platform.
    pub fn parse(name: &str) -> Option<Platform> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    /// Dense index, usable for per-platform guard arrays.
    pub fn index(&self) -> usize {
        match self {
            Platform::Youtube => 0,
            Platform::Tiktok => 1,
            Platform::Instagram => 2,
            Platform::X => 3,
        }
    }
}

/// Account lifecycle status. Owned by the account-lifecycle subsystem;
/// read-only inside the prediction core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Setup,
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Setup => "setup",
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn parse(name: &str) -> Option<AccountStatus> {
        match name {
            "setup" => Some(AccountStatus::Setup),
            "active" => Some(AccountStatus::Active),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

/// Account age bucket used for cohort baselines. Six fixed buckets derived
/// from the account creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBucket {
    New,
    Young,
    Growing,
    Established,
    Mature,
    Veteran,
}

impl AgeBucket {
    /// Bucket an account by its age in days.
    pub fn from_age_days(days: i64) -> AgeBucket {
        match days {
            d if d <= 30 => AgeBucket::New,
            d if d <= 60 => AgeBucket::Young,
            d if d <= 90 => AgeBucket::Growing,
            d if d <= 180 => AgeBucket::Established,
            d if d <= 365 => AgeBucket::Mature,
            _ => AgeBucket::Veteran,
        }
    }

    /// Bucket an account by creation time relative to `now`.
    pub fn from_created_at(created_at: DateTime<Utc>, now: DateTime<Utc>) -> AgeBucket {
        Self::from_age_days((now - created_at).num_days())
    }
}

/// A posting account. Owned by the account-lifecycle subsystem (external);
/// the prediction core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub platform: Platform,
    pub niche: Option<String>,
    pub cluster: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_buckets_cover_boundaries() {
        assert_eq!(AgeBucket::from_age_days(0), AgeBucket::New);
        assert_eq!(AgeBucket::from_age_days(30), AgeBucket::New);
        assert_eq!(AgeBucket::from_age_days(31), AgeBucket::Young);
        assert_eq!(AgeBucket::from_age_days(60), AgeBucket::Young);
        assert_eq!(AgeBucket::from_age_days(90), AgeBucket::Growing);
        assert_eq!(AgeBucket::from_age_days(180), AgeBucket::Established);
        assert_eq!(AgeBucket::from_age_days(365), AgeBucket::Mature);
        assert_eq!(AgeBucket::from_age_days(366), AgeBucket::Veteran);
    }

    #[test]
    fn platform_names_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::parse(platform.as_str()), Some(platform));
        }
    }
}
