use std::fmt;

/// Snipe-IT categories synced into the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Hardware,
    LockerKey,
    AccessCard,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::Hardware,
        AssetCategory::LockerKey,
        AssetCategory::AccessCard,
    ];

    /// Snipe-IT `category_id`.
    pub fn id(self) -> u32 {
        match self {
            AssetCategory::Hardware => 2,
            AssetCategory::LockerKey => 25,
            AssetCategory::AccessCard => 26,
        }
    }

    /// Jira custom field receiving this category's serials.
    pub fn jira_field(self) -> &'static str {
        match self {
            AssetCategory::Hardware => "customfield_10374",
            AssetCategory::LockerKey => "customfield_11817",
            AssetCategory::AccessCard => "customfield_11823",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetCategory::Hardware => "hardware",
            AssetCategory::LockerKey => "locker keys",
            AssetCategory::AccessCard => "access cards",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
