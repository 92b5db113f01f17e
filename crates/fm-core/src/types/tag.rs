//! Classification tags for discovered resources.
//!
//! This module provides the [`ClassificationTag`] enum, the closed set of
//! risk/interest categories a file can be highlighted with.

use serde::{Deserialize, Serialize};

/// The risk/interest category assigned to a file resource.
///
/// The declaration order is the reference evaluation order of the default
/// rule set, and the derived [`Ord`] follows it, so a `BTreeMap` keyed by tag
/// lists categories in precedence order.
///
/// A resource with no matching rule carries no tag (`Option::None`).
///
/// # Examples
///
/// ```
/// use fm_core::ClassificationTag;
///
/// assert_eq!(ClassificationTag::PRECEDENCE[0], ClassificationTag::SensitiveKeyword);
/// assert!(ClassificationTag::SensitiveKeyword < ClassificationTag::SourceCode);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTag {
    /// File name contains a sensitive keyword as a whole word (`admin`, `password`, ...).
    /// Any character other than a letter or digit separates words, so
    /// `admin_panel.php` matches and `badminton.html` does not.
    SensitiveKeyword,

    /// Credential or key material (`.htpasswd`, `.pem`, `id_rsa`, ...).
    CredentialStore,

    /// Backup, swap, or temporary copies (`.bak`, `.old`, `.swp`, `file~`, ...).
    BackupTemp,

    /// Server, application, or environment configuration (`.env`, `config.php`, `web.config`, ...).
    NetworkConfig,

    /// Database files and dumps (`.sql`, `.sqlite`, `.mdb`, ...).
    Database,

    /// Log files (`.log`, `error_log`, ...).
    Log,

    /// Archives (`.zip`, `.tar.gz`, `.7z`, ...).
    Archive,

    /// Exposed source code (`.inc`, `.phps`, `.java`, `.py`, ...).
    SourceCode,
}

impl ClassificationTag {
    /// Every tag, in the reference evaluation order.
    pub const PRECEDENCE: [Self; 8] = [
        Self::SensitiveKeyword,
        Self::CredentialStore,
        Self::BackupTemp,
        Self::NetworkConfig,
        Self::Database,
        Self::Log,
        Self::Archive,
        Self::SourceCode,
    ];

    /// Returns a human-readable label for report headings.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_core::ClassificationTag;
    ///
    /// assert_eq!(ClassificationTag::BackupTemp.label(), "Backup/Temporary Files");
    /// ```
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SensitiveKeyword => "Sensitive Keywords",
            Self::CredentialStore => "Credential Stores",
            Self::BackupTemp => "Backup/Temporary Files",
            Self::NetworkConfig => "Configuration/Environment Files",
            Self::Database => "Database Files",
            Self::Log => "Log Files",
            Self::Archive => "Archive Files",
            Self::SourceCode => "Source Code",
        }
    }

    /// Returns the short machine name, matching the serde representation.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SensitiveKeyword => "sensitive_keyword",
            Self::CredentialStore => "credential_store",
            Self::BackupTemp => "backup_temp",
            Self::NetworkConfig => "network_config",
            Self::Database => "database",
            Self::Log => "log",
            Self::Archive => "archive",
            Self::SourceCode => "source_code",
        }
    }

    /// Returns the built-in pattern for this tag.
    ///
    /// Patterns are matched case-insensitively against the file name only
    /// (the final path segment), never against the directory part.
    #[must_use]
    pub const fn default_pattern(self) -> &'static str {
        match self {
            Self::SensitiveKeyword => {
                r"(^|[^a-z0-9])(admin|administrator|password|passwords|passwd|secret|secrets|credential|credentials|private|token|tokens|apikey|api_key|api-key)([^a-z0-9]|$)"
            }
            Self::CredentialStore => {
                r"(\.(htpasswd|pem|key|p12|pfx|jks|keystore|kdbx|ppk|gpg|pgp|asc|crt|cer|der)$)|(^id_(rsa|dsa|ecdsa|ed25519)(\.pub)?$)|(^\.?(netrc|pgpass|git-credentials|npmrc|pypirc)$)"
            }
            Self::BackupTemp => {
                r"(\.(bak|backup|bk|old|orig|tmp|temp|swp|swo|save|sav|copy)$)|(~\w*$)"
            }
            Self::NetworkConfig => {
                r"((^|\.)(env|config\.php|config\.js|config\.json|config\.xml|config\.ya?ml|web\.config|php\.ini|settings\.py|appsettings\.json|wp-config\.php|local\.xml|htaccess)$)|(\.(conf|cfg|cnf|ini|properties|ovpn)$)"
            }
            Self::Database => r"\.(sql|sqlite|sqlite3|db|db3|mdb|accdb|dbf|mdf|ldf|dump)$",
            Self::Log => r"(\.log$)|((^|[._-])(error|access|debug)_log$)",
            Self::Archive => r"\.(zip|tar|gz|tgz|bz2|xz|rar|7z|war|jar)$",
            Self::SourceCode => {
                r"(\.(inc|phps|java|cs|py|rb|pl|go|c|cpp|h|sh)$)|(\.php_)|(^\.(gitignore|gitattributes|hgignore)$)"
            }
        }
    }
}

impl std::fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
