//! Cache descriptors as reported by the store
//!
//! A descriptor is a point-in-time snapshot of one cache. Nothing here
//! is validated on construction; checks belong to the verifier.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a cache survives process exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persistence {
    /// Memory-mapped file, survives reboot
    Persistent,
    /// OS shared memory, gone with the owning session
    NonPersistent,
}

impl Persistence {
    /// Build from the `persistent` flag
    pub fn from_flag(persistent: bool) -> Self {
        if persistent {
            Self::Persistent
        } else {
            Self::NonPersistent
        }
    }

    /// Whether this is the persistent kind
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent)
    }
}

impl fmt::Display for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::NonPersistent => write!(f, "non-persistent"),
        }
    }
}

/// Address width the cache was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    Bits32,
    Bits64,
    /// Anything else the store reported
    Unknown(String),
}

impl AddressMode {
    /// Map a numeric mode (32 or 64)
    pub fn from_bits(bits: i64) -> Self {
        match bits {
            32 => Self::Bits32,
            64 => Self::Bits64,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether the mode is one of the known widths
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl FromStr for AddressMode {
    type Err = std::convert::Infallible;

    /// Parses `32-bit`, `64-bit`, `32` or `64`; anything else is `Unknown`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches("-bit");
        Ok(match digits.parse::<i64>() {
            Ok(bits) => Self::from_bits(bits),
            Err(_) => Self::Unknown(s.trim().to_string()),
        })
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits32 => write!(f, "32-bit"),
            Self::Bits64 => write!(f, "64-bit"),
            Self::Unknown(raw) => write!(f, "unknown ({})", raw),
        }
    }
}

/// One cache as seen by a single enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheDescriptor {
    /// Cache name; absent for malformed entries
    pub name: Option<String>,
    pub persistence: Persistence,
    pub address_mode: AddressMode,
    /// Total size, when the store reports it
    pub size_bytes: Option<u64>,
    /// Free space, when the store reports it
    pub free_bytes: Option<u64>,
    /// Opaque runtime level tag, e.g. `Java17`
    pub jvm_level: String,
    pub compatible: bool,
    pub corrupt: bool,
    /// Absent when the cache was never detached (or is in use)
    pub last_detach_time: Option<NaiveDateTime>,
    pub os_semid: Option<i64>,
    pub os_shmid: Option<i64>,
}

impl CacheDescriptor {
    /// Create a descriptor with neutral defaults
    pub fn new(name: impl Into<String>, persistence: Persistence, address_mode: AddressMode) -> Self {
        Self {
            name: Some(name.into()),
            persistence,
            address_mode,
            size_bytes: None,
            free_bytes: None,
            jvm_level: String::new(),
            compatible: true,
            corrupt: false,
            last_detach_time: None,
            os_semid: None,
            os_shmid: None,
        }
    }

    /// The name, treating an empty string as absent
    pub fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Whether the store reports this cache as persistent
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_persistent()
    }
}
