//! Memory quantities in kilobytes
//!
//! All sizes are computed in KB and rendered with the largest PostgreSQL
//! unit (KB, MB, GB) that divides them evenly.

use serde::{Serialize, Serializer};
use std::fmt;

/// A memory or disk size, stored in kilobytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Kilobytes(pub u64);

impl Kilobytes {
    /// Create a quantity from a number of megabytes
    pub const fn from_megabytes(mb: u64) -> Self {
        Kilobytes(mb * 1024)
    }

    /// Raw kilobyte count
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Kilobytes {
    fn from(kb: u64) -> Self {
        Kilobytes(kb)
    }
}

impl fmt::Display for Kilobytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_kilobytes(self.0))
    }
}

impl Serialize for Kilobytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a kilobyte count the way postgresql.conf expects it.
///
/// Each step up (KB -> MB -> GB) is taken only when the value divides
/// evenly by 1024 and is at least 1024. A value that survives all three
/// steps is printed as the bare KB count.
pub fn format_kilobytes(kb: u64) -> String {
    if kb % 1024 != 0 || kb < 1024 {
        return format!("{}KB", kb);
    }
    let mb = kb / 1024;
    if mb % 1024 != 0 || mb < 1024 {
        return format!("{}MB", mb);
    }
    let gb = mb / 1024;
    if gb % 1024 != 0 || gb < 1024 {
        return format!("{}GB", gb);
    }
    kb.to_string()
}
