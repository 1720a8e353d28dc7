use std::fmt;

use serde::{Deserialize, Serialize};

/// The two adjacent pipeline stages taking part in a promotion.
///
/// `lower` is the source of new changes (e.g. `dev1`), `higher` is the
/// promotion target (e.g. `sit1`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvPair {
    pub lower: String,
    pub higher: String,
}

impl EnvPair {
    pub fn new(lower: impl Into<String>, higher: impl Into<String>) -> Self {
        Self {
            lower: lower.into().trim().to_string(),
            higher: higher.into().trim().to_string(),
        }
    }
}

impl fmt::Display for EnvPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lower, self.higher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let envs = EnvPair::new(" dev1 ", "sit1\n");
        assert_eq!(envs.lower, "dev1");
        assert_eq!(envs.higher, "sit1");
        assert_eq!(envs.to_string(), "dev1 -> sit1");
    }
}
