use serde::{Deserialize, Serialize};

/// Base-map detail levels, in increasing vertex count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Medium,
    High,
}

impl Resolution {
    /// The dataset scale this level resolves to.
    pub fn scale(self) -> &'static str {
        match self {
            Resolution::Low => "110m",
            Resolution::Medium => "50m",
            Resolution::High => "10m",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "low" => Some(Resolution::Low),
            "medium" => Some(Resolution::Medium),
            "high" => Some(Resolution::High),
            _ => None,
        }
    }

    pub const ALL: [Resolution; 3] = [Resolution::Low, Resolution::Medium, Resolution::High];
}

#[cfg(test)]
mod tests {
    use super::Resolution;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip() {
        for r in Resolution::ALL {
            assert_eq!(Resolution::parse(r.name()), Some(r));
        }
    }

    #[test]
    fn scales_increase_in_detail() {
        assert_eq!(Resolution::Low.scale(), "110m");
        assert_eq!(Resolution::Medium.scale(), "50m");
        assert_eq!(Resolution::High.scale(), "10m");
    }
}
