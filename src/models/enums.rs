use crate::knowledge::KnowledgeBaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Extra `| "alias"` literals are accepted on parse and deserialize only.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s $(, alias = $alias)*)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = KnowledgeBaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s $(| $alias)* => Ok(Self::$variant)),+,
                    _ => Err(KnowledgeBaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Legacy knowledge files use the Indonesian tier names.
str_enum!(Severity {
    Mild => "mild" | "ringan",
    Moderate => "moderate" | "sedang",
    Severe => "severe" | "berat",
});

str_enum!(ConfidenceBand {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

impl ConfidenceBand {
    /// Band a confidence percentage: >=70 high, >=40 moderate, otherwise low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 70.0 {
            Self::High
        } else if confidence >= 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}
