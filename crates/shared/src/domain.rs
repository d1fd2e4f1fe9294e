use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ReviewId);

/// Backend-assigned tone of a review. Anything the backend sends that is not
/// one of the three known labels collapses into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Sentiment {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            _ => Self::Unknown,
        }
    }

    pub fn style(self) -> SentimentStyle {
        match self {
            Self::Positive => SentimentStyle {
                icon: "😊",
                color: "#4CAF50",
                label: "Positive",
            },
            Self::Negative => SentimentStyle {
                icon: "😞",
                color: "#F44336",
                label: "Negative",
            },
            Self::Neutral => SentimentStyle {
                icon: "😐",
                color: "#FF9800",
                label: "Neutral",
            },
            Self::Unknown => SentimentStyle {
                icon: "❓",
                color: "#9E9E9E",
                label: "Unknown",
            },
        }
    }
}

/// Display tuple for a sentiment badge. `color` is a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentStyle {
    pub icon: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}
