use serde::{Deserialize, Serialize};

/// Harm categories a safety threshold can be applied to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    /// Negative or harmful comments targeting identity or protected attributes.
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,

    /// Content that is rude, disrespectful, or profane.
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,

    /// References to sexual acts or other lewd content.
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,

    /// Content that promotes or enables access to harmful goods or activities.
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,

    /// Content that may be used to harm civic integrity.
    #[serde(rename = "HARM_CATEGORY_CIVIC_INTEGRITY")]
    CivicIntegrity,
}

/// The probability threshold at which content is blocked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Block when the probability is low, medium or high.
    BlockLowAndAbove,

    /// Block when the probability is medium or high.
    BlockMediumAndAbove,

    /// Block only when the probability is high.
    BlockOnlyHigh,

    /// Never block.
    BlockNone,

    /// Turn the safety filter off.
    Off,
}

/// A safety threshold for one harm category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SafetySetting {
    /// The category this setting applies to.
    pub category: HarmCategory,

    /// The probability threshold at which content is blocked.
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Create a new safety setting.
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }

    /// Harassment, hate speech, sexually explicit and dangerous content, each
    /// blocked at medium probability and above.
    pub fn defaults() -> Vec<SafetySetting> {
        [
            HarmCategory::Harassment,
            HarmCategory::HateSpeech,
            HarmCategory::SexuallyExplicit,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting::new(category, HarmBlockThreshold::BlockMediumAndAbove))
        .collect()
    }
}

/// The safety rating the API assigned to a piece of content.
///
/// Categories and probabilities are kept as the strings the API sent so that
/// categories introduced later still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyRating {
    /// The harm category, e.g. `HARM_CATEGORY_HARASSMENT`.
    pub category: String,

    /// The probability bucket, e.g. `NEGLIGIBLE`.
    pub probability: String,

    /// Whether this rating caused the content to be blocked.
    #[serde(default)]
    pub blocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn default_settings_wire_shape() {
        assert_eq!(
            to_value(SafetySetting::defaults()).unwrap(),
            json!([
                {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"}
            ])
        );
    }

    #[test]
    fn rating_accepts_unknown_categories() {
        let rating: SafetyRating = serde_json::from_value(json!({
            "category": "HARM_CATEGORY_SOMETHING_NEW",
            "probability": "NEGLIGIBLE"
        }))
        .unwrap();
        assert!(!rating.blocked);
        assert_eq!(rating.probability, "NEGLIGIBLE");
    }
}
