use serde::Serialize;

/// Content categories the provider filters on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Every category set to BLOCK_NONE
pub const PERMISSIVE: [SafetySetting; 4] = [
    SafetySetting {
        category: HarmCategory::HateSpeech,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::Harassment,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::SexuallyExplicit,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: HarmBlockThreshold::BlockNone,
    },
];
