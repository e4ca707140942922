//! @ai:module:intent Static registry of prompt versions and their metadata
//! @ai:module:layer domain
//! @ai:module:public_api PromptVersion, PromptMetadata
//! @ai:module:stateless true

use crate::error::PromptError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// @ai:intent Named prompt template used to ask the model for both summaries
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVersion {
    Default,
    Concise,
    Detailed,
    UserFocused,
    TechnicalFocused,
    Structured,
    Conversational,
    BulletPoints,
}

/// @ai:intent Descriptive attributes of a prompt version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptMetadata {
    pub description: &'static str,
    pub focus: &'static str,
    pub style: &'static str,
    pub length: &'static str,
}

impl PromptVersion {
    /// Registration order; listings and error messages follow it.
    pub const ALL: [PromptVersion; 8] = [
        PromptVersion::Default,
        PromptVersion::Concise,
        PromptVersion::Detailed,
        PromptVersion::UserFocused,
        PromptVersion::TechnicalFocused,
        PromptVersion::Structured,
        PromptVersion::Conversational,
        PromptVersion::BulletPoints,
    ];

    /// @ai:intent Registry key of this prompt version
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptVersion::Default => "default",
            PromptVersion::Concise => "concise",
            PromptVersion::Detailed => "detailed",
            PromptVersion::UserFocused => "user_focused",
            PromptVersion::TechnicalFocused => "technical_focused",
            PromptVersion::Structured => "structured",
            PromptVersion::Conversational => "conversational",
            PromptVersion::BulletPoints => "bullet_points",
        }
    }

    /// @ai:intent Look up a prompt version by registry key
    /// @ai:post Err lists every registered name
    /// @ai:effects pure
    pub fn get(name: &str) -> Result<Self, PromptError> {
        Self::ALL
            .iter()
            .copied()
            .find(|version| version.as_str() == name)
            .ok_or_else(|| PromptError::NotFound {
                name: name.to_string(),
                available: Self::names(),
            })
    }

    /// @ai:intent All registered names in registration order
    /// @ai:effects pure
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
    }

    /// @ai:intent Raw template body with {title}, {body}, {diff_excerpt}, {max_diff_length} placeholders
    /// @ai:effects pure
    pub fn template(&self) -> &'static str {
        match self {
            PromptVersion::Default => DEFAULT_TEMPLATE,
            PromptVersion::Concise => CONCISE_TEMPLATE,
            PromptVersion::Detailed => DETAILED_TEMPLATE,
            PromptVersion::UserFocused => USER_FOCUSED_TEMPLATE,
            PromptVersion::TechnicalFocused => TECHNICAL_FOCUSED_TEMPLATE,
            PromptVersion::Structured => STRUCTURED_TEMPLATE,
            PromptVersion::Conversational => CONVERSATIONAL_TEMPLATE,
            PromptVersion::BulletPoints => BULLET_POINTS_TEMPLATE,
        }
    }

    /// @ai:intent Describe the intent and tone of this prompt version
    /// @ai:effects pure
    pub fn describe(&self) -> PromptMetadata {
        match self {
            PromptVersion::Default => PromptMetadata {
                description: "Original prompt from current system",
                focus: "balanced",
                style: "formal",
                length: "medium",
            },
            PromptVersion::Concise => PromptMetadata {
                description: "Shorter, more direct approach",
                focus: "brevity",
                style: "minimal",
                length: "short",
            },
            PromptVersion::Detailed => PromptMetadata {
                description: "Comprehensive with specific guidance",
                focus: "completeness",
                style: "formal",
                length: "long",
            },
            PromptVersion::UserFocused => PromptMetadata {
                description: "Emphasizes user benefits and business value",
                focus: "user_impact",
                style: "business",
                length: "medium",
            },
            PromptVersion::TechnicalFocused => PromptMetadata {
                description: "Technical precision and accuracy",
                focus: "technical_accuracy",
                style: "technical",
                length: "medium",
            },
            PromptVersion::Structured => PromptMetadata {
                description: "Clear structure with checkboxes",
                focus: "organization",
                style: "structured",
                length: "medium",
            },
            PromptVersion::Conversational => PromptMetadata {
                description: "Natural, informal language",
                focus: "accessibility",
                style: "casual",
                length: "short",
            },
            PromptVersion::BulletPoints => PromptMetadata {
                description: "Bullet point format",
                focus: "readability",
                style: "formatted",
                length: "medium",
            },
        }
    }
}

impl FromStr for PromptVersion {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::get(s)
    }
}

impl std::fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const DEFAULT_TEMPLATE: &str = r#"You are a technical writer creating PR summaries.

Analyze this pull request and create two summaries:

PR DETAILS:
Title: {title}
Description: {body}
Diff (first {max_diff_length} chars): {diff_excerpt}

INSTRUCTIONS:
- Create a "technical" summary (2-3 sentences describing what changed technically)
- Create a "marketing" summary (1-2 sentences describing user benefits, or "Minor technical improvements" for basic fixes)
- Do not mention author names in the summaries
- Respond with ONLY a valid JSON object, no other text
- Use this exact format: {{"technical": "your technical summary", "marketing": "your marketing summary"}}

JSON Response:"#;

const CONCISE_TEMPLATE: &str = r#"Analyze this PR and create two brief summaries:

PR: {title}
Description: {body}
Changes: {diff_excerpt}

Create:
1. Technical summary: What changed (1-2 sentences)
2. Marketing summary: User benefit (1 sentence)

Return only JSON: {{"technical": "...", "marketing": "..."}}"#;

const DETAILED_TEMPLATE: &str = r#"You are an expert technical writer specializing in software development communication.

TASK: Create professional summaries for this pull request that will be shared with both technical and business stakeholders.

PR INFORMATION:
Title: {title}
Description: {body}
Code Changes: {diff_excerpt}

REQUIREMENTS:

Technical Summary:
- 2-3 sentences maximum
- Focus on WHAT changed (files, functions, logic)
- Include technical details like APIs, algorithms, or architecture changes
- Use precise technical language
- Avoid implementation details that don't affect functionality

Marketing Summary:
- 1-2 sentences maximum
- Focus on WHY it matters to users/business
- Highlight user-facing benefits, performance improvements, or problem solutions
- Use accessible language that non-technical stakeholders can understand
- If no clear user benefit, use "Technical improvements and maintenance"

OUTPUT FORMAT:
Respond with ONLY valid JSON, no additional text or explanation.
Format: {{"technical": "your technical summary", "marketing": "your marketing summary"}}

JSON Response:"#;

const USER_FOCUSED_TEMPLATE: &str = r#"Create summaries for this PR focusing on user impact:

PR: {title}
Details: {body}
Changes: {diff_excerpt}

For each summary, think about:
- Technical: What systems/components were modified?
- Marketing: How does this improve the user experience?

Create concise summaries that emphasize user benefits and business value.

Return JSON: {{"technical": "...", "marketing": "..."}}"#;

const TECHNICAL_FOCUSED_TEMPLATE: &str = r#"As a senior software engineer, analyze this PR with technical precision:

PR: {title}
Description: {body}
Diff: {diff_excerpt}

Technical Summary Requirements:
- Identify specific components/modules affected
- Mention architectural patterns or design changes
- Include performance implications if evident
- Use exact technical terminology

Marketing Summary Requirements:
- Translate technical changes into business value
- Focus on measurable improvements
- Keep it factual and specific

Output JSON only: {{"technical": "...", "marketing": "..."}}"#;

const STRUCTURED_TEMPLATE: &str = r#"PULL REQUEST ANALYSIS

INPUT:
- Title: {title}
- Description: {body}
- Code Changes: {diff_excerpt}

OUTPUT REQUIREMENTS:

Technical Summary:
□ What was changed (files, functions, logic)
□ How it was implemented
□ Technical impact/scope
□ 2-3 sentences maximum

Marketing Summary:
□ User-facing benefits
□ Business value
□ Problem solved
□ 1-2 sentences maximum

RESPONSE FORMAT:
{{"technical": "your technical summary", "marketing": "your marketing summary"}}

Response:"#;

const CONVERSATIONAL_TEMPLATE: &str = r#"Hey! I need you to help me explain this pull request to different audiences.

Here's what happened:
- PR Title: {title}
- What they said: {body}
- What actually changed: {diff_excerpt}

Can you help me write two explanations?

1. For the tech team - what exactly changed in the code?
2. For everyone else - why should they care?

Keep it short and sweet. Just give me back:
{{"technical": "explanation for developers", "marketing": "explanation for everyone else"}}"#;

const BULLET_POINTS_TEMPLATE: &str = r#"Summarize this PR in bullet points:

PR: {title}
Description: {body}
Changes: {diff_excerpt}

Technical Summary (bullet points):
• What files/components were modified
• What functionality was added/changed
• Any architectural or design changes

Marketing Summary (bullet points):
• User benefits or improvements
• Business value
• Problem solved

Convert to JSON format: {{"technical": "• point 1 • point 2 • point 3", "marketing": "• benefit 1 • benefit 2"}}"#;
