/// Prompts for the project suggestion agent
pub struct PromptLibrary;

/// Word budget the suggestion must stay under
pub const SUGGESTION_WORD_LIMIT: usize = 180;

impl PromptLibrary {
    /// System preamble establishing the mentor persona
    pub fn mentor_preamble() -> &'static str {
        "You are a thoughtful, encouraging senior engineer career mentor. \
        You look at what a developer has actually built and what they are curious about, \
        and you recommend projects that are concrete, achievable and a little bit ambitious. \
        Use the available GitHub tools to ground every recommendation in real data."
    }

    /// Task prompt for a single username
    pub fn project_suggestion(username: &str) -> String {
        format!(
            "Task: Given the GitHub username \"{username}\", use the available tools to:\n\
            1) Identify their top programming languages and recency of work (repos and pushed_at)\n\
            2) Note any gaps between what they star and what they build\n\
            3) Propose ONE concrete project they should build next that fits their current skills while stretching them a bit.\n\
            \n\
            Requirements for the output (short, actionable, no fluff):\n\
            - Title: a catchy project title\n\
            - Why: 1–2 sentences tying it to their top languages/experience\n\
            - Key Features: 3–5 bullet points\n\
            - Tech Stack: list primary languages/frameworks to use (from their strengths + 1 stretch)\n\
            - Next Steps: 3–4 steps to get started\n\
            \n\
            Keep it under {SUGGESTION_WORD_LIMIT} words. Return only the suggestion text as a single string."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_suggestion_mentions_username_and_sections() {
        let prompt = PromptLibrary::project_suggestion("octocat");
        assert!(prompt.contains("\"octocat\""));
        for section in ["Title:", "Why:", "Key Features:", "Tech Stack:", "Next Steps:"] {
            assert!(prompt.contains(section), "missing {section}");
        }
        assert!(prompt.contains("under 180 words"));
    }
}
