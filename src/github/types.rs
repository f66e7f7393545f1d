//! Response shapes for the GitHub endpoints the adapters consume.
//!
//! Deserializing into these types is the schema check: unknown fields are
//! ignored, missing required fields and wrong types are rejected.

use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Public profile of a GitHub user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Summary of one of the user's own repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RepoSummary {
    pub name: String,
    pub language: Option<String>,
    pub pushed_at: String,
    pub stargazers_count: u64,
    pub forks: u64,
}

/// One entry of the top-languages ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TopLanguage {
    pub name: String,
    pub count: u32,
    /// Share of language-tagged repositories, rounded to a whole percent
    pub percentage: u32,
}

/// Repository count per language, kept in the order languages were first seen.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageCounts(Vec<(String, u32)>);

impl LanguageCounts {
    pub fn get(&self, language: &str) -> Option<&u32> {
        self.0
            .iter()
            .find(|(name, _)| name == language)
            .map(|(_, count)| count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, u32)> for LanguageCounts {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for LanguageCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LanguageCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = LanguageCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of language names to repository counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, u32>()? {
                    counts.push(entry);
                }
                Ok(LanguageCounts(counts))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Language usage across the user's repositories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStats {
    #[schemars(with = "BTreeMap<String, u32>")]
    pub languages: LanguageCounts,
    /// Number of repositories that report a language
    pub total_repos: u32,
    pub top_languages: Vec<TopLanguage>,
}

/// A recently starred repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StarredRepo {
    pub name: String,
    pub language: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: u64,
}

/// What the user stars, as opposed to what they build
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StarredSummary {
    pub total_starred: u32,
    pub top_starred_languages: Vec<String>,
    pub recent_stars: Vec<StarredRepo>,
}

/// Minimal repository shape used for language counting
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawLanguageRepo {
    #[serde(default)]
    pub language: Option<String>,
}

