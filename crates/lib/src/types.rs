use crate::errors::RecipeError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The default base URL of the remote recipe source.
pub const DEFAULT_API_URL: &str = "https://api.spoonacular.com";

/// The default timeout applied to every outbound request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A recipe normalized into the canonical shape produced for any caller.
///
/// A `Recipe` value is constructed fresh on every query; it is never itself
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable identifier, sourced from the external API, stringified.
    pub id: String,
    pub title: String,
    /// Plain-text description with any HTML stripped.
    pub description: String,
    pub image: String,
    /// Cook time in minutes. Defaults to 30 when the source omits it.
    pub cook_time: u32,
    /// Defaults to 4 when the source omits it.
    pub servings: u32,
    /// First entry of the source's cuisine list, or `"Various"` if none.
    pub cuisine: String,
    /// Free-text ingredient lines, as supplied by the source.
    pub ingredients: Vec<String>,
    /// Ordered instruction steps; empty if the source provides none.
    pub instructions: Vec<String>,
    /// Percentage of the recipe's required ingredients covered by the query.
    /// Fixed at 100 when the recipe was fetched directly by identifier.
    pub match_percentage: u8,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    /// Short tags derived from the source's dietary-suitability flags.
    pub dietary_tags: Vec<String>,
}

/// The strategy applied when the recipe source fails mid-query.
///
/// This is a deliberate fallback policy, not an error channel: with
/// `Empty`, callers cannot distinguish "no matches" from "source failure
/// masked as empty".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Mask source failures as an empty result set (production).
    #[default]
    Empty,
    /// Serve canned sample recipes (offline development).
    Samples,
}

/// A client for the remote recipe source.
///
/// Each query is a short-lived request-response sequence with no shared
/// mutable state, so a single client can serve concurrent searches.
pub struct RecipeClient {
    pub(crate) http_client: ReqwestClient,
    pub(crate) api_url: String,
    pub(crate) api_key: String,
    pub(crate) fallback: FallbackPolicy,
}

impl fmt::Debug for RecipeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeClient")
            .field("api_url", &self.api_url)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// A builder for creating [`RecipeClient`] instances.
#[derive(Default)]
pub struct RecipeClientBuilder {
    api_url: Option<String>,
    api_key: String,
    fallback: FallbackPolicy,
    timeout: Option<Duration>,
}

impl RecipeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the recipe source. Defaults to the public API.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Sets the recipe source API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Selects what a search returns when the source fails.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Overrides the per-request timeout. A hung remote call otherwise
    /// blocks the single request it belongs to for this long.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `RecipeClient`.
    ///
    /// Fails if no API key was provided or the HTTP client cannot be built.
    pub fn build(self) -> Result<RecipeClient, RecipeError> {
        if self.api_key.is_empty() {
            return Err(RecipeError::MissingApiKey);
        }

        let http_client = ReqwestClient::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(RecipeError::ClientBuild)?;

        Ok(RecipeClient {
            http_client,
            api_url: self
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: self.api_key,
            fallback: self.fallback,
        })
    }
}

// --- Recipe source wire types ---

/// The result of matching one candidate recipe's ingredient list against the
/// caller's selection: counts and names of used vs. missing ingredients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoverageRecord {
    pub id: u64,
    pub used_ingredient_count: u32,
    pub missed_ingredient_count: u32,
    #[serde(default)]
    pub used_ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub missed_ingredients: Vec<IngredientRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IngredientRef {
    pub name: String,
}

/// Full recipe information, independent of any specific ingredient query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<InstructionGroup>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub dairy_free: bool,
    #[serde(default)]
    pub very_healthy: bool,
    #[serde(default)]
    pub low_fodmap: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ExtendedIngredient {
    pub original: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstructionGroup {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstructionStep {
    pub step: String,
}
