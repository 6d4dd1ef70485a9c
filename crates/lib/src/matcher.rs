//! The two-phase ingredient search pipeline: an ingredient-coverage query
//! produces candidate ids, a bulk detail query fetches those ids with the
//! caller's filters applied, and the two result sets are joined by id.

use crate::errors::RecipeError;
use crate::samples;
use crate::types::{CoverageRecord, DetailRecord, FallbackPolicy, Recipe, RecipeClient};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{info, warn};

/// How many candidates to request from the coverage phase. More than the
/// caller usually wants, so the detail phase has room to filter.
const SEARCH_CANDIDATES: u32 = 20;

/// Source ranking mode 2: maximize used ingredients over minimizing missing.
const RANKING_MAXIMIZE_USED: u32 = 2;

const DEFAULT_COOK_TIME: u32 = 30;
const DEFAULT_SERVINGS: u32 = 4;
const CUISINE_FALLBACK: &str = "Various";

impl RecipeClient {
    /// Finds recipes whose ingredient lists overlap the given selection,
    /// ranked by the source's coverage ordering.
    ///
    /// `dietary_filters` and `cuisine_filters` are passed through to the
    /// source's own filter vocabulary without local validation. An empty
    /// candidate set is a normal outcome, not an error. A source failure is
    /// resolved by the client's [`FallbackPolicy`].
    pub async fn find_recipes_by_ingredients(
        &self,
        ingredients: &[String],
        dietary_filters: &[String],
        cuisine_filters: &[String],
    ) -> Result<Vec<Recipe>, RecipeError> {
        match self
            .search_ranked(ingredients, dietary_filters, cuisine_filters)
            .await
        {
            Ok(recipes) => Ok(recipes),
            // A detail record without a coverage record is a contract
            // violation, not a source outage. Fail fast instead of masking
            // it with fallback data.
            Err(e @ RecipeError::MissingCoverage(_)) => Err(e),
            Err(e) => match self.fallback {
                FallbackPolicy::Empty => {
                    warn!("Recipe source failed, returning empty results: {e}");
                    Ok(Vec::new())
                }
                FallbackPolicy::Samples => {
                    warn!("Recipe source failed, serving sample recipes: {e}");
                    Ok(samples::sample_recipes(ingredients))
                }
            },
        }
    }

    async fn search_ranked(
        &self,
        ingredients: &[String],
        dietary_filters: &[String],
        cuisine_filters: &[String],
    ) -> Result<Vec<Recipe>, RecipeError> {
        // Phase 1: coverage query. `ignorePantry` keeps staples like salt
        // and oil from inflating or deflating matches.
        let response = self
            .http_client
            .get(format!("{}/recipes/findByIngredients", self.api_url))
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("ingredients", &ingredients.join(",")),
                ("number", &SEARCH_CANDIDATES.to_string()),
                ("ranking", &RANKING_MAXIMIZE_USED.to_string()),
                ("ignorePantry", "true"),
            ])
            .send()
            .await?;
        let coverage: Vec<CoverageRecord> = read_json(response).await?;

        if coverage.is_empty() {
            info!("Coverage query returned no candidates");
            return Ok(Vec::new());
        }

        // Phase 2: bulk detail for exactly the candidate ids. The source
        // applies the diet/cuisine filters itself; filtered-out recipes are
        // simply absent from the response.
        let ids = coverage
            .iter()
            .map(|c| c.id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let by_id: HashMap<u64, CoverageRecord> =
            coverage.into_iter().map(|c| (c.id, c)).collect();

        let mut query: Vec<(&str, String)> = vec![
            ("apiKey", self.api_key.clone()),
            ("ids", ids),
            ("includeNutrition", "false".to_string()),
        ];
        for diet in dietary_filters {
            query.push(("diet", diet.clone()));
        }
        for cuisine in cuisine_filters {
            query.push(("cuisine", cuisine.clone()));
        }

        let response = self
            .http_client
            .get(format!("{}/recipes/informationBulk", self.api_url))
            .query(&query)
            .send()
            .await?;
        let details: Vec<DetailRecord> = read_json(response).await?;

        // Join detail records with their coverage records, preserving the
        // bulk response order. The source's ordering is the ranking.
        details
            .into_iter()
            .map(|detail| {
                let coverage = by_id
                    .get(&detail.id)
                    .ok_or(RecipeError::MissingCoverage(detail.id))?;
                Ok(normalize(detail, Some(coverage)))
            })
            .collect()
    }

    /// Fetches full detail for one recipe directly, with no ingredient
    /// coverage phase.
    ///
    /// Returns `None` when the source reports the recipe does not exist or
    /// the request fails; callers treat both uniformly as "not found".
    pub async fn get_recipe_by_id(&self, id: &str) -> Option<Recipe> {
        let result: Result<DetailRecord, RecipeError> = async {
            let response = self
                .http_client
                .get(format!("{}/recipes/{id}/information", self.api_url))
                .query(&[("apiKey", self.api_key.as_str())])
                .send()
                .await?;
            read_json(response).await
        }
        .await;

        match result {
            Ok(detail) => Some(normalize(detail, None)),
            Err(e) => {
                warn!("Failed to fetch recipe {id}: {e}");
                None
            }
        }
    }
}

/// Reads a response body, surfacing non-success statuses as [`RecipeError::Api`]
/// with the best error message the body yields.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RecipeError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(RecipeError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(RecipeError::from)
}

/// Best-effort error message extraction: a JSON `message` field if the body
/// parses, the raw body text otherwise, a generic message if that is empty.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "API request failed".to_string()
    } else {
        body.to_string()
    }
}

/// Converts a detail record into the canonical [`Recipe`] shape.
///
/// With a coverage record, the match fields reflect the ingredient query;
/// without one (direct lookup by id) the sentinel values apply: 100% match
/// and empty matched/missing sets.
pub(crate) fn normalize(detail: DetailRecord, coverage: Option<&CoverageRecord>) -> Recipe {
    let (match_percentage, matched_ingredients, missing_ingredients) = match coverage {
        Some(c) => (
            match_percentage(c.used_ingredient_count, c.missed_ingredient_count),
            c.used_ingredients.iter().map(|i| i.name.clone()).collect(),
            c.missed_ingredients.iter().map(|i| i.name.clone()).collect(),
        ),
        None => (100, Vec::new(), Vec::new()),
    };

    let dietary_tags = dietary_tags(&detail);

    Recipe {
        id: detail.id.to_string(),
        title: detail.title,
        description: strip_html(detail.summary.as_deref().unwrap_or_default()),
        image: detail.image.unwrap_or_default(),
        cook_time: detail.ready_in_minutes.unwrap_or(DEFAULT_COOK_TIME),
        servings: detail.servings.unwrap_or(DEFAULT_SERVINGS),
        cuisine: detail
            .cuisines
            .into_iter()
            .next()
            .unwrap_or_else(|| CUISINE_FALLBACK.to_string()),
        ingredients: detail
            .extended_ingredients
            .into_iter()
            .map(|i| i.original)
            .collect(),
        instructions: detail
            .analyzed_instructions
            .into_iter()
            .next()
            .map(|group| group.steps.into_iter().map(|s| s.step).collect())
            .unwrap_or_default(),
        match_percentage,
        matched_ingredients,
        missing_ingredients,
        dietary_tags,
    }
}

/// `round(100 * used / (used + missed))`, defined as 0 when both counts are
/// zero to avoid the division the source leaves undefined.
pub(crate) fn match_percentage(used: u32, missed: u32) -> u8 {
    let total = used + missed;
    if total == 0 {
        return 0;
    }
    ((f64::from(used) / f64::from(total)) * 100.0).round() as u8
}

/// Maps the source's boolean dietary flags to tag strings, in a fixed order.
fn dietary_tags(detail: &DetailRecord) -> Vec<String> {
    let flags = [
        (detail.vegetarian, "vegetarian"),
        (detail.vegan, "vegan"),
        (detail.gluten_free, "gluten-free"),
        (detail.dairy_free, "dairy-free"),
        (detail.very_healthy, "healthy"),
        (detail.low_fodmap, "low-fodmap"),
    ];
    flags
        .into_iter()
        .filter_map(|(set, tag)| set.then(|| tag.to_string()))
        .collect()
}

/// Strips HTML tags, leaving plain text.
pub(crate) fn strip_html(html: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    re.replace_all(html, "").to_string()
}
