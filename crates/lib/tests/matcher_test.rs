//! # Recipe Matcher Tests
//!
//! Integration tests for the two-phase ingredient search pipeline and the
//! direct detail lookup, with the remote recipe source mocked.

use pantrypal::{FallbackPolicy, RecipeClientBuilder};
use serde_json::json;
use std::sync::Once;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

fn client_for(server: &MockServer, fallback: FallbackPolicy) -> pantrypal::RecipeClient {
    RecipeClientBuilder::new()
        .api_url(server.uri())
        .api_key("test-key")
        .fallback(fallback)
        .build()
        .expect("client should build")
}

fn pasta_coverage() -> serde_json::Value {
    json!([{
        "id": 123456,
        "usedIngredientCount": 3,
        "missedIngredientCount": 2,
        "usedIngredients": [
            {"name": "pasta"}, {"name": "garlic"}, {"name": "olive oil"}
        ],
        "missedIngredients": [
            {"name": "red pepper flakes"}, {"name": "parsley"}
        ]
    }])
}

fn pasta_detail() -> serde_json::Value {
    json!([{
        "id": 123456,
        "title": "Pasta with Garlic and Olive Oil",
        "summary": "<p>A <b>great</b> dish</p>",
        "image": "https://img.example/pasta.jpg",
        "readyInMinutes": 20,
        "servings": 2,
        "cuisines": ["Italian"],
        "extendedIngredients": [
            {"original": "8 oz pasta"},
            {"original": "3 cloves garlic"},
            {"original": "2 tbsp olive oil"}
        ],
        "analyzedInstructions": [
            {"steps": [
                {"step": "Cook the pasta."},
                {"step": "Toss with garlic and oil."}
            ]}
        ],
        "vegetarian": true,
        "vegan": false,
        "glutenFree": false,
        "dairyFree": true,
        "veryHealthy": false,
        "lowFodmap": false
    }])
}

#[tokio::test]
async fn test_search_returns_empty_for_zero_candidates() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let client = client_for(&server, FallbackPolicy::Empty);

    // --- 2. Act ---
    let recipes = client
        .find_recipes_by_ingredients(&["dragon fruit".to_string()], &[], &[])
        .await
        .unwrap();

    // --- 3. Assert ---
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_search_end_to_end_pasta_scenario() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .and(query_param("ingredients", "pasta,garlic,olive oil"))
        .and(query_param("number", "20"))
        .and(query_param("ranking", "2"))
        .and(query_param("ignorePantry", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasta_coverage()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recipes/informationBulk"))
        .and(query_param("ids", "123456"))
        .and(query_param("includeNutrition", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasta_detail()))
        .mount(&server)
        .await;

    let client = client_for(&server, FallbackPolicy::Empty);
    let ingredients = ["pasta", "garlic", "olive oil"].map(String::from);

    // --- 2. Act ---
    let recipes = client
        .find_recipes_by_ingredients(&ingredients, &[], &[])
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(recipes.len(), 1);
    let recipe = &recipes[0];
    assert_eq!(recipe.id, "123456");
    assert_eq!(recipe.match_percentage, 60, "round(100 * 3 / 5)");
    assert_eq!(recipe.cuisine, "Italian");
    assert_eq!(recipe.cook_time, 20);
    assert_eq!(recipe.servings, 2);
    assert_eq!(recipe.description, "A great dish");
    assert_eq!(
        recipe.matched_ingredients,
        vec!["pasta", "garlic", "olive oil"]
    );
    assert_eq!(
        recipe.missing_ingredients,
        vec!["red pepper flakes", "parsley"]
    );
    assert_eq!(recipe.dietary_tags, vec!["vegetarian", "dairy-free"]);
    assert_eq!(
        recipe.instructions,
        vec!["Cook the pasta.", "Toss with garlic and oil."]
    );
    // Matched and missing never overlap.
    for matched in &recipe.matched_ingredients {
        assert!(!recipe.missing_ingredients.contains(matched));
    }
}

#[tokio::test]
async fn test_filters_are_passed_through_to_bulk_query() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasta_coverage()))
        .mount(&server)
        .await;

    // The mock only matches when both filters arrive as repeated params.
    Mock::given(method("GET"))
        .and(path("/recipes/informationBulk"))
        .and(query_param("diet", "vegetarian"))
        .and(query_param("cuisine", "Italian"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasta_detail()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, FallbackPolicy::Empty);

    // --- 2. Act ---
    let recipes = client
        .find_recipes_by_ingredients(
            &["pasta".to_string()],
            &["vegetarian".to_string()],
            &["Italian".to_string()],
        )
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(recipes.len(), 1);
}

#[tokio::test]
async fn test_detail_without_coverage_fails_fast() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasta_coverage()))
        .mount(&server)
        .await;

    // The bulk response carries an id the coverage phase never produced.
    let mut detail = pasta_detail();
    detail[0]["id"] = json!(999999);
    Mock::given(method("GET"))
        .and(path("/recipes/informationBulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail))
        .mount(&server)
        .await;

    // Even the sample fallback must not mask a contract violation.
    let client = client_for(&server, FallbackPolicy::Samples);

    // --- 2. Act ---
    let result = client
        .find_recipes_by_ingredients(&["pasta".to_string()], &[], &[])
        .await;

    // --- 3. Assert ---
    match result {
        Err(pantrypal::RecipeError::MissingCoverage(id)) => assert_eq!(id, 999999),
        other => panic!("Expected MissingCoverage, got {other:?}"),
    }
}

#[tokio::test]
async fn test_source_failure_with_empty_fallback() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({"message": "quota exhausted"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, FallbackPolicy::Empty);

    // --- 2. Act ---
    let recipes = client
        .find_recipes_by_ingredients(&["pasta".to_string()], &[], &[])
        .await
        .unwrap();

    // --- 3. Assert: the failure is masked as "no matches".
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_source_failure_with_sample_fallback() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/findByIngredients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    let client = client_for(&server, FallbackPolicy::Samples);
    let ingredients = ["pasta", "garlic"].map(String::from);

    // --- 2. Act ---
    let recipes = client
        .find_recipes_by_ingredients(&ingredients, &[], &[])
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(recipes.len(), 2);
    let pasta = &recipes[0];
    assert_eq!(pasta.title, "Pasta with Garlic and Olive Oil");
    assert_eq!(pasta.matched_ingredients, vec!["pasta", "garlic"]);
    // The canned percentage survives, it is not recomputed.
    assert_eq!(pasta.match_percentage, 80);
}

#[tokio::test]
async fn test_get_recipe_by_id_uses_sentinel_match_fields() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    let mut detail = pasta_detail();
    let single = detail[0].take();
    Mock::given(method("GET"))
        .and(path("/recipes/123456/information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(single))
        .mount(&server)
        .await;
    let client = client_for(&server, FallbackPolicy::Empty);

    // --- 2. Act ---
    let recipe = client.get_recipe_by_id("123456").await.expect("found");

    // --- 3. Assert ---
    assert_eq!(recipe.match_percentage, 100);
    assert!(recipe.matched_ingredients.is_empty());
    assert!(recipe.missing_ingredients.is_empty());
    assert_eq!(recipe.title, "Pasta with Garlic and Olive Oil");
}

#[tokio::test]
async fn test_get_recipe_by_id_absent_is_none() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/42/information"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Recipe not found"})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, FallbackPolicy::Empty);

    // --- 2. Act & Assert ---
    assert!(client.get_recipe_by_id("42").await.is_none());
}

#[test]
fn test_builder_requires_api_key() {
    let result = RecipeClientBuilder::new().build();
    assert!(matches!(result, Err(pantrypal::RecipeError::MissingApiKey)));
}
