//! Canned recipes served by [`FallbackPolicy::Samples`] when the recipe
//! source is unreachable, for offline development.
//!
//! [`FallbackPolicy::Samples`]: crate::types::FallbackPolicy::Samples

use crate::types::Recipe;

struct Sample {
    recipe: Recipe,
    /// Ingredient names this sample counts as matchable.
    matchable: &'static [&'static str],
    /// Ingredient names the sample is missing unless the caller has them.
    missing: &'static [&'static str],
}

/// Returns the sample recipes with matched/missing ingredients recomputed
/// against the caller's selection. The match percentage keeps its canned
/// value; it is not recomputed.
pub(crate) fn sample_recipes(ingredients: &[String]) -> Vec<Recipe> {
    samples()
        .into_iter()
        .map(|sample| {
            let mut recipe = sample.recipe;
            recipe.matched_ingredients = ingredients
                .iter()
                .filter(|i| sample.matchable.contains(&i.as_str()))
                .cloned()
                .collect();
            recipe.missing_ingredients = sample
                .missing
                .iter()
                .filter(|m| !ingredients.iter().any(|i| i == *m))
                .map(|m| m.to_string())
                .collect();
            recipe
        })
        .collect()
}

fn samples() -> Vec<Sample> {
    vec![
        Sample {
            recipe: Recipe {
                id: "123456".to_string(),
                title: "Pasta with Garlic and Olive Oil".to_string(),
                description: "A simple and delicious pasta dish with garlic and olive oil."
                    .to_string(),
                image: "https://spoonacular.com/recipeImages/654959-556x370.jpg".to_string(),
                cook_time: 20,
                servings: 2,
                cuisine: "Italian".to_string(),
                ingredients: ["pasta", "garlic", "olive oil", "red pepper flakes", "parsley"]
                    .map(String::from)
                    .to_vec(),
                instructions: [
                    "Cook pasta according to package directions.",
                    "Sauté garlic in olive oil.",
                    "Add red pepper flakes.",
                    "Toss with pasta and garnish with parsley.",
                ]
                .map(String::from)
                .to_vec(),
                match_percentage: 80,
                matched_ingredients: Vec::new(),
                missing_ingredients: Vec::new(),
                dietary_tags: vec!["vegetarian".to_string()],
            },
            matchable: &["pasta", "garlic", "olive oil"],
            missing: &["red pepper flakes", "parsley"],
        },
        Sample {
            recipe: Recipe {
                id: "234567".to_string(),
                title: "Simple Chicken Stir-Fry".to_string(),
                description: "A quick and easy chicken stir-fry with vegetables.".to_string(),
                image: "https://spoonacular.com/recipeImages/661340-556x370.jpg".to_string(),
                cook_time: 30,
                servings: 4,
                cuisine: "Asian".to_string(),
                ingredients: [
                    "chicken breast",
                    "broccoli",
                    "carrot",
                    "soy sauce",
                    "garlic",
                    "ginger",
                ]
                .map(String::from)
                .to_vec(),
                instructions: [
                    "Cut chicken into strips.",
                    "Stir-fry chicken until cooked.",
                    "Add vegetables and stir-fry.",
                    "Add sauce and simmer until thickened.",
                ]
                .map(String::from)
                .to_vec(),
                match_percentage: 70,
                matched_ingredients: Vec::new(),
                missing_ingredients: Vec::new(),
                dietary_tags: vec!["high-protein".to_string()],
            },
            matchable: &["chicken breast", "broccoli", "carrot", "garlic"],
            missing: &["soy sauce", "ginger"],
        },
    ]
}
