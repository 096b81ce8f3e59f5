//! Prompt templates for food, workout and meal suggestion requests.

pub const FOOD_SYSTEM_PROMPT: &str = "You are a nutrition expert. Parse food descriptions into \
structured JSON data with accurate nutrition information.";

pub const WORKOUT_SYSTEM_PROMPT: &str =
    "You are a fitness expert. Parse workout descriptions into structured JSON data.";

pub const SUGGESTION_SYSTEM_PROMPT: &str =
    "You are a nutrition expert providing healthy meal suggestions.";

/// Sampling temperature for structured extraction.
pub const PARSE_TEMPERATURE: f32 = 0.3;

/// Sampling temperature for free-form suggestions.
pub const SUGGESTION_TEMPERATURE: f32 = 0.7;

const FOOD_EXAMPLE: &str = r#"[
  {
    "name": "Eggs",
    "brand": null,
    "serving_size": 2,
    "serving_unit": "large eggs",
    "calories": 140,
    "protein_g": 12.0,
    "carbs_g": 1.0,
    "fats_g": 10.0,
    "fiber_g": 0.0,
    "is_custom": false
  }
]"#;

const WORKOUT_EXAMPLE: &str = r#"[
  {
    "name": "Push-ups",
    "category": "strength",
    "muscle_group": "chest",
    "sets": 3,
    "reps": 10,
    "duration_minutes": null,
    "weight_kg": null
  }
]"#;

pub fn food_prompt(text: &str) -> String {
    format!(
        "Parse the following food description into structured data. Return ONLY a valid JSON \
array of food items.
Each item should have: name, serving_size (float), serving_unit (string), calories (int), \
protein_g (float), carbs_g (float), fats_g (float), fiber_g (float).
Use your knowledge of common foods to estimate nutrition values.

Food description: {text}

Return format:
{FOOD_EXAMPLE}
"
    )
}

pub fn workout_prompt(text: &str) -> String {
    format!(
        "Parse the following workout description into structured data. Return ONLY a valid JSON \
array of exercises.
Each item should have: name, category (strength/cardio/flexibility/sports), muscle_group \
(optional), sets (optional, int), reps (optional, int), duration_minutes (optional, int), \
weight_kg (optional, float).

Workout description: {text}

Return format:
{WORKOUT_EXAMPLE}
"
    )
}

/// Blank preferences or restrictions render as `None`.
pub fn suggestion_prompt(
    count: usize,
    preferences: Option<&str>,
    dietary_restrictions: Option<&str>,
) -> String {
    let or_none = |v: Option<&str>| {
        v.map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("None")
            .to_string()
    };
    format!(
        "Suggest {count} healthy meal ideas.\nPreferences: {}\nDietary restrictions: {}\n\n\
Provide simple meal names only, one per line.",
        or_none(preferences),
        or_none(dietary_restrictions)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_prompt_embeds_description() {
        let prompt = food_prompt("2 eggs and toast");
        assert!(prompt.contains("Food description: 2 eggs and toast"));
        assert!(prompt.contains("Return ONLY a valid JSON array of food items."));
        assert!(prompt.contains("\"serving_unit\": \"large eggs\""));
    }

    #[test]
    fn test_workout_prompt_lists_categories() {
        let prompt = workout_prompt("ran 5k");
        assert!(prompt.contains("category (strength/cardio/flexibility/sports)"));
        assert!(prompt.contains("Workout description: ran 5k"));
    }

    #[test]
    fn test_example_payloads_are_valid_json() {
        let foods: serde_json::Value = serde_json::from_str(FOOD_EXAMPLE).unwrap();
        assert_eq!(foods[0]["calories"], 140);
        let exercises: serde_json::Value = serde_json::from_str(WORKOUT_EXAMPLE).unwrap();
        assert_eq!(exercises[0]["reps"], 10);
    }

    #[test]
    fn test_suggestion_prompt_defaults_to_none() {
        let prompt = suggestion_prompt(5, None, Some("  "));
        assert_eq!(
            prompt,
            "Suggest 5 healthy meal ideas.\nPreferences: None\nDietary restrictions: None\n\n\
Provide simple meal names only, one per line."
        );

        let prompt = suggestion_prompt(5, Some("high protein"), Some("vegan"));
        assert!(prompt.contains("Preferences: high protein\n"));
        assert!(prompt.contains("Dietary restrictions: vegan\n"));
    }
}
