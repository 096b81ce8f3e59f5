//! Natural-language food and workout parsing on top of a generation backend.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use fittrack_core::defaults::MEAL_SUGGESTION_COUNT;
use fittrack_core::{
    CreateFoodRequest, GenerationBackend, GenerationOptions, ParsedExercise, Result,
};

use crate::extract::{parse_json_list, suggestion_lines};
use crate::prompts::{
    food_prompt, suggestion_prompt, workout_prompt, FOOD_SYSTEM_PROMPT, PARSE_TEMPERATURE,
    SUGGESTION_SYSTEM_PROMPT, SUGGESTION_TEMPERATURE, WORKOUT_SYSTEM_PROMPT,
};

/// Turns free text into catalogue-shaped records. Nothing is persisted.
#[derive(Clone)]
pub struct NutritionParser {
    backend: Arc<dyn GenerationBackend>,
}

impl NutritionParser {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Estimate foods and their nutrition from a meal description.
    pub async fn parse_food(&self, text: &str) -> Result<Vec<CreateFoodRequest>> {
        let start = Instant::now();
        let reply = self
            .backend
            .generate_with_system(
                FOOD_SYSTEM_PROMPT,
                &food_prompt(text),
                GenerationOptions::with_temperature(PARSE_TEMPERATURE),
            )
            .await?;
        debug!(reply_len = reply.len(), "Food parse reply received");

        let mut items: Vec<CreateFoodRequest> = parse_json_list(&reply).inspect_err(|e| {
            warn!(error = %e, "Food parse reply rejected");
        })?;
        // Parsed items are suggestions, never catalogue entries yet.
        for item in &mut items {
            item.is_custom = false;
        }

        info!(
            subsystem = "inference",
            component = "parser",
            op = "parse_food",
            model = self.model_name(),
            item_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Food description parsed"
        );
        Ok(items)
    }

    /// Extract exercises with sets, reps, duration and load from a workout description.
    pub async fn parse_workout(&self, text: &str) -> Result<Vec<ParsedExercise>> {
        let start = Instant::now();
        let reply = self
            .backend
            .generate_with_system(
                WORKOUT_SYSTEM_PROMPT,
                &workout_prompt(text),
                GenerationOptions::with_temperature(PARSE_TEMPERATURE),
            )
            .await?;

        let exercises: Vec<ParsedExercise> = parse_json_list(&reply).inspect_err(|e| {
            warn!(error = %e, "Workout parse reply rejected");
        })?;

        info!(
            subsystem = "inference",
            component = "parser",
            op = "parse_workout",
            model = self.model_name(),
            item_count = exercises.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Workout description parsed"
        );
        Ok(exercises)
    }

    /// Up to five meal names, one per reply line.
    pub async fn meal_suggestions(
        &self,
        preferences: Option<&str>,
        dietary_restrictions: Option<&str>,
    ) -> Result<Vec<String>> {
        let reply = self
            .backend
            .generate_with_system(
                SUGGESTION_SYSTEM_PROMPT,
                &suggestion_prompt(MEAL_SUGGESTION_COUNT, preferences, dietary_restrictions),
                GenerationOptions::with_temperature(SUGGESTION_TEMPERATURE),
            )
            .await?;

        let suggestions = suggestion_lines(&reply, MEAL_SUGGESTION_COUNT);
        debug!(count = suggestions.len(), "Meal suggestions generated");
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use fittrack_core::{Error, ExerciseCategory};

    fn parser(mock: &MockGenerationBackend) -> NutritionParser {
        NutritionParser::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_parse_food_from_fenced_reply() {
        let mock = MockGenerationBackend::new().with_fixed_response(
            "Sure!\n```json\n[{\"name\": \"Banana\", \"serving_size\": 1, \"serving_unit\": \"medium\", \
             \"calories\": 105, \"protein_g\": 1.3, \"carbs_g\": 27.0, \"fats_g\": 0.4, \"fiber_g\": 3.1, \
             \"is_custom\": true}]\n```",
        );
        let items = parser(&mock).parse_food("a banana").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Banana");
        assert_eq!(items[0].calories, 105);
        assert!(!items[0].is_custom);

        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, FOOD_SYSTEM_PROMPT);
        assert!(calls[0].prompt.contains("Food description: a banana"));
        assert_eq!(calls[0].temperature, Some(PARSE_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_parse_food_single_object() {
        let mock = MockGenerationBackend::new().with_fixed_response(
            "{\"name\": \"Toast\", \"serving_size\": 1, \"serving_unit\": \"slice\", \"calories\": 80}",
        );
        let items = parser(&mock).parse_food("toast").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].protein_g, 0.0);
    }

    #[tokio::test]
    async fn test_parse_food_invalid_reply() {
        let mock = MockGenerationBackend::new().with_fixed_response("I am not sure.");
        let err = parser(&mock).parse_food("??").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_parse_workout() {
        let mock = MockGenerationBackend::new().with_fixed_response(
            "[{\"name\": \"Push-ups\", \"category\": \"strength\", \"muscle_group\": \"chest\", \
             \"sets\": 3, \"reps\": 10, \"duration_minutes\": null, \"weight_kg\": null}, \
             {\"name\": \"Running\", \"category\": \"cardio\", \"duration_minutes\": 20}]",
        );
        let exercises = parser(&mock).parse_workout("3x10 pushups, ran 20 min").await.unwrap();

        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].category, Some(ExerciseCategory::Strength));
        assert_eq!(exercises[0].reps, Some(10));
        assert_eq!(exercises[1].duration_minutes, Some(20));
        assert_eq!(mock.get_calls()[0].system, WORKOUT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_meal_suggestions_capped() {
        let mock = MockGenerationBackend::new()
            .with_fixed_response("# Meals\nA\nB\n\nC\nD\nE\nF\nG");
        let suggestions = parser(&mock)
            .meal_suggestions(Some("spicy"), None)
            .await
            .unwrap();

        assert_eq!(suggestions, vec!["A", "B", "C", "D", "E"]);
        let call = &mock.get_calls()[0];
        assert_eq!(call.temperature, Some(SUGGESTION_TEMPERATURE));
        assert!(call.prompt.contains("Preferences: spicy"));
        assert!(call.prompt.contains("Dietary restrictions: None"));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let mock = MockGenerationBackend::new().with_failure("quota exhausted");
        let err = parser(&mock)
            .meal_suggestions(None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Inference error: quota exhausted");
    }
}
