//! Label texts and resolver builders.

use std::sync::Arc;
use std::time::Duration;

use labelscore::cache::ResolutionCache;
use labelscore::resilience::RetryPolicy;
use labelscore::resolver::{NutritionSource, TieredIngredientResolver};
use labelscore::{IngredientRecord, ScanPipeline};

pub const GRANOLA_LABEL: &str = "NUTRITION FACTS Serving size 1/2 cup (45g)\n\
    INGREDIENTS: Organic rolled oats, organic cane sugar, sunflower oil, honey,\n\
    almonds, sea salt, natural flavors (vanilla, cinnamon). Packed in a facility that handles nuts.";

pub const SNACK_CAKE_LABEL: &str = "Ingredients: Enriched wheat flour, sugar, partially \
    hydrogenated soybean oil, high fructose corn syrup, salt, sodium benzoate, red 40, \
    yellow 5, artificial flavors. Keep in a cool place.";

pub const NO_LIST_LABEL: &str = "Best before: see top. Net wt 200g.";

/// Retry policy that keeps retry tests fast.
pub fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .max_attempts(attempts)
        .base_delay(Duration::from_millis(1))
}

pub fn resolver_with(source: Arc<dyn NutritionSource>) -> TieredIngredientResolver {
    TieredIngredientResolver::builder(Arc::new(ResolutionCache::<IngredientRecord>::new()))
        .external(source)
        .retry_policy(fast_retry(3))
        .external_timeout(Duration::from_millis(500))
        .build()
}

pub fn pipeline_with(source: Arc<dyn NutritionSource>) -> ScanPipeline {
    ScanPipeline::new(Arc::new(resolver_with(source)))
}

/// Search response body with one product.
pub fn product_body(grade: &str, additives: &[&str]) -> String {
    serde_json::json!({
        "count": 1,
        "page": 1,
        "products": [{"nutrition_grades": grade, "additives_tags": additives}]
    })
    .to_string()
}

pub fn empty_body() -> String {
    serde_json::json!({"count": 0, "page": 1, "products": []}).to_string()
}
