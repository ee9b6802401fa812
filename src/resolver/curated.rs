//! Fixed table of common ingredients with hand-assigned scores.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;

use super::tier::ResolutionTier;
use super::types::{IngredientRecord, ResolutionSource};

/// `(name, nutrition score, additive class, explanation)`.
type CuratedRow = (&'static str, u8, Option<&'static str>, &'static str);

const CURATED_ROWS: &[CuratedRow] = &[
    ("water", 100, None, "Water adds no calories and raises no nutritional concerns."),
    ("salt", 40, None, "Salt is the main source of dietary sodium; excess intake raises blood pressure."),
    ("sea salt", 42, None, "Sea salt is nutritionally close to table salt and just as high in sodium."),
    ("sugar", 25, None, "Added sugar supplies calories without other nutrients."),
    ("cane sugar", 25, None, "Cane sugar is an added sugar with no meaningful micronutrients."),
    ("brown sugar", 27, None, "Brown sugar is sucrose with traces of molasses; still an added sugar."),
    ("high fructose corn syrup", 12, None, "High fructose corn syrup is a concentrated added sugar linked to metabolic risk."),
    ("corn syrup", 18, None, "Corn syrup is a glucose syrup used as an added sweetener."),
    ("honey", 55, None, "Honey is a natural sweetener but still counts as added sugar."),
    ("wheat flour", 55, None, "Refined wheat flour keeps the starch but loses most fibre."),
    ("enriched wheat flour", 50, None, "Enriched flour has some vitamins added back after refining."),
    ("whole wheat flour", 82, None, "Whole wheat flour keeps the bran and germ, adding fibre and minerals."),
    ("rolled oats", 88, None, "Rolled oats are a whole grain rich in soluble fibre."),
    ("brown rice", 80, None, "Brown rice is a whole grain with more fibre than white rice."),
    ("rice", 60, None, "White rice is a refined grain and a simple energy source."),
    ("olive oil", 80, None, "Olive oil is rich in monounsaturated fats."),
    ("extra virgin olive oil", 85, None, "Extra virgin olive oil keeps more polyphenols than refined oils."),
    ("canola oil", 62, None, "Canola oil is low in saturated fat with some omega-3."),
    ("sunflower oil", 55, None, "Sunflower oil is high in omega-6 polyunsaturated fat."),
    ("soybean oil", 50, None, "Soybean oil is a common refined vegetable oil."),
    ("palm oil", 30, None, "Palm oil is high in saturated fat."),
    ("butter", 40, None, "Butter is high in saturated fat."),
    ("milk", 68, None, "Milk provides protein and calcium."),
    ("eggs", 72, None, "Eggs are a dense source of protein and micronutrients."),
    ("cocoa", 70, None, "Cocoa solids provide fibre and flavanols."),
    ("yeast", 70, None, "Yeast is a leavening agent with B vitamins."),
    ("garlic", 90, None, "Garlic is a vegetable with beneficial sulfur compounds."),
    ("onion", 88, None, "Onion is a vegetable that adds flavour without added fat or sugar."),
    ("tomatoes", 88, None, "Tomatoes supply vitamin C and lycopene."),
    ("spinach", 95, None, "Spinach is a leafy green high in vitamins and minerals."),
    ("almonds", 85, None, "Almonds provide healthy fats, protein and vitamin E."),
    ("peanuts", 72, None, "Peanuts provide protein and unsaturated fats."),
    ("cinnamon", 85, None, "Cinnamon is a spice used in small amounts."),
    ("black pepper", 82, None, "Black pepper is a spice used in small amounts."),
    ("vinegar", 70, None, "Vinegar is an acidic flavouring with negligible calories."),
    ("lemon juice", 80, None, "Lemon juice adds acidity and some vitamin C."),
    ("vanilla extract", 65, None, "Vanilla extract is a flavouring used in small amounts."),
    ("natural flavors", 50, None, "Natural flavors are derived from food sources but their makeup is undisclosed."),
    ("artificial flavors", 20, Some("moderate_risk"), "Artificial flavors are synthetic flavour compounds."),
    ("citric acid", 70, None, "Citric acid is an acidulant commonly made by fermentation."),
    ("ascorbic acid", 90, None, "Ascorbic acid is vitamin C, often added as an antioxidant."),
    ("baking soda", 60, None, "Baking soda is a leavening agent that contributes sodium."),
    ("sodium benzoate", 30, Some("preservative"), "Sodium benzoate is a preservative that can form benzene with vitamin C."),
    ("potassium sorbate", 45, Some("preservative"), "Potassium sorbate is a widely used mould inhibitor."),
    ("sodium nitrite", 15, Some("high_risk"), "Sodium nitrite cures meat and can form nitrosamines."),
    ("monosodium glutamate", 35, Some("flavor_enhancer"), "Monosodium glutamate is a flavour enhancer that adds sodium."),
    ("aspartame", 20, Some("moderate_risk"), "Aspartame is an artificial sweetener."),
    ("sucralose", 25, Some("moderate_risk"), "Sucralose is an artificial sweetener."),
    ("red 40", 10, Some("high_risk"), "Red 40 is a synthetic dye linked to hyperactivity in children."),
    ("yellow 5", 10, Some("high_risk"), "Yellow 5 (tartrazine) is a synthetic dye linked to sensitivities."),
    ("caramel color", 35, Some("coloring"), "Caramel color can contain 4-MEI depending on how it is made."),
    ("soy lecithin", 60, Some("emulsifier"), "Soy lecithin is an emulsifier generally regarded as safe."),
    ("xanthan gum", 60, Some("thickener"), "Xanthan gum is a fermentation-derived thickener."),
    ("guar gum", 65, Some("thickener"), "Guar gum is a plant-derived thickener with soluble fibre."),
    ("carrageenan", 35, Some("moderate_risk"), "Carrageenan is a seaweed thickener with debated gut effects."),
];

static CURATED: LazyLock<HashMap<&'static str, &'static CuratedRow>> =
    LazyLock::new(|| CURATED_ROWS.iter().map(|row| (row.0, row)).collect());

/// Number of curated ingredients.
pub fn curated_len() -> usize {
    CURATED_ROWS.len()
}

/// Looks up a normalized name in the curated table.
pub fn curated_record(name: &str) -> Option<IngredientRecord> {
    CURATED.get(name).map(|(name, score, class, explanation)| {
        let record = IngredientRecord::new(*name, ResolutionSource::Curated)
            .with_score(*score)
            .with_explanation(*explanation);
        match class {
            Some(class) => record.with_additive_class(*class),
            None => record,
        }
    })
}

/// Tier backed by the curated table. Not written back: the table is authoritative.
#[derive(Debug, Default, Clone, Copy)]
pub struct CuratedTier;

#[async_trait]
impl ResolutionTier for CuratedTier {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::Curated
    }

    fn writes_back(&self) -> bool {
        false
    }

    async fn lookup(&self, name: &str) -> Option<IngredientRecord> {
        curated_record(name)
    }
}
