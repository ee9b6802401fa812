//! Keyword-family classifier for names no table or database knows.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::tier::ResolutionTier;
use super::types::{IngredientRecord, ResolutionSource};
use crate::constants::NEUTRAL_NUTRITION_SCORE;

#[derive(Debug, Clone, Copy)]
/// One keyword family with its score band and explanation template.
pub struct HeuristicFamily {
    pub family: &'static str,
    pub keywords: &'static [&'static str],
    pub score: u8,
    pub additive_class: Option<&'static str>,
    /// `{ingredient}` is replaced with the ingredient name.
    pub template: &'static str,
}

/// Families in evaluation order; the first match wins.
pub const HEURISTIC_FAMILIES: &[HeuristicFamily] = &[
    HeuristicFamily {
        family: "preservative",
        keywords: &[
            "benzoate", "benzoic", "sorbate", "sorbic", "nitrite", "nitrate", "sulfite",
            "sulphite", "metabisulfite", "propionate", "bht", "bha", "tbhq", "edta",
            "preservative",
        ],
        score: 35,
        additive_class: Some("preservative"),
        template: "{ingredient} looks like a preservative used to extend shelf life.",
    },
    HeuristicFamily {
        family: "coloring",
        keywords: &[
            "color", "colour", "dye", "lake", "tartrazine", "carmine", "erythrosine",
            "allura", "sunset yellow", "brilliant blue", "titanium dioxide",
        ],
        score: 30,
        additive_class: Some("coloring"),
        template: "{ingredient} looks like a coloring agent added for appearance.",
    },
    HeuristicFamily {
        family: "emulsifier",
        keywords: &[
            "lecithin", "glyceride", "polysorbate", "emulsifier", "stearoyl", "sorbitan",
            "datem",
        ],
        score: 55,
        additive_class: Some("emulsifier"),
        template: "{ingredient} looks like an emulsifier that keeps fats and water mixed.",
    },
    HeuristicFamily {
        family: "vitamin_mineral",
        keywords: &[
            "vitamin", "ascorb", "tocopherol", "niacin", "riboflavin", "thiamin",
            "folic", "folate", "biotin", "calcium", "iron", "zinc", "magnesium",
            "potassium iodide", "cholecalciferol", "pyridoxine", "cobalamin",
        ],
        score: 85,
        additive_class: None,
        template: "{ingredient} looks like an added vitamin or mineral.",
    },
    HeuristicFamily {
        family: "sweetener",
        keywords: &[
            "aspartame", "sucralose", "saccharin", "acesulfame", "stevia", "steviol",
            "sorbitol", "xylitol", "maltitol", "erythritol", "mannitol", "sweetener",
            "neotame", "monk fruit",
        ],
        score: 30,
        additive_class: Some("sweetener"),
        template: "{ingredient} looks like a sweetener used in place of sugar.",
    },
    HeuristicFamily {
        family: "natural_extract",
        keywords: &["extract", "natural", "essential oil", "oleoresin", "concentrate"],
        score: 65,
        additive_class: None,
        template: "{ingredient} looks like a plant-derived extract or natural flavouring.",
    },
    HeuristicFamily {
        family: "thickener",
        keywords: &[
            "gum", "pectin", "starch", "agar", "carrageenan", "gelatin", "cellulose",
            "alginate", "thickener", "maltodextrin",
        ],
        score: 55,
        additive_class: Some("thickener"),
        template: "{ingredient} looks like a thickener or stabiliser.",
    },
];

static FAMILY_MATCHERS: LazyLock<Vec<(&'static HeuristicFamily, Regex)>> = LazyLock::new(|| {
    HEURISTIC_FAMILIES
        .iter()
        .filter_map(|family| {
            let alternation = family
                .keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            // Keywords anchor at a word start but may be followed by suffixes.
            Regex::new(&format!(r"\b(?:{alternation})"))
                .ok()
                .map(|re| (family, re))
        })
        .collect()
});

/// Returns the first family whose keywords appear in `name`.
pub fn classify(name: &str) -> Option<&'static HeuristicFamily> {
    FAMILY_MATCHERS
        .iter()
        .find(|(_, re)| re.is_match(name))
        .map(|(family, _)| *family)
}

/// Builds the heuristic record for `name`. Always produces a record.
pub fn heuristic_record(name: &str) -> IngredientRecord {
    match classify(name) {
        Some(family) => {
            let record = IngredientRecord::new(name, ResolutionSource::Heuristic)
                .with_score(family.score)
                .with_explanation(family.template.replace("{ingredient}", name));
            match family.additive_class {
                Some(class) => record.with_additive_class(class),
                None => record,
            }
        }
        None => IngredientRecord::new(name, ResolutionSource::Heuristic)
            .with_score(NEUTRAL_NUTRITION_SCORE)
            .with_explanation(format!(
                "{name} is not a recognised additive; treated as a typical food ingredient."
            )),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTier;

#[async_trait]
impl ResolutionTier for HeuristicTier {
    fn source(&self) -> ResolutionSource {
        ResolutionSource::Heuristic
    }

    fn writes_back(&self) -> bool {
        true
    }

    async fn lookup(&self, name: &str) -> Option<IngredientRecord> {
        Some(heuristic_record(name))
    }
}
