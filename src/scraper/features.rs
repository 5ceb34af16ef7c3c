// src/scraper/features.rs

use crate::domain::FeatureFragment;
use regex::Regex;
use tracing::debug;

/// Turns one amenity string into a structured value, if it recognises it.
pub trait AmenityParser {
    fn parse(&self, amenity: &str) -> Option<FeatureFragment>;
}

type BuildFragment = fn(&str) -> Option<FeatureFragment>;

struct PatternRule {
    pattern: Regex,
    label: &'static str,
    build: BuildFragment,
}

fn beds(v: &str) -> Option<FeatureFragment> {
    parse_count(v).map(FeatureFragment::Beds)
}

fn baths_full(v: &str) -> Option<FeatureFragment> {
    parse_count(v).map(FeatureFragment::BathsFull)
}

fn baths_half(v: &str) -> Option<FeatureFragment> {
    parse_count(v).map(FeatureFragment::BathsHalf)
}

fn living_area(v: &str) -> Option<FeatureFragment> {
    parse_area(v).map(FeatureFragment::LivingArea)
}

fn lot_area(v: &str) -> Option<FeatureFragment> {
    parse_area(v).map(FeatureFragment::LotArea)
}

fn garage_spaces(v: &str) -> Option<FeatureFragment> {
    parse_count(v).map(FeatureFragment::GarageSpaces)
}

fn year_built(v: &str) -> Option<FeatureFragment> {
    parse_count(v).map(FeatureFragment::YearBuilt)
}

// (match pattern, label stripped before the value, builder)
// Evaluated top to bottom; when several match, the last one wins.
const RULES: [(&str, &str, BuildFragment); 7] = [
    (r"^Number of Bedrooms", "Number of Bedrooms:", beds),
    (r"^Number of Bathrooms \(full\)", "Number of Bathrooms (full):", baths_full),
    (r"^Number of Bathrooms \(half\)", "Number of Bathrooms (half):", baths_half),
    (r"^Living Area", "Living Area:", living_area),
    (r"^Lot Area", "Lot Area:", lot_area),
    (r"Number of Garage Spaces", "Number of Garage Spaces:", garage_spaces),
    (r"^Year Built", "Year Built:", year_built),
];

fn clean_number(value: &str) -> String {
    value.replace("Square Feet", "").replace(',', "").trim().to_string()
}

fn parse_count(value: &str) -> Option<u32> {
    clean_number(value).parse().ok()
}

fn parse_area(value: &str) -> Option<f64> {
    clean_number(value).parse().ok()
}

/// Ordered table of amenity patterns.
pub struct FeatureTable {
    rules: Vec<PatternRule>,
}

impl FeatureTable {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|&(pattern, label, build)| {
                Ok(PatternRule {
                    pattern: Regex::new(pattern)?,
                    label,
                    build,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }
}

impl AmenityParser for FeatureTable {
    fn parse(&self, amenity: &str) -> Option<FeatureFragment> {
        let rule = self.rules.iter().filter(|r| r.pattern.is_match(amenity)).last()?;
        let value = amenity.replace(rule.label, "");
        let fragment = (rule.build)(&value);
        if fragment.is_none() {
            debug!(amenity, "Recognised amenity has an unreadable value");
        }
        fragment
    }
}

/// Structured values found in a listing's amenities, plus the leftovers.
#[derive(Debug, Default, PartialEq)]
pub struct AmenitySummary {
    pub fragments: Vec<FeatureFragment>,
    pub notes: Vec<String>,
}

pub fn summarize_amenities<P, I, S>(parser: &P, amenities: I) -> AmenitySummary
where
    P: AmenityParser + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = AmenitySummary::default();
    for amenity in amenities {
        let amenity = amenity.as_ref();
        // Patterns are matched on the trimmed text; notes keep the source text.
        match parser.parse(amenity.trim()) {
            Some(fragment) => summary.fragments.push(fragment),
            None => summary.notes.push(amenity.to_string()),
        }
    }
    summary
}
