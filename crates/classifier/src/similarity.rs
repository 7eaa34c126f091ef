use std::fmt;

use semantic::Embedding;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ConceptCatalog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptScore {
    pub name: String,
    pub score: f32,
}

/// Concept name to similarity score, one entry per catalog entry, in catalog order.
///
/// Serializes as a JSON object whose key order is the catalog order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityMap {
    scores: Vec<ConceptScore>,
}

impl SimilarityMap {
    pub fn new(scores: Vec<ConceptScore>) -> Self {
        Self { scores }
    }

    /// Every name at score 0.0, in the given order.
    pub fn zeroed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            scores: names
                .into_iter()
                .map(|name| ConceptScore {
                    name: name.to_string(),
                    score: 0.0,
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.scores.iter().find(|s| s.name == name).map(|s| s.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConceptScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Copy with every score rounded to `places` decimals.
    pub fn rounded(&self, places: u32) -> Self {
        Self {
            scores: self
                .scores
                .iter()
                .map(|s| ConceptScore {
                    name: s.name.clone(),
                    score: round_to(s.score, places),
                })
                .collect(),
        }
    }

    /// Entries sorted by descending score; equal scores keep catalog order.
    pub fn sorted_desc(&self) -> Vec<&ConceptScore> {
        let mut sorted: Vec<&ConceptScore> = self.scores.iter().collect();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        sorted
    }
}

/// Cosine similarity of `embedding` against every catalog entry, in catalog order.
pub fn score_against(embedding: &Embedding, catalog: &ConceptCatalog) -> SimilarityMap {
    SimilarityMap {
        scores: catalog
            .entries()
            .iter()
            .map(|entry| ConceptScore {
                name: entry.name.clone(),
                score: embedding.cosine_similarity(&entry.archetype_embedding),
            })
            .collect(),
    }
}

/// Round half away from zero, computed in `f64`.
pub fn round_to(value: f32, places: u32) -> f32 {
    let factor = 10f64.powi(places as i32);
    (((value as f64) * factor).round() / factor) as f32
}

/// Render a fraction as a percentage with one decimal, e.g. `0.8123` as `"81.2%"`.
pub fn format_percent(value: f32) -> String {
    format!("{:.1}%", value as f64 * 100.0)
}

impl Serialize for SimilarityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for s in &self.scores {
            map.serialize_entry(&s.name, &s.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SimilarityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedScores;

        impl<'de> Visitor<'de> for OrderedScores {
            type Value = SimilarityMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of concept name to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, score)) = access.next_entry::<String, f32>()? {
                    scores.push(ConceptScore { name, score });
                }
                Ok(SimilarityMap { scores })
            }
        }

        deserializer.deserialize_map(OrderedScores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConceptEntry;

    fn catalog() -> ConceptCatalog {
        let entry = |name: &str, v: Vec<f32>| ConceptEntry {
            name: name.into(),
            archetype_text: name.into(),
            archetype_embedding: Embedding::new(v, "t", false),
        };
        ConceptCatalog::from_entries(
            "department",
            vec![
                entry("A", vec![1.0, 0.0, 0.0]),
                entry("B", vec![0.0, 1.0, 0.0]),
                entry("C", vec![1.0, 1.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn covers_every_entry_in_range() {
        let map = score_against(&Embedding::new(vec![0.3, -0.9, 0.2], "t", false), &catalog());
        assert_eq!(map.len(), 3);
        assert!(map.iter().all(|s| (-1.0..=1.0).contains(&s.score)));
        let names: Vec<_> = map.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn zero_embedding_scores_zero_everywhere() {
        let map = score_against(&Embedding::zeros(3, "t"), &catalog());
        assert_eq!(map.len(), 3);
        assert!(map.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn rounding_and_percent() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.8125, 2), 0.81);
        assert_eq!(round_to(-0.4567, 3), -0.457);
        assert_eq!(format_percent(0.8), "80.0%");
        assert_eq!(format_percent(0.123), "12.3%");
    }

    #[test]
    fn sorted_desc_keeps_catalog_order_on_ties() {
        let map = SimilarityMap::new(vec![
            ConceptScore { name: "X".into(), score: 0.5 },
            ConceptScore { name: "Y".into(), score: 0.7 },
            ConceptScore { name: "Z".into(), score: 0.5 },
        ]);
        let names: Vec<_> = map.sorted_desc().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["Y", "X", "Z"]);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let map = SimilarityMap::new(vec![
            ConceptScore { name: "Safety".into(), score: 0.5 },
            ConceptScore { name: "HR".into(), score: 0.25 },
        ]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Safety":0.5,"HR":0.25}"#);

        let back: SimilarityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn zeroed_covers_every_name_in_order() {
        let map = SimilarityMap::zeroed(catalog().names());
        let names: Vec<&str> = map.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(map.iter().all(|s| s.score == 0.0));
    }
}
