use serde::Deserialize;

use super::lenient;

/// Catalog collections that carry view counts and ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Movie,
    Series,
    ShortFilm,
    Event,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Movie,
        ContentKind::Series,
        ContentKind::ShortFilm,
        ContentKind::Event,
    ];

    pub fn collection(self) -> &'static str {
        match self {
            ContentKind::Movie => "movies",
            ContentKind::Series => "webseries",
            ContentKind::ShortFilm => "shortfilms",
            ContentKind::Event => "events",
        }
    }
}

/// The fields of a catalog item the analytics job reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentRecord {
    #[serde(default, deserialize_with = "lenient::number")]
    pub views: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub rating: Option<f64>,
}

impl ContentRecord {
    /// A rating only counts when it is strictly positive; zero means unrated.
    pub fn positive_rating(&self) -> Option<f64> {
        self.rating.filter(|r| *r > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names() {
        let names: Vec<_> = ContentKind::ALL.iter().map(|k| k.collection()).collect();
        assert_eq!(names, vec!["movies", "webseries", "shortfilms", "events"]);
    }

    #[test]
    fn test_positive_rating() {
        let rated: ContentRecord = serde_json::from_value(json!({ "views": 5, "rating": 4.5 }))
            .unwrap();
        assert_eq!(rated.positive_rating(), Some(4.5));

        let zero: ContentRecord = serde_json::from_value(json!({ "rating": 0 })).unwrap();
        assert_eq!(zero.positive_rating(), None);

        let negative: ContentRecord = serde_json::from_value(json!({ "rating": -1 })).unwrap();
        assert_eq!(negative.positive_rating(), None);
    }

    #[test]
    fn test_missing_views() {
        let item: ContentRecord = serde_json::from_value(json!({ "title": "Pilot" })).unwrap();
        assert_eq!(item.views, None);
    }
}
