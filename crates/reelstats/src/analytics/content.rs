use crate::model::ContentRecord;

/// Views and rating sums for one catalog collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentTally {
    pub views: f64,
    pub rating_sum: f64,
    pub rating_count: u64,
}

impl ContentTally {
    pub fn collect(records: &[ContentRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, item| {
            let rating = item.positive_rating();
            Self {
                views: acc.views + item.views.unwrap_or(0.0),
                rating_sum: acc.rating_sum + rating.unwrap_or(0.0),
                rating_count: acc.rating_count + u64::from(rating.is_some()),
            }
        })
    }
}

/// Catalog-wide view counts and the pooled rating average.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentMetrics {
    pub movie_views: f64,
    pub series_views: f64,
    pub short_film_views: f64,
    pub event_views: f64,
    pub total_views: f64,
    pub avg_rating: f64,
    pub total_ratings: u64,
}

impl ContentMetrics {
    /// Combines the four per-collection tallies. Ratings are pooled across
    /// collections, not averaged per collection.
    pub fn combine(
        movies: ContentTally,
        series: ContentTally,
        short_films: ContentTally,
        events: ContentTally,
    ) -> Self {
        let tallies = [movies, series, short_films, events];
        let rating_sum: f64 = tallies.iter().map(|t| t.rating_sum).sum();
        let total_ratings: u64 = tallies.iter().map(|t| t.rating_count).sum();

        Self {
            movie_views: movies.views,
            series_views: series.views,
            short_film_views: short_films.views,
            event_views: events.views,
            total_views: movies.views + series.views + short_films.views + events.views,
            avg_rating: if total_ratings > 0 {
                rating_sum / total_ratings as f64
            } else {
                0.0
            },
            total_ratings,
        }
    }
}
