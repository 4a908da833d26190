use std::fmt;

use serde::Serialize;

/// A selectable reporting time window on distrowatch.com, e.g. a single
/// month or a trailing 12-month period. Produced only by parsing the
/// index page's data span selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSpan {
    pub data_span_id: String,
    pub data_span_name: String,
}

/// One row of a page hit ranking. `rank` is the 1-based rank as printed
/// by the source; 0 marks a rank cell that did not parse as a number.
/// `value` is NaN when the value cell did not parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub name: String,
    pub url: String,
    pub rank: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankingType {
    Unknown,
    HitsPerDay,
    TrendingPageHits,
    Rating,
}

impl fmt::Display for RankingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RankingType::Unknown => "unknown",
            RankingType::HitsPerDay => "hits per day",
            RankingType::TrendingPageHits => "trending page hits",
            RankingType::Rating => "rating",
        })
    }
}

/// One fully parsed ranking page. `data_span_name` is the span the server
/// actually selected, which may differ from the one requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub data_span_name: String,
    pub ranking_type: RankingType,
    pub distributions_ranking: Vec<Distribution>,
}
