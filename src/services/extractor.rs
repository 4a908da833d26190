use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::ranking::{DataSpan, Distribution, Ranking, RankingType};

/// Marker text of the first header cell of the ranking table. The table
/// cannot be located by its CSS class alone; several tables on the page
/// share `class="News"`.
const RANKING_TABLE_HEADING: &str = "Page Hit Ranking";

/// Extracts the list of selectable data spans from the index page.
///
/// Returns an empty vec when the page does not contain a recognizable
/// ranking table, which usually means the upstream layout changed.
pub fn parse_data_spans(html_content: &str) -> Vec<DataSpan> {
    let html_document = Html::parse_document(html_content);
    let option_selector = Selector::parse("option").unwrap();

    let Some(span_select) = find_data_span_select(&html_document) else {
        return Vec::new();
    };

    span_select
        .select(&option_selector)
        .filter_map(|option| {
            let data_span_id = option.value().attr("value")?;
            Some(DataSpan {
                data_span_id: data_span_id.to_string(),
                data_span_name: collect_text(option),
            })
        })
        .collect()
}

/// Extracts one ranking from a data span page. Relative distribution
/// links are resolved against `base_url`.
///
/// Best effort on unexpected markup: a missing table or selector yields a
/// ranking with an empty label, `Unknown` type and no entries rather than
/// an error.
pub fn parse_ranking(html_content: &str, base_url: &Url) -> Ranking {
    let html_document = Html::parse_document(html_content);
    let ranking_type_selector = Selector::parse("tr > th:nth-child(3)").unwrap();
    let selected_option_selector = Selector::parse("option[selected]").unwrap();
    let row_selector = Selector::parse("tr").unwrap();

    let Some(ranking_table) = find_ranking_table(&html_document) else {
        log::error!("No ranking table found, page layout may have changed");
        return Ranking {
            data_span_name: String::new(),
            ranking_type: RankingType::Unknown,
            distributions_ranking: Vec::new(),
        };
    };

    // The selected option is what the server actually served, which wins
    // over the span id that was asked for.
    let data_span_name = ranking_table
        .select(&selected_option_selector)
        .next()
        .map(collect_text)
        .unwrap_or_default();

    let ranking_type = ranking_table
        .select(&ranking_type_selector)
        .next()
        .map(|cell| map_ranking_type(&collect_text(cell)))
        .unwrap_or(RankingType::Unknown);

    // Rows 1-3 are the table heading, the data span form and the column
    // header row.
    let distributions_ranking = ranking_table
        .select(&row_selector)
        .skip(3)
        .filter_map(|row| parse_distribution_row(row, base_url))
        .collect();

    Ranking {
        data_span_name,
        ranking_type,
        distributions_ranking,
    }
}

/// Classifies a ranking by the text of the third column header.
/// Case-sensitive prefix match, first rule wins.
pub fn map_ranking_type(ranking_type_text: &str) -> RankingType {
    if ranking_type_text.starts_with("HPD") {
        RankingType::HitsPerDay
    } else if ranking_type_text.starts_with("Rating") {
        RankingType::Rating
    } else if ranking_type_text.starts_with("Trend") {
        RankingType::TrendingPageHits
    } else {
        RankingType::Unknown
    }
}

fn find_ranking_table(html_document: &Html) -> Option<ElementRef<'_>> {
    let table_selector = Selector::parse("table.News").unwrap();
    let heading_selector = Selector::parse("tr > th:nth-child(1)").unwrap();

    html_document.select(&table_selector).find(|table| {
        table
            .select(&heading_selector)
            .next()
            .is_some_and(|heading| collect_text(heading) == RANKING_TABLE_HEADING)
    })
}

fn find_data_span_select(html_document: &Html) -> Option<ElementRef<'_>> {
    let select_selector = Selector::parse("td > form > select").unwrap();

    let Some(ranking_table) = find_ranking_table(html_document) else {
        log::error!("No ranking table found, page layout may have changed");
        return None;
    };

    let span_select = ranking_table.select(&select_selector).next();
    if span_select.is_none() {
        log::error!("No data span selector found inside the ranking table");
    }
    span_select
}

fn parse_distribution_row(row: ElementRef<'_>, base_url: &Url) -> Option<Distribution> {
    let link_selector = Selector::parse("a").unwrap();

    let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
    if cells.len() < 3 {
        return None;
    }
    let link = cells[1].select(&link_selector).next()?;

    let href = link.value().attr("href").unwrap_or_default();
    let url = match base_url.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    };

    // Per-field fallbacks: the source prints 1-based ranks, so 0 marks an
    // unparseable rank cell without dropping the row. Rank parsing is
    // strict, so a digit prefix with trailing decoration also maps to the
    // sentinel rather than to the leading digits.
    let rank = collect_text(cells[0]).parse().unwrap_or(0);
    let value = collect_text(cells[2]).parse().unwrap_or(f64::NAN);

    Some(Distribution {
        name: collect_text(link),
        url,
        rank,
        value,
    })
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::map_ranking_type;
    use crate::domain::ranking::RankingType;

    #[test]
    fn map_ranking_type_matches_known_prefixes() {
        assert_eq!(
            map_ranking_type("HPD last 6 months"),
            RankingType::HitsPerDay
        );
        assert_eq!(map_ranking_type("Rating"), RankingType::Rating);
        assert_eq!(map_ranking_type("Trend"), RankingType::TrendingPageHits);
    }

    #[test]
    fn map_ranking_type_defaults_to_unknown() {
        assert_eq!(map_ranking_type("xyz"), RankingType::Unknown);
        assert_eq!(map_ranking_type(""), RankingType::Unknown);
        // Prefix matching is case-sensitive.
        assert_eq!(map_ranking_type("hpd"), RankingType::Unknown);
    }
}
