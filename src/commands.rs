use std::{fs, path::Path};

use anyhow::Context;
use futures::future::join_all;
use serde::Serialize;

use crate::{
    domain::ranking::{DataSpan, Ranking},
    error::Error,
    services::DistroWatchProvider,
};

/// Handler for the `list` command: prints the selectable data spans as a
/// two column table, or as JSON with `--json`.
pub async fn list_data_spans(
    provider: &DistroWatchProvider,
    json: bool,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let data_spans = provider.fetch_data_spans().await?;

    if json {
        println!("{}", serde_json::to_string(&data_spans)?);
    } else {
        for data_span in &data_spans {
            println!("{:<15} {}", data_span.data_span_id, data_span.data_span_name);
        }
    }

    if let Some(path) = file {
        write_json(path, &data_spans)?;
    }
    Ok(())
}

/// Handler for the `ranking` command. `all` anywhere in the tokens fetches
/// every known ranking; otherwise each token is checked against the known
/// span ids and invalid ones are reported without aborting the rest.
///
/// Returns whether every requested token was valid, so the binary can
/// exit non-zero after still printing the valid results.
pub async fn query_ranking(
    provider: &DistroWatchProvider,
    data_spans: &[String],
    json: bool,
    file: Option<&Path>,
) -> anyhow::Result<bool> {
    let (rankings, all_valid) = if data_spans.iter().any(|token| token == "all") {
        (provider.fetch_all_rankings().await?, true)
    } else {
        let known_spans = provider.fetch_data_spans().await?;
        let (valid, invalid) = partition_data_spans(data_spans, &known_spans);

        for token in &invalid {
            let error = Error::InvalidDataSpan(token.to_string());
            eprintln!("{error}, run 'distrowatch list' to see the valid ones");
        }

        let requests = valid.iter().map(|id| provider.fetch_ranking(id));
        let rankings = join_all(requests)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        (rankings, invalid.is_empty())
    };

    if json {
        println!("{}", serde_json::to_string(&rankings)?);
    } else {
        print_rankings(&rankings);
    }

    if let Some(path) = file {
        write_json(path, &rankings)?;
    }
    Ok(all_valid)
}

/// Splits requested span tokens into (known, unknown) against the span
/// list currently offered by the site. Order is preserved on both sides.
pub fn partition_data_spans<'a>(
    tokens: &'a [String],
    known_spans: &[DataSpan],
) -> (Vec<&'a str>, Vec<&'a str>) {
    tokens.iter().map(String::as_str).partition(|token| {
        known_spans
            .iter()
            .any(|data_span| data_span.data_span_id == *token)
    })
}

fn print_rankings(rankings: &[Ranking]) {
    for ranking in rankings {
        println!("{} ({})", ranking.data_span_name, ranking.ranking_type);
        println!("{:>4} {:<24} {:>10} {}", "Rank", "Distribution", "Value", "URL");
        for distribution in &ranking.distributions_ranking {
            println!(
                "{:>4} {:<24} {:>10} {}",
                distribution.rank, distribution.name, distribution.value, distribution.url
            );
        }
        println!();
    }
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(data)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote output to {}", path.display());
    Ok(())
}
