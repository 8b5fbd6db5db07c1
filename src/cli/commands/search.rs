//! One-shot search command handler

use crate::cli::SearchArgs;
use crate::config::Config;
use crate::models::SearchQuery;
use crate::state::SharedState;

pub async fn cmd_search(config: Config, args: SearchArgs) -> anyhow::Result<()> {
    let query = SearchQuery {
        title: args.title,
        actors: args.actors,
        media_type: args.media_type,
        genre: args.genre,
        page: args.page,
        limit: args.limit.unwrap_or(config.pagination.default_page_size),
    };

    let state = SharedState::new(config)?;
    let result = state.search_service.search(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.results().is_empty() {
        println!("No movies found ({} total)", result.total());
        return Ok(());
    }

    println!(
        "Results {}-{} of {} (page {})",
        (result.page() as usize - 1) * result.limit() as usize + 1,
        (result.page() as usize - 1) * result.limit() as usize + result.results().len(),
        result.total(),
        result.page()
    );
    println!("{:-<60}", "");

    for movie in result.results() {
        println!(
            "• {} ({}) [{}] via {}",
            movie.title(),
            movie.year(),
            movie.media_type(),
            movie.source()
        );
        println!("  Starring: {}", movie.actors().join(", "));
        println!("  Genre: {}", movie.genre().join(", "));
        println!();
    }

    Ok(())
}
