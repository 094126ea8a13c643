//! Batch orchestration: drive each row through the fixed stage order
//! with per-row failure isolation.
//!
//! Stage order: team extraction -> account lookup -> content generation
//! -> image composition -> media upload -> caption generation -> figure
//! insertion -> publish -> indexing. A failed stage terminates its row
//! only; completed stages of a failed row are never rolled back.

use std::path::Path;

use tracing::{info, warn};

use crate::compose::{TextFitEngine, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::{AiError, BatchError, RowError};
use crate::html::{figure_fragment, insert_figures};
use crate::retry::{retry, EXTRACTION_ATTEMPTS};
use crate::traits::{ai::AI, index::Indexer, notify::Notifier, publish::Publisher, source::JobSource};
use crate::types::content::{ComposedImage, MediaFields, PostDraft, PublishedPost, TeamPair};
use crate::types::job::{Account, BatchJob, RowTask};
use crate::types::outcome::{BatchSummary, RowResult};

/// Load a job workbook and run the batch.
///
/// A failure here (unreadable workbook, missing sheet) is reported once
/// through the notifier and halts the run before the first row.
pub async fn load_and_run<S, A, P, N>(
    source: &S,
    path: &Path,
    engine: &TextFitEngine,
    ai: &A,
    publisher: &P,
    notifier: &N,
    indexer: Option<&dyn Indexer>,
) -> Result<BatchSummary, BatchError>
where
    S: JobSource,
    A: AI,
    P: Publisher,
    N: Notifier,
{
    let job = match source.load(path) {
        Ok(job) => job,
        Err(e) => {
            notifier.notify(&format!("Batch aborted: {e}")).await;
            return Err(e.into());
        }
    };
    Ok(run_batch(&job, engine, ai, publisher, notifier, indexer).await)
}

/// Run every row of an already-loaded batch, in file order.
///
/// Rows are independent: one bad row never aborts the run. Progress
/// commentary goes to the notifier per row, plus a final summary.
pub async fn run_batch<A, P, N>(
    job: &BatchJob,
    engine: &TextFitEngine,
    ai: &A,
    publisher: &P,
    notifier: &N,
    indexer: Option<&dyn Indexer>,
) -> BatchSummary
where
    A: AI,
    P: Publisher,
    N: Notifier,
{
    notifier
        .notify(&format!("Processing {} rows", job.rows.len()))
        .await;

    let mut results = Vec::with_capacity(job.rows.len());
    for (idx, task) in job.rows.iter().enumerate() {
        // Workbook numbering: header is row 1, first task is row 2
        let row_no = idx + 2;
        notifier
            .notify(&format!(
                "Row {row_no}: {} -> {}",
                task.source_url, task.site
            ))
            .await;

        let outcome = process_row(task, job, engine, ai, publisher, notifier, indexer).await;
        match &outcome {
            Ok(post) => {
                info!(row = row_no, link = %post.link, "row published");
                notifier
                    .notify(&format!("Row {row_no} published: {}", post.link))
                    .await;
            }
            Err(e) => {
                warn!(row = row_no, stage = %e.stage(), "row failed: {e}");
                notifier
                    .notify(&format!("Row {row_no} failed at {}: {e}", e.stage()))
                    .await;
            }
        }
        results.push(RowResult {
            row: row_no,
            outcome,
        });
    }

    let summary = BatchSummary::new(results);
    notifier
        .notify(&format!(
            "Batch complete: {} published, {} failed",
            summary.published(),
            summary.failed()
        ))
        .await;
    summary
}

/// Drive one row through the stage sequence.
///
/// Returns at the first terminal failure; non-terminal problems
/// (caption fallback, figure-insertion fallback, indexing) are notified
/// and the row continues.
pub async fn process_row<A, P, N>(
    task: &RowTask,
    job: &BatchJob,
    engine: &TextFitEngine,
    ai: &A,
    publisher: &P,
    notifier: &N,
    indexer: Option<&dyn Indexer>,
) -> Result<PublishedPost, RowError>
where
    A: AI,
    P: Publisher,
    N: Notifier,
{
    // Team extraction, bounded retry. An attempt only counts as a
    // success when both labels come back non-empty.
    let teams = retry(EXTRACTION_ATTEMPTS, || async {
        let pair = ai.extract_teams(&task.source_url).await?;
        if pair.is_complete() {
            Ok(pair)
        } else {
            Err(AiError::Malformed {
                reason: "empty team label".to_string(),
            })
        }
    })
    .await
    .map_err(|source| RowError::Extraction {
        attempts: EXTRACTION_ATTEMPTS,
        source,
    })?;
    info!(home = %teams.home, away = %teams.away, "teams extracted");

    // Account lookup
    let account = job
        .account_for(&task.site)
        .ok_or_else(|| RowError::Lookup {
            site: task.site.clone(),
        })?;

    // Content generation. An empty title is a generation failure, not
    // an empty-but-valid title.
    let article = ai
        .generate_article(&task.source_url, &task.anchor())
        .await
        .map_err(RowError::Generation)?;
    if article.title.trim().is_empty() {
        return Err(RowError::EmptyTitle);
    }
    info!(title = %article.title, headings = article.headings.len(), "article generated");

    // Image composition: thumbnail always; supplementary images only
    // when at least one section heading exists. Figure 2 belongs to the
    // first heading, figure 3 to the last (same heading when only one).
    let thumbnail = engine.compose(&account.background_ref, &article.title).await?;
    let fig2_heading = article.headings.first().cloned();
    let fig3_heading = article.headings.last().cloned();

    let fig2_image = match &fig2_heading {
        Some(heading) => Some(engine.compose(&account.background_ref, heading).await?),
        None => None,
    };
    let fig3_image = match &fig3_heading {
        Some(heading) => Some(engine.compose(&account.background_ref, heading).await?),
        None => None,
    };

    // Media upload. The thumbnail becomes the post's featured media.
    let thumb_media = publisher
        .upload_media(account, &thumbnail, &MediaFields::uniform(&article.title))
        .await
        .map_err(RowError::Upload)?;

    // Caption generation + supplementary uploads; the heading text is
    // the caption fallback when paraphrasing fails.
    let figure2 = build_figure(ai, publisher, account, fig2_image, fig2_heading, &teams).await?;
    let figure3 = build_figure(ai, publisher, account, fig3_image, fig3_heading, &teams).await?;

    // Figure insertion fails closed: keep the original body and proceed
    // to publish.
    let body_html = match insert_figures(&article.body_html, &figure2, &figure3) {
        Ok(body) => body,
        Err(e) => {
            warn!("figure insertion failed, publishing without figures: {e}");
            notifier
                .notify(&format!("Figure insertion failed, body left as-is: {e}"))
                .await;
            article.body_html.clone()
        }
    };

    // Publish
    let post = publisher
        .create_post(
            account,
            &PostDraft {
                title: article.title.clone(),
                body_html,
                category_id: task.category_id,
                featured_media: thumb_media.id,
            },
        )
        .await
        .map_err(RowError::Publish)?;

    // Indexing: only with a publish link and a configured indexer, and
    // never fatal since the row already succeeded.
    if let Some(indexer) = indexer {
        if !post.link.is_empty() {
            if let Err(e) = indexer.submit(std::slice::from_ref(&post.link)).await {
                warn!(link = %post.link, "indexing submission failed: {e}");
                notifier
                    .notify(&format!("Indexing failed for {}: {e}", post.link))
                    .await;
            }
        }
    }

    Ok(post)
}

/// Caption, upload, and render one supplementary figure. Empty string
/// when the article had no heading for this slot.
async fn build_figure<A, P>(
    ai: &A,
    publisher: &P,
    account: &Account,
    image: Option<ComposedImage>,
    heading: Option<String>,
    teams: &TeamPair,
) -> Result<String, RowError>
where
    A: AI,
    P: Publisher,
{
    let (image, heading) = match (image, heading) {
        (Some(image), Some(heading)) => (image, heading),
        _ => return Ok(String::new()),
    };
    let caption = caption_or_fallback(ai, &heading, teams).await;
    let fields = MediaFields::uniform(&heading).with_caption(caption.clone());
    let media = publisher
        .upload_media(account, &image, &fields)
        .await
        .map_err(RowError::Upload)?;
    Ok(figure_fragment(
        &media.url,
        &caption,
        &caption,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        media.id,
    ))
}

async fn caption_or_fallback<A: AI>(ai: &A, heading: &str, teams: &TeamPair) -> String {
    match ai.caption(heading, Some(teams)).await {
        Ok(caption) if !caption.trim().is_empty() => caption,
        Ok(_) => heading.to_string(),
        Err(e) => {
            warn!(heading, "caption generation failed, using heading: {e}");
            heading.to_string()
        }
    }
}
