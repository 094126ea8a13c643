//! End-to-end batch runs against mock collaborators.
//!
//! Rendering needs a real font, so every test starts from a fixture
//! that scans for an installed system font and skips when none exists.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use publisher::testing::{MockAI, MockIndexer, MockJobSource, MockPublisher, MockPublisherCall, RecordingNotifier};
use publisher::{
    load_and_run, process_row, run_batch, Account, Article, BatchError, BatchJob, RowError,
    RowTask, Stage, TextFitEngine,
};

struct Fixture {
    engine: TextFitEngine,
    background_ref: String,
    // Holds the scratch area alive for the test's duration
    _dir: TempDir,
}

impl Fixture {
    /// Build an engine over a synthetic background, or `None` when the
    /// environment has no usable font installed.
    fn new() -> Option<Self> {
        const CANDIDATES: &[&str] = &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/Library/Fonts/Arial Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ];
        let font = CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())?;

        let dir = tempfile::tempdir().unwrap();
        let background_ref = write_background(dir.path());
        let engine = TextFitEngine::new(font, dir.path().join("out")).unwrap();
        Some(Self {
            engine,
            background_ref: background_ref.to_str().unwrap().to_string(),
            _dir: dir,
        })
    }

    fn account(&self, site: &str) -> Account {
        Account::new(
            site,
            format!("https://{site}"),
            "editor",
            "app-pass",
            self.background_ref.as_str(),
        )
    }
}

fn write_background(dir: &Path) -> PathBuf {
    let bg = RgbImage::from_pixel(320, 180, Rgb([40, 90, 160]));
    let path = dir.join("background.png");
    bg.save(&path).unwrap();
    path
}

fn task_for(site: &str) -> RowTask {
    RowTask::new(
        format!("https://news.example/{site}/match"),
        site,
        7,
        "best odds today",
        "https://target.example/odds",
    )
}

#[tokio::test]
async fn batch_continues_past_a_row_with_no_account() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    // Row one targets a site absent from the accounts table
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task_for("alpha.example"))
        .with_row(task_for("beta.example"));

    let ai = MockAI::new();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let summary = run_batch(&job, &fx.engine, &ai, &publisher, &notifier, None).await;

    assert_eq!(summary.published(), 1);
    assert_eq!(summary.failed(), 1);

    // Workbook numbering: the first task is row 2
    assert_eq!(summary.results[0].row, 2);
    assert_eq!(summary.results[0].failed_stage(), Some(Stage::AccountLookup));
    assert_eq!(summary.results[1].row, 3);
    let post = summary.results[1].outcome.as_ref().unwrap();
    assert!(!post.link.is_empty());

    // The failed row produced no remote traffic
    assert!(publisher
        .calls()
        .iter()
        .all(|c| !matches!(c, MockPublisherCall::UploadMedia { site, .. } if site == "alpha.example")));
}

#[tokio::test]
async fn successful_row_uploads_thumbnail_and_two_figures() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let post = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap();
    assert!(!post.link.is_empty());

    // Thumbnail plus one figure per heading slot
    assert_eq!(publisher.upload_count(), 3);

    // The first upload (the thumbnail) becomes the featured media
    let drafts = publisher.posts();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].featured_media, Some(1));
    assert_eq!(drafts[0].category_id, 7);

    // Figures were woven into the body after the heading tags
    assert_eq!(drafts[0].body_html.matches("<figure id=").count(), 2);
    let first_h2_close = drafts[0].body_html.find("</h2>").unwrap();
    let first_figure = drafts[0].body_html.find("<figure id=").unwrap();
    assert!(first_figure > first_h2_close);
}

#[tokio::test]
async fn overlong_title_row_still_publishes() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    // A valid but extremely long title must not break scratch-file
    // creation; the engine settles at the floor size and the row
    // publishes normally.
    let title = "a thoroughly detailed look at every tactical wrinkle".repeat(8);
    let body = "<p>intro</p><h2>Team news</h2><p>middle with \
                <a href=\"https://target.example/odds\">best odds today</a></p>";
    let ai = MockAI::new().with_article(
        task.source_url.as_str(),
        Article::new(title, vec!["Team news".to_string()], body),
    );
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let post = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap();
    assert!(!post.link.is_empty());
    assert_eq!(publisher.upload_count(), 3);
}

#[tokio::test]
async fn caption_failure_falls_back_to_the_heading_text() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new().failing_captions();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap();

    // Figure uploads carry the heading verbatim as their caption
    let figure_captions: Vec<_> = publisher
        .calls()
        .iter()
        .filter_map(|c| match c {
            MockPublisherCall::UploadMedia { fields, .. } => Some(fields.caption.clone()),
            _ => None,
        })
        .skip(1) // thumbnail
        .collect();
    assert_eq!(figure_captions, vec!["Team news", "Prediction"]);
}

#[tokio::test]
async fn extraction_retries_stop_at_first_success() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new().with_extraction_failures(2);
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let outcome = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None).await;
    assert!(outcome.is_ok());
    assert_eq!(ai.extraction_calls(), 3);
}

#[tokio::test]
async fn extraction_exhaustion_fails_the_row_before_generation() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new().with_extraction_failures(3);
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let err = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RowError::Extraction { attempts: 3, .. }));
    assert_eq!(ai.extraction_calls(), 3);

    // No article was requested and nothing was uploaded
    assert!(!ai
        .calls()
        .iter()
        .any(|c| matches!(c, publisher::testing::MockAICall::GenerateArticle { .. })));
    assert_eq!(publisher.upload_count(), 0);
}

#[tokio::test]
async fn empty_title_is_a_generation_failure_with_no_composition() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new().with_article(
        task.source_url.as_str(),
        Article::new("   ", vec!["Team news".to_string()], "<p>body</p>"),
    );
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let err = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RowError::EmptyTitle));
    assert_eq!(err.stage(), Stage::ContentGeneration);
    assert_eq!(publisher.upload_count(), 0);
}

#[tokio::test]
async fn article_without_headings_publishes_with_only_the_thumbnail() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let body = "<p>One flat paragraph with <a href=\"https://target.example/odds\">best odds today</a>.</p>";
    let ai = MockAI::new().with_article(
        task.source_url.as_str(),
        Article::new("Flat preview", vec![], body),
    );
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None)
        .await
        .unwrap();

    assert_eq!(publisher.upload_count(), 1);
    let drafts = publisher.posts();
    assert_eq!(drafts[0].body_html, body);
}

#[tokio::test]
async fn malformed_heading_markup_publishes_the_original_body() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    // Open tag without a matching close: insertion must fail closed
    let body = "<p>intro</p><h2>Team news<p>rest of the body</p>";
    let ai = MockAI::new().with_article(
        task.source_url.as_str(),
        Article::new("Broken markup preview", vec!["Team news".to_string()], body),
    );
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let post = process_row(&task, &job, &fx.engine, &ai, &publisher, &notifier, None).await;
    assert!(post.is_ok());

    let drafts = publisher.posts();
    assert_eq!(drafts[0].body_html, body);
    assert!(!drafts[0].body_html.contains("<figure"));
    assert!(notifier
        .messages()
        .iter()
        .any(|m| m.contains("Figure insertion failed")));
}

#[tokio::test]
async fn published_links_are_submitted_for_indexing() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();
    let indexer = MockIndexer::new();

    let post = process_row(
        &task,
        &job,
        &fx.engine,
        &ai,
        &publisher,
        &notifier,
        Some(&indexer),
    )
    .await
    .unwrap();

    assert_eq!(indexer.submitted(), vec![post.link]);
}

#[tokio::test]
async fn indexing_failure_never_fails_the_row() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let task = task_for("beta.example");
    let job = BatchJob::new()
        .with_account(fx.account("beta.example"))
        .with_row(task.clone());

    let ai = MockAI::new();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();
    let indexer = MockIndexer::new().failing();

    let post = process_row(
        &task,
        &job,
        &fx.engine,
        &ai,
        &publisher,
        &notifier,
        Some(&indexer),
    )
    .await;
    assert!(post.is_ok());
    assert!(notifier
        .messages()
        .iter()
        .any(|m| m.contains("Indexing failed")));
}

#[tokio::test]
async fn unreadable_job_input_halts_before_any_row() {
    let Some(fx) = Fixture::new() else {
        eprintln!("skipping: no system font available");
        return;
    };

    let source = MockJobSource::failing();
    let ai = MockAI::new();
    let publisher = MockPublisher::new();
    let notifier = RecordingNotifier::new();

    let err = load_and_run(
        &source,
        Path::new("missing.xlsx"),
        &fx.engine,
        &ai,
        &publisher,
        &notifier,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BatchError::Source(_)));
    assert!(publisher.calls().is_empty());
    assert!(notifier
        .messages()
        .iter()
        .any(|m| m.contains("Batch aborted")));
}
