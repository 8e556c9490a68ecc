//! Drives every input file through the pipeline stages.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use super::{BatchSummary, FileOutcome, FileReport, Identified, Stage, StageFailure};
use crate::config::Config;
use crate::cover::CoverArtAcquirer;
use crate::enrichment::acoustid::{AcoustIdClient, AcoustIdProvider};
use crate::enrichment::audd::AudDClient;
use crate::enrichment::coverart::CoverArtClient;
use crate::enrichment::fingerprint::Fingerprinter;
use crate::enrichment::http::{self, USER_AGENT};
use crate::enrichment::musicbrainz::MusicBrainzClient;
use crate::enrichment::throttle::Throttle;
use crate::enrichment::traits::RecognitionProvider;
use crate::enrichment::{MetadataResolver, Recognizer};
use crate::error::{Error, Result};
use crate::metadata::{TagSet, TagWriteError, TagWriter, WriteOutcome};
use crate::scanner::has_extension;

/// The network-facing stages, shared by `run` and `identify`
#[derive(Clone)]
pub struct Stages {
    pub recognizer: Recognizer,
    pub resolver: MetadataResolver,
    pub acquirer: CoverArtAcquirer,
}

impl Stages {
    pub fn new(
        recognizer: Recognizer,
        resolver: MetadataResolver,
        acquirer: CoverArtAcquirer,
    ) -> Self {
        Self {
            recognizer,
            resolver,
            acquirer,
        }
    }

    /// Build the real clients described by `config`.
    ///
    /// Providers without credentials are left out; AcoustID is also left out
    /// when `fpcalc` can't be found. Fails when no provider remains.
    pub fn from_config(config: &Config) -> Result<Self> {
        let network = &config.network;
        let retry = network.retry_policy();
        let client = http::build_client(USER_AGENT, network.timeout());

        let mut providers: Vec<Arc<dyn RecognitionProvider>> = Vec::new();
        for name in &config.recognition.providers {
            match name.as_str() {
                "acoustid" => {
                    let Some(key) = credential(&config.credentials.acoustid_api_key) else {
                        tracing::info!("AcoustID disabled: no API key");
                        continue;
                    };
                    let Some(fingerprinter) = Fingerprinter::locate() else {
                        tracing::warn!("AcoustID disabled: fpcalc not found");
                        continue;
                    };
                    let lookup = AcoustIdClient::new(key, client.clone(), retry);
                    providers.push(Arc::new(AcoustIdProvider::new(lookup, fingerprinter)));
                }
                "audd" => {
                    let Some(token) = credential(&config.credentials.audd_api_token) else {
                        tracing::info!("AudD disabled: no API token");
                        continue;
                    };
                    providers.push(Arc::new(AudDClient::new(token, client.clone(), retry)));
                }
                other => tracing::warn!(provider = other, "ignoring unknown recognition provider"),
            }
        }

        if providers.is_empty() {
            return Err(Error::no_provider(
                "set ACOUSTID_API_KEY (with fpcalc installed) or AUDD_API_TOKEN",
            ));
        }

        let throttle = Arc::new(Throttle::new(network.musicbrainz_interval()));
        let musicbrainz = Arc::new(MusicBrainzClient::new(client.clone(), retry, throttle));
        let cover_art = Arc::new(CoverArtClient::new(client, retry, network.artwork_timeout()));

        let recognizer = Recognizer::new(providers, config.recognition.min_confidence);
        tracing::info!(providers = ?recognizer.provider_names(), "recognition providers ready");

        Ok(Self::new(
            recognizer,
            MetadataResolver::new(musicbrainz, cover_art.clone(), config.artwork.size),
            CoverArtAcquirer::new(cover_art),
        ))
    }

    /// Recognize and resolve `file` without writing anything.
    pub async fn identify(&self, file: &Path) -> std::result::Result<Identified, StageFailure> {
        let candidate = self.recognizer.identify(file).await.ok_or_else(|| {
            StageFailure::new(Stage::Recognition, "not identified by any provider")
        })?;

        let source = candidate.source();
        let score = candidate.score();
        let metadata = self
            .resolver
            .resolve(candidate)
            .await
            .map_err(|e| StageFailure::new(Stage::Resolution, e.to_string()))?;

        Ok(Identified {
            source,
            score,
            metadata,
        })
    }
}

fn credential(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Runs a batch of files through [`Stages`] and a [`TagWriter`]
pub struct BatchOrchestrator {
    stages: Stages,
    writer: TagWriter,
    concurrency: usize,
    extension: String,
}

impl BatchOrchestrator {
    pub fn new(stages: Stages, writer: TagWriter) -> Self {
        Self {
            stages,
            writer,
            concurrency: 4,
            extension: "mp3".to_string(),
        }
    }

    /// Build from configuration, writing under `target`.
    pub fn from_config(config: &Config, target: &Path) -> Result<Self> {
        let stages = Stages::from_config(config)?;
        let writer = TagWriter::new(target, config.batch.on_existing)
            .with_extension(config.batch.extension.clone());

        Ok(Self::new(stages, writer)
            .with_concurrency(config.batch.concurrency)
            .with_extension(config.batch.extension.clone()))
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn stages(&self) -> &Stages {
        &self.stages
    }

    /// Process every file with the configured extension.
    ///
    /// At most `concurrency` files are in flight. Each file is classified
    /// independently and the counters come from the collected reports.
    pub async fn run(&self, files: Vec<PathBuf>) -> BatchSummary {
        let files: Vec<PathBuf> = files
            .into_iter()
            .filter(|file| has_extension(file, &self.extension))
            .collect();

        tracing::info!(
            files = files.len(),
            concurrency = self.concurrency,
            "starting batch"
        );

        let reports: Vec<FileReport> = stream::iter(files)
            .map(|file| self.process_file(file))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let summary = BatchSummary::from_reports(reports);
        tracing::info!(
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch finished"
        );
        summary
    }

    /// Run one file through every stage and record its outcome.
    pub async fn process_file(&self, file: PathBuf) -> FileReport {
        let outcome = self.pipeline(&file).await;
        let report = FileReport { file, outcome };
        record(&report);
        report
    }

    async fn pipeline(&self, file: &Path) -> FileOutcome {
        let identified = match self.stages.identify(file).await {
            Ok(identified) => identified,
            Err(failure) => return failure.into(),
        };

        let cover = self
            .stages
            .acquirer
            .fetch(identified.metadata.cover_reference.as_deref())
            .await;
        let with_art = cover.is_some();
        let tags = TagSet::from_resolved(&identified.metadata, cover);

        let writer = self.writer.clone();
        let source = file.to_path_buf();
        let written = tokio::task::spawn_blocking(move || writer.write(&source, &tags))
            .await
            .unwrap_or_else(|e| Err(TagWriteError::Task(e.to_string())));

        match written {
            Ok(WriteOutcome::Written(target)) => FileOutcome::Succeeded { target, with_art },
            Ok(WriteOutcome::SkippedExisting(target)) => FileOutcome::Skipped {
                target,
                reason: "target already exists".to_string(),
            },
            Err(e) => StageFailure::new(Stage::TagWrite, e.to_string()).into(),
        }
    }
}

/// One progress line on stdout and one log entry per file.
fn record(report: &FileReport) {
    let name = report.display_name();
    match &report.outcome {
        FileOutcome::Succeeded { target, with_art } => {
            let art = if *with_art { "" } else { " (no cover art)" };
            println!("✓ {} → {}{}", name, target.display(), art);
            tracing::info!(
                file = %name,
                target = %target.display(),
                cover_art = with_art,
                "tagged copy written"
            );
        }
        FileOutcome::Skipped { target, reason } => {
            println!("- {} skipped: {}", name, reason);
            tracing::info!(file = %name, target = %target.display(), reason = %reason, "skipped");
        }
        FileOutcome::Failed { stage, reason } => {
            println!("✗ {} failed at {}: {}", name, stage, reason);
            tracing::info!(file = %name, stage = %stage, reason = %reason, "failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::coverart::CoverSize;
    use crate::enrichment::domain::{ArtworkLocators, DescribedRecording, EnrichmentError};
    use crate::enrichment::traits::mocks::{
        MockArtwork, MockCoverArt, MockMusicBrainz, MockProvider,
    };
    use crate::metadata::{self, ExistingPolicy};
    use crate::test_utils::{sample_jpeg, write_mp3_fixture};
    use std::fs;
    use tempfile::TempDir;

    const PLACEHOLDER_ART: &str = "https://coverart.example.com/mock-release-id";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("in")).unwrap();
            Self { dir }
        }

        fn input(&self, name: &str) -> PathBuf {
            let path = self.dir.path().join("in").join(name);
            write_mp3_fixture(&path);
            path
        }

        fn out(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        fn orchestrator(
            &self,
            provider: MockProvider,
            musicbrainz: MockMusicBrainz,
            cover_art: MockCoverArt,
            artwork: MockArtwork,
        ) -> BatchOrchestrator {
            self.orchestrator_with_policy(
                ExistingPolicy::Skip,
                provider,
                musicbrainz,
                cover_art,
                artwork,
            )
        }

        fn orchestrator_with_policy(
            &self,
            policy: ExistingPolicy,
            provider: MockProvider,
            musicbrainz: MockMusicBrainz,
            cover_art: MockCoverArt,
            artwork: MockArtwork,
        ) -> BatchOrchestrator {
            let stages = Stages::new(
                Recognizer::new(vec![Arc::new(provider)], 0.5),
                MetadataResolver::new(
                    Arc::new(musicbrainz),
                    Arc::new(cover_art),
                    CoverSize::Medium,
                ),
                CoverArtAcquirer::new(Arc::new(artwork)),
            );
            BatchOrchestrator::new(stages, TagWriter::new(self.out(), policy))
        }

        fn output_files(&self) -> usize {
            walkdir::WalkDir::new(self.out())
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .count()
        }
    }

    fn daft_punk() -> MockProvider {
        MockProvider::recording("Daft Punk", "One More Time", 0.9)
    }

    #[tokio::test]
    async fn test_unrecognized_file_fails_at_recognition() {
        let fx = Fixture::new();
        let input = fx.input("mystery.mp3");
        let orchestrator = fx.orchestrator(
            MockProvider::no_matches("acoustid"),
            MockMusicBrainz::without_release(None, None),
            MockCoverArt::empty(),
            MockArtwork::default(),
        );

        let summary = orchestrator.run(vec![input.clone()]).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.files[0].file, input);
        assert!(matches!(
            summary.files[0].outcome,
            FileOutcome::Failed {
                stage: Stage::Recognition,
                ..
            }
        ));
        assert_eq!(fx.output_files(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_logged_with_file_name() {
        use tracing_subscriber::prelude::*;

        let fx = Fixture::new();
        let input = fx.input("mystery.mp3");
        let log_path = fx.dir.path().join("recognition_log.txt");
        let log = crate::logging::open_log_file(&log_path).unwrap();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(crate::logging::file_layer(log)),
        );

        let orchestrator = fx.orchestrator(
            MockProvider::no_matches("acoustid"),
            MockMusicBrainz::without_release(None, None),
            MockCoverArt::empty(),
            MockArtwork::default(),
        );
        orchestrator.run(vec![input]).await;

        let contents = fs::read_to_string(&log_path).unwrap();
        let line = contents
            .lines()
            .find(|l| l.contains("mystery.mp3"))
            .expect("log entry for the file");
        assert!(line.contains("recognition"));
    }

    #[tokio::test]
    async fn test_recognized_without_release_writes_identity_only() {
        let fx = Fixture::new();
        let input = fx.input("track01.mp3");
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::without_release(Some("Daft Punk"), Some("One More Time")),
            MockCoverArt::with_placeholder(),
            MockArtwork::default(),
        );

        let summary = orchestrator.run(vec![input]).await;
        assert_eq!(summary.succeeded, 1);

        let target = fx.out().join("Daft Punk/Daft Punk - One More Time.mp3");
        assert_eq!(
            summary.files[0].outcome,
            FileOutcome::Succeeded {
                target: target.clone(),
                with_art: false
            }
        );

        let tags = metadata::read(&target).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("Daft Punk"));
        assert_eq!(tags.title.as_deref(), Some("One More Time"));
        assert!(tags.album.is_none());
        assert!(tags.date.is_none());
    }

    #[tokio::test]
    async fn test_same_identity_twice_skips_second_file() {
        let fx = Fixture::new();
        let files = vec![fx.input("a.mp3"), fx.input("b.mp3")];
        let orchestrator = fx
            .orchestrator(
                daft_punk(),
                MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000"),
                MockCoverArt::empty(),
                MockArtwork::default(),
            )
            .with_concurrency(2);

        let summary = orchestrator.run(files).await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(fx.output_files(), 1);

        let target = fx.out().join("Daft Punk/Daft Punk - One More Time.mp3");
        assert_eq!(metadata::read(&target).unwrap().album.as_deref(), Some("Discovery"));
    }

    #[tokio::test]
    async fn test_artwork_404_still_succeeds_without_image() {
        let fx = Fixture::new();
        let input = fx.input("track.mp3");
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000-11-30"),
            MockCoverArt::with_placeholder(),
            MockArtwork::default(),
        );

        let summary = orchestrator.run(vec![input]).await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.without_art, 1);
        let FileOutcome::Succeeded { target, with_art } = &summary.files[0].outcome else {
            panic!("expected success, got {:?}", summary.files[0].outcome);
        };
        assert!(!with_art);

        let tags = metadata::read(target).unwrap();
        assert_eq!(tags.picture_count, 0);
        assert_eq!(tags.album.as_deref(), Some("Discovery"));
        assert_eq!(tags.date.as_deref(), Some("2000-11-30"));
    }

    #[tokio::test]
    async fn test_cover_art_is_embedded() {
        let fx = Fixture::new();
        let input = fx.input("track.mp3");
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000"),
            MockCoverArt::with_placeholder(),
            MockArtwork::serving(PLACEHOLDER_ART, sample_jpeg()),
        );

        let summary = orchestrator.run(vec![input]).await;

        let FileOutcome::Succeeded { target, with_art } = &summary.files[0].outcome else {
            panic!("expected success, got {:?}", summary.files[0].outcome);
        };
        assert!(with_art);
        let tags = metadata::read(target).unwrap();
        assert_eq!(tags.picture_count, 1);
        assert_eq!(tags.front_cover_len, Some(sample_jpeg().len()));
    }

    #[tokio::test]
    async fn test_second_run_skips_everything() {
        let fx = Fixture::new();
        let files = vec![fx.input("a.mp3")];
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000"),
            MockCoverArt::empty(),
            MockArtwork::default(),
        );

        let first = orchestrator.run(files.clone()).await;
        assert_eq!(first.succeeded, 1);
        let target = fx.out().join("Daft Punk/Daft Punk - One More Time.mp3");
        let before = fs::read(&target).unwrap();

        let second = orchestrator.run(files).await;
        assert_eq!(second.skipped, 1);
        assert_eq!(second.succeeded, 0);
        assert_eq!(fs::read(&target).unwrap(), before);
        assert_eq!(fx.output_files(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_rerun_reaches_same_tag_state() {
        let fx = Fixture::new();
        let files = vec![fx.input("a.mp3")];
        let orchestrator = fx.orchestrator_with_policy(
            ExistingPolicy::Overwrite,
            daft_punk(),
            MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000"),
            MockCoverArt::with_placeholder(),
            MockArtwork::serving(PLACEHOLDER_ART, sample_jpeg()),
        );
        let target = fx.out().join("Daft Punk/Daft Punk - One More Time.mp3");

        let first = orchestrator.run(files.clone()).await;
        assert_eq!(
            first.files[0].outcome,
            FileOutcome::Succeeded {
                target: target.clone(),
                with_art: true
            }
        );
        let after_first = metadata::read(&target).unwrap();

        let second = orchestrator.run(files).await;
        assert_eq!(second.succeeded, 1);
        assert_eq!(second.skipped, 0);
        let after_second = metadata::read(&target).unwrap();

        assert_eq!(after_second, after_first);
        assert_eq!(after_second.picture_count, 1);
        assert_eq!(after_second.album.as_deref(), Some("Discovery"));
        assert_eq!(fx.output_files(), 1);
    }

    #[tokio::test]
    async fn test_lookup_error_fails_at_resolution() {
        let fx = Fixture::new();
        let input = fx.input("track.mp3");
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::with_error(EnrichmentError::HttpStatus {
                status: 503,
                message: "Service Unavailable".into(),
            }),
            MockCoverArt::empty(),
            MockArtwork::default(),
        );

        let summary = orchestrator.run(vec![input]).await;

        let FileOutcome::Failed { stage, reason } = &summary.files[0].outcome else {
            panic!("expected failure, got {:?}", summary.files[0].outcome);
        };
        assert_eq!(*stage, Stage::Resolution);
        assert!(reason.contains("503"));
        assert_eq!(fx.output_files(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_source_fails_at_tag_write_only() {
        let fx = Fixture::new();
        let good = fx.input("good.mp3");
        let bad = fx.dir.path().join("in/bad.mp3");
        fs::create_dir(&bad).unwrap();

        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::without_release(None, None),
            MockCoverArt::empty(),
            MockArtwork::default(),
        )
        .with_concurrency(1);

        let summary = orchestrator.run(vec![bad, good]).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        let failed = summary.files.iter().find(|r| r.outcome.is_failure()).unwrap();
        assert_eq!(failed.display_name(), "bad.mp3");
        assert!(matches!(
            failed.outcome,
            FileOutcome::Failed {
                stage: Stage::TagWrite,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_other_extensions_are_ignored() {
        let fx = Fixture::new();
        let notes = fx.dir.path().join("in/notes.txt");
        fs::write(&notes, "not audio").unwrap();
        let provider = Arc::new(daft_punk());
        let shared: Arc<dyn RecognitionProvider> = provider.clone();

        let stages = Stages::new(
            Recognizer::new(vec![shared], 0.5),
            MetadataResolver::new(
                Arc::new(MockMusicBrainz::without_release(None, None)),
                Arc::new(MockCoverArt::empty()),
                CoverSize::Medium,
            ),
            CoverArtAcquirer::new(Arc::new(MockArtwork::default())),
        );
        let orchestrator =
            BatchOrchestrator::new(stages, TagWriter::new(fx.out(), ExistingPolicy::Skip));

        let summary = orchestrator.run(vec![notes, fx.input("LOUD.MP3")]).await;

        assert_eq!(summary.processed(), 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_described_provider() {
        let fx = Fixture::new();
        let input = fx.input("track.mp3");

        let described = DescribedRecording {
            artist: Some("Queen".into()),
            title: Some("Bicycle Race".into()),
            album: Some("Jazz".into()),
            release_date: Some("1978-11-10".into()),
            label: Some("EMI".into()),
            artwork: ArtworkLocators {
                deezer: Some("https://deezer.example.com/cover.jpg".into()),
                ..Default::default()
            },
        };
        let stages = Stages::new(
            Recognizer::new(
                vec![
                    Arc::new(MockProvider::with_error(
                        "acoustid",
                        EnrichmentError::Timeout("lookup".into()),
                    )),
                    Arc::new(MockProvider::described(described)),
                ],
                0.5,
            ),
            MetadataResolver::new(
                Arc::new(MockMusicBrainz::with_error(EnrichmentError::NoMatches)),
                Arc::new(MockCoverArt::empty()),
                CoverSize::Medium,
            ),
            CoverArtAcquirer::new(Arc::new(MockArtwork::serving(
                "https://deezer.example.com/cover.jpg",
                sample_jpeg(),
            ))),
        );
        let orchestrator =
            BatchOrchestrator::new(stages, TagWriter::new(fx.out(), ExistingPolicy::Skip));

        let summary = orchestrator.run(vec![input]).await;

        assert_eq!(summary.succeeded, 1);
        let target = fx.out().join("Queen/Queen - Bicycle Race.mp3");
        let tags = metadata::read(&target).unwrap();
        assert_eq!(tags.label.as_deref(), Some("EMI"));
        assert_eq!(tags.album.as_deref(), Some("Jazz"));
        assert_eq!(tags.picture_count, 1);
    }

    #[tokio::test]
    async fn test_identify_writes_nothing() {
        let fx = Fixture::new();
        let input = fx.input("track.mp3");
        let orchestrator = fx.orchestrator(
            daft_punk(),
            MockMusicBrainz::with_release("Daft Punk", "One More Time", "Discovery", "2000"),
            MockCoverArt::with_placeholder(),
            MockArtwork::default(),
        );

        let identified = orchestrator.stages().identify(&input).await.unwrap();

        assert_eq!(identified.score, 0.9);
        assert_eq!(identified.metadata.album.as_deref(), Some("Discovery"));
        assert_eq!(
            identified.metadata.cover_reference.as_deref(),
            Some(PLACEHOLDER_ART)
        );
        assert!(!fx.out().exists());
    }

    #[test]
    fn test_from_config_without_credentials_fails() {
        let mut config = Config::default();
        config.credentials.acoustid_api_key = None;
        config.credentials.audd_api_token = Some("   ".into());

        let result = Stages::from_config(&config);
        assert!(matches!(result, Err(Error::NoProvider(_))));
    }

    #[test]
    fn test_from_config_with_audd_token() {
        let mut config = Config::default();
        config.recognition.providers = vec!["audd".into()];
        config.credentials.audd_api_token = Some("token".into());

        let stages = Stages::from_config(&config).unwrap();
        assert_eq!(stages.recognizer.provider_names(), vec!["audd"]);
    }
}
