//! Select → generate → validate → store → track.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use topicwise_core::{Difficulty, Error, NewContent, Result};
use topicwise_select::{DuplicateValidator, TopicSelector};
use topicwise_store::ContentHistoryStore;

use crate::types::*;

/// External text/media generation capability.
pub trait ContentGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<ContentPackage>;
}

/// External storage for generated artifacts (object storage, spreadsheets, ...).
pub trait ArtifactSink: Send + Sync {
    fn name(&self) -> &str;

    /// Store an artifact and return where it can be found.
    fn store(&self, artifact: &Artifact) -> Result<String>;
}

/// Runs one topic at a time through generation and publication.
pub struct ContentPipeline {
    selector: TopicSelector,
    validator: DuplicateValidator,
    generator: Arc<dyn ContentGenerator>,
    sinks: Vec<Arc<dyn ArtifactSink>>,
    reject_invalid: bool,
}

impl ContentPipeline {
    pub fn new(
        selector: TopicSelector,
        validator: DuplicateValidator,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            selector,
            validator,
            generator,
            sinks: Vec::new(),
            reject_invalid: false,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Stop before publishing when validation fails.
    pub fn reject_invalid(mut self, reject: bool) -> Self {
        self.reject_invalid = reject;
        self
    }

    /// Run the pipeline for one piece.
    ///
    /// Without a topic the selector picks one; an explicit topic keeps the
    /// given category (or a suggested one) and its catalog difficulty.
    pub fn run<R: Rng + ?Sized>(
        &self,
        topic: Option<&str>,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
        rng: &mut R,
    ) -> Result<PipelineRun> {
        let request = match topic {
            None => {
                let pick = self.selector.select(category, difficulty, true, rng)?;
                GenerationRequest {
                    topic: pick.topic,
                    category: pick.category,
                    difficulty: pick.difficulty,
                }
            }
            Some(topic) => {
                let category = match category {
                    Some(c) => c.to_string(),
                    None => self.selector.engine().suggest_next_category(true, rng)?,
                };
                let difficulty = difficulty
                    .or_else(|| self.selector.catalog().difficulty_of(&category, topic))
                    .unwrap_or_default();
                GenerationRequest {
                    topic: topic.to_string(),
                    category,
                    difficulty,
                }
            }
        };
        self.run_request(request)
    }

    fn run_request(&self, request: GenerationRequest) -> Result<PipelineRun> {
        info!("Generating '{}' ({})", request.topic, request.category);
        let package = self.generator.generate(&request)?;

        let validation =
            self.validator
                .validate(&package.title, &request.topic, Some(&request.category))?;
        if self.reject_invalid && !validation.is_valid {
            warn!(
                "Rejected '{}': score={:.3}",
                package.title, validation.overall_score
            );
            return Ok(PipelineRun {
                status: PipelineStatus::Rejected,
                request,
                title: package.title,
                validation,
                stored: Vec::new(),
                record: None,
            });
        }

        let stored = self.store_artifacts(&package.artifacts)?;

        let record = self.selector.engine().history().record(NewContent::new(
            package.title.clone(),
            request.topic.clone(),
            request.category.clone(),
            request.difficulty,
        ))?;
        info!(
            "Published '{}' as {} ({} artifacts stored)",
            record.title,
            record.unique_id,
            stored.len()
        );

        Ok(PipelineRun {
            status: PipelineStatus::Published,
            request,
            title: package.title,
            validation,
            stored,
            record: Some(record),
        })
    }

    /// Hand every artifact to every sink.
    ///
    /// Sinks have no rollback, so on failure the artifacts already stored are
    /// logged with their locations and the piece is not tracked.
    fn store_artifacts(&self, artifacts: &[Artifact]) -> Result<Vec<StoredArtifact>> {
        let mut stored = Vec::new();
        for artifact in artifacts {
            for sink in &self.sinks {
                match sink.store(artifact) {
                    Ok(url) => stored.push(StoredArtifact {
                        sink: sink.name().to_string(),
                        name: artifact.name.clone(),
                        url,
                    }),
                    Err(e) => {
                        for orphan in &stored {
                            warn!(
                                "Orphaned artifact {} in {}: {}",
                                orphan.name, orphan.sink, orphan.url
                            );
                        }
                        return Err(Error::Upload(format!(
                            "{} to {}: {}",
                            artifact.name,
                            sink.name(),
                            e
                        )));
                    }
                }
            }
        }
        Ok(stored)
    }

    /// Generate up to `count` pieces from a diverse catalog sample.
    ///
    /// A failed piece is reported and the batch continues.
    pub fn run_batch<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> BatchReport {
        let sample = self
            .selector
            .catalog()
            .diverse_sample(count, &HashSet::new(), rng);

        let mut report = BatchReport::default();
        for entry in sample {
            let request = GenerationRequest {
                topic: entry.topic,
                category: entry.category,
                difficulty: entry.difficulty,
            };
            let (topic, category) = (request.topic.clone(), request.category.clone());
            match self.run_request(request) {
                Ok(run) => report.runs.push(run),
                Err(e) => {
                    warn!("Batch item '{}' failed: {}", topic, e);
                    report.failures.push(BatchFailure {
                        topic,
                        category,
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            "Batch complete: {} runs, {} failures",
            report.runs.len(),
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use topicwise_catalog::TopicCatalog;
    use topicwise_diversity::DiversityEngine;
    use topicwise_store::MemoryHistory;

    struct EchoGenerator;

    impl ContentGenerator for EchoGenerator {
        fn generate(&self, request: &GenerationRequest) -> Result<ContentPackage> {
            Ok(ContentPackage {
                title: request.topic.clone(),
                body: format!("All about {}", request.topic),
                artifacts: vec![Artifact {
                    name: "clip.mp4".into(),
                    content_type: "video/mp4".into(),
                    data: vec![0, 1, 2],
                }],
            })
        }
    }

    struct FailingGenerator;

    impl ContentGenerator for FailingGenerator {
        fn generate(&self, _request: &GenerationRequest) -> Result<ContentPackage> {
            Err(Error::Generation("quota exceeded".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        stored: Mutex<Vec<String>>,
    }

    impl ArtifactSink for RecordingSink {
        fn name(&self) -> &str {
            "memory"
        }

        fn store(&self, artifact: &Artifact) -> Result<String> {
            let mut stored = self.stored.lock();
            stored.push(artifact.name.clone());
            Ok(format!("mem://{}/{}", stored.len(), artifact.name))
        }
    }

    struct FailingSink;

    impl ArtifactSink for FailingSink {
        fn name(&self) -> &str {
            "bucket"
        }

        fn store(&self, _artifact: &Artifact) -> Result<String> {
            Err(Error::Storage("bucket unavailable".into()))
        }
    }

    fn pipeline(
        store: Arc<MemoryHistory>,
        generator: Arc<dyn ContentGenerator>,
    ) -> ContentPipeline {
        let engine = DiversityEngine::with_defaults(store);
        let catalog = Arc::new(TopicCatalog::builtin());
        ContentPipeline::new(
            TopicSelector::new(engine.clone(), catalog.clone()),
            DuplicateValidator::new(engine, catalog),
            generator,
        )
    }

    #[test]
    fn test_run_publishes_and_tracks() {
        let store = Arc::new(MemoryHistory::new());
        let sink = Arc::new(RecordingSink::default());
        let pipeline = pipeline(store.clone(), Arc::new(EchoGenerator)).with_sink(sink.clone());
        let mut rng = StdRng::seed_from_u64(1);

        let run = pipeline.run(None, Some("Sleep"), None, &mut rng).unwrap();
        assert_eq!(run.status, PipelineStatus::Published);
        assert_eq!(run.request.category, "Sleep");
        assert_eq!(run.stored.len(), 1);
        assert_eq!(run.stored[0].url, "mem://1/clip.mp4");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(run.record.unwrap().topic, run.request.topic);
        assert_eq!(sink.stored.lock().len(), 1);
    }

    #[test]
    fn test_reject_invalid_skips_publication() {
        let store = Arc::new(MemoryHistory::new());
        store
            .record(NewContent::new(
                "Drink lemon water for energy",
                "Drink lemon water for energy",
                "Hydration",
                Difficulty::Beginner,
            ))
            .unwrap();
        let pipeline = pipeline(store.clone(), Arc::new(EchoGenerator)).reject_invalid(true);
        let mut rng = StdRng::seed_from_u64(1);

        let run = pipeline
            .run(Some("Drink lemon water for energy"), Some("Hydration"), None, &mut rng)
            .unwrap();
        assert_eq!(run.status, PipelineStatus::Rejected);
        assert!(run.record.is_none());
        assert!(!run.validation.alternatives.is_empty());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_content_published_without_opt_in() {
        let store = Arc::new(MemoryHistory::new());
        store
            .record(NewContent::new("a", "evening walk", "Fitness", Difficulty::Beginner))
            .unwrap();
        let pipeline = pipeline(store.clone(), Arc::new(EchoGenerator));
        let mut rng = StdRng::seed_from_u64(1);

        let run = pipeline
            .run(Some("evening walk"), Some("Fitness"), None, &mut rng)
            .unwrap();
        assert!(!run.validation.is_valid);
        assert_eq!(run.status, PipelineStatus::Published);
        assert_eq!(run.request.difficulty, Difficulty::Beginner);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_generation_error_propagates() {
        let store = Arc::new(MemoryHistory::new());
        let pipeline = pipeline(store.clone(), Arc::new(FailingGenerator));
        let mut rng = StdRng::seed_from_u64(1);
        let err = pipeline.run(None, None, None, &mut rng).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_batch_uses_distinct_pairs() {
        let store = Arc::new(MemoryHistory::new());
        let pipeline = pipeline(store.clone(), Arc::new(EchoGenerator));
        let mut rng = StdRng::seed_from_u64(5);

        let report = pipeline.run_batch(4, &mut rng);
        assert_eq!(report.runs.len(), 4);
        assert!(report.failures.is_empty());
        let pairs: HashSet<(String, Difficulty)> = report
            .runs
            .iter()
            .map(|r| (r.request.category.clone(), r.request.difficulty))
            .collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(store.count().unwrap(), 4);

        let failing = self::pipeline(store, Arc::new(FailingGenerator));
        let report = failing.run_batch(2, &mut rng);
        assert!(report.runs.is_empty());
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_second_sink_failure_is_upload_error() {
        let store = Arc::new(MemoryHistory::new());
        let first = Arc::new(RecordingSink::default());
        let pipeline = pipeline(store.clone(), Arc::new(EchoGenerator))
            .with_sink(first.clone())
            .with_sink(Arc::new(FailingSink));
        let mut rng = StdRng::seed_from_u64(2);

        let err = pipeline.run(None, None, None, &mut rng).unwrap_err();
        match err {
            Error::Upload(msg) => {
                assert!(msg.contains("clip.mp4"));
                assert!(msg.contains("bucket unavailable"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(first.stored.lock().len(), 1);
        assert_eq!(store.count().unwrap(), 0);
    }
}
