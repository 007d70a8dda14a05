#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use gallery_core::{DescriptorSource, Dimensions, DownloadedArtifact, ImageDescriptor};
use gallery_engine::{
    Clock, ContentStore, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, StoreError,
    Tag, TransformError, Transformer,
};

pub fn fixed_clock() -> Clock {
    Arc::new(|| Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
}

pub fn descriptor(url: &str) -> ImageDescriptor {
    ImageDescriptor {
        source_name: "picsum".to_string(),
        category: "random1_7".to_string(),
        dimensions: Dimensions::new(800, 600),
        url: url.to_string(),
    }
}

/// Hands out `https://img.test/<n>` with a fresh `n` every call.
#[derive(Default)]
pub struct UniqueSource {
    next: usize,
}

impl DescriptorSource for UniqueSource {
    fn next_descriptor(&mut self) -> ImageDescriptor {
        self.next += 1;
        descriptor(&format!("https://img.test/{}", self.next))
    }
}

/// Cycles through a fixed list of URLs.
pub struct CyclingSource {
    urls: Vec<String>,
    next: usize,
}

impl CyclingSource {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            next: 0,
        }
    }
}

impl DescriptorSource for CyclingSource {
    fn next_descriptor(&mut self) -> ImageDescriptor {
        let url = self.urls[self.next % self.urls.len()].clone();
        self.next += 1;
        descriptor(&url)
    }
}

pub fn payload(len: usize) -> FetchOutput {
    FetchOutput {
        bytes: vec![0xAB; len],
        metadata: FetchMetadata {
            original_url: String::new(),
            final_url: String::new(),
            content_type: Some("image/jpeg".to_string()),
            byte_len: len as u64,
        },
    }
}

pub fn network_error() -> FetchError {
    FetchError::new(FailureKind::Network, "connection reset")
}

pub fn too_small() -> FetchError {
    FetchError::new(
        FailureKind::TooSmall {
            min_bytes: 5_000,
            actual: 12,
        },
        "response too small",
    )
}

/// Plays back scripted results, then repeats `fallback` forever.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<FetchOutput, FetchError>>>,
    fallback: Result<FetchOutput, FetchError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(
        script: Vec<Result<FetchOutput, FetchError>>,
        fallback: Result<FetchOutput, FetchError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(result: Result<FetchOutput, FetchError>) -> Self {
        Self::new(Vec::new(), result)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Leaves bytes untouched.
pub struct PassthroughTransformer;

impl Transformer for PassthroughTransformer {
    fn transform(&self, bytes: &[u8]) -> Result<Vec<u8>, TransformError> {
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub data: Vec<u8>,
    pub tags: Vec<Tag>,
}

impl Submission {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }
}

/// In-memory store. Submission `n` (1-based) fails if listed in `failures`.
pub struct FakeStore {
    balance: Result<u128, StoreError>,
    price_fails: bool,
    failures: HashMap<usize, StoreError>,
    submissions: Mutex<Vec<Submission>>,
    attempts: Mutex<usize>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            balance: Ok(1_000_000),
            price_fails: false,
            failures: HashMap::new(),
            submissions: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        }
    }

    pub fn with_balance(mut self, balance: Result<u128, StoreError>) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_price_failure(mut self) -> Self {
        self.price_fails = true;
        self
    }

    pub fn failing_on(mut self, attempt: usize, err: StoreError) -> Self {
        self.failures.insert(attempt, err);
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContentStore for FakeStore {
    async fn balance(&self) -> Result<u128, StoreError> {
        self.balance.clone()
    }

    async fn price(&self, byte_len: u64) -> Result<u128, StoreError> {
        if self.price_fails {
            return Err(StoreError::Network("price endpoint down".into()));
        }
        Ok(u128::from(byte_len) * 10)
    }

    async fn submit(&self, data: Vec<u8>, tags: &[Tag]) -> Result<String, StoreError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if let Some(err) = self.failures.get(&attempt) {
            return Err(err.clone());
        }
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(Submission {
            data,
            tags: tags.to_vec(),
        });
        Ok(format!("cid-{attempt}"))
    }
}

pub fn insufficient() -> StoreError {
    StoreError::InsufficientBalance {
        message: "402 payment required".into(),
    }
}

/// Writes `count` small files into `dir` and returns them as artifacts.
pub fn artifacts_in(dir: &Path, count: usize) -> Vec<DownloadedArtifact> {
    (1..=count)
        .map(|n| {
            let path = dir.join(format!("picsum_random1_{n}_1700000000000_{n}.jpg"));
            std::fs::write(&path, vec![n as u8; 2048]).unwrap();
            DownloadedArtifact {
                local_path: path,
                source_name: "picsum".to_string(),
                category: format!("random1_{n}"),
                source_url: format!("https://img.test/{n}"),
                byte_size: 2048,
                created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            }
        })
        .collect()
}
