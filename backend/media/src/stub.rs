use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use prinix_core::{MediaDescriptor, MediaResolver, PrinixError};

/// A resolver that returns a canned descriptor, or always fails.
pub struct StaticResolver {
    media: Option<MediaDescriptor>,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn found(media: MediaDescriptor) -> Self {
        Self {
            media: Some(media),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            media: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaResolver for StaticResolver {
    fn name(&self) -> &str {
        "static"
    }

    async fn resolve(&self, query: &str) -> Result<MediaDescriptor, PrinixError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.media
            .clone()
            .ok_or_else(|| PrinixError::MediaNotFound(query.to_string()))
    }
}
