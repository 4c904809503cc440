use std::time::{Duration, Instant};

/// How long a finished export stays downloadable.
pub const EXPORT_TTL: Duration = Duration::from_secs(60);

pub const EXPIRED_MESSAGE: &str = "This export has expired. Export the league again to download it.";

/// A rendered export waiting to be downloaded.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    /// Dropped once the export expires.
    contents: Option<String>,
    created: Instant,
    ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFetch<'a> {
    Ready { file_name: &'a str, contents: &'a str },
    Expired(&'static str),
}

impl ExportArtifact {
    pub fn new(file_name: String, contents: String) -> Self {
        Self::created_at(file_name, contents, Instant::now())
    }

    pub fn created_at(file_name: String, contents: String, created: Instant) -> Self {
        Self { file_name, contents: Some(contents), created, ttl: EXPORT_TTL }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.ttl
    }

    /// Hands out the contents, or frees them once the export has expired.
    pub fn fetch_at(&mut self, now: Instant) -> ArtifactFetch<'_> {
        if self.is_expired_at(now) {
            self.contents = None;
        }
        match &self.contents {
            Some(contents) => ArtifactFetch::Ready { file_name: &self.file_name, contents },
            None => ArtifactFetch::Expired(EXPIRED_MESSAGE),
        }
    }

    pub fn fetch(&mut self) -> ArtifactFetch<'_> {
        self.fetch_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after_ttl() {
        let start = Instant::now();
        let mut artifact = ExportArtifact::created_at("Basketball GM - L.json".into(), "{}".into(), start);
        assert_eq!(
            artifact.fetch_at(start + Duration::from_secs(59)),
            ArtifactFetch::Ready { file_name: "Basketball GM - L.json", contents: "{}" }
        );
        assert_eq!(artifact.fetch_at(start + EXPORT_TTL), ArtifactFetch::Expired(EXPIRED_MESSAGE));
        assert!(artifact.contents.is_none());
        // Freed contents stay gone.
        assert_eq!(artifact.fetch_at(start), ArtifactFetch::Expired(EXPIRED_MESSAGE));
    }
}
