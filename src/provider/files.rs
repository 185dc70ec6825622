//! Local files provider
//!
//! Lists media files beneath a configured directory. The scan is lazy: the
//! row stream walks the tree as the table polls it, and an IO failure
//! mid-walk surfaces as a domain error that truncates the stream.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::Config;
use crate::models::{Column, HighlightRules, Listing, Payload};
use crate::provider::registry::RegistryError;
use crate::provider::{FilterSpec, FilterValues, ListingStream, Provider, ProviderError};
use crate::ui::Theme;

pub const NAME: &str = "files";

const MEDIA_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mov", "webm", "m4v", "mpg", "ts"];

/// Provider over a local media directory
#[derive(Debug)]
pub struct FilesProvider {
    root: PathBuf,
    download_dir: PathBuf,
    limit: usize,
}

impl FilesProvider {
    /// Fails with a configuration error when the media directory does not
    /// exist, rather than presenting an empty listing
    pub fn new(config: &Config) -> Result<Self, RegistryError> {
        let root = config.media_dir();
        if !root.is_dir() {
            return Err(RegistryError::Config {
                name: NAME.to_string(),
                reason: format!("media directory {} does not exist", root.display()),
            });
        }
        Ok(Self {
            root,
            download_dir: config.download_dir(),
            limit: config.listing_limit(),
        })
    }
}

impl Provider for FilesProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn attributes(&self) -> Vec<Column> {
        vec![
            Column::new("title"),
            Column::new("size").width(10).right_aligned(),
            Column::new("age").width(12).right_aligned(),
            Column::new("ext").width(6),
        ]
    }

    fn filters(&self) -> Vec<(String, FilterSpec)> {
        vec![
            (
                // Minimum file size in megabytes
                "min_mb".to_string(),
                FilterSpec::Integer {
                    default: 0,
                    minimum: Some(0),
                    maximum: Some(100_000),
                    big_step: 100,
                    auto_refresh: true,
                },
            ),
            (
                // Only files modified within N days; 0 disables the cutoff
                "days".to_string(),
                FilterSpec::Integer {
                    default: 0,
                    minimum: Some(0),
                    maximum: Some(3650),
                    big_step: 30,
                    auto_refresh: true,
                },
            ),
            ("name".to_string(), FilterSpec::text("")),
        ]
    }

    fn listings(&self, filters: &FilterValues) -> ListingStream {
        let days = filters.integer("days").unwrap_or(0);
        let cutoff = (days > 0)
            .then(|| SystemTime::now().checked_sub(Duration::from_secs(days as u64 * 86_400)))
            .flatten();

        Box::new(Walk {
            stack: vec![ReadDirState::Pending(self.root.clone())],
            needle: filters.text("name").unwrap_or("").to_lowercase(),
            min_bytes: filters.integer("min_mb").unwrap_or(0).max(0) as u64 * 1_000_000,
            cutoff,
        })
    }

    fn refresh(&mut self) -> Result<(), ProviderError> {
        // Nothing is cached between queries; every query rescans the tree
        Ok(())
    }

    fn download(&self, payload: &Payload) -> Result<PathBuf, ProviderError> {
        let source = PathBuf::from(&payload.locator);
        let file_name = source.file_name().ok_or_else(|| {
            ProviderError::Download(format!("{} has no file name", payload.locator))
        })?;
        fs::create_dir_all(&self.download_dir)?;
        let dest = self.download_dir.join(file_name);
        fs::copy(&source, &dest)?;
        Ok(dest)
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn highlight(&self) -> HighlightRules {
        HighlightRules::new(&[
            (r"\b(?:2160p|4[Kk])\b", Theme::quality_4k()),
            (r"\b1080p\b", Theme::quality_1080p()),
            (r"\b720p\b", Theme::quality_720p()),
            (r"\b(?:[Xx]26[45]|HEVC)\b", Theme::codec()),
        ])
        .expect("static highlight patterns")
    }
}

// =============================================================================
// Lazy Directory Walk
// =============================================================================

enum ReadDirState {
    /// Directory discovered but not yet opened
    Pending(PathBuf),
    Open(fs::ReadDir),
}

/// Depth-first walk yielding one listing per matching media file
struct Walk {
    stack: Vec<ReadDirState>,
    needle: String,
    min_bytes: u64,
    cutoff: Option<SystemTime>,
}

impl Walk {
    fn matches(&self, name: &str, size: u64, modified: Option<SystemTime>) -> bool {
        if !self.needle.is_empty() && !name.to_lowercase().contains(&self.needle) {
            return false;
        }
        if size < self.min_bytes {
            return false;
        }
        if let (Some(cutoff), Some(modified)) = (self.cutoff, modified) {
            if modified < cutoff {
                return false;
            }
        }
        true
    }
}

impl Iterator for Walk {
    type Item = Result<Listing, ProviderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.stack.last_mut()?;
            if let ReadDirState::Pending(path) = state {
                let path = std::mem::take(path);
                match fs::read_dir(&path) {
                    Ok(rd) => *state = ReadDirState::Open(rd),
                    Err(e) => {
                        self.stack.pop();
                        return Some(Err(e.into()));
                    }
                }
            }
            let ReadDirState::Open(rd) = self.stack.last_mut()? else {
                continue;
            };

            let entry = match rd.next() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(entry)) => entry,
            };

            let path = entry.path();
            if path.is_dir() {
                self.stack.push(ReadDirState::Pending(path));
                continue;
            }
            if !is_media(&path) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => return Some(Err(e.into())),
            };
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let modified = metadata.modified().ok();
            if !self.matches(&name, metadata.len(), modified) {
                continue;
            }

            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            let payload = Payload {
                locator: path.to_string_lossy().into_owned(),
                title: name.clone(),
                detail: format!("{} ({})", path.display(), format_size(metadata.len())),
            };
            let listing = Listing::new(payload)
                .with_field("title", &name)
                .with_field("size", format_size(metadata.len()))
                .with_field("age", format_age(modified))
                .with_field("ext", ext);
            return Some(Ok(listing));
        }
    }
}

fn is_media(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Human-readable byte size (GB/MB/KB)
fn format_size(bytes: u64) -> String {
    const GB: u64 = 1_000_000_000;
    const MB: u64 = 1_000_000;
    const KB: u64 = 1_000;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.0} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    }
}

/// Age of a file as "today", "3d" or "2y"
fn format_age(modified: Option<SystemTime>) -> String {
    let Some(modified) = modified else {
        return "?".to_string();
    };
    let days = SystemTime::now()
        .duration_since(modified)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or(0);
    match days {
        0 => "today".to_string(),
        1..=364 => format!("{}d", days),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FilterValue;
    use std::io::Write;

    fn seed_media(dir: &Path) {
        fs::create_dir_all(dir.join("shows")).unwrap();
        let files = [
            ("Dune.2021.1080p.mkv", 3_000_000u64),
            ("Dune.2021.720p.mp4", 1_000_000),
            ("shows/Static.Bloom.S01E01.2160p.mkv", 5_000_000),
            ("notes.txt", 100),
        ];
        for (name, size) in files {
            let mut f = fs::File::create(dir.join(name)).unwrap();
            f.write_all(&vec![0u8; size as usize]).unwrap();
        }
    }

    fn provider_for(dir: &Path) -> FilesProvider {
        FilesProvider::new(&Config {
            media_dir: Some(dir.to_path_buf()),
            download_dir: Some(dir.join("downloads")),
            ..Config::default()
        })
        .unwrap()
    }

    fn collect(stream: ListingStream) -> Vec<Listing> {
        stream.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_missing_media_dir_is_config_error() {
        let err = FilesProvider::new(&Config {
            media_dir: Some(PathBuf::from("/definitely/not/here")),
            ..Config::default()
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::Config { name, .. } if name == "files"));
    }

    #[test]
    fn test_walk_finds_media_recursively() {
        let dir = tempfile::tempdir().unwrap();
        seed_media(dir.path());
        let rows = collect(provider_for(dir.path()).listings(&FilterValues::new()));

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.field("ext").is_some()));
        assert!(rows.iter().any(|r| r.payload.title.contains("Static.Bloom")));
    }

    #[test]
    fn test_name_filter() {
        let dir = tempfile::tempdir().unwrap();
        seed_media(dir.path());
        let mut values = FilterValues::new();
        values.set("name", FilterValue::Text("dune".into()));

        let rows = collect(provider_for(dir.path()).listings(&values));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_min_size_filter() {
        let dir = tempfile::tempdir().unwrap();
        seed_media(dir.path());
        let mut values = FilterValues::new();
        values.set("min_mb", FilterValue::Integer(2));

        let rows = collect(provider_for(dir.path()).listings(&values));
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_ne!(row.field("size"), Some("1 MB"));
        }
    }

    #[test]
    fn test_download_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        seed_media(dir.path());
        let provider = provider_for(dir.path());
        let rows = collect(provider.listings(&FilterValues::new()));

        let dest = provider.download(&rows[0].payload).unwrap();
        assert!(dest.exists());
        assert!(dest.starts_with(dir.path().join("downloads")));
    }

    #[test]
    fn test_unreadable_dir_yields_stream_error() {
        let provider = FilesProvider {
            root: PathBuf::from("/definitely/not/here"),
            download_dir: std::env::temp_dir(),
            limit: 50,
        };
        let mut stream = provider.listings(&FilterValues::new());
        assert!(matches!(stream.next(), Some(Err(ProviderError::Io(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(2_500_000_000), "2.5 GB");
        assert_eq!(format_size(750_000_000), "750 MB");
        assert_eq!(format_size(12_000), "12 KB");
    }
}
