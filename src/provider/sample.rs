//! Built-in sample provider
//!
//! An offline catalog of release-style listings, used as the default
//! provider and as a stable fixture for the UI. Titles carry quality
//! tokens so the highlight rules have something to chew on.

use std::path::PathBuf;

use crate::config::Config;
use crate::models::{Column, HighlightRules, Listing, Payload};
use crate::provider::{FilterSpec, FilterValues, ListingStream, Provider, ProviderError};
use crate::ui::Theme;

pub const NAME: &str = "sample";

/// Catalog entry: (title, year, seeds)
const CATALOG: &[(&str, i64, u32)] = &[
    ("Neon.District.2021.2160p.WEB-DL", 2021, 412),
    ("Neon.District.2021.1080p.BluRay", 2021, 286),
    ("Neon.District.2021.720p.WEB", 2021, 93),
    ("Chrome.Saints.2019.1080p.BluRay", 2019, 154),
    ("Chrome.Saints.2019.480p.DVDRip", 2019, 12),
    ("Midnight.Protocol.2023.2160p.HDR", 2023, 530),
    ("Midnight.Protocol.2023.1080p.WEB", 2023, 348),
    ("Glass.Harbor.2017.720p.HDTV", 2017, 41),
    ("Glass.Harbor.2017.1080p.Remux", 2017, 77),
    ("Static.Bloom.2024.2160p.WEB-DL", 2024, 611),
    ("Static.Bloom.2024.1080p.WEB-DL", 2024, 402),
    ("Static.Bloom.2024.720p.WEB", 2024, 120),
    ("Paper.Satellites.2015.1080p.BluRay", 2015, 66),
    ("Paper.Satellites.2015.480p.WEB", 2015, 9),
    ("Last.Transmission.2020.1080p.WEB", 2020, 233),
    ("Last.Transmission.2020.720p.HDTV", 2020, 58),
    ("Vantablack.2022.2160p.Remux", 2022, 301),
    ("Vantablack.2022.1080p.BluRay", 2022, 245),
    ("Low.Orbit.1999.480p.DVDRip", 1999, 18),
    ("Low.Orbit.1999.720p.Restored", 1999, 34),
    ("Signal.Decay.2018.1080p.WEB-DL", 2018, 129),
    ("Signal.Decay.2018.720p.WEB", 2018, 44),
    ("The.Long.Reboot.2025.2160p.WEB-DL", 2025, 702),
    ("The.Long.Reboot.2025.1080p.WEB-DL", 2025, 489),
];

#[derive(Debug, Clone)]
struct Entry {
    title: String,
    year: i64,
    seeds: u32,
}

impl Entry {
    /// Quality token extracted from the release title
    fn quality(&self) -> &str {
        for token in ["2160p", "1080p", "720p", "480p"] {
            if self.title.contains(token) {
                return token;
            }
        }
        "?"
    }

    fn to_listing(&self) -> Listing {
        let payload = Payload {
            locator: format!("sample://{}", self.title),
            title: self.title.clone(),
            detail: format!(
                "{} ({}) {} seeds, quality {}",
                self.title,
                self.year,
                self.seeds,
                self.quality()
            ),
        };
        Listing::new(payload)
            .with_field("title", &self.title)
            .with_field("year", self.year.to_string())
            .with_field("quality", self.quality())
            .with_field("seeds", self.seeds.to_string())
    }
}

/// Offline demo provider backed by a fixed catalog
pub struct SampleProvider {
    entries: Vec<Entry>,
    limit: usize,
    download_dir: PathBuf,
}

impl SampleProvider {
    pub fn new(config: &Config) -> Self {
        let entries = CATALOG
            .iter()
            .map(|(title, year, seeds)| Entry {
                title: (*title).to_string(),
                year: *year,
                seeds: *seeds,
            })
            .collect();
        Self {
            entries,
            limit: config.listing_limit(),
            download_dir: config.download_dir(),
        }
    }
}

impl Provider for SampleProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn attributes(&self) -> Vec<Column> {
        vec![
            Column::new("title"),
            Column::new("year").width(6).right_aligned(),
            Column::new("quality").width(8),
            Column::new("seeds").width(6).right_aligned(),
        ]
    }

    fn filters(&self) -> Vec<(String, FilterSpec)> {
        vec![
            ("page".to_string(), FilterSpec::integer(1, Some(1), Some(9))),
            (
                "year".to_string(),
                FilterSpec::Integer {
                    default: 1990,
                    minimum: Some(1990),
                    maximum: Some(2025),
                    big_step: 10,
                    auto_refresh: true,
                },
            ),
            ("search".to_string(), FilterSpec::text("")),
        ]
    }

    fn listings(&self, filters: &FilterValues) -> ListingStream {
        let min_year = filters.integer("year").unwrap_or(0);
        let page = filters.integer("page").unwrap_or(1).max(1) as usize;
        let needle = filters.text("search").unwrap_or("").to_lowercase();

        let rows: Vec<Listing> = self
            .entries
            .iter()
            .filter(|e| e.year >= min_year)
            .filter(|e| needle.is_empty() || e.title.to_lowercase().contains(&needle))
            .skip((page - 1) * self.limit)
            .map(Entry::to_listing)
            .collect();

        Box::new(rows.into_iter().map(Ok))
    }

    fn refresh(&mut self) -> Result<(), ProviderError> {
        // Offline catalog: a refresh just reorders so the change is visible
        self.entries.rotate_left(1);
        Ok(())
    }

    fn download(&self, payload: &Payload) -> Result<PathBuf, ProviderError> {
        let file_name = format!("{}.url", payload.title.replace(['/', ' '], "_"));
        let dest = self.download_dir.join(file_name);
        std::fs::create_dir_all(&self.download_dir)?;
        std::fs::write(&dest, format!("{}\n", payload.locator))?;
        Ok(dest)
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn highlight(&self) -> HighlightRules {
        HighlightRules::new(&[
            (r"\b2160p\b", Theme::quality_4k()),
            (r"\b1080p\b", Theme::quality_1080p()),
            (r"\b720p\b", Theme::quality_720p()),
            (r"\b480p\b", Theme::quality_sd()),
        ])
        .expect("static highlight patterns")
    }
}
