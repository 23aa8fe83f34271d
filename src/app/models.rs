//! Data models for catalog records
//!
//! Shows and videos as returned by the catalog list endpoints, plus the
//! ordered quality tier enum used to pick a rendition for download.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Ordered video quality preference
///
/// `Highest` is not a concrete rendition: it resolves dynamically to the best
/// tier with an available URL for a specific video (premium videos may lack
/// low tiers, free videos may lack HD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Highest,
    Hd,
    High,
    Low,
    Mobile,
}

impl QualityTier {
    /// Concrete tiers in descending preference order, used to resolve `Highest`
    pub const FALLBACK_ORDER: [QualityTier; 4] = [
        QualityTier::Hd,
        QualityTier::High,
        QualityTier::Low,
        QualityTier::Mobile,
    ];
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::Highest => "highest",
            QualityTier::Hd => "hd",
            QualityTier::High => "high",
            QualityTier::Low => "low",
            QualityTier::Mobile => "mobile",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QualityTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highest" => Ok(QualityTier::Highest),
            "hd" => Ok(QualityTier::Hd),
            "high" => Ok(QualityTier::High),
            "low" => Ok(QualityTier::Low),
            "mobile" => Ok(QualityTier::Mobile),
            other => Err(ConfigError::InvalidQuality {
                value: other.to_string(),
            }),
        }
    }
}

/// A show record from the `video_shows` list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub api_detail_url: Option<String>,
}

/// Show reference embedded in a video record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowRef {
    pub id: u64,
    pub title: String,
}

/// A video record from the `videos` list endpoint
///
/// Rendition URLs are per-tier and individually optional; absence means the
/// catalog does not offer that encoding for this video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub video_show: Option<ShowRef>,
    #[serde(default)]
    pub hd_url: Option<String>,
    #[serde(default)]
    pub high_url: Option<String>,
    #[serde(default)]
    pub low_url: Option<String>,
    #[serde(default)]
    pub mobile_url: Option<String>,
}

impl Video {
    /// Rendition URL for a concrete quality tier, if the catalog offers it
    ///
    /// Returns `None` for `Highest`, which is resolved through
    /// [`Video::best_available`] instead.
    pub fn rendition_url(&self, tier: QualityTier) -> Option<&str> {
        match tier {
            QualityTier::Highest => None,
            QualityTier::Hd => self.hd_url.as_deref(),
            QualityTier::High => self.high_url.as_deref(),
            QualityTier::Low => self.low_url.as_deref(),
            QualityTier::Mobile => self.mobile_url.as_deref(),
        }
    }

    /// Best available rendition in descending preference order
    pub fn best_available(&self) -> Option<(QualityTier, &str)> {
        QualityTier::FALLBACK_ORDER
            .iter()
            .find_map(|&tier| self.rendition_url(tier).map(|url| (tier, url)))
    }

    /// Title of the show this video belongs to, when the catalog reports one
    pub fn show_title(&self) -> Option<&str> {
        self.video_show.as_ref().map(|s| s.title.as_str())
    }
}

/// A record type that exposes the field the resolver matches against
pub trait NamedRecord {
    /// The name/title field tested by the query regex
    fn match_field(&self) -> &str;
}

impl NamedRecord for Show {
    fn match_field(&self) -> &str {
        &self.title
    }
}

impl NamedRecord for Video {
    fn match_field(&self) -> &str {
        &self.name
    }
}
