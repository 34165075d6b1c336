//! Configuration for page composition.
//!
//! Every threshold used by the four stages lives here. The defaults reproduce
//! the documented behavior; callers can tune them from code with the `with_*`
//! setters or load them from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Font size used whenever a fragment or page has no usable size.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Settings for the overlap merge stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum relative font size difference `|a/b - 1|` for two fragments to merge.
    pub font_size_tolerance: f32,
    /// Divisor applied to the raw expansion value.
    pub expansion_divisor: f32,
    /// Lower bound of the floor, as a multiple of the pair's mean font size.
    pub expansion_floor_ratio: f32,
    /// Absolute minimum of the expansion floor.
    pub expansion_floor_min: f32,
    /// Hard ceiling on the expansion margin.
    pub expansion_ceiling: f32,
    /// Vertical distance under which two members count as the same line.
    pub line_tolerance: f32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            font_size_tolerance: 0.10,
            expansion_divisor: 3.5,
            expansion_floor_ratio: 0.8,
            expansion_floor_min: 5.0,
            expansion_ceiling: 15.0,
            line_tolerance: 10.0,
        }
    }
}

/// Settings for column detection and ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Minimum horizontal gap that separates two columns.
    pub min_gap: f32,
    /// Tolerance used when interleaving non-text elements with composites.
    pub interleave_tolerance: f32,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            min_gap: 15.0,
            interleave_tolerance: 10.0,
        }
    }
}

/// Settings for heading/paragraph classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Heading thresholds as multiples of the page average, h1 first.
    pub heading_multipliers: [f32; 5],
    /// Composites with this many words or more are always paragraphs.
    pub max_heading_words: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            heading_multipliers: [2.10, 1.75, 1.50, 1.25, 1.10],
            max_heading_words: 15,
        }
    }
}

/// Settings for the cross-page continuity analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityConfig {
    /// Heading ratio above which a short page is a cover page.
    pub cover_heading_ratio: f32,
    /// Text length under which a heading-heavy page is a cover page.
    pub cover_max_chars: usize,
    /// Font size, as a multiple of the page average, that counts as very large.
    pub cover_large_font_ratio: f32,
    /// Text length of a blurb-style cover page.
    pub cover_blurb_max_chars: usize,
    /// Maximum composite count of a blurb-style cover page.
    pub cover_blurb_max_composites: usize,
    /// Font size multiple of the page average for a new-section title.
    pub section_font_ratio: f32,
    /// Maximum length of a new-section title.
    pub section_max_chars: usize,
    /// Maximum word count of a new-section title.
    pub section_max_words: usize,
    /// Number of opening composites inspected for a new-section title.
    pub section_lookahead: usize,
    /// Pages with less text than this are short-form.
    pub short_form_max_chars: usize,
    /// Paragraph density at or above which a page is long-form.
    pub long_form_min_paragraph_density: f32,
    /// Maximum relative difference of average font sizes.
    pub font_size_tolerance: f32,
    /// Maximum heading ratio difference.
    pub heading_ratio_tolerance: f32,
    /// Maximum paragraph density difference.
    pub paragraph_density_tolerance: f32,
    /// Maximum element-type distribution distance.
    pub element_distribution_tolerance: f32,
    /// Words inspected at the tail and head for lexical overlap.
    pub lexical_window: usize,
    /// Shared content words needed for the lexical overlap signal.
    pub min_lexical_overlap: usize,
    /// Score needed to continue a group.
    pub min_score: u32,
}

impl Default for ContinuityConfig {
    fn default() -> Self {
        Self {
            cover_heading_ratio: 0.6,
            cover_max_chars: 1000,
            cover_large_font_ratio: 2.0,
            cover_blurb_max_chars: 500,
            cover_blurb_max_composites: 6,
            section_font_ratio: 1.5,
            section_max_chars: 100,
            section_max_words: 12,
            section_lookahead: 3,
            short_form_max_chars: 300,
            long_form_min_paragraph_density: 0.5,
            font_size_tolerance: 0.30,
            heading_ratio_tolerance: 0.4,
            paragraph_density_tolerance: 0.25,
            element_distribution_tolerance: 0.3,
            lexical_window: 40,
            min_lexical_overlap: 2,
            min_score: 2,
        }
    }
}

/// Complete configuration for the composition pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Overlap merge stage
    pub merge: MergeConfig,
    /// Column order stage
    pub columns: ColumnConfig,
    /// Type classification stage
    pub classify: ClassifyConfig,
    /// Page continuity analyzer
    pub continuity: ContinuityConfig,
}

impl ComposerConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON; missing fields keep their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_flow::config::ComposerConfig;
    ///
    /// let json = r#"{ "columns": { "min_gap": 20.0 } }"#;
    /// let config = ComposerConfig::from_json_str(json).unwrap();
    /// assert_eq!(config.columns.min_gap, 20.0);
    /// assert_eq!(config.merge.expansion_ceiling, 15.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the merge stage settings.
    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    /// Set the column stage settings.
    pub fn with_columns(mut self, columns: ColumnConfig) -> Self {
        self.columns = columns;
        self
    }

    /// Set the classification settings.
    pub fn with_classify(mut self, classify: ClassifyConfig) -> Self {
        self.classify = classify;
        self
    }

    /// Set the continuity analyzer settings.
    pub fn with_continuity(mut self, continuity: ContinuityConfig) -> Self {
        self.continuity = continuity;
        self
    }

    /// Check that every threshold is in range.
    pub fn validate(&self) -> Result<()> {
        let m = &self.merge;
        check_positive("merge.expansion_divisor", m.expansion_divisor)?;
        check_non_negative("merge.font_size_tolerance", m.font_size_tolerance)?;
        check_non_negative("merge.expansion_floor_ratio", m.expansion_floor_ratio)?;
        check_non_negative("merge.expansion_floor_min", m.expansion_floor_min)?;
        check_non_negative("merge.expansion_ceiling", m.expansion_ceiling)?;
        check_non_negative("merge.line_tolerance", m.line_tolerance)?;

        check_non_negative("columns.min_gap", self.columns.min_gap)?;
        check_non_negative("columns.interleave_tolerance", self.columns.interleave_tolerance)?;

        let multipliers = &self.classify.heading_multipliers;
        for m in multipliers {
            check_positive("classify.heading_multipliers", *m)?;
        }
        if multipliers.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::InvalidConfig(
                "classify.heading_multipliers must be non-increasing from h1 to h5".to_string(),
            ));
        }

        let c = &self.continuity;
        for (name, value) in [
            ("continuity.cover_heading_ratio", c.cover_heading_ratio),
            ("continuity.long_form_min_paragraph_density", c.long_form_min_paragraph_density),
            ("continuity.heading_ratio_tolerance", c.heading_ratio_tolerance),
            ("continuity.paragraph_density_tolerance", c.paragraph_density_tolerance),
            ("continuity.element_distribution_tolerance", c.element_distribution_tolerance),
        ] {
            check_ratio(name, value)?;
        }
        check_non_negative("continuity.font_size_tolerance", c.font_size_tolerance)?;
        check_positive("continuity.cover_large_font_ratio", c.cover_large_font_ratio)?;
        check_positive("continuity.section_font_ratio", c.section_font_ratio)?;
        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, value)))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be non-negative, got {}", name, value)))
    }
}

fn check_ratio(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be within [0, 1], got {}", name, value)))
    }
}
