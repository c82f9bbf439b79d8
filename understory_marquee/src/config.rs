// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine options and per-ticker configuration resolution.
//!
//! A ticker's effective configuration comes from, narrowest first:
//!
//! 1. its element's attributes (`ticker-speed`, `ticker-gap`, ...),
//! 2. the first [`Breakpoint`] whose `max_width` covers the viewport width,
//! 3. the global [`Options`].
//!
//! Live API overrides apply on top, and a reduced-motion preference forces the
//! speed to zero last.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Scroll direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Content moves toward negative x (right to left).
    #[default]
    #[serde(alias = "left")]
    Forward,
    /// Content moves toward positive x (left to right).
    #[serde(alias = "right")]
    Reverse,
}

impl Direction {
    /// Parse an attribute value. Accepts `forward`/`reverse` and the legacy `left`/`right`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" | "left" => Some(Self::Forward),
            "reverse" | "right" => Some(Self::Reverse),
            _ => None,
        }
    }

    /// Sign of the offset change per unit of movement.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => -1.0,
            Self::Reverse => 1.0,
        }
    }
}

/// Responsive override applied when the viewport is at most `max_width` wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Upper bound (inclusive) of the viewport width, in pixels.
    pub max_width: f64,
    /// Speed override, in pixels per second.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Gap override, in pixels.
    #[serde(default)]
    pub gap: Option<f64>,
    /// Direction override.
    #[serde(default)]
    pub direction: Option<Direction>,
}

/// Global engine options.
///
/// Every field has a default, so a partial JSON document is valid input:
///
/// ```
/// use understory_marquee::{Direction, Options};
///
/// let options = Options::from_json(r#"{ "speed": 80, "direction": "right" }"#).unwrap();
/// assert_eq!(options.speed, 80.0);
/// assert_eq!(options.direction, Direction::Reverse);
/// assert_eq!(options.selector, ".ticker");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Selector for ticker containers.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Selector for items inside a container.
    #[serde(default = "default_item_selector")]
    pub item_selector: String,
    /// Prefix of per-instance attributes.
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,
    /// Speed in pixels per second.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Gap between items, in pixels.
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Scroll direction.
    #[serde(default)]
    pub direction: Direction,
    /// Pause while hovered (and while touched on touch devices).
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
    /// Pause while focus is inside the ticker.
    #[serde(default = "default_true")]
    pub pause_on_focus: bool,
    /// Responsive overrides, narrowest first.
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<Breakpoint>,
    /// Trailing debounce for resize notifications, in milliseconds.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: f64,
    /// Minimum width change that triggers a rebuild, in pixels.
    #[serde(default = "default_resize_threshold")]
    pub resize_threshold: f64,
    /// Delay before rebuilding after an orientation change, in milliseconds.
    #[serde(default = "default_orientation_delay_ms")]
    pub orientation_delay_ms: f64,
    /// Cap on the time step of a single frame, in milliseconds.
    #[serde(default = "default_max_frame_ms")]
    pub max_frame_ms: f64,
    /// Schedule for waiting on late content.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            item_selector: default_item_selector(),
            attribute_prefix: default_attribute_prefix(),
            speed: default_speed(),
            gap: default_gap(),
            direction: Direction::default(),
            pause_on_hover: default_true(),
            pause_on_focus: default_true(),
            breakpoints: default_breakpoints(),
            resize_debounce_ms: default_resize_debounce_ms(),
            resize_threshold: default_resize_threshold(),
            orientation_delay_ms: default_orientation_delay_ms(),
            max_frame_ms: default_max_frame_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

fn default_selector() -> String {
    ".ticker".to_string()
}

fn default_item_selector() -> String {
    ".ticker-item".to_string()
}

fn default_attribute_prefix() -> String {
    "ticker-".to_string()
}

fn default_speed() -> f64 {
    50.0
}

fn default_gap() -> f64 {
    20.0
}

fn default_true() -> bool {
    true
}

fn default_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint {
            max_width: 768.0,
            speed: Some(40.0),
            gap: Some(10.0),
            direction: None,
        },
        Breakpoint {
            max_width: 1024.0,
            speed: Some(45.0),
            gap: Some(15.0),
            direction: None,
        },
    ]
}

fn default_resize_debounce_ms() -> f64 {
    250.0
}

fn default_resize_threshold() -> f64 {
    100.0
}

fn default_orientation_delay_ms() -> f64 {
    300.0
}

fn default_max_frame_ms() -> f64 {
    50.0
}

impl Options {
    /// Parse options from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject negative or non-finite numbers and unsorted breakpoints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("speed", self.speed)?;
        check("gap", self.gap)?;
        check("resize_debounce_ms", self.resize_debounce_ms)?;
        check("resize_threshold", self.resize_threshold)?;
        check("orientation_delay_ms", self.orientation_delay_ms)?;
        check("max_frame_ms", self.max_frame_ms)?;
        check("retry.initial_delay_ms", self.retry.initial_delay_ms)?;
        check("retry.multiplier", self.retry.multiplier)?;
        for bp in &self.breakpoints {
            check("breakpoints.max_width", bp.max_width)?;
            if let Some(speed) = bp.speed {
                check("breakpoints.speed", speed)?;
            }
            if let Some(gap) = bp.gap {
                check("breakpoints.gap", gap)?;
            }
        }
        if self
            .breakpoints
            .windows(2)
            .any(|w| w[0].max_width > w[1].max_width)
        {
            return Err(ConfigError::UnorderedBreakpoints);
        }
        Ok(())
    }

    /// The first breakpoint covering `viewport_width`, scanning narrowest first.
    pub fn breakpoint_for(&self, viewport_width: f64) -> Option<&Breakpoint> {
        self.breakpoints
            .iter()
            .find(|bp| viewport_width <= bp.max_width)
    }

    fn attribute_name(&self, suffix: &str) -> String {
        format!("{}{}", self.attribute_prefix, suffix)
    }
}

fn check(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidNumber { field, value })
    }
}

/// Effective configuration of one ticker. Replaced wholesale, never patched in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerConfig {
    /// Pixels per second; zero freezes the ticker.
    pub speed: f64,
    /// Gap between items, in pixels.
    pub gap: f64,
    /// Scroll direction.
    pub direction: Direction,
    /// Pause while hovered or touched.
    pub pause_on_hover: bool,
    /// Pause while focus is inside.
    pub pause_on_focus: bool,
}

impl TickerConfig {
    /// Signed offset change per second.
    pub fn velocity(&self) -> f64 {
        self.speed * self.direction.sign()
    }
}

/// Values set through the programmatic API. They survive re-resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    /// Speed set with `set_speed`.
    pub speed: Option<f64>,
    /// Direction set with `set_direction`.
    pub direction: Option<Direction>,
}

/// Resolve the effective configuration for one element.
///
/// `attribute` looks up an attribute on the element by full name.
pub fn resolve(
    options: &Options,
    attribute: impl Fn(&str) -> Option<String>,
    viewport_width: f64,
    overrides: &Overrides,
    reduced_motion: bool,
) -> TickerConfig {
    let bp = options.breakpoint_for(viewport_width);

    let speed = number_attribute(options, &attribute, "speed")
        .or_else(|| bp.and_then(|b| b.speed))
        .unwrap_or(options.speed);
    let gap = number_attribute(options, &attribute, "gap")
        .or_else(|| bp.and_then(|b| b.gap))
        .unwrap_or(options.gap);
    let direction = parsed_attribute(options, &attribute, "direction", Direction::parse)
        .or_else(|| bp.and_then(|b| b.direction))
        .unwrap_or(options.direction);
    let pause_on_hover = parsed_attribute(options, &attribute, "pause-on-hover", parse_bool)
        .unwrap_or(options.pause_on_hover);
    let pause_on_focus = parsed_attribute(options, &attribute, "pause-on-focus", parse_bool)
        .unwrap_or(options.pause_on_focus);

    let speed = overrides.speed.unwrap_or(speed);
    let direction = overrides.direction.unwrap_or(direction);

    TickerConfig {
        speed: if reduced_motion { 0.0 } else { speed },
        gap,
        direction,
        pause_on_hover,
        pause_on_focus,
    }
}

fn number_attribute(
    options: &Options,
    attribute: &impl Fn(&str) -> Option<String>,
    suffix: &str,
) -> Option<f64> {
    parsed_attribute(options, attribute, suffix, |raw| {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    })
}

fn parsed_attribute<T>(
    options: &Options,
    attribute: &impl Fn(&str) -> Option<String>,
    suffix: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let name = options.attribute_name(suffix);
    let raw = attribute(&name)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(attribute = %name, value = %raw, "ignoring invalid ticker attribute");
    }
    parsed
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
