//! Contract models for the marquee banner
//!
//! These models are shared by the domain, the native client and the REST layer.
//! Settings types only derive `Serialize`: a `BannerSettings` value is always
//! produced by the validator (or `Default`), never deserialized directly.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Numeric domains for every clamped field
pub mod limits {
    /// Inclusive integer range with the value used when the key is absent
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntRange {
        pub min: i64,
        pub max: i64,
        pub default: i64,
    }

    /// Inclusive float range with the value used when the key is absent
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct FloatRange {
        pub min: f64,
        pub max: f64,
        pub default: f64,
    }

    pub const REPEAT_COUNT: IntRange = IntRange { min: 1, max: 100, default: 5 };
    pub const SCROLL_SPEED_SECONDS: IntRange = IntRange { min: 10, max: 100, default: 30 };
    pub const SPEED_MULTIPLIER: FloatRange = FloatRange { min: 0.1, max: 2.0, default: 1.0 };
    pub const FONT_SIZE: IntRange = IntRange { min: 10, max: 40, default: 16 };
    pub const BORDER_WIDTH_PX: IntRange = IntRange { min: 0, max: 10, default: 0 };
    pub const VERTICAL_PADDING_PX: IntRange = IntRange { min: 0, max: 50, default: 10 };
    pub const MESSAGE_SPACING_PX: IntRange = IntRange { min: 0, max: 200, default: 50 };

    pub const BUTTON_BORDER_WIDTH_PX: IntRange = IntRange { min: 0, max: 10, default: 1 };
    pub const BUTTON_BORDER_RADIUS_PX: IntRange = IntRange { min: 0, max: 50, default: 4 };
    pub const BUTTON_PADDING_PX: IntRange = IntRange { min: 0, max: 30, default: 6 };
    pub const BUTTON_FONT_SIZE: IntRange = IntRange { min: 10, max: 40, default: 14 };
    pub const BUTTON_GAP_PX: IntRange = IntRange { min: 0, max: 200, default: 20 };
    pub const BUTTON_MARGIN_PX: IntRange = IntRange { min: 0, max: 100, default: 10 };

    /// Maximum characters of plain button text
    pub const BUTTON_TEXT_MAX_CHARS: usize = 100;
}

static HEX_COLOR: Lazy<Option<Regex>> = Lazy::new(|| Regex::new("^#[0-9a-fA-F]{6}$").ok());

/// A `#rrggbb` color that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse an exact 6-digit hex color (case-insensitive); the input is kept verbatim
    pub fn parse(raw: &str) -> Option<Self> {
        let matches = HEX_COLOR
            .as_ref()
            .map(|re| re.is_match(raw))
            .unwrap_or(false);
        matches.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compile-time color default, turned into a `HexColor` on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralColor(&'static str);

impl LiteralColor {
    pub fn to_color(self) -> HexColor {
        HexColor(self.0.to_string())
    }
}

/// Component color defaults
pub mod colors {
    use super::LiteralColor;

    pub const BACKGROUND: LiteralColor = LiteralColor("#1e73be");
    pub const TEXT: LiteralColor = LiteralColor("#ffffff");
    pub const BORDER: LiteralColor = LiteralColor("#000000");
    pub const LINK: LiteralColor = LiteralColor("#ffff00");
    pub const BUTTON: LiteralColor = LiteralColor("#ffffff");
    pub const BUTTON_TEXT: LiteralColor = LiteralColor("#1e73be");
    pub const BUTTON_BORDER: LiteralColor = LiteralColor("#ffffff");
}

/// Enumerated setting with a fixed set of accepted spellings
pub trait AllowList: Sized + Copy + Default + 'static {
    /// Every accepted value
    const ALL: &'static [Self];

    /// The stored (and CSS) spelling of this value
    fn as_str(self) -> &'static str;

    /// Exact membership test against the allow-list
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.iter().copied().find(|value| value.as_str() == raw)
    }
}

macro_rules! allow_list {
    (
        $(#[$meta:meta])*
        $name:ident (default = $default:ident) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl AllowList for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

allow_list! {
    /// Font stacks offered to the admin
    FontFamily (default = Inherit) {
        Inherit => "inherit",
        Arial => "Arial, sans-serif",
        Helvetica => "Helvetica, sans-serif",
        Georgia => "Georgia, serif",
        TimesNewRoman => "'Times New Roman', serif",
        Verdana => "Verdana, sans-serif",
        Tahoma => "Tahoma, sans-serif",
        TrebuchetMs => "'Trebuchet MS', sans-serif",
        CourierNew => "'Courier New', monospace",
    }
}

allow_list! {
    /// CSS font weights
    FontWeight (default = Normal) {
        Normal => "normal",
        Bold => "bold",
        W100 => "100",
        W200 => "200",
        W300 => "300",
        W400 => "400",
        W500 => "500",
        W600 => "600",
        W700 => "700",
        W800 => "800",
        W900 => "900",
    }
}

allow_list! {
    /// Border line styles
    BorderStyle (default = Solid) {
        None => "none",
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
        Double => "double",
    }
}

allow_list! {
    /// Edge a locked button is pinned to
    LockPosition (default = Right) {
        Left => "left",
        Right => "right",
    }
}

/// Fully validated banner configuration (the settings snapshot)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerSettings {
    pub enabled: bool,
    /// Sanitized rich text
    pub message: String,
    pub repeat_count: u32,
    pub scroll_speed_seconds: u32,
    pub mobile_speed_multiplier: f64,
    pub tablet_speed_multiplier: f64,
    pub background_color: HexColor,
    pub text_color: HexColor,
    pub border_color: HexColor,
    pub link_color: HexColor,
    pub font_size: u32,
    pub font_family: FontFamily,
    pub font_weight: FontWeight,
    pub border_width_px: u32,
    pub border_style: BorderStyle,
    pub vertical_padding_px: u32,
    pub message_spacing_px: u32,
    pub sitewide: bool,
    /// Free text, one pattern per line
    pub include_urls: String,
    /// Free text, one pattern per line
    pub exclude_urls: String,
    pub disable_on_mobile: bool,
    pub sticky: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
    pub image_start_date: Option<String>,
    pub image_end_date: Option<String>,
    pub button: ButtonSettings,
}

/// Optional call-to-action button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonSettings {
    pub enabled: bool,
    /// Plain text label
    pub text: String,
    /// Target URL, empty when unset or neutralized
    pub link: String,
    pub new_window: bool,
    pub color: HexColor,
    pub text_color: HexColor,
    pub border_color: HexColor,
    pub border_width_px: u32,
    pub border_radius_px: u32,
    pub padding_px: u32,
    pub font_size: u32,
    pub font_weight: FontWeight,
    /// Emit a single pinned button instead of one per repetition
    pub lock_enabled: bool,
    pub lock_position: LockPosition,
    /// Spacing between a locked button and the track
    pub gap_px: u32,
    /// Inline-mode spacing before each button
    pub margin_left_px: u32,
    /// Inline-mode spacing after each button
    pub margin_right_px: u32,
}

impl ButtonSettings {
    /// Whether a button should be emitted at all
    pub fn is_active(&self) -> bool {
        self.enabled && !self.text.is_empty()
    }
}

fn int_default(range: limits::IntRange) -> u32 {
    u32::try_from(range.default).unwrap_or(0)
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            link: String::new(),
            new_window: false,
            color: colors::BUTTON.to_color(),
            text_color: colors::BUTTON_TEXT.to_color(),
            border_color: colors::BUTTON_BORDER.to_color(),
            border_width_px: int_default(limits::BUTTON_BORDER_WIDTH_PX),
            border_radius_px: int_default(limits::BUTTON_BORDER_RADIUS_PX),
            padding_px: int_default(limits::BUTTON_PADDING_PX),
            font_size: int_default(limits::BUTTON_FONT_SIZE),
            font_weight: FontWeight::default(),
            lock_enabled: false,
            lock_position: LockPosition::default(),
            gap_px: int_default(limits::BUTTON_GAP_PX),
            margin_left_px: int_default(limits::BUTTON_MARGIN_PX),
            margin_right_px: int_default(limits::BUTTON_MARGIN_PX),
        }
    }
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            message: String::new(),
            repeat_count: int_default(limits::REPEAT_COUNT),
            scroll_speed_seconds: int_default(limits::SCROLL_SPEED_SECONDS),
            mobile_speed_multiplier: limits::SPEED_MULTIPLIER.default,
            tablet_speed_multiplier: limits::SPEED_MULTIPLIER.default,
            background_color: colors::BACKGROUND.to_color(),
            text_color: colors::TEXT.to_color(),
            border_color: colors::BORDER.to_color(),
            link_color: colors::LINK.to_color(),
            font_size: int_default(limits::FONT_SIZE),
            font_family: FontFamily::default(),
            font_weight: FontWeight::default(),
            border_width_px: int_default(limits::BORDER_WIDTH_PX),
            border_style: BorderStyle::default(),
            vertical_padding_px: int_default(limits::VERTICAL_PADDING_PX),
            message_spacing_px: int_default(limits::MESSAGE_SPACING_PX),
            sitewide: true,
            include_urls: String::new(),
            exclude_urls: String::new(),
            disable_on_mobile: false,
            sticky: false,
            start_date: None,
            end_date: None,
            image: None,
            image_start_date: None,
            image_end_date: None,
            button: ButtonSettings::default(),
        }
    }
}

/// Viewport width classes used for responsive speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

/// Upper widths (inclusive) of the mobile and tablet classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub mobile_max_width_px: u32,
    pub tablet_max_width_px: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile_max_width_px: 768,
            tablet_max_width_px: 1024,
        }
    }
}

impl ViewportClass {
    /// Classify a live viewport width
    pub fn from_width(width_px: u32, breakpoints: &Breakpoints) -> Self {
        if width_px <= breakpoints.mobile_max_width_px {
            Self::Mobile
        } else if width_px <= breakpoints.tablet_max_width_px {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

/// Facts about one page view, captured once per evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Path or full URL of the page, query and fragment allowed
    pub current_path: String,
    pub now: DateTime<Utc>,
    pub viewport: ViewportClass,
}

impl RequestContext {
    pub fn new(current_path: impl Into<String>, now: DateTime<Utc>, viewport: ViewportClass) -> Self {
        Self {
            current_path: current_path.into(),
            now,
            viewport,
        }
    }

    /// Build a context stamped with the current time
    pub fn capture(current_path: impl Into<String>, viewport: ViewportClass) -> Self {
        Self::new(current_path, Utc::now(), viewport)
    }
}

/// Why the text banner is (or is not) shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Visible,
    Disabled,
    EmptyMessage,
    OutsideSchedule,
    /// Current path matched an exclude pattern
    Excluded,
    /// Targeting is page-specific and no include pattern matched
    NotIncluded,
}

/// Outcome of the text banner pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDecision {
    pub show: bool,
    pub reason: DecisionReason,
    /// Snapshot the decision was made against, absent when validation exited early
    pub settings: Option<BannerSettings>,
}

impl RenderDecision {
    pub fn hidden(reason: DecisionReason, settings: Option<BannerSettings>) -> Self {
        Self {
            show: false,
            reason,
            settings,
        }
    }

    pub fn visible(settings: BannerSettings) -> Self {
        Self {
            show: true,
            reason: DecisionReason::Visible,
            settings: Some(settings),
        }
    }
}

impl DecisionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Disabled => "disabled",
            Self::EmptyMessage => "empty_message",
            Self::OutsideSchedule => "outside_schedule",
            Self::Excluded => "excluded",
            Self::NotIncluded => "not_included",
        }
    }
}

/// Why the image banner is (or is not) shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageReason {
    Visible,
    NoImage,
    OutsideSchedule,
}

/// Outcome of the image banner pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDecision {
    pub show: bool,
    pub reason: ImageReason,
    pub url: Option<String>,
}

impl ImageReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::NoImage => "no_image",
            Self::OutsideSchedule => "outside_schedule",
        }
    }
}

/// Both pipelines evaluated against one snapshot and one request context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub text: RenderDecision,
    pub image: ImageDecision,
}

/// Page-injection payload: rendered fragments plus the cache key they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct PageBanner {
    pub evaluation: Evaluation,
    pub stylesheet: Option<String>,
    pub banner_html: Option<String>,
    pub image_html: Option<String>,
    pub settings_hash: String,
}

impl PageBanner {
    /// Whether nothing would be injected
    pub fn is_empty(&self) -> bool {
        self.banner_html.is_none() && self.image_html.is_none()
    }

    /// Concatenated fragment for injection after `<body>`
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(html) = &self.banner_html {
            if let Some(css) = &self.stylesheet {
                out.push_str("<style id=\"marquee-banner-style\">");
                out.push_str(css);
                out.push_str("</style>");
            }
            out.push_str(html);
        }
        if let Some(html) = &self.image_html {
            out.push_str(html);
        }
        out
    }
}
