//! Settings validation
//!
//! Turns loosely typed admin input into a [`BannerSettings`] snapshot. Nothing
//! here fails: every field has a deterministic fallback, and what was changed
//! along the way is reported as [`Finding`]s for the caller to log.

use crate::contract::model::{
    colors, limits, AllowList, BannerSettings, BorderStyle, ButtonSettings, DecisionReason,
    FontFamily, FontWeight, HexColor, LiteralColor, LockPosition,
};
use crate::domain::sanitize::{self, Neutralized};
use serde_json::{Map, Value};

/// Default bound on message length, in characters
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 2000;

/// What happened to a field during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    /// Malformed value replaced by the default
    Defaulted,
    /// Numeric value moved into its range
    Clamped,
    /// Markup, attribute or URL removed for safety
    Neutralized(Neutralized),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Field key, `button.` prefixed for the button group
    pub field: String,
    pub kind: FindingKind,
}

impl Finding {
    pub fn is_security_relevant(&self) -> bool {
        match &self.kind {
            FindingKind::Neutralized(item) => item.is_security_relevant(),
            _ => false,
        }
    }
}

/// Validated settings plus what validation changed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    pub settings: BannerSettings,
    pub findings: Vec<Finding>,
}

/// Settings validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_message_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LENGTH)
    }
}

impl Validator {
    pub fn new(max_message_length: usize) -> Self {
        Self { max_message_length }
    }

    /// Validate every field of `raw`
    pub fn validate(&self, raw: &Value) -> ValidatedSettings {
        let mut fields = Fields::root(raw);
        let enabled = fields.flag("enabled", false);
        let message = fields.message("message", self.max_message_length);
        fields.complete(enabled, message)
    }

    /// Validate only if the banner can be shown at all
    ///
    /// `enabled && non-empty message` is checked first; when it fails the
    /// remaining fields are not validated and the hiding reason is returned.
    pub fn validate_for_display(&self, raw: &Value) -> Result<ValidatedSettings, DecisionReason> {
        let mut fields = Fields::root(raw);
        let enabled = fields.flag("enabled", false);
        if !enabled {
            return Err(DecisionReason::Disabled);
        }
        let message = fields.message("message", self.max_message_length);
        if message.is_empty() {
            return Err(DecisionReason::EmptyMessage);
        }
        Ok(fields.complete(enabled, message))
    }
}

/// [`Validator::validate`] with default limits
pub fn validate(raw: &Value) -> ValidatedSettings {
    Validator::default().validate(raw)
}

/// Loose boolean: `true`, non-zero numbers, and `"1"`/`"true"`/`"yes"`/`"on"`
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Loose number: JSON numbers, numeric strings and booleans
pub fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// `max(min, min(max, floor(value)))`
pub fn clamp_int(value: f64, range: limits::IntRange) -> i64 {
    let floored = if value.is_finite() { value.floor() } else { 0.0 };
    floored.min(range.max as f64).max(range.min as f64) as i64
}

pub fn clamp_float(value: f64, range: limits::FloatRange) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    value.min(range.max).max(range.min)
}

/// Field reader over one JSON object, collecting findings
struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
    root: Option<&'a Map<String, Value>>,
    prefix: &'static str,
    findings: Vec<Finding>,
}

impl<'a> Fields<'a> {
    fn root(raw: &'a Value) -> Self {
        let map = raw.as_object();
        Self {
            map,
            root: map,
            prefix: "",
            findings: Vec::new(),
        }
    }

    fn nested(&self, key: &'static str, prefix: &'static str) -> Fields<'a> {
        Fields {
            map: self.root.and_then(|root| root.get(key)).and_then(Value::as_object),
            root: self.root,
            prefix,
            findings: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|map| map.get(key)).filter(|value| !value.is_null())
    }

    fn note(&mut self, key: &str, kind: FindingKind) {
        self.findings.push(Finding {
            field: format!("{}{}", self.prefix, key),
            kind,
        });
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).map(truthy).unwrap_or(default)
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    fn int(&mut self, key: &str, range: limits::IntRange) -> u32 {
        let Some(value) = self.get(key) else {
            return to_u32(range.default);
        };
        let number = match numeric(value) {
            Some(number) => number,
            None => {
                self.note(key, FindingKind::Defaulted);
                0.0
            }
        };
        let clamped = clamp_int(number, range);
        if clamped as f64 != number.floor() {
            self.note(key, FindingKind::Clamped);
        }
        to_u32(clamped)
    }

    fn float(&mut self, key: &str, range: limits::FloatRange) -> f64 {
        let Some(value) = self.get(key) else {
            return range.default;
        };
        let number = match numeric(value) {
            Some(number) => number,
            None => {
                self.note(key, FindingKind::Defaulted);
                0.0
            }
        };
        let clamped = clamp_float(number, range);
        if clamped != number {
            self.note(key, FindingKind::Clamped);
        }
        clamped
    }

    fn color(&mut self, key: &str, default: LiteralColor) -> HexColor {
        let Some(value) = self.get(key) else {
            return default.to_color();
        };
        match value.as_str().and_then(|raw| HexColor::parse(raw.trim())) {
            Some(color) => color,
            None => {
                self.note(key, FindingKind::Defaulted);
                default.to_color()
            }
        }
    }

    fn choice<T: AllowList>(&mut self, key: &str) -> T {
        let Some(raw) = self.get(key) else {
            return T::default();
        };
        let parsed = match raw {
            Value::String(text) => T::parse(text),
            Value::Number(number) => T::parse(&number.to_string()),
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            self.note(key, FindingKind::Defaulted);
            T::default()
        })
    }

    fn optional_text(&self, key: &str) -> Option<String> {
        self.text(key)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// URL that must not carry a script-capable scheme
    fn url(&mut self, key: &str) -> Option<String> {
        let url = self.optional_text(key)?;
        if sanitize::is_dangerous_url(&url) {
            self.note(
                key,
                FindingKind::Neutralized(Neutralized::DangerousUrl {
                    attribute: key.to_string(),
                }),
            );
            return None;
        }
        Some(url)
    }

    fn message(&mut self, key: &str, max_chars: usize) -> String {
        let Some(raw) = self.text(key) else {
            return String::new();
        };
        let sanitized = sanitize::sanitize_message_within(&raw, max_chars);
        if sanitized.truncated {
            self.note(key, FindingKind::Clamped);
        }
        for item in sanitized.neutralized {
            self.note(key, FindingKind::Neutralized(item));
        }
        sanitized.html
    }

    fn button(&mut self) -> ButtonSettings {
        let mut fields = self.nested("button", "button.");
        let text: String = fields
            .text("text")
            .map(|raw| sanitize::plain_text(&raw))
            .unwrap_or_default()
            .chars()
            .take(limits::BUTTON_TEXT_MAX_CHARS)
            .collect();

        let button = ButtonSettings {
            enabled: fields.flag("enabled", false),
            text: text.trim().to_string(),
            link: fields.url("link").unwrap_or_default(),
            new_window: fields.flag("new_window", false),
            color: fields.color("color", colors::BUTTON),
            text_color: fields.color("text_color", colors::BUTTON_TEXT),
            border_color: fields.color("border_color", colors::BUTTON_BORDER),
            border_width_px: fields.int("border_width_px", limits::BUTTON_BORDER_WIDTH_PX),
            border_radius_px: fields.int("border_radius_px", limits::BUTTON_BORDER_RADIUS_PX),
            padding_px: fields.int("padding_px", limits::BUTTON_PADDING_PX),
            font_size: fields.int("font_size", limits::BUTTON_FONT_SIZE),
            font_weight: fields.choice::<FontWeight>("font_weight"),
            lock_enabled: fields.flag("lock_enabled", false),
            lock_position: fields.choice::<LockPosition>("lock_position"),
            gap_px: fields.int("gap_px", limits::BUTTON_GAP_PX),
            margin_left_px: fields.int("margin_left_px", limits::BUTTON_MARGIN_PX),
            margin_right_px: fields.int("margin_right_px", limits::BUTTON_MARGIN_PX),
        };
        self.findings.append(&mut fields.findings);
        button
    }

    fn complete(mut self, enabled: bool, message: String) -> ValidatedSettings {
        let settings = BannerSettings {
            enabled,
            message,
            repeat_count: self.int("repeat_count", limits::REPEAT_COUNT),
            scroll_speed_seconds: self.int("scroll_speed_seconds", limits::SCROLL_SPEED_SECONDS),
            mobile_speed_multiplier: self.float("mobile_speed_multiplier", limits::SPEED_MULTIPLIER),
            tablet_speed_multiplier: self.float("tablet_speed_multiplier", limits::SPEED_MULTIPLIER),
            background_color: self.color("background_color", colors::BACKGROUND),
            text_color: self.color("text_color", colors::TEXT),
            border_color: self.color("border_color", colors::BORDER),
            link_color: self.color("link_color", colors::LINK),
            font_size: self.int("font_size", limits::FONT_SIZE),
            font_family: self.choice::<FontFamily>("font_family"),
            font_weight: self.choice::<FontWeight>("font_weight"),
            border_width_px: self.int("border_width_px", limits::BORDER_WIDTH_PX),
            border_style: self.choice::<BorderStyle>("border_style"),
            vertical_padding_px: self.int("vertical_padding_px", limits::VERTICAL_PADDING_PX),
            message_spacing_px: self.int("message_spacing_px", limits::MESSAGE_SPACING_PX),
            sitewide: self.flag("sitewide", true),
            include_urls: self.text("include_urls").unwrap_or_default(),
            exclude_urls: self.text("exclude_urls").unwrap_or_default(),
            disable_on_mobile: self.flag("disable_on_mobile", false),
            sticky: self.flag("sticky", false),
            start_date: self.optional_text("start_date"),
            end_date: self.optional_text("end_date"),
            image: self.url("image"),
            image_start_date: self.optional_text("image_start_date"),
            image_end_date: self.optional_text("image_end_date"),
            button: self.button(),
        };
        ValidatedSettings {
            settings,
            findings: self.findings,
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
