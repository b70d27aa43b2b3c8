//! Banner renderer
//!
//! Pure functions from a validated snapshot to markup. The inline animation
//! duration reflects the viewport the page was requested with; the stylesheet
//! carries every breakpoint so the same markup stays correct after a resize.

use crate::contract::model::{
    AllowList, BannerSettings, Breakpoints, ButtonSettings, LockPosition, ViewportClass,
};
use crate::domain::markup::{Element, Node};

pub const BANNER_ID: &str = "marquee-banner";
pub const IMAGE_ID: &str = "marquee-banner-image";
pub const DEFAULT_Z_INDEX: i32 = 9999;
const KEYFRAMES: &str = "marquee-banner-scroll";

/// Rendered text banner
#[derive(Debug, Clone, PartialEq)]
pub struct BannerMarkup {
    pub root: Element,
    pub stylesheet: String,
    /// Animation duration for the viewport it was rendered for
    pub duration_seconds: f64,
}

impl BannerMarkup {
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    pub fn track(&self) -> Option<&Element> {
        self.root.find("marquee-banner__track")
    }
}

/// Scroll duration in seconds; lower is faster
pub fn effective_duration(settings: &BannerSettings, viewport: ViewportClass) -> f64 {
    let base = f64::from(settings.scroll_speed_seconds);
    match viewport {
        ViewportClass::Mobile => base * settings.mobile_speed_multiplier,
        ViewportClass::Tablet => base * settings.tablet_speed_multiplier,
        ViewportClass::Desktop => base,
    }
}

/// CSS time value rounded to two decimals: `30s`, `27.5s`
pub fn format_seconds(seconds: f64) -> String {
    let rounded = (seconds * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}s")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    breakpoints: Breakpoints,
    z_index: i32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Breakpoints::default(), DEFAULT_Z_INDEX)
    }
}

impl Renderer {
    pub fn new(breakpoints: Breakpoints, z_index: i32) -> Self {
        Self { breakpoints, z_index }
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Render the text banner; `None` when suppressed for mobile viewports
    pub fn render(&self, settings: &BannerSettings, viewport: ViewportClass) -> Option<BannerMarkup> {
        if settings.disable_on_mobile && viewport == ViewportClass::Mobile {
            return None;
        }

        let duration_seconds = effective_duration(settings, viewport);
        let button = &settings.button;
        let locked = button.is_active() && button.lock_enabled;

        let mut track = Element::new("div").class("marquee-banner__track").style([
            ("display", "inline-flex".to_string()),
            ("align-items", "center".to_string()),
            ("white-space", "nowrap".to_string()),
            (
                "animation",
                format!("{KEYFRAMES} {} linear infinite", format_seconds(duration_seconds)),
            ),
        ]);
        for index in 0..settings.repeat_count {
            let mut message = Element::new("span")
                .class("marquee-banner__message")
                .style([("padding-right", px(settings.message_spacing_px))])
                .child(Node::trusted(settings.message.clone()));
            if index > 0 {
                message = message.attr("aria-hidden", "true");
            }
            track.push(message);
            if button.is_active() && !locked {
                track.push(inline_button(button));
            }
        }

        let viewport_box = Element::new("div")
            .class("marquee-banner__viewport")
            .style([
                ("flex", "1 1 auto".to_string()),
                ("min-width", "0".to_string()),
                ("overflow", "hidden".to_string()),
            ])
            .child(track);

        let mut content = Element::new("div").class("marquee-banner__content").style([
            ("display", "flex".to_string()),
            ("align-items", "center".to_string()),
            ("width", "100%".to_string()),
        ]);
        match (locked, button.lock_position) {
            (true, LockPosition::Left) => {
                content.push(locked_button(button));
                content.push(viewport_box);
            }
            (true, LockPosition::Right) => {
                content.push(viewport_box);
                content.push(locked_button(button));
            }
            (false, _) => content.push(viewport_box),
        }

        let root = Element::new("div")
            .attr("id", BANNER_ID)
            .class(if settings.sticky {
                "marquee-banner marquee-banner--sticky"
            } else {
                "marquee-banner"
            })
            .attr("role", "region")
            .attr("aria-label", "Announcement")
            .style(self.container_style(settings))
            .child(content);

        Some(BannerMarkup {
            root,
            stylesheet: self.stylesheet(settings),
            duration_seconds,
        })
    }

    /// Full-width static image banner
    pub fn render_image(&self, url: &str) -> Element {
        Element::new("div")
            .attr("id", IMAGE_ID)
            .class("marquee-banner-image")
            .style([
                ("width", "100%".to_string()),
                ("line-height", "0".to_string()),
            ])
            .child(
                Element::new("img")
                    .attr("src", url)
                    .attr("alt", "")
                    .style([
                        ("display", "block".to_string()),
                        ("width", "100%".to_string()),
                        ("height", "auto".to_string()),
                    ]),
            )
    }

    /// Keyframes, link color, hover pause and per-breakpoint durations
    pub fn stylesheet(&self, settings: &BannerSettings) -> String {
        let mobile = self.breakpoints.mobile_max_width_px;
        let tablet = self.breakpoints.tablet_max_width_px;
        let duration = |viewport| format_seconds(effective_duration(settings, viewport));

        let mut css = format!(
            "@keyframes {KEYFRAMES}{{from{{transform:translateX(0)}}to{{transform:translateX(-100%)}}}}\
             #{BANNER_ID} a:not(.marquee-banner__button){{color:{link}}}\
             #{BANNER_ID}:hover .marquee-banner__track{{animation-play-state:paused}}\
             @media (min-width:{desktop_min}px){{#{BANNER_ID} .marquee-banner__track{{animation-duration:{desktop}!important}}}}\
             @media (min-width:{tablet_min}px) and (max-width:{tablet}px){{#{BANNER_ID} .marquee-banner__track{{animation-duration:{tablet_duration}!important}}}}\
             @media (max-width:{mobile}px){{#{BANNER_ID} .marquee-banner__track{{animation-duration:{mobile_duration}!important}}}}",
            link = settings.link_color,
            desktop_min = tablet + 1,
            desktop = duration(ViewportClass::Desktop),
            tablet_min = mobile + 1,
            tablet_duration = duration(ViewportClass::Tablet),
            mobile_duration = duration(ViewportClass::Mobile),
        );
        if settings.disable_on_mobile {
            css.push_str(&format!(
                "@media (max-width:{mobile}px){{#{BANNER_ID}{{display:none!important}}}}"
            ));
        }
        css
    }

    fn container_style(&self, settings: &BannerSettings) -> Vec<(&'static str, String)> {
        let border = format!(
            "{} {} {}",
            px(settings.border_width_px),
            settings.border_style.as_str(),
            settings.border_color
        );
        let mut style = Vec::with_capacity(16);
        if settings.sticky {
            style.push(("position", "fixed".to_string()));
            style.push(("top", "var(--marquee-banner-offset, 0px)".to_string()));
            style.push(("left", "0".to_string()));
        } else {
            style.push(("position", "relative".to_string()));
        }
        style.extend([
            ("width", "100%".to_string()),
            ("z-index", self.z_index.to_string()),
            ("box-sizing", "border-box".to_string()),
            ("overflow", "hidden".to_string()),
            ("background-color", settings.background_color.to_string()),
            ("color", settings.text_color.to_string()),
            ("border-top", border.clone()),
            ("border-bottom", border),
            ("padding", format!("{} 0", px(settings.vertical_padding_px))),
            ("font-size", px(settings.font_size)),
            ("font-family", settings.font_family.as_str().to_string()),
            ("font-weight", settings.font_weight.as_str().to_string()),
        ]);
        style
    }
}

fn px(value: u32) -> String {
    format!("{value}px")
}

fn button_style(button: &ButtonSettings) -> Vec<(&'static str, String)> {
    vec![
        ("display", "inline-block".to_string()),
        ("flex-shrink", "0".to_string()),
        ("white-space", "nowrap".to_string()),
        ("text-decoration", "none".to_string()),
        ("background-color", button.color.to_string()),
        ("color", button.text_color.to_string()),
        (
            "border",
            format!("{} solid {}", px(button.border_width_px), button.border_color),
        ),
        ("border-radius", px(button.border_radius_px)),
        (
            "padding",
            format!("{} {}", px(button.padding_px), px(button.padding_px * 2)),
        ),
        ("font-size", px(button.font_size)),
        ("font-weight", button.font_weight.as_str().to_string()),
    ]
}

fn button_element(button: &ButtonSettings, class: &'static str, mut style: Vec<(&'static str, String)>) -> Element {
    let mut element = if button.link.is_empty() {
        Element::new("span")
    } else {
        let mut link = Element::new("a").attr("href", button.link.clone());
        if button.new_window {
            link = link
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer");
        }
        link
    };
    element = element.class(class);
    let mut declarations = button_style(button);
    declarations.append(&mut style);
    element.style(declarations).child(Node::text(button.text.clone()))
}

fn inline_button(button: &ButtonSettings) -> Element {
    button_element(
        button,
        "marquee-banner__button",
        vec![
            ("margin-left", px(button.margin_left_px)),
            ("margin-right", px(button.margin_right_px)),
        ],
    )
}

fn locked_button(button: &ButtonSettings) -> Element {
    let gap = match button.lock_position {
        LockPosition::Left => ("margin-right", px(button.gap_px)),
        LockPosition::Right => ("margin-left", px(button.gap_px)),
    };
    button_element(
        button,
        "marquee-banner__button marquee-banner__button--locked",
        vec![gap],
    )
}

/// [`Renderer::render`] with default breakpoints
pub fn render(settings: &BannerSettings, viewport: ViewportClass) -> Option<BannerMarkup> {
    Renderer::default().render(settings, viewport)
}

/// Insert `fragment` right after the opening `<body>` tag
///
/// A fragment holds the text banner (with its stylesheet) and the image
/// banner. Each part is skipped when its element id is already in the
/// document, so a re-render never duplicates a banner. Parts without a banner
/// id are always inserted. Without a body tag the fragment is prepended.
pub fn mount(document: &str, fragment: &str) -> String {
    let is_mounted = |id: &str| document.contains(&format!("id=\"{id}\""));
    let fragment: String = fragment_parts(fragment)
        .into_iter()
        .filter(|(id, _)| !matches!(id, Some(id) if is_mounted(*id)))
        .map(|(_, part)| part)
        .collect();
    if fragment.is_empty() {
        return document.to_string();
    }

    let lower = document.to_ascii_lowercase();
    let body_end = lower
        .match_indices("<body")
        .find(|(start, _)| {
            lower[start + 5..]
                .chars()
                .next()
                .is_some_and(|c| c == '>' || c.is_ascii_whitespace())
        })
        .and_then(|(start, _)| lower[start..].find('>').map(|end| start + end + 1));

    match body_end {
        Some(at) => {
            let mut out = String::with_capacity(document.len() + fragment.len());
            out.push_str(&document[..at]);
            out.push_str(&fragment);
            out.push_str(&document[at..]);
            out
        }
        None => format!("{fragment}{document}"),
    }
}

/// Split a fragment into the text banner part and the image banner part
fn fragment_parts(fragment: &str) -> Vec<(Option<&'static str>, &str)> {
    let image_start = fragment
        .find(&format!("<div id=\"{IMAGE_ID}\""))
        .unwrap_or(fragment.len());
    let (text, image) = fragment.split_at(image_start);

    let mut parts = Vec::with_capacity(2);
    if !text.is_empty() {
        let id = text.contains(&format!("id=\"{BANNER_ID}\"")).then_some(BANNER_ID);
        parts.push((id, text));
    }
    if !image.is_empty() {
        parts.push((Some(IMAGE_ID), image));
    }
    parts
}
