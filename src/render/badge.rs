//! SVG badge templating
//!
//! Pure string assembly from a stats record and a theme. The layout is
//! fixed: a three-panel card (total, current streak, longest streak) for
//! activity sources, and a compact key/value card for profile stats. The
//! only contract is well-formed markup carrying the stat fields.

use base64::Engine;
use chrono::NaiveDate;

use crate::render::theme::BadgeTheme;
use crate::stats::StreakStats;

const CARD_WIDTH: u32 = 495;
const CARD_HEIGHT: u32 = 195;

/// Escape text interpolated into SVG element content or attributes.
fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        short_date(start)
    } else {
        format!("{} - {}", short_date(start), short_date(end))
    }
}

/// Encode avatar bytes as a `data:` URI for inline embedding.
pub fn avatar_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

fn panel(x: u32, theme: &BadgeTheme, value: &str, label: &str, sublabel: &str) -> String {
    format!(
        r#"<g transform="translate({x},0)">
  <text x="82" y="74" text-anchor="middle" fill="{text}" font-size="28" font-weight="700">{value}</text>
  <text x="82" y="104" text-anchor="middle" fill="{text}" font-size="14" font-weight="600">{label}</text>
  <text x="82" y="128" text-anchor="middle" fill="{muted}" font-size="11">{sub}</text>
</g>"#,
        x = x,
        text = theme.text,
        muted = theme.muted,
        value = xml_escape(value),
        label = xml_escape(label),
        sub = xml_escape(sublabel),
    )
}

/// Render the streak badge for one user.
///
/// `avatar` is an optional pre-encoded `data:` URI placed in the card
/// header; rendering never fails because of a missing avatar.
pub fn render_streak_badge(
    title: &str,
    stats: &StreakStats,
    theme: &BadgeTheme,
    avatar: Option<&str>,
) -> String {
    let total_range = format!(
        "{} - present",
        short_date(stats.first_active_date)
    );
    let current_range = if stats.current_streak > 0 {
        date_range(stats.current_streak_start, stats.current_streak_end)
    } else {
        String::new()
    };
    let longest_range = if stats.longest_streak > 0 {
        date_range(stats.longest_streak_start, stats.longest_streak_end)
    } else {
        String::new()
    };

    let avatar_markup = avatar
        .map(|uri| {
            format!(
                r#"<image x="14" y="10" width="24" height="24" href="{}" clip-path="circle(12px)"/>"#,
                xml_escape(uri)
            )
        })
        .unwrap_or_default();
    let title_x = if avatar.is_some() { 46 } else { 16 };

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">
<rect x="0.5" y="0.5" width="{rw}" height="{rh}" rx="4.5" fill="{bg}" stroke="{border}"/>
{avatar}<text x="{title_x}" y="28" fill="{text}" font-size="15" font-weight="700">{title}</text>
<line x1="165" y1="50" x2="165" y2="145" stroke="{border}"/>
<line x1="330" y1="50" x2="330" y2="145" stroke="{border}"/>
{total_panel}
{current_panel}
{longest_panel}
<circle cx="247.5" cy="163" r="3" fill="{accent}"/>
</svg>"#,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        rw = CARD_WIDTH - 1,
        rh = CARD_HEIGHT - 1,
        bg = theme.background,
        border = theme.border,
        text = theme.text,
        accent = theme.accent,
        title = xml_escape(title),
        title_x = title_x,
        avatar = avatar_markup,
        total_panel = panel(0, theme, &stats.total.to_string(), "Total", &total_range),
        current_panel = panel(
            165,
            theme,
            &stats.current_streak.to_string(),
            "Current Streak",
            &current_range,
        ),
        longest_panel = panel(
            330,
            theme,
            &stats.longest_streak.to_string(),
            "Longest Streak",
            &longest_range,
        ),
    )
}

/// Render a compact key/value badge, e.g. for scraped profile stats.
pub fn render_stat_badge(title: &str, rows: &[(&str, String)], theme: &BadgeTheme) -> String {
    let height = 60 + rows.len() as u32 * 26;
    let mut body = String::new();
    for (i, (label, value)) in rows.iter().enumerate() {
        let y = 58 + i as u32 * 26;
        body.push_str(&format!(
            r#"<text x="16" y="{y}" fill="{muted}" font-size="13">{label}</text>
<text x="284" y="{y}" text-anchor="end" fill="{text}" font-size="13" font-weight="600">{value}</text>
"#,
            y = y,
            muted = theme.muted,
            text = theme.text,
            label = xml_escape(label),
            value = xml_escape(value),
        ));
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="{h}" viewBox="0 0 300 {h}" role="img" aria-label="{title}">
<rect x="0.5" y="0.5" width="299" height="{rh}" rx="4.5" fill="{bg}" stroke="{border}"/>
<text x="16" y="28" fill="{accent}" font-size="15" font-weight="700">{title}</text>
{body}</svg>"#,
        h = height,
        rh = height - 1,
        bg = theme.background,
        border = theme.border,
        accent = theme.accent,
        title = xml_escape(title),
        body = body,
    )
}
