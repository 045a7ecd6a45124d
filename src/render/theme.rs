use serde::Deserialize;

/// Fixed badge styling. Selected per request via the `theme` query
/// parameter; unknown names fall back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeTheme {
    pub name: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
}

/// Query parameters accepted by the badge routes.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
    #[serde(default)]
    pub theme: Option<String>,
}

pub const LIGHT: BadgeTheme = BadgeTheme {
    name: "light",
    background: "#fffefe",
    border: "#e4e2e2",
    accent: "#fb8c00",
    text: "#151515",
    muted: "#464646",
};

pub const DARK: BadgeTheme = BadgeTheme {
    name: "dark",
    background: "#151515",
    border: "#e4e2e2",
    accent: "#fb8c00",
    text: "#fefefe",
    muted: "#9e9e9e",
};

impl BadgeTheme {
    pub fn from_name(name: Option<&str>) -> &'static BadgeTheme {
        match name {
            Some("dark") => &DARK,
            _ => &LIGHT,
        }
    }
}
