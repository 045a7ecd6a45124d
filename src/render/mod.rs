pub mod badge;
pub mod theme;

pub use badge::{avatar_data_uri, render_stat_badge, render_streak_badge};
pub use theme::{BadgeTheme, ThemeQuery};
