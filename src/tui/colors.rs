//! Palette shared by every widget
use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(24, 26, 33);
pub const BORDER_COLOR: Color = Color::Rgb(88, 94, 112);
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 146, 160);
/// Warnings and destructive choices
pub const ACCENT_PRIMARY: Color = Color::Rgb(224, 108, 117);
/// Confirmations and success
pub const ACCENT_SECONDARY: Color = Color::Rgb(152, 195, 121);
/// Focus and titles
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(97, 175, 239);
