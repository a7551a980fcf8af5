//! Spyglass palette: slate backgrounds with a brass accent.
use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(201, 162, 84); // brass
pub const ACCENT_DIM: Color = Color::Rgb(150, 121, 66);
pub const SUCCESS: Color = Color::Rgb(110, 180, 150);
pub const WARNING: Color = Color::Rgb(214, 170, 96);
pub const ERROR: Color = Color::Rgb(214, 94, 94);

pub const TEXT: Color = Color::Rgb(222, 228, 234);
pub const TEXT_MUTED: Color = Color::Rgb(128, 140, 152);

pub const BG_BASE: Color = Color::Rgb(24, 30, 38);
pub const BG_SURFACE: Color = Color::Rgb(34, 42, 52);
pub const BG_INPUT: Color = Color::Rgb(42, 52, 64);

pub const BORDER: Color = Color::Rgb(58, 70, 84);
pub const BORDER_FOCUS: Color = ACCENT;
