use crate::snapshot::Role;
use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub keyword: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub highlight: Color, // Yellow
    pub accent: Color,    // Pink
    pub teal: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),
    number: Color::Rgb(250, 179, 135),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    highlight: Color::Rgb(249, 226, 175),
    accent: Color::Rgb(245, 194, 231),
    teal: Color::Rgb(148, 226, 213),
};

impl Theme {
    /// Colour of a highlighted position
    pub fn role(&self, role: Role) -> Color {
        match role {
            Role::Comparing | Role::Candidate | Role::Frontier => self.highlight,
            Role::Swapped | Role::Active => self.secondary,
            Role::Sorted | Role::Found | Role::Match | Role::Prime | Role::Chosen => self.success,
            Role::Pivot | Role::Path | Role::Hull => self.accent,
            Role::Range | Role::Visited => self.primary,
            Role::Eliminated | Role::Composite => self.comment,
            Role::Mismatch | Role::Conflict => self.error,
        }
    }
}

/// Roles in the order they win when one position carries several
pub const ROLE_PRIORITY: [Role; 19] = [
    Role::Conflict,
    Role::Mismatch,
    Role::Comparing,
    Role::Candidate,
    Role::Swapped,
    Role::Active,
    Role::Pivot,
    Role::Found,
    Role::Match,
    Role::Path,
    Role::Chosen,
    Role::Hull,
    Role::Frontier,
    Role::Sorted,
    Role::Prime,
    Role::Range,
    Role::Visited,
    Role::Composite,
    Role::Eliminated,
];
