use ratatui::style::Color;

/// Semantic color slots for the stagediff UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,

    // Diff
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_add_emphasis_bg: Color,
    pub diff_del_emphasis_bg: Color,
    pub diff_context_fg: Color,
    pub hunk_header_fg: Color,
    pub hunk_header_hover_bg: Color,
    pub line_selected_bg: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "github-dark" => github_dark(),
            _ => one_dark(),
        }
    }
}

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: Color::Rgb(97, 175, 239),
        text: Color::Rgb(171, 178, 191),
        text_muted: Color::Rgb(92, 99, 112),
        surface: Color::Rgb(30, 30, 30),
        selection_bg: Color::Rgb(54, 59, 69),
        diff_add_bg: Color::Rgb(30, 48, 34),
        diff_del_bg: Color::Rgb(54, 30, 33),
        diff_add_fg: Color::Rgb(152, 195, 121),
        diff_del_fg: Color::Rgb(224, 108, 117),
        diff_add_emphasis_bg: Color::Rgb(42, 77, 48),
        diff_del_emphasis_bg: Color::Rgb(92, 42, 48),
        diff_context_fg: Color::Rgb(130, 137, 151),
        hunk_header_fg: Color::Rgb(86, 182, 194),
        hunk_header_hover_bg: Color::Rgb(44, 50, 60),
        line_selected_bg: Color::Rgb(36, 62, 92),
        success: Color::Rgb(152, 195, 121),
        error: Color::Rgb(224, 108, 117),
        warning: Color::Rgb(229, 192, 123),
    }
}

fn github_dark() -> Theme {
    Theme {
        name: "github-dark".to_string(),
        accent: Color::Rgb(88, 166, 255),
        text: Color::Rgb(201, 209, 217),
        text_muted: Color::Rgb(110, 118, 129),
        surface: Color::Rgb(22, 27, 34),
        selection_bg: Color::Rgb(48, 54, 61),
        diff_add_bg: Color::Rgb(18, 38, 24),
        diff_del_bg: Color::Rgb(49, 22, 25),
        diff_add_fg: Color::Rgb(126, 231, 135),
        diff_del_fg: Color::Rgb(255, 123, 114),
        diff_add_emphasis_bg: Color::Rgb(26, 68, 37),
        diff_del_emphasis_bg: Color::Rgb(92, 30, 35),
        diff_context_fg: Color::Rgb(139, 148, 158),
        hunk_header_fg: Color::Rgb(121, 192, 255),
        hunk_header_hover_bg: Color::Rgb(33, 40, 48),
        line_selected_bg: Color::Rgb(28, 58, 92),
        success: Color::Rgb(126, 231, 135),
        error: Color::Rgb(255, 123, 114),
        warning: Color::Rgb(210, 153, 34),
    }
}
