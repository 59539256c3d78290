use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub block_start: Color,
    pub block_move: Color,
    pub block_fill: Color,
    pub block_repeat: Color,
    pub piece: Color,       // Dodger blue, like the board piece
    pub empty_cell: Color,  // Unfilled cells are white
    pub start_marker: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    block_start: Color::Rgb(249, 226, 175),
    block_move: Color::Rgb(137, 180, 250),
    block_fill: Color::Rgb(166, 227, 161),
    block_repeat: Color::Rgb(203, 166, 247),
    piece: Color::Rgb(30, 144, 255),
    empty_cell: Color::Rgb(255, 255, 255),
    start_marker: Color::Rgb(153, 153, 153),
};
