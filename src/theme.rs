use ratatui::style::Color;

/// A named color palette for the UI.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "midnight chalk",
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(245, 194, 231),
    muted: Color::Rgb(127, 132, 156),
    border: Color::Rgb(69, 71, 90),
    status: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    highlight_fg: Color::Rgb(30, 30, 46),
    highlight_bg: Color::Rgb(245, 194, 231),
    stripe_bg: Color::Rgb(36, 36, 54),
    key_fg: Color::Rgb(30, 30, 46),
    key_bg: Color::Rgb(137, 180, 250),
  },
  Theme {
    name: "lecture hall",
    bg: Color::Rgb(40, 42, 54),
    fg: Color::Rgb(248, 248, 242),
    accent: Color::Rgb(139, 233, 253),
    muted: Color::Rgb(98, 114, 164),
    border: Color::Rgb(68, 71, 90),
    status: Color::Rgb(80, 250, 123),
    error: Color::Rgb(255, 85, 85),
    highlight_fg: Color::Rgb(40, 42, 54),
    highlight_bg: Color::Rgb(139, 233, 253),
    stripe_bg: Color::Rgb(46, 48, 62),
    key_fg: Color::Rgb(40, 42, 54),
    key_bg: Color::Rgb(189, 147, 249),
  },
  Theme {
    name: "notepad",
    bg: Color::Rgb(250, 244, 237),
    fg: Color::Rgb(87, 82, 121),
    accent: Color::Rgb(180, 99, 122),
    muted: Color::Rgb(152, 147, 165),
    border: Color::Rgb(223, 218, 217),
    status: Color::Rgb(86, 148, 159),
    error: Color::Rgb(180, 99, 122),
    highlight_fg: Color::Rgb(250, 244, 237),
    highlight_bg: Color::Rgb(180, 99, 122),
    stripe_bg: Color::Rgb(242, 233, 222),
    key_fg: Color::Rgb(250, 244, 237),
    key_bg: Color::Rgb(40, 105, 131),
  },
];
