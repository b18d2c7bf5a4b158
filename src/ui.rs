use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode};
use crate::catalog::VideoRecord;
use crate::constants::constants;
use crate::theme::Theme;
use crate::upload::UploadState;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// A centered rectangle of at most `width` x `height` inside `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let w = width.min(area.width);
  let h = height.min(area.height);
  Rect { x: area.x + (area.width - w) / 2, y: area.y + (area.height - h) / 2, width: w, height: h }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);

  if app.upload.modal_open() {
    render_upload_modal(frame, app, main_area);
  }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ shine ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  match app.active_video() {
    Some(_) => render_feed(frame, app, area),
    None => render_empty(frame, app, area),
  }
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let headline = if app.catalog.is_empty() { "The feed is empty" } else { "No videos found" };
  let text = vec![
    Line::from(""),
    Line::from(Span::styled(headline, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Try different search terms or upload your own video!", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Press u to upload your first video.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  // Safety: render_feed is only called when active_video() is Some.
  let Some(video) = app.active_video() else { return };
  let index = app.feed.active_index().unwrap_or(0);
  let total = app.feed.len();
  let playing = app.feed.is_playing(video.id);

  let [screen_area, info_area] =
    Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)]).areas(area);

  render_screen(frame, theme, screen_area, video, playing, index, total);
  render_info(frame, theme, info_area, video);
}

fn render_screen(
  frame: &mut Frame,
  theme: &Theme,
  area: Rect,
  video: &VideoRecord,
  playing: bool,
  index: usize,
  total: usize,
) {
  let title = Line::from(vec![
    Span::styled(" Now Showing ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("{}/{} ", index + 1, total), Style::default().fg(theme.muted)),
  ]);
  let block = Block::bordered()
    .title(title)
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let inner_w = inner.width.saturating_sub(2) as usize;
  let glyph = if playing { "▶  playing" } else { "⏸  paused" };
  let glyph_style = if playing {
    Style::default().fg(theme.status).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(theme.muted).add_modifier(Modifier::BOLD)
  };

  let mut lines = Vec::new();
  let pad = inner.height.saturating_sub(5) / 2;
  for _ in 0..pad {
    lines.push(Line::from(""));
  }
  lines.push(Line::from(Span::styled(glyph, glyph_style)));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled("Space to toggle playback", Style::default().fg(theme.muted))));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    truncate_str(&video.video_url, inner_w),
    Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
  )));

  frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

  // Scroll indicator, bottom edge of the screen pane.
  if total > 1 {
    let hint = "↓ scroll for next video ↑";
    let hint_area = Rect {
      x: inner.x + (inner.width.saturating_sub(hint.chars().count() as u16)) / 2,
      y: inner.y + inner.height.saturating_sub(1),
      width: (hint.chars().count() as u16).min(inner.width),
      height: 1,
    };
    frame.render_widget(Line::from(Span::styled(hint, Style::default().fg(theme.muted))), hint_area);
  }
}

fn render_info(frame: &mut Frame, theme: &Theme, area: Rect, video: &VideoRecord) {
  let block = Block::bordered()
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  let mut lines = vec![Line::from("")];

  let mut title_spans =
    vec![Span::styled(video.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))];
  if video.is_uploaded {
    title_spans.push(Span::raw("  "));
    title_spans.push(Span::styled(" Your Upload ", Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg)));
  }
  lines.push(Line::from(title_spans));
  lines.push(Line::from(""));

  lines.push(Line::from(vec![
    Span::styled(video.user.name.clone(), Style::default().fg(theme.accent)),
    Span::styled(format!("  {}", video.user.university), Style::default().fg(theme.muted)),
  ]));
  lines.push(Line::from(Span::styled(video.user.department.clone(), Style::default().fg(theme.muted))));
  lines.push(Line::from(Span::styled(
    format!("{} followers • {} videos", video.user.followers.display(), video.user.videos),
    Style::default().fg(theme.muted),
  )));
  lines.push(Line::from(""));

  lines.push(Line::from(Span::styled(video.description.clone(), Style::default().fg(theme.fg))));
  lines.push(Line::from(""));

  if !video.topics.is_empty() {
    lines.push(Line::from(Span::styled(
      "Topics Covered",
      Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
    for topic in &video.topics {
      lines.push(Line::from(Span::styled(
        format!("• {}", topic.title),
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
      )));
      lines.push(Line::from(Span::styled(format!("  {}", topic.content), Style::default().fg(theme.muted))));
    }
    lines.push(Line::from(""));
  }

  lines.push(Line::from(vec![
    Span::styled(format!("♥ {}", video.likes.display()), Style::default().fg(theme.status)),
    Span::styled(format!("   ↗ {}", video.shares.display()), Style::default().fg(theme.status)),
    Span::styled(format!("   {}", video.display_date()), Style::default().fg(theme.muted)),
  ]));

  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_upload_modal(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let modal = centered_rect(area, 52, 7);
  frame.render_widget(Clear, modal);

  let block = Block::bordered()
    .title(Span::styled(" Uploading Video ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .style(Style::default().bg(theme.bg))
    .padding(Padding::horizontal(1));
  let inner = block.inner(modal);
  frame.render_widget(block, modal);

  match app.upload {
    UploadState::Uploading { progress, .. } => {
      let [_, gauge_area, _, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
      ])
      .areas(inner);
      let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.stripe_bg))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{}%", progress.round() as u32));
      frame.render_widget(gauge, gauge_area);
      frame.render_widget(
        Paragraph::new(Span::styled("c / Esc to cancel", Style::default().fg(theme.muted)))
          .alignment(Alignment::Center),
        hint_area,
      );
    }
    _ => {
      let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
          "✓ Video uploaded successfully!",
          Style::default().fg(theme.status).add_modifier(Modifier::BOLD),
        )),
      ];
      frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ✓ {}", info), Style::default().fg(theme.status))
  } else if app.mode == AppMode::Search {
    (format!(" Popular: {}", constants().popular_searches.join(" · ")), Style::default().fg(theme.muted))
  } else if let Some(video) = app.active_video().filter(|v| app.feed.is_playing(v.id)) {
    (format!(" ▶ {}", video.title), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let (title, active) = match app.mode {
    AppMode::Search => (" Search videos ", true),
    AppMode::Upload => (" Upload — video file path ", true),
    AppMode::Feed => (" Search (press /) ", false),
  };
  let border_color = if active { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(title)
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let (text, cursor, scroll) = match app.mode {
    AppMode::Upload => (&app.upload_input, app.upload_cursor, &mut app.upload_scroll),
    _ => (&app.query, app.query_cursor, &mut app.query_scroll),
  };

  let cursor_col = display_width(text, cursor);
  if cursor_col < *scroll {
    *scroll = cursor_col;
  } else if cursor_col >= *scroll + inner_w {
    *scroll = cursor_col.saturating_sub(inner_w) + 1;
  }
  let scroll = *scroll;

  let visible: String = text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= scroll)
    .take_while(|(start, _, _)| *start < scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let fg = if active { theme.fg } else { theme.muted };
  let paragraph = Paragraph::new(visible).style(Style::default().fg(fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if active {
    let cursor_x = area.x + 2 + (cursor_col - scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Feed => {
      let mut k = Vec::new();
      if app.upload.is_uploading() {
        k.push(("c", "Cancel upload"));
      }
      k.push(("Space", "Play/Pause"));
      k.push(("↓/↑", "Navigate"));
      k.push(("/", "Search"));
      k.push(("u", "Upload"));
      k.push(("^t", "Theme"));
      if app.query.trim().is_empty() {
        k.push(("Esc", "Quit"));
      } else {
        k.push(("Esc", "Clear search"));
      }
      k
    }
    AppMode::Search => vec![("Enter", "Done"), ("Tab", "Suggest"), ("Esc", "Clear"), ("^t", "Theme")],
    AppMode::Upload => vec![("Enter", "Start upload"), ("Esc", "Back"), ("^t", "Theme")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_short_strings_unchanged() {
    assert_eq!(truncate_str("abc", 5), "abc");
    assert_eq!(truncate_str("abcde", 5), "abcde");
  }

  #[test]
  fn truncate_appends_ellipsis() {
    assert_eq!(truncate_str("abcdef", 5), "abcd…");
  }

  #[test]
  fn centered_rect_clamps_to_area() {
    let area = Rect { x: 0, y: 0, width: 20, height: 6 };
    let r = centered_rect(area, 52, 7);
    assert!(r.width <= area.width && r.height <= area.height);
    let r = centered_rect(area, 10, 4);
    assert_eq!((r.x, r.y, r.width, r.height), (5, 1, 10, 4));
  }
}
