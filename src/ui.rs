//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Nothing here mutates the data;
//! the only state touched is list selection, which ratatui keeps in
//! [`ListState`](ratatui::widgets::ListState).
//!
//! ## For contributors
//!
//! * The layout is a vertical stack: search bar, the three sections side by
//!   side, the selected link and a one-line status bar.
//! * Each section renders its items as two-line "cards": badge + title, then
//!   a source-specific detail line.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Mode, Section};
use crate::source::{NewsItem, SocialPost, TrendItem};
use crate::state::AggregatedState;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [search_area, main_area, link_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search_bar(app, frame, search_area);

    // With nothing to fall back on, the error takes over the main area.
    match app.error.clone() {
        Some(error) if app.snapshot.state.is_empty() => draw_error(&error, frame, main_area),
        _ => draw_sections(app, frame, main_area),
    }

    draw_selected_link(app, frame, link_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let (border, hint) = match app.mode {
        Mode::Search => (Color::Magenta, ""),
        Mode::Normal if app.query.is_empty() => (Color::DarkGray, "press / to search live trends…"),
        Mode::Normal => (Color::DarkGray, ""),
    };

    let mut spans = vec![Span::styled(&app.query, Style::default().fg(Color::White))];
    if app.mode == Mode::Search {
        spans.push(Span::styled("▏", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(
                " HypeRadar ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);
}

fn draw_sections(app: &mut App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let areas = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);

    for (section, area) in Section::ALL.into_iter().zip(areas.iter()) {
        draw_section(app, &view, section, frame, *area);
    }
}

fn draw_section(
    app: &mut App,
    view: &AggregatedState,
    section: Section,
    frame: &mut Frame,
    area: Rect,
) {
    let cards: Vec<ListItem> = if app.loading && app.snapshot.version == 0 {
        (0..3).map(|_| skeleton_card()).collect()
    } else {
        match section {
            Section::Trends => view.trends.iter().map(trend_card).collect(),
            Section::Social => view.social.iter().map(social_card).collect(),
            Section::News => view.news.iter().map(news_card).collect(),
        }
    };

    let focused = app.focus == section;
    let count = section.len_in(view);
    let list = List::new(cards)
        .block(
            Block::default()
                .title(format!(" {} ({count}) ", section.title()))
                .borders(Borders::ALL)
                .border_style(if focused {
                    Style::default().fg(section_color(section))
                } else {
                    Style::default().fg(Color::DarkGray)
                }),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_states[section.index()]);
}

fn section_color(section: Section) -> Color {
    match section {
        Section::Trends => Color::Blue,
        Section::Social => Color::LightRed,
        Section::News => Color::Yellow,
    }
}

fn card<'a>(badge: &'a str, color: Color, title: &'a str, detail: String) -> ListItem<'a> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("{badge:<7}"), Style::default().fg(color)),
            Span::styled(title, Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(
            format!("       {detail}"),
            Style::default().fg(Color::Magenta),
        )),
    ])
}

fn trend_card(item: &TrendItem) -> ListItem<'_> {
    card("GOOGLE", Color::Blue, &item.title, item.traffic_label.clone())
}

fn social_card(post: &SocialPost) -> ListItem<'_> {
    let mut detail = format!("{}  ↑{}", post.community, post.upvotes);
    if let Some(comments) = post.comment_count {
        detail.push_str(&format!("  {comments} comments"));
    }
    if post.thumbnail.is_some() {
        detail.push_str("  ▣");
    }
    card("REDDIT", Color::LightRed, &post.title, detail)
}

fn news_card(item: &NewsItem) -> ListItem<'_> {
    let mut detail = format!("▲{} by {}", item.score, item.author);
    if let Some(comments) = item.comment_count {
        detail.push_str(&format!("  {comments} comments"));
    }
    card(
        "HN",
        Color::Yellow,
        item.title.as_deref().unwrap_or("(untitled)"),
        detail,
    )
}

fn skeleton_card() -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(Span::styled("░░░░░░░░░░░░░░░░", Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled("░░░░░░░░", Style::default().fg(Color::DarkGray))),
    ])
}

fn draw_error(error: &str, frame: &mut Frame, area: Rect) {
    let message = Paragraph::new(Line::from(Span::styled(
        error,
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
    .centered()
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}

fn draw_selected_link(app: &mut App, frame: &mut Frame, area: Rect) {
    let link = app.selected_link().unwrap_or_default();
    let line = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(link, Style::default().fg(Color::Cyan)),
    ]));
    frame.render_widget(line, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let activity = if app.loading {
        Span::styled("⟳ refreshing", Style::default().fg(Color::Magenta))
    } else {
        Span::styled(&app.status, Style::default().fg(Color::Yellow))
    };

    let updated = app
        .snapshot
        .updated_at
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("updated %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "never updated".into());

    let mut spans = vec![
        Span::raw(" "),
        activity,
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::Green)),
    ];
    if let Some(error) = &app.error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error, Style::default().fg(Color::Red)));
    }
    spans.push(Span::raw(
        "  q: quit  /: search  r: refresh  Tab: section  ↑/↓: scroll",
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
