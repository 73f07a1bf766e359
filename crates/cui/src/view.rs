use crate::app::App;
use arcana_core::{DrawMode, Step};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

const WHEEL_RADIUS: f64 = 38.0;
const JITTER_SCALE: f64 = 0.3;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = root_layout(frame.area());
    draw_header(frame, root[0], app);
    match app.session.step() {
        Step::Welcome => draw_welcome(frame, root[1], app),
        Step::Question => draw_question(frame, root[1], app),
        Step::SpreadSelect => draw_spreads(frame, root[1], app),
        Step::ShuffleAndDraw => {
            let columns = body_columns(root[1]);
            draw_wheel(frame, columns[0], app);
            draw_slots(frame, columns[1], app);
        }
        Step::Reveal => draw_reveal(frame, root[1], app),
        Step::Reading => draw_reading(frame, root[1], app),
    }
    draw_events(frame, root[2], app);

    if app.show_history {
        draw_history_popup(frame, app);
    }
    if app.show_help {
        draw_help_popup(frame, app);
    }
}

/// The rectangle the wheel is drawn in, for mapping mouse positions.
pub fn wheel_area(area: Rect) -> Rect {
    body_columns(root_layout(area)[1])[0]
}

fn root_layout(area: Rect) -> [Rect; 3] {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(7),
        ])
        .split(area);
    [root[0], root[1], root[2]]
}

fn body_columns(area: Rect) -> [Rect; 2] {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    [columns[0], columns[1]]
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let title = format!(
        "{} | {} | {}: {} | {}: {}",
        locale.text("Arcana", "塔罗秘境"),
        app.session.step().label(locale),
        locale.text("Tone", "风格"),
        app.session.tone().label(locale),
        locale.text("Mode", "方式"),
        app.session.draw_mode().label(locale),
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(format!(
            "{}: {} | {}",
            locale.text("Status", "状态"),
            app.status_line,
            app.hint()
        )),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_welcome(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let lines = vec![
        Line::from(""),
        Line::from(locale.text("Arcana", "塔罗秘境").bold().magenta()),
        Line::from(""),
        Line::from(locale.text(
            "Quiet your mind and hold a question in your heart.",
            "静下心来，在心中默念你的问题。",
        )),
        Line::from(locale.text(
            "Press Enter to begin your reading.",
            "按回车开始占卜。",
        )),
        Line::from(""),
        Line::from(format!(
            "{}: {}",
            locale.text("saved readings", "历史解读"),
            app.history.len()
        ))
        .dark_gray(),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .block(pane_block(locale.text("Welcome", "欢迎"), false)),
        area,
    );
}

fn draw_question(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let mut lines = vec![
        Line::from(locale.text("What do you want to ask?", "你想问什么？")),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(
                app.question_input.clone(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("_"),
        ]),
        Line::from(""),
        Line::from(locale.text("Examples:", "示例：")).dark_gray(),
    ];
    for (idx, template) in app.templates().iter().enumerate() {
        let marker = if app.template_cursor == Some(idx) {
            ">> "
        } else {
            "   "
        };
        lines.push(Line::from(format!("{marker}{template}")));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(pane_block(locale.text("Question", "提问"), true)),
        area,
    );
}

fn draw_spreads(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let columns = body_columns(area);
    let items: Vec<ListItem> = app
        .spreads
        .iter()
        .map(|spread| {
            ListItem::new(format!(
                "{} ({} {})",
                spread.name,
                spread.card_count,
                locale.text("cards", "张")
            ))
        })
        .collect();
    let list = List::new(items)
        .block(pane_block(locale.text("Spreads", "牌阵"), true))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if !app.spreads.is_empty() {
        state.select(Some(app.spread_cursor.min(app.spreads.len() - 1)));
    }
    frame.render_stateful_widget(list, columns[0], &mut state);

    let mut lines = vec![Line::from(format!(
        "{}: {}",
        locale.text("Question", "问题"),
        app.session.question()
    ))];
    if let Some(spread) = app.spreads.get(app.spread_cursor) {
        lines.push(Line::from(""));
        lines.push(Line::from(spread.description.clone()));
        lines.push(Line::from(""));
        for (idx, position) in spread.positions.iter().enumerate() {
            lines.push(Line::from(format!("{}. {position}", idx + 1)));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{}: {}",
        locale.text("draw mode", "抽牌方式"),
        app.session.draw_mode().label(locale)
    )));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block(locale.text("Details", "详情"), false)),
        columns[1],
    );
}

fn draw_wheel(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let visuals = app.session.deck().visuals();
    let count = visuals.len();
    let target = app.wheel.top_index(visuals);
    let manual = app.session.draw_mode() == DrawMode::Manual;
    let title = format!(
        "{} ({count} {})",
        locale.text("Deck", "牌堆"),
        locale.text("left", "张")
    );
    let centre = if manual {
        locale.text("drag to turn", "拖动旋转")
    } else {
        locale.text("Enter to draw", "回车抽牌")
    };
    let canvas = Canvas::default()
        .block(pane_block(&title, app.wheel.is_dragging()))
        .x_bounds([-50.0, 50.0])
        .y_bounds([-50.0, 50.0])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 12.0,
                color: Color::DarkGray,
            });
            for (idx, visual) in visuals.iter().enumerate() {
                let (x, y) = app
                    .wheel
                    .card_position(idx, count, visual, WHEEL_RADIUS, JITTER_SCALE);
                let glyph = if target == Some(idx) {
                    Span::styled("◆", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled("▪", Style::default().fg(Color::Magenta))
                };
                ctx.print(x, y, glyph);
            }
            ctx.print(-8.0, 0.0, Span::styled(centre, Style::default().fg(Color::Gray)));
        });
    frame.render_widget(canvas, area);
}

fn draw_slots(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let spread = app.session.spread();
    let drawn = app.session.drawn_cards();
    let lines: Vec<Line> = spread
        .positions
        .iter()
        .enumerate()
        .map(|(idx, position)| match drawn.get(idx) {
            Some(card) => Line::from(format!(
                "{}. {position}: {} ({})",
                idx + 1,
                card.name(),
                card.orientation_label(locale)
            ))
            .green(),
            None => Line::from(format!("{}. {position}: -", idx + 1)).dark_gray(),
        })
        .collect();
    let title = format!(
        "{} {}/{}",
        spread.name,
        drawn.len(),
        app.session.needed()
    );
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block(&title, false)),
        area,
    );
}

fn draw_reveal(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let revealed = app.session.revealed_count();
    let mut lines = vec![
        Line::from(format!(
            "{}: {}",
            locale.text("Question", "问题"),
            app.session.question()
        )),
        Line::from(""),
    ];
    for (idx, card) in app.session.drawn_cards().iter().enumerate() {
        let line = if idx < revealed {
            let text = format!(
                "{}. {}: {} ({})",
                idx + 1,
                card.position_name,
                card.name(),
                card.orientation_label(locale)
            );
            if card.is_reversed {
                Line::from(text).red()
            } else {
                Line::from(text).green()
            }
        } else if idx == revealed {
            Line::from(format!(
                ">> {}. {}: {}",
                idx + 1,
                card.position_name,
                locale.text("[face down]", "[未翻开]")
            ))
            .yellow()
        } else {
            Line::from(format!(
                "{}. {}: {}",
                idx + 1,
                card.position_name,
                locale.text("[face down]", "[未翻开]")
            ))
            .dark_gray()
        };
        lines.push(line);
    }
    if app.is_loading() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(locale.text("Consulting the cards...", "正在连接宇宙能量..."))
                .magenta()
                .bold(),
        );
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(pane_block(app.session.spread().name.as_str(), true)),
        area,
    );
}

fn draw_reading(frame: &mut Frame, area: Rect, app: &App) {
    let locale = app.locale;
    let Some(reading) = app.session.reading() else {
        frame.render_widget(pane_block(locale.text("Reading", "解读"), true), area);
        return;
    };
    let mut lines = vec![
        Line::from(format!(
            "{}: {}",
            locale.text("Question", "问题"),
            reading.question
        ))
        .bold(),
        Line::from(format!(
            "{} | {}",
            app.spread_name(&reading.spread_id),
            reading.tone.label(locale)
        ))
        .dark_gray(),
        Line::from(""),
    ];
    match &reading.interpretation {
        Some(interpretation) => {
            lines.push(Line::from(interpretation.summary.clone()).magenta());
            lines.push(Line::from(""));
            for (idx, analysis) in interpretation.card_analysis.iter().enumerate() {
                let orientation = reading
                    .cards
                    .get(idx)
                    .map(|card| card.orientation_label(locale))
                    .unwrap_or_default();
                lines.push(
                    Line::from(format!(
                        "{} · {} ({orientation})",
                        analysis.position, analysis.card_name
                    ))
                    .yellow(),
                );
                if app.show_meanings {
                    lines.push(Line::from(analysis.meaning.clone()));
                }
                lines.push(Line::from(""));
            }
            lines.push(Line::from(locale.text("Advice", "建议")).bold());
            lines.push(Line::from(interpretation.advice.clone()));
        }
        None => {
            for card in &reading.cards {
                lines.push(Line::from(format!(
                    "{} · {} ({})",
                    card.position_name,
                    card.name(),
                    card.orientation_label(locale)
                )));
            }
        }
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.reading_scroll, 0))
            .block(pane_block(locale.text("Reading", "解读"), true)),
        area,
    );
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = pane_block(app.locale.text("Events", "事件"), false);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);
    let rows = app.history_rows();
    let block = Block::default()
        .title(app.locale.text(
            "History (Enter replay, Esc close)",
            "历史记录（回车 查看，Esc 关闭）",
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(app.locale.text("No readings yet.", "暂无记录。")).block(block),
            area,
        );
        return;
    }
    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row.clone())).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    state.select(Some(app.history_cursor.min(rows.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "q quit | ? help | Esc back | Enter confirm",
            "q 退出 | ? 帮助 | Esc 返回 | 回车 确认",
        )),
        Line::from(app.locale.text(
            "arrows/hjkl move and rotate the deck",
            "方向键/hjkl 移动与旋转牌堆",
        )),
        Line::from(app.locale.text(
            "mouse: drag the ring to turn, click to draw",
            "鼠标：拖动牌环旋转，点击抽牌",
        )),
        Line::from(app.locale.text(
            "space draw/reveal | a auto draw/reveal all | i interpret",
            "空格 抽牌/翻牌 | a 自动抽牌/全部翻开 | i 解读",
        )),
        Line::from(app.locale.text(
            "m draw mode | t tone | v card meanings",
            "m 抽牌方式 | t 解读风格 | v 牌义",
        )),
        Line::from(app.locale.text(
            "H history | n/Ctrl+N new reading",
            "H 历史记录 | n/Ctrl+N 重新开始",
        )),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "帮助"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_sits_in_the_left_body_column() {
        let area = Rect::new(0, 0, 100, 40);
        let wheel = wheel_area(area);
        assert_eq!(wheel.x, 0);
        assert_eq!(wheel.y, 4);
        assert_eq!(wheel.width, 60);
        assert_eq!(wheel.height, 40 - 4 - 7);
    }
}
