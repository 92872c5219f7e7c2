// UI rendering logic
use crate::app::{App, InputMode, FORM_LABELS};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use stockroom_core::display::{format_date, format_money};
use stockroom_core::{Severity, Status};

pub fn render(frame: &mut Frame, app: &mut App, now: DateTime<Utc>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Dashboard counters
            Constraint::Length(3), // Search + filter
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_dashboard(frame, app, chunks[0], now);
    render_search_bar(frame, app, chunks[1]);
    render_table(frame, app, chunks[2], now);
    render_status_bar(frame, app, chunks[3]);

    match app.input_mode {
        InputMode::Form => render_form(frame, app),
        InputMode::ConfirmDelete => render_delete_prompt(frame, app),
        _ => {}
    }

    render_toasts(frame, app);
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect, now: DateTime<Utc>) {
    let dash = app.dashboard(now);

    let cards = [
        ("Total Products", dash.total.to_string(), Color::Cyan),
        ("Low Stock", dash.low_stock_count.to_string(), Color::Yellow),
        ("Out of Stock", dash.out_of_stock_count.to_string(), Color::Gray),
        ("Expired", dash.expired_count.to_string(), Color::Red),
        (
            "Total Profit",
            format_money(&app.currency, dash.total_profit),
            Color::Green,
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 5])
        .split(area);

    for ((title, value, color), column) in cards.into_iter().zip(columns.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(card, *column);
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Searching;
    let border = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::raw(&app.search_input),
        if searching {
            Span::styled("█", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
    ]);

    let title = format!(
        "Search (/)  •  Filter: {} (f)",
        app.status_filter.label()
    );
    let search = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    frame.render_widget(search, area);
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect, now: DateTime<Utc>) {
    let query = app.query();
    let rows = app.inventory.view(&query, now);

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let record = row.record;
            let color = status_color(row.status);
            Row::new(vec![
                Cell::from(record.name.clone()),
                Cell::from(record.quantity.to_string()),
                Cell::from(format_money(&app.currency, record.buy_price)),
                Cell::from(format_money(&app.currency, record.sell_price)),
                Cell::from(format_money(&app.currency, row.profit)),
                Cell::from(format_date(record.expiry)),
                Cell::from(Span::styled(
                    row.status.label(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Name", "Qty", "Buy", "Sell", "Profit", "Expiry", "Status",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let title = format!("Inventory ({} of {})", rows.len(), app.inventory.len());
    let table = Table::new(
        body,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(8),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(13),
            Constraint::Percentage(13),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().bg(Color::Rgb(68, 71, 90)))
    .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Normal => {
            "q quit • / search • f filter • a add • e edit • d delete • x export • g demo • w warnings"
        }
        InputMode::Searching => "type to search • Enter/Esc done",
        InputMode::Form => "Tab/↓ next • ↑ previous • Enter save • Esc cancel",
        InputMode::ConfirmDelete => "y confirm • n cancel",
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::Gray))];
    if app.inventory.is_read_only() {
        spans.push(Span::styled(
            "  [read-only preview]",
            Style::default().fg(Color::Magenta),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_form(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };
    let area = centered_rect(50, 14, frame.area());

    let mut lines = Vec::new();
    for (i, label) in FORM_LABELS.iter().enumerate() {
        let active = i == form.cursor;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut value = form.field(i).to_string();
        if active {
            value.push('█');
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:<20}", label), label_style),
            Span::raw(value),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(form.title())
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );
}

fn render_delete_prompt(frame: &mut Frame, app: &App) {
    let name = app.pending_delete_name().unwrap_or("this item");
    let area = centered_rect(50, 5, frame.area());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(format!("Are you sure you want to delete “{}”? (y/n)", name))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Delete")
                    .border_style(Style::default().fg(Color::Red)),
            ),
        area,
    );
}

/// Newest toast at the bottom of a stack in the top-right corner
fn render_toasts(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    let width = (screen.width / 2).max(30).min(screen.width);
    let mut y = screen.y + 1;

    for toast in &app.toasts {
        let height = 3 + (toast.message.chars().count() as u16 / width.saturating_sub(2).max(1));
        if y + height > screen.bottom() {
            break;
        }
        let area = Rect {
            x: screen.right().saturating_sub(width + 1),
            y,
            width,
            height,
        };

        let color = match toast.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Cyan,
        };

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            area,
        );
        y += height;
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Good => Color::Green,
        Status::LowStock => Color::Yellow,
        Status::OutOfStock => Color::Gray,
        Status::NearExpiry => Color::Rgb(255, 165, 0),
        Status::Expired => Color::Red,
    }
}

/// A box of `percent_x` width and fixed `height`, centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
