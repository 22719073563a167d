//! UI rendering for the TUI.

use crickdash_core::{Chart, ChartKind, QueryResult, Value};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        BarChart, Block, BorderType, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table,
    },
    Frame,
};

use crate::app::{App, FormField, ViewMode};

/// Rows shown in the data preview
const PREVIEW_ROWS: usize = 20;
/// Bars that fit comfortably in one chart panel
const MAX_BARS: usize = 12;

// ========== Colors ==========

/// Active tab and accents
const ACCENT: Color = Color::Rgb(0, 180, 180);
/// Border color for the analysis menu
const BORDER_MENU: Color = Color::Rgb(100, 180, 100);
/// Border color for results
const BORDER_RESULTS: Color = Color::Rgb(80, 160, 80);
/// Border color for the connect form
const BORDER_FORM: Color = Color::Rgb(180, 100, 180);
/// Labels and table headers
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Bar fill color
const BAR_COLOR: Color = Color::Rgb(220, 180, 0);
/// Pie slice palette, cycled
const PIE_COLORS: [Color; 6] = [
    Color::Rgb(0, 180, 180),
    Color::Rgb(220, 180, 0),
    Color::Rgb(180, 100, 180),
    Color::Rgb(80, 160, 80),
    Color::Rgb(255, 127, 80),
    Color::Rgb(138, 43, 226),
];

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    render_dashboard(frame, app);

    if app.view_mode == ViewMode::Connect {
        render_connect_form(frame, app);
    }
}

/// Render the dashboard: tabs, analysis menu, results, status, footer.
fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(2), // Tab header
        Constraint::Min(8),    // Body
        Constraint::Length(1), // Status line
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_tab_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Render the tab bar header with the app name and one tab per dataset.
fn render_tab_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(12), // App name
        Constraint::Min(1),     // Tabs
    ])
    .split(area);

    let app_name = Paragraph::new(" crickdash").style(Style::default().fg(ACCENT).bold());
    frame.render_widget(app_name, chunks[0]);

    let mut spans: Vec<Span> = Vec::new();
    for (idx, dataset) in crickdash_core::Dataset::ALL.iter().enumerate() {
        let style = if idx == app.dataset_index {
            Style::default()
                .fg(ACCENT)
                .bold()
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", dataset.display_name()), style));
        spans.push(Span::raw(" "));
    }

    let tabs = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, chunks[1]);
}

/// Render the analysis menu and the results panel side by side.
fn render_body(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(46), // Analysis menu
        Constraint::Min(30),    // Results
    ])
    .split(area);

    render_analysis_menu(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
}

/// Render the analysis list and, when relevant, the fielder input.
fn render_analysis_menu(frame: &mut Frame, app: &mut App, area: Rect) {
    let takes_fielder = app.selected_analysis().takes_fielder();

    let chunks = if takes_fielder {
        Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(area)
    } else {
        Layout::vertical([Constraint::Min(5)]).split(area)
    };

    let items: Vec<ListItem> = crickdash_core::Analysis::ALL
        .iter()
        .map(|a| ListItem::new(a.label()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Select Analysis ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_MENU)),
        )
        .highlight_style(Style::default().fg(ACCENT).bold())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.analysis_state);

    if takes_fielder {
        let style = if app.editing_fielder {
            Style::default().fg(ACCENT).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if app.editing_fielder { "_" } else { "" };
        let input = Paragraph::new(Line::from(vec![
            Span::styled("Fielder: ", Style::default().fg(LABEL_COLOR)),
            Span::styled(format!("{}{}", app.fielder, cursor), style),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_MENU)),
        );
        frame.render_widget(input, chunks[1]);
    }
}

/// Render the preview table and any charts for the last result.
fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let Some(result) = &app.result else {
        let hint = if app.is_connected() {
            "Press Enter to run the selected analysis."
        } else {
            "Press 'c' to connect to the database first."
        };
        let placeholder = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Results ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(BORDER_RESULTS)),
            );
        frame.render_widget(placeholder, area);
        return;
    };

    // Split between preview and charts; charts share the lower half.
    let chunks = if app.charts.is_empty() {
        Layout::vertical([Constraint::Min(5)]).split(area)
    } else {
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area)
    };

    render_preview_table(frame, result, chunks[0]);

    if !app.charts.is_empty() {
        let constraints: Vec<Constraint> = app
            .charts
            .iter()
            .map(|_| Constraint::Ratio(1, app.charts.len() as u32))
            .collect();
        let chart_areas = Layout::horizontal(constraints).split(chunks[1]);
        for (chart, chart_area) in app.charts.iter().zip(chart_areas.iter()) {
            render_chart(frame, result, chart, *chart_area);
        }
    }
}

/// Render the first rows of the result as a table.
fn render_preview_table(frame: &mut Frame, result: &QueryResult, area: Rect) {
    let title = format!(" Data Preview ({} rows) ", result.rows.len());

    if result.is_empty() {
        let empty = Paragraph::new("Query returned no rows.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(BORDER_RESULTS)),
            );
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        result
            .columns
            .iter()
            .map(|c| Cell::from(c.as_str()).style(Style::default().fg(LABEL_COLOR).bold())),
    );

    let rows = result.rows.iter().take(PREVIEW_ROWS).map(|row| {
        Row::new(
            row.values
                .iter()
                .map(|v| Cell::from(v.to_string()))
                .collect::<Vec<_>>(),
        )
    });

    let widths: Vec<Constraint> = result
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, result.columns.len().max(1) as u32))
        .collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_RESULTS)),
    );

    frame.render_widget(table, area);
}

/// Category/value pairs a chart can draw, extracted by column binding.
fn chart_data(result: &QueryResult, chart: &Chart) -> Vec<(String, f64)> {
    let Some(cat_idx) = result.column_index(chart.category) else {
        return Vec::new();
    };
    let Some(val_idx) = result.column_index(chart.value) else {
        return Vec::new();
    };

    let limit = chart.limit.unwrap_or(usize::MAX);
    result
        .rows
        .iter()
        .take(limit)
        .filter_map(|row| {
            let label = match row.values.get(cat_idx)? {
                Value::Null => return None,
                v => v.to_string(),
            };
            let value = row.values.get(val_idx)?.as_f64()?;
            Some((label, value))
        })
        .collect()
}

/// Render one chart for the result.
fn render_chart(frame: &mut Frame, result: &QueryResult, chart: &Chart, area: Rect) {
    match chart.kind {
        ChartKind::Bar => render_bar_chart(frame, result, chart, area),
        ChartKind::Pie => render_pie_chart(frame, result, chart, area),
    }
}

/// Bar chart via the ratatui widget.
fn render_bar_chart(frame: &mut Frame, result: &QueryResult, chart: &Chart, area: Rect) {
    let data = chart_data(result, chart);

    let block = Block::default()
        .title(format!(" {} ", chart.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_RESULTS));

    if data.is_empty() {
        let empty = Paragraph::new("No chartable data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Bar labels get truncated to keep the bars readable.
    let bars: Vec<(String, u64)> = data
        .iter()
        .take(MAX_BARS)
        .map(|(label, value)| {
            let short: String = label.chars().take(8).collect();
            (short, value.round().max(0.0) as u64)
        })
        .collect();
    let bar_refs: Vec<(&str, u64)> = bars.iter().map(|(l, v)| (l.as_str(), *v)).collect();

    let widget = BarChart::default()
        .block(block)
        .data(&bar_refs)
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(BAR_COLOR))
        .value_style(Style::default().fg(Color::Black).bg(BAR_COLOR));

    frame.render_widget(widget, area);
}

/// Pie chart rendered as proportional rows; terminals have no wedges, but
/// the names/values encoding is the same.
fn render_pie_chart(frame: &mut Frame, result: &QueryResult, chart: &Chart, area: Rect) {
    let data = chart_data(result, chart);
    let total: f64 = data.iter().map(|(_, v)| v.max(0.0)).sum();

    let block = Block::default()
        .title(format!(" {} ", chart.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_RESULTS));

    if data.is_empty() || total <= 0.0 {
        let empty = Paragraph::new("No chartable data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = inner_width.saturating_sub(30).max(8);

    let lines: Vec<Line> = data
        .iter()
        .enumerate()
        .map(|(idx, (label, value))| {
            let share = value.max(0.0) / total;
            let filled = ((share * bar_width as f64).round() as usize).min(bar_width);
            let color = PIE_COLORS[idx % PIE_COLORS.len()];

            let short: String = label.chars().take(14).collect();
            Line::from(vec![
                Span::styled(format!("{:<14} ", short), Style::default().fg(Color::White)),
                Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
                Span::styled(
                    format!(" {:>5.1}% ({})", share * 100.0, value),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);
}

/// Render the status line (verbatim errors in red).
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };

    let style = if status.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let line = Paragraph::new(format!(" {}", status.text)).style(style);
    frame.render_widget(line, area);
}

/// Render the footer with connection state and key hints.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let (state, state_color) = if app.is_connected() {
        ("Connected", Color::Green)
    } else {
        ("Disconnected", Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", state), Style::default().fg(state_color).bold()),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
    ];

    let hints = if app.view_mode == ViewMode::Connect {
        "Tab: next field  Enter: connect  Esc: cancel"
    } else if app.editing_fielder {
        "type the fielder name  Enter: done"
    } else if app.selected_analysis().takes_fielder() {
        "Tab: dataset  \u{2191}\u{2193}: analysis  f: fielder  Enter: run  c: connect  d: disconnect  q: quit"
    } else {
        "Tab: dataset  \u{2191}\u{2193}: analysis  Enter: run  c: connect  d: disconnect  q: quit"
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the connection form as a centered overlay.
fn render_connect_form(frame: &mut Frame, app: &App) {
    let area = centered_rect(46, 9, frame.area());

    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let focused = app.form.focused() == field;
        let label_style = if focused {
            Style::default().fg(ACCENT).bold()
        } else {
            Style::default().fg(LABEL_COLOR)
        };

        let raw = app.form.value(field);
        let shown = if field == FormField::Password {
            "\u{2022}".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {:<10}", field.label()), label_style),
            Span::styled(
                format!("{}{}", shown, cursor),
                Style::default().fg(Color::White),
            ),
        ]));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" Database Connection ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_FORM)),
    );

    frame.render_widget(form, area);
}

/// A fixed-size rect centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
