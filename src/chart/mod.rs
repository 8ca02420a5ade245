pub mod view;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

pub use view::ChartView;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Take over the terminal and draw the view until `q`/`Esc`.
pub fn show(view: &ChartView) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, view);

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &ChartView,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, view))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        _ => {}
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, view: &ChartView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // header
            Constraint::Percentage(55), // line chart
            Constraint::Min(8),         // scatter
            Constraint::Length(1),      // footer
        ])
        .split(f.area());

    render_header(f, view, chunks[0]);
    render_line_chart(f, view, chunks[1]);
    render_scatter(f, view, chunks[2]);
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, view: &ChartView, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", view.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(view.summary.clone(), Style::default().fg(Color::White)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_line_chart(f: &mut Frame, view: &ChartView, area: Rect) {
    let datasets = vec![
        Dataset::default()
            .name("Sentiment Score")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&view.sentiment_line),
        Dataset::default()
            .name("Stock Price")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&view.price_line),
    ];

    let chart = Chart::new(datasets)
        .block(titled_block(format!(
            " Normalized Sentiment Score vs Stock Price for {} ",
            view.title
        )))
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds(view.x_bounds)
                .labels(view.date_labels.clone()),
        )
        .y_axis(
            Axis::default()
                .title("Normalized Value (0 to 100)")
                .style(Style::default().fg(Color::Gray))
                .bounds(view.normalized_bounds())
                .labels(["0", "50", "100"]),
        );
    f.render_widget(chart, area);
}

fn render_scatter(f: &mut Frame, view: &ChartView, area: Rect) {
    let datasets = vec![Dataset::default()
        .name("days")
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Magenta))
        .data(&view.scatter)];

    let chart = Chart::new(datasets)
        .block(titled_block(format!(
            " Sentiment Score vs Price Change for {} ",
            view.title
        )))
        .x_axis(
            Axis::default()
                .title("Sentiment Score")
                .style(Style::default().fg(Color::Gray))
                .bounds(view.normalized_bounds())
                .labels(["0", "50", "100"]),
        )
        .y_axis(
            Axis::default()
                .title("Price Change (%)")
                .style(Style::default().fg(Color::Gray))
                .bounds(view.change_bounds)
                .labels(view.change_labels.clone()),
        );
    f.render_widget(chart, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q/Esc] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit"),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)), area);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}
