//! Interactive dashboard for browsing sentence comparisons
//!
//! Selectable sentence table on the left, reference + scored hypotheses on
//! the right, and the two attribution heatmaps side by side below. Enter
//! zooms the heatmaps to the full body.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;

use crate::config::Settings;
use crate::models::{ComparisonSet, SentencePair, SentenceRecord, SentenceSummary};
use crate::render::{self, Colormap};

pub struct App {
    set: ComparisonSet,
    sentences: Vec<SentenceSummary>,
    list_state: ListState,
    colormap: Colormap,
    eos_label: String,
    zoomed: bool,
}

impl App {
    pub fn new(set: ComparisonSet, settings: &Settings) -> Self {
        let sentences = set.source_sentences();
        let mut list_state = ListState::default();
        if !set.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            set,
            sentences,
            list_state,
            colormap: settings.colormap,
            eos_label: settings.eos_label.clone(),
            zoomed: false,
        }
    }

    fn next(&mut self) {
        if self.set.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.set.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.set.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.set.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn selected_pair(&self) -> Option<SentencePair<'_>> {
        self.list_state.selected().and_then(|i| self.set.pair(i))
    }
}

pub fn run(set: ComparisonSet, settings: &Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(set, settings);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc if !app.zoomed => return Ok(()),
                    KeyCode::Esc => app.zoomed = false,
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Enter => app.zoomed = !app.zoomed,
                    KeyCode::Char('c') => app.colormap = app.colormap.next(),
                    KeyCode::PageDown => {
                        for _ in 0..10 {
                            app.next();
                        }
                    }
                    KeyCode::PageUp => {
                        for _ in 0..10 {
                            app.previous();
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Header with selection position and active colormap
    let selected = app.list_state.selected().unwrap_or(0) + 1;
    let header = Paragraph::new(format!(
        " lrpscope | {} sentences | {}/{} | colormap: {}",
        app.set.len(),
        selected,
        app.set.len(),
        app.colormap
    ))
    .style(Style::default().fg(Color::Cyan).bold())
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let body = chunks[1];

    if app.zoomed {
        render_heatmap_row(f, body, app);
    } else {
        let rows_split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(body);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows_split[0]);

        let info = app.selected_pair().map(info_lines);
        render_list(f, top[0], app);
        if let Some(text) = info {
            let para = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title(" Info "))
                .wrap(Wrap { trim: false });
            f.render_widget(para, top[1]);
        }

        render_heatmap_row(f, rows_split[1], app);
    }

    // Footer
    let help = " j/k:Navigate  Enter:Zoom heatmaps  c:Colormap  q:Quit";
    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[2]);
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .sentences
        .iter()
        .map(|s| {
            let line = Line::from(vec![
                Span::styled(format!("{:>4} ", s.id), Style::default().fg(Color::DarkGray)),
                Span::raw(s.src.as_str()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Sentence "))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_heatmap_row(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let Some(pair) = app.selected_pair() else {
        return;
    };
    let base = heatmap_lines(pair.baseline, app.colormap, &app.eos_label, halves[0]);
    let aug = heatmap_lines(pair.augmented, app.colormap, &app.eos_label, halves[1]);

    render_heatmap_pane(f, halves[0], " Baseline inp_lrp ", base);
    render_heatmap_pane(f, halves[1], " Augmented inp_lrp ", aug);
}

fn render_heatmap_pane(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(para, area);
}

/// Styled lines for one matrix, clipped to the pane
fn heatmap_lines(
    record: &SentenceRecord,
    colormap: Colormap,
    eos: &str,
    area: Rect,
) -> Vec<Line<'static>> {
    let matrix = &record.attribution;
    let values = render::normalized(matrix);
    let dst_labels = record.dst_axis_labels(eos);
    let label_width = dst_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(10);

    // 2 terminal cells per matrix column, minus borders and the row label
    let max_cols = (area.width.saturating_sub(label_width as u16 + 4) / 2) as usize;
    let max_rows = area.height.saturating_sub(5) as usize;
    let shown_cols = matrix.cols().min(max_cols.max(1));
    let shown_rows = matrix.rows().min(max_rows.max(1));

    let mut lines = Vec::new();
    for r in 0..shown_rows {
        let label = dst_labels.get(r).map(String::as_str).unwrap_or("?");
        let mut spans = vec![Span::styled(
            format!(
                "{:>w$} ",
                render::truncate_label(label, 10),
                w = label_width
            ),
            Style::default().fg(Color::DarkGray),
        )];
        for c in 0..shown_cols {
            let (red, green, blue) = colormap.color(values[r * matrix.cols() + c]);
            spans.push(Span::styled(
                "  ",
                Style::default().bg(Color::Rgb(red, green, blue)),
            ));
        }
        if shown_cols < matrix.cols() {
            spans.push(Span::styled("…", Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }
    if shown_rows < matrix.rows() {
        lines.push(Line::from(Span::styled(
            "…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    let legend = record
        .src_axis_labels(eos)
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{i}={l}"))
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(Line::from(Span::styled(
        format!("src: {legend}"),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn info_lines(pair: SentencePair<'_>) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Reference: ", Style::default().bold()),
            Span::raw(pair.reference.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("Baseline  ({:0.4}) ", pair.baseline_bleu.score),
                Style::default().fg(Color::Yellow).bold(),
            ),
            Span::raw(pair.baseline.dst_display()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("Augmented ({:0.4}) ", pair.augmented_bleu.score),
                Style::default().fg(Color::Green).bold(),
            ),
            Span::raw(pair.augmented.dst_display()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "matrices: {}x{} baseline, {}x{} augmented",
                pair.baseline.attribution.rows(),
                pair.baseline.attribution.cols(),
                pair.augmented.attribution.rows(),
                pair.augmented.attribution.cols()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
