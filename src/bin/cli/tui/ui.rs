use chrono::{Local, TimeZone};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use certprep_lib::models::{ExamResult, ExamType};
use certprep_lib::session::View;

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let session = state.controller.state();

    let mut constraints = vec![Constraint::Length(3)];
    if session.error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut next = 0;
    draw_title(f, state, chunks[next]);
    next += 1;

    if state.controller.state().error.is_some() {
        draw_error(f, state, chunks[next]);
        next += 1;
    }

    let content = chunks[next];
    match state.controller.state().view {
        View::Home => draw_home(f, state, content),
        View::Exam => draw_exam(f, state, content),
        View::Flashcards | View::EkgFlashcards | View::BodyPositionFlashcards => {
            draw_deck(f, state, content)
        }
        View::History => draw_history(f, state, content),
        View::Profile => draw_profile(f, state, content),
    }

    draw_status_bar(f, state, chunks[next + 1]);

    if state.controller.state().is_loading() {
        draw_loading_overlay(f, state);
    }
}

fn view_name(view: View) -> &'static str {
    match view {
        View::Home => "Dashboard",
        View::Exam => "Practice Exam",
        View::Flashcards => "Flashcards",
        View::EkgFlashcards => "EKG Flashcards",
        View::BodyPositionFlashcards => "Body Positions Flashcards",
        View::History => "Exam History",
        View::Profile => "Profile & Settings",
    }
}

fn draw_title(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();

    let title = match session.view {
        View::History => "Exam History".to_string(),
        View::Profile => "Profile & Settings".to_string(),
        view => match session.selected_exam {
            Some(exam) => format!("{} - {}", exam, view_name(view)),
            None => "NHA Study Aid Pro".to_string(),
        },
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}

fn draw_error(f: &mut Frame, state: &TuiState, area: Rect) {
    let message = state.controller.state().error.clone().unwrap_or_default();
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(message, Style::default().fg(Color::Red)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("x to dismiss")
            .border_style(Style::default().fg(Color::Red)),
    );

    f.render_widget(paragraph, area);
}

fn exam_color(exam: ExamType) -> Color {
    match exam {
        ExamType::Ccma => Color::Green,
        ExamType::Phlebotomy => Color::Red,
        ExamType::Ekg => Color::Cyan,
    }
}

fn draw_home(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    // Side menu
    let entries = session.menu_entries();
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let marker = if i == state.menu_selected.min(entries.len().saturating_sub(1)) {
            "> "
        } else {
            "  "
        };
        let style = if marker == "> " {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("{marker}{}", entry.label), style)));
        lines.push(Line::from(Span::styled(
            format!("    {}", entry.detail),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let menu = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Menu"));
    f.render_widget(menu, columns[0]);

    // Certification pickers
    let mut lines = vec![
        Line::from("Select your certification path to begin."),
        Line::from(""),
    ];
    for (i, exam) in ExamType::ALL.iter().enumerate() {
        let selected = session.selected_exam == Some(*exam);
        let marker = if selected { "●" } else { "○" };
        let style = if selected {
            Style::default().fg(exam_color(*exam)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(exam_color(*exam))
        };
        lines.push(Line::from(Span::styled(
            format!("  {marker} [{}] {}", i + 1, exam.label()),
            style,
        )));
    }
    lines.push(Line::from(""));

    if let Some(exam) = session.selected_exam {
        lines.push(Line::from(vec![
            Span::raw("You have selected "),
            Span::styled(exam.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("."),
        ]));
        lines.push(Line::from(
            "Choose a module from the menu, or press s to start a practice exam.",
        ));
    } else {
        lines.push(Line::from(Span::styled(
            "Press 1, 2, or 3 to choose a track.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let main = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("NHA Study Aid Pro"));
    f.render_widget(main, columns[1]);
}

fn draw_exam(f: &mut Frame, state: &TuiState, area: Rect) {
    if state.showing_results {
        draw_exam_results(f, state, area);
        return;
    }

    let attempt = match &state.attempt {
        Some(attempt) => attempt,
        None => return,
    };
    let question = match attempt.current_question() {
        Some(question) => question.clone(),
        None => return,
    };
    let answer = attempt.current_answer().cloned();

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Question {} of {}  ({} answered)",
                attempt.current_index() + 1,
                attempt.questions().len(),
                attempt.answered_count()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(question.question.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];

    for (i, option) in question.options.iter().enumerate() {
        let letter = (b'a' + i as u8) as char;
        let style = match &answer {
            Some(answer) if *option == answer.correct_answer => {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            }
            Some(answer) if *option == answer.selected_answer && !answer.is_correct => {
                Style::default().fg(Color::Red)
            }
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default(),
        };
        lines.push(Line::from(Span::styled(format!("  {letter}) {option}"), style)));
    }

    if let Some(answer) = &answer {
        lines.push(Line::from(""));
        let verdict = if answer.is_correct {
            Span::styled("Correct!", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("Incorrect.", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        };
        lines.push(Line::from(verdict));
        lines.push(Line::from(answer.explanation.clone()));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Practice Exam"));
    f.render_widget(paragraph, area);
}

fn draw_exam_results(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();
    let stats = match &state.last_stats {
        Some(stats) => stats,
        None => return,
    };

    let percentage = if stats.total_questions > 0 {
        stats.score * 100 / stats.total_questions
    } else {
        0
    };
    let score_color = if percentage >= 80 {
        Color::Green
    } else if percentage >= 60 {
        Color::Yellow
    } else {
        Color::Red
    };

    let mut lines = vec![
        Line::from(Span::styled("Exam Complete!", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}/{} ({percentage}%)", stats.score, stats.total_questions),
            Style::default().fg(score_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Missed questions: {}", stats.incorrect_answers.len())),
        Line::from(""),
    ];

    if session.is_generating_guide {
        lines.push(Line::from(Span::styled(
            "Analyzing your results to create a custom study plan...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(guide) = &session.study_guide {
        lines.push(Line::from(Span::styled(
            "Your Personalized Study Guide",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for text_line in guide.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    } else if !stats.incorrect_answers.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press g to generate a study guide from your missed questions.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Perfect score, nothing to review!",
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(paragraph, area);
}

fn draw_deck(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();
    let len = state.deck_len();
    if len == 0 {
        let paragraph = Paragraph::new("This deck is empty. Press r to regenerate.")
            .block(Block::default().borders(Borders::ALL).title("Flashcards"));
        f.render_widget(paragraph, area);
        return;
    }

    let index = state.card_index.min(len - 1);
    let side = if state.card_flipped { "back" } else { "front" };
    let title = format!(
        "{} - card {}/{} ({side})",
        session.current_topic.map(|t| t.label()).unwrap_or("Flashcards"),
        index + 1,
        len
    );

    let mut lines = Vec::new();
    match session.view {
        View::Flashcards => {
            let card = &session.flashcards[index];
            if !state.card_flipped {
                lines.push(Line::from(Span::styled(
                    card.term.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(card.definition.clone()));
                if !card.context.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        card.context.clone(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
        View::EkgFlashcards => {
            let card = &session.ekg_flashcards[index];
            if !state.card_flipped {
                lines.push(Line::from(Span::styled(
                    card.interpretation.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                if let Some(bytes) = card.image_bytes() {
                    lines.push(Line::from(Span::styled(
                        format!("[strip illustration attached, {} bytes]", bytes.len()),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            } else {
                lines.push(Line::from(card.explanation.clone()));
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Response: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(card.response_procedure.clone()),
                ]));
            }
        }
        View::BodyPositionFlashcards => {
            let card = &session.body_position_flashcards[index];
            if !state.card_flipped {
                lines.push(Line::from(Span::styled(
                    card.position_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                if let Some(bytes) = card.image_bytes() {
                    lines.push(Line::from(Span::styled(
                        format!("[illustration attached, {} bytes]", bytes.len()),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            } else {
                lines.push(Line::from(card.description.clone()));
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Purpose: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(card.purpose.clone()),
                ]));
            }
        }
        _ => {}
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn format_timestamp(timestamp: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn draw_history(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();
    let results = &session.exam_history;

    if results.is_empty() {
        let paragraph = Paragraph::new("No exam results yet. Finish a practice exam first.")
            .block(Block::default().borders(Borders::ALL).title("Exam History"));
        f.render_widget(paragraph, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Percentage(55)])
        .split(area);

    let selected = state.history_selected.min(results.len() - 1);

    let mut lines = Vec::new();
    for (i, result) in results.iter().enumerate() {
        let marker = if i == selected { "> " } else { "  " };
        let percent = if result.total_questions > 0 {
            result.score * 100 / result.total_questions
        } else {
            0
        };
        let guide_tag = if result.study_guide.is_some() { "  [guide]" } else { "" };
        let style = if i == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}{}  {}  {}/{} ({percent}%){guide_tag}",
                format_timestamp(result.timestamp),
                result.exam_type.short_name(),
                result.score,
                result.total_questions,
            ),
            style,
        )));
    }
    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Exam History (newest first)"));
    f.render_widget(list, rows[0]);

    draw_history_detail(f, state, &results[selected], rows[1]);
}

fn draw_history_detail(f: &mut Frame, state: &TuiState, result: &ExamResult, area: Rect) {
    let session = state.controller.state();
    let mut lines = vec![
        Line::from(format!("Exam: {}", result.exam_type)),
        Line::from(format!("Missed questions: {}", result.incorrect_answers.len())),
        Line::from(""),
    ];

    let generating_this = session.is_generating_guide
        && session.current_generating_id.as_deref() == Some(result.id.as_str());

    if generating_this {
        lines.push(Line::from(Span::styled(
            "Generating study guide...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(guide) = &result.study_guide {
        lines.push(Line::from(Span::styled(
            "Study Guide",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for text_line in guide.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    } else if result.incorrect_answers.is_empty() {
        lines.push(Line::from("Perfect score, no study guide needed."));
    } else {
        lines.push(Line::from(Span::styled(
            "Press g to generate a study guide for this result.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(paragraph, area);
}

fn draw_profile(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();

    let key_status = if state.api_key_configured {
        Span::styled("configured", Style::default().fg(Color::Green))
    } else {
        Span::styled("not configured", Style::default().fg(Color::Red))
    };

    let lines = vec![
        Line::from(format!("certprep {}", env!("CARGO_PKG_VERSION"))),
        Line::from(""),
        Line::from(format!("Data directory: {}", state.data_dir.display())),
        Line::from(vec![Span::raw("Gemini API key: "), key_status]),
        Line::from(format!(
            "Selected exam: {}",
            session.selected_exam.map(|e| e.label()).unwrap_or("none")
        )),
        Line::from(format!("Stored results: {}", session.exam_history.len())),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Profile & Settings"));
    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.controller.state();

    let hints = if session.is_loading() {
        "generating... · q quit"
    } else {
        match session.view {
            View::Home => "1-3 select exam · j/k menu · Enter open · s start exam · h history · p profile · q quit",
            View::Exam if state.showing_results => "g study guide · Esc home · q quit",
            View::Exam => "a-d answer · n/p navigate · f finish · Esc home",
            View::Flashcards | View::EkgFlashcards | View::BodyPositionFlashcards => {
                "Space flip · n/p cards · r regenerate · Esc home"
            }
            View::History => "j/k select · g study guide · Esc home",
            View::Profile => "Esc home",
        }
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(paragraph, area);
}

fn draw_loading_overlay(f: &mut Frame, state: &TuiState) {
    let message = state
        .controller
        .state()
        .loading_message
        .clone()
        .unwrap_or_else(|| "Working...".to_string());

    let area = centered_rect(60, 5, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Please wait"));
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = r.width * percent_x / 100;
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height: height.min(r.height) }
}
