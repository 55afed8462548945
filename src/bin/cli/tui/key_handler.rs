use crossterm::event::{KeyCode, KeyEvent};

use certprep_lib::models::ExamType;
use certprep_lib::session::{SessionEvent, View};

use super::app_state::TuiState;

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // While a generation is in flight only quitting is allowed; the
    // request itself cannot be cancelled and will land on the channel.
    if state.controller.state().is_loading() {
        if key.code == KeyCode::Char('q') {
            state.quit = true;
        }
        return;
    }

    match state.controller.state().view {
        View::Home => handle_home(state, key),
        View::Exam => handle_exam(state, key),
        View::Flashcards | View::EkgFlashcards | View::BodyPositionFlashcards => {
            handle_deck(state, key)
        }
        View::History => handle_history(state, key),
        View::Profile => handle_profile(state, key),
    }
}

fn back(state: &mut TuiState) {
    state.dispatch(SessionEvent::BackRequested);
}

fn handle_home(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('1') => state.dispatch(SessionEvent::ExamSelected(ExamType::Ccma)),
        KeyCode::Char('2') => state.dispatch(SessionEvent::ExamSelected(ExamType::Phlebotomy)),
        KeyCode::Char('3') => state.dispatch(SessionEvent::ExamSelected(ExamType::Ekg)),
        KeyCode::Char('j') | KeyCode::Down => state.menu_move_down(),
        KeyCode::Char('k') | KeyCode::Up => state.menu_move_up(),
        KeyCode::Enter => state.activate_menu_entry(),
        KeyCode::Char('s') => state.dispatch(SessionEvent::ExamStartRequested),
        KeyCode::Char('h') => state.dispatch(SessionEvent::HistoryRequested),
        KeyCode::Char('p') => state.dispatch(SessionEvent::ProfileRequested),
        KeyCode::Char('x') => state.dispatch(SessionEvent::ErrorDismissed),
        _ => {}
    }
}

fn handle_exam(state: &mut TuiState, key: KeyEvent) {
    if state.showing_results {
        match key.code {
            KeyCode::Char('q') => state.quit = true,
            KeyCode::Char('g') => state.retry_study_guide(),
            KeyCode::Esc | KeyCode::Char('b') => back(state),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char(c @ 'a'..='d') => state.select_option(c as usize - 'a' as usize),
        KeyCode::Char(c @ '1'..='4') => state.select_option(c as usize - '1' as usize),
        KeyCode::Char('n') | KeyCode::Right => state.exam_next(),
        KeyCode::Char('p') | KeyCode::Left => state.exam_previous(),
        KeyCode::Char('f') => state.finish_exam(),
        // 'b' is taken by option selection here; Esc is the way home.
        KeyCode::Esc => back(state),
        _ => {}
    }
}

fn handle_deck(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => state.flip_card(),
        KeyCode::Char('n') | KeyCode::Right => state.next_card(),
        KeyCode::Char('p') | KeyCode::Left => state.previous_card(),
        KeyCode::Char('r') => state.dispatch(SessionEvent::RegenerateRequested),
        KeyCode::Esc | KeyCode::Char('b') => back(state),
        _ => {}
    }
}

fn handle_history(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.history_move_down(),
        KeyCode::Char('k') | KeyCode::Up => state.history_move_up(),
        KeyCode::Char('g') => state.generate_guide_for_selected(),
        KeyCode::Esc | KeyCode::Char('b') => back(state),
        _ => {}
    }
}

fn handle_profile(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Char('b') => back(state),
        _ => {}
    }
}
