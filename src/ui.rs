use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Focus},
    language::Language,
    session::Session,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const TITLE: &str = "TypR: Accelerate Your Coding";
const PLACEHOLDER: &str = "Start typing...";
const NEWLINE_MARKER: &str = "⏎";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharState {
    Typed,
    Current,
    Pending,
}

struct CodeStyles {
    typed: Style,
    current: Style,
    pending: Style,
}

impl CodeStyles {
    fn new() -> Self {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        Self {
            typed: Style::default().patch(bold_style).fg(Color::Green),
            current: Style::default()
                .patch(bold_style)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::UNDERLINED),
            pending: Style::default().add_modifier(Modifier::DIM),
        }
    }

    fn get(&self, state: CharState) -> Style {
        match state {
            CharState::Typed => self.typed,
            CharState::Current => self.current,
            CharState::Pending => self.pending,
        }
    }
}

/// Split the snippet into styled lines, merging runs of chars in the same state
fn code_lines(session: &Session, tab_width: usize) -> Vec<Line<'static>> {
    let styles = CodeStyles::new();
    let cursor = session.cursor();

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_state = CharState::Pending;

    let flush = |run: &mut String, state: CharState, spans: &mut Vec<Span<'static>>| {
        if !run.is_empty() {
            spans.push(Span::styled(std::mem::take(run), styles.get(state)));
        }
    };

    for (idx, &c) in session.target().iter().enumerate() {
        let state = match idx.cmp(&cursor) {
            std::cmp::Ordering::Less => CharState::Typed,
            std::cmp::Ordering::Equal => CharState::Current,
            std::cmp::Ordering::Greater => CharState::Pending,
        };
        if state != run_state {
            flush(&mut run, run_state, &mut spans);
            run_state = state;
        }

        match c {
            '\n' => {
                if state == CharState::Current {
                    run.push_str(NEWLINE_MARKER);
                }
                flush(&mut run, run_state, &mut spans);
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            '\t' => run.push_str(&" ".repeat(tab_width)),
            c => run.push(c),
        }
    }
    flush(&mut run, run_state, &mut spans);
    lines.push(Line::from(spans));
    lines
}

fn status_text(session: &Session, now: Instant) -> String {
    let mistakes = format!("Mistakes: {}", session.mistakes());
    let progress = match (session.wpm(), session.accuracy()) {
        (Some(wpm), Some(acc)) => format!("{} WPM   {}% acc", wpm, acc),
        _ if session.has_started() && !session.has_finished() => {
            format!("{:.1}s", session.elapsed_at(now).as_secs_f64())
        }
        _ => PLACEHOLDER.to_string(),
    };
    format!("{}   {}", mistakes, progress)
}

/// Line index the cursor sits on; a finished session points at the last line
fn cursor_line(session: &Session) -> usize {
    let cursor = session.cursor().min(session.len());
    session.target()[..cursor].iter().filter(|&&c| c == '\n').count()
}

/// Rows to scroll so the cursor line stays inside a view of `height` rows
fn scroll_offset(cursor_line: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    let offset = (cursor_line + 1).saturating_sub(height);
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Convert a length to cells, saturating instead of wrapping
fn cells(len: usize, pad: u16) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX).saturating_add(pad)
}

/// Centered rect of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_picker(app: &App, area: Rect, buf: &mut Buffer) {
    let items: Vec<ListItem> = Language::ALL
        .iter()
        .map(|l| ListItem::new(l.to_string()))
        .collect();
    let popup = centered(area, 24, Language::ALL.len() as u16 + 2);

    Clear.render(popup, buf);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select Language"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.picker_index));
    StatefulWidget::render(list, popup, buf, &mut state);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let lines = code_lines(session, self.config.tab_width);
        let code_width = cells(lines.iter().map(|l| l.width()).max().unwrap_or(0), 2);
        let code_height = cells(lines.len(), 2);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(1), // language
                Constraint::Min(3),    // code
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            TITLE,
            bold_style.fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let language_line = match session.snippet().language() {
            Some(lang) => format!("Language: {}  (←/→ to switch)", lang),
            None => format!("Snippet: {}", session.snippet().name()),
        };
        Paragraph::new(Span::styled(language_line, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let title_width = cells(session.snippet().name().width(), 4);
        let code_area = centered(
            chunks[2],
            code_width.max(title_width),
            code_height,
        );
        let border_style = if self.focus == Focus::Typing {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let offset = scroll_offset(cursor_line(session), code_area.height.saturating_sub(2));
        Paragraph::new(lines)
            .scroll((offset, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(session.snippet().name().to_string()),
            )
            .render(code_area, buf);

        let status_style = if session.has_finished() {
            bold_style.fg(Color::Magenta)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(status_text(session, Instant::now()), status_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            "(ctrl+r) reset / (ctrl+l) language / (←/→) prev/next / (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        if self.focus == Focus::LanguagePicker {
            render_picker(self, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::key::KeyInput;
    use crate::language::Snippet;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn session(text: &str) -> Session {
        Session::new(Snippet::custom("test", text).unwrap())
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(app: &App) -> String {
        render_sized(app, 100, 30)
    }

    fn render_sized(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_code_lines_split_on_newline() {
        let s = session("ab\nc");
        let lines = code_lines(&s, 4);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "ab");
        assert_eq!(line_text(&lines[1]), "c");
    }

    #[test]
    fn test_current_newline_is_marked() {
        let mut s = session("ab\nc");
        s.handle_key(KeyInput::Char('a'));
        s.handle_key(KeyInput::Char('b'));
        let lines = code_lines(&s, 4);
        assert_eq!(line_text(&lines[0]), format!("ab{}", NEWLINE_MARKER));
        let marker = lines[0].spans.last().unwrap();
        assert_eq!(marker.style, CodeStyles::new().current);
    }

    #[test]
    fn test_tabs_expand_to_tab_width() {
        let s = session("\tx");
        let lines = code_lines(&s, 2);
        assert_eq!(line_text(&lines[0]), "  x");
    }

    #[test]
    fn test_spans_follow_cursor() {
        let mut s = session("abcd");
        s.handle_key(KeyInput::Char('a'));
        s.handle_key(KeyInput::Char('b'));
        let styles = CodeStyles::new();
        let spans = &code_lines(&s, 4)[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[0].style, styles.typed);
        assert_eq!(spans[1].content, "c");
        assert_eq!(spans[1].style, styles.current);
        assert_eq!(spans[2].content, "d");
        assert_eq!(spans[2].style, styles.pending);
    }

    #[test]
    fn test_status_placeholder_until_finished() {
        let mut s = session("ab");
        let now = Instant::now();
        assert_eq!(status_text(&s, now), "Mistakes: 0   Start typing...");

        s.handle_key_at(KeyInput::Char('x'), now);
        assert_eq!(
            status_text(&s, now + Duration::from_millis(1500)),
            "Mistakes: 1   1.5s"
        );
    }

    #[test]
    fn test_status_shows_wpm_after_finish() {
        let mut s = session("one two");
        let t0 = Instant::now();
        s.handle_key_at(KeyInput::Char('o'), t0);
        for c in "ne two".chars() {
            s.handle_key_at(KeyInput::Char(c), t0 + Duration::from_secs(6));
        }
        // 2 words in 0.1 minutes
        assert_eq!(status_text(&s, t0), "Mistakes: 0   20 WPM   100% acc");
    }

    #[test]
    fn test_status_zero_elapsed_keeps_placeholder() {
        let mut s = session("a");
        s.handle_key_at(KeyInput::Char('a'), Instant::now());
        assert!(status_text(&s, Instant::now()).ends_with(PLACEHOLDER));
    }

    #[test]
    fn test_render_typing_screen() {
        let app = App::new(Language::Python, Box::new(MemoryConfigStore::default())).unwrap();
        let content = render(&app);
        assert!(content.contains(TITLE));
        assert!(content.contains("Language: Python"));
        assert!(content.contains("def quick_sort(arr):"));
        assert!(content.contains("Mistakes: 0"));
        assert!(content.contains(PLACEHOLDER));
    }

    #[test]
    fn test_render_picker_overlay() {
        let mut app = App::new(Language::Go, Box::new(MemoryConfigStore::default())).unwrap();
        app.open_picker();
        let content = render(&app);
        assert!(content.contains("Select Language"));
        assert!(content.contains("> Go"));
        assert!(content.contains("C#"));
    }

    #[test]
    fn test_render_small_terminal_does_not_panic() {
        let app = App::new(Language::Java, Box::new(MemoryConfigStore::default())).unwrap();
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();
    }

    #[test]
    fn test_scroll_keeps_cursor_line_visible() {
        assert_eq!(scroll_offset(0, 15), 0);
        assert_eq!(scroll_offset(14, 15), 0);
        assert_eq!(scroll_offset(15, 15), 1);
        assert_eq!(scroll_offset(19, 15), 5);
        assert_eq!(scroll_offset(3, 0), 3);
    }

    #[test]
    fn test_cursor_line_counts_typed_newlines() {
        let mut s = session("ab\nc\nd");
        assert_eq!(cursor_line(&s), 0);
        for c in "ab".chars() {
            s.handle_key(KeyInput::Char(c));
        }
        assert_eq!(cursor_line(&s), 0);
        s.handle_key(KeyInput::Enter);
        assert_eq!(cursor_line(&s), 1);
        for key in [KeyInput::Char('c'), KeyInput::Enter, KeyInput::Char('d')] {
            s.handle_key(key);
        }
        assert!(s.has_finished());
        assert_eq!(cursor_line(&s), 2);
    }

    #[test]
    fn test_go_snippet_scrolls_in_standard_terminal() {
        let mut app = App::new(Language::Go, Box::new(MemoryConfigStore::default())).unwrap();
        let last_line = "return append(sorted, quickSort(right)...)";

        let content = render_sized(&app, 80, 24);
        assert!(content.contains("package main"));

        let text: Vec<char> = app.session.target().to_vec();
        let last_newline = text.iter().rposition(|&c| c == '\n').unwrap();
        for &c in &text[..=last_newline] {
            let key = match c {
                '\n' => KeyInput::Enter,
                '\t' => KeyInput::Tab,
                c => KeyInput::Char(c),
            };
            app.session.handle_key(key);
        }
        assert_eq!(app.session.mistakes(), 0);

        let content = render_sized(&app, 80, 24);
        assert!(content.contains(last_line));
    }

    #[test]
    fn test_oversized_snippets_render_without_overflow() {
        let store = || Box::new(MemoryConfigStore::default());

        let wide = Snippet::custom("big", "a".repeat(65_534)).unwrap();
        let app = App::with_snippet(wide, Language::Go, store());
        render_sized(&app, 80, 24);

        let tall = Snippet::custom("tall", "a\n".repeat(65_534) + "a").unwrap();
        let app = App::with_snippet(tall, Language::Go, store());
        render_sized(&app, 80, 24);

        let named = Snippet::custom("n".repeat(70_000), "a").unwrap();
        let app = App::with_snippet(named, Language::Go, store());
        render_sized(&app, 80, 24);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(centered(area, 4, 1), Rect::new(3, 2, 4, 1));
        assert_eq!(centered(area, 40, 40), area);
    }
}
