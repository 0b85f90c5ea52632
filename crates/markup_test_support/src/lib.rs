//! Helpers shared by the workspace's integration tests.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use markup::{ElementRef, MarkupListener};

/// Makes control characters visible in diff output.
pub fn visible(line: &str) -> String {
    line.chars().flat_map(char::escape_debug).collect()
}

/// Describes where two line sequences diverge, with two lines of context on each side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    fn at(lines: &[String], idx: usize) -> &str {
        lines.get(idx).map_or("(absent)", String::as_str)
    }

    let total = expected.len().max(actual.len());
    let mut report = String::new();
    if let Some(first) = (0..total).find(|&idx| at(expected, idx) != at(actual, idx)) {
        let window = first.saturating_sub(2)..(first + 3).min(total);
        let _ = writeln!(report, "lines differ from line {}:", first + 1);
        for idx in window {
            let mark = if idx == first { '>' } else { ' ' };
            let _ = writeln!(report, "{mark}{:>5} want: {}", idx + 1, at(expected, idx));
            let _ = writeln!(report, "{mark}{:>5}  got: {}", idx + 1, at(actual, idx));
        }
    }
    let _ = writeln!(report, "want {} line(s), got {}", expected.len(), actual.len());
    report
}

/// Panics with a line diff when the two sequences differ.
pub fn assert_lines_eq<E: AsRef<str>, A: AsRef<str>>(expected: &[E], actual: &[A]) {
    let expected: Vec<String> = expected.iter().map(|line| visible(line.as_ref())).collect();
    let actual: Vec<String> = actual.iter().map(|line| visible(line.as_ref())).collect();
    if expected != actual {
        panic!("line mismatch\n{}", diff_lines(&expected, &actual));
    }
}

/// Splits serialized markup at tag boundaries so diffs stay readable: `<a><b>x</b></a>` becomes
/// `["<a>", "<b>", "x", "</b>", "</a>"]`.
pub fn markup_lines(markup: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    for ch in markup.chars() {
        if ch == '<' && !pending.is_empty() {
            out.push(pending.clone());
            pending.clear();
        }
        pending.push(ch);
        if ch == '>' {
            out.push(pending.clone());
            pending.clear();
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

/// One notification seen by a [`RecordingListener`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListenerEvent {
    Started {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Ended {
        name: String,
    },
}

pub type EventLog = Rc<RefCell<Vec<ListenerEvent>>>;

/// Markup listener that appends every notification to a shared log.
pub struct RecordingListener {
    log: EventLog,
}

impl RecordingListener {
    pub fn new() -> (Self, EventLog) {
        let log: EventLog = Rc::default();
        (
            Self {
                log: Rc::clone(&log),
            },
            log,
        )
    }

    pub fn with_log(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
        }
    }
}

impl MarkupListener for RecordingListener {
    fn element_started(&mut self, element: ElementRef<'_>) {
        self.log.borrow_mut().push(ListenerEvent::Started {
            name: element.name().to_string(),
            attributes: element
                .attributes()
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect(),
        });
    }

    fn element_ended(&mut self, element: ElementRef<'_>) {
        self.log.borrow_mut().push(ListenerEvent::Ended {
            name: element.name().to_string(),
        });
    }
}
