use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_static::lazy_static;

use crate::compile::CharClass;

lazy_static! {
    static ref ENGINE: Engine = Engine::new();
}

static INITIALIZED: AtomicUsize = AtomicUsize::new(0);

/// Initialize the process-wide engine tables.
///
/// Compiling the first pattern does this implicitly; calling it up front moves the one-time cost out of the
/// first compilation. It is safe to call from any number of threads, the tables are built exactly once.
pub fn init() {
    lazy_static::initialize(&ENGINE);
}

/// Returns how many times the engine tables have been built, which is `0` before first use and `1` afterwards.
pub fn init_count() -> usize {
    INITIALIZED.load(Ordering::Acquire)
}

pub(crate) fn engine() -> &'static Engine {
    &ENGINE
}

/// Character tables shared by every compiled pattern.
#[derive(Debug)]
pub(crate) struct Engine {
    digit: CharClass,
    word: CharClass,
    space: CharClass,
    posix: HashMap<&'static str, CharClass>,
    folds: HashMap<char, Vec<char>>,
    fold_max: char,
}

impl Engine {
    fn new() -> Self {
        let word = scan_class(|c| c == '_' || c.is_alphanumeric());
        let space = scan_class(char::is_whitespace);
        let (folds, fold_max) = case_orbits();

        let engine = Engine {
            digit: CharClass::from_ranges(vec![('0', '9')]),
            word,
            space,
            posix: posix_classes(),
            folds,
            fold_max,
        };

        INITIALIZED.fetch_add(1, Ordering::AcqRel);

        debug!(
            "engine initialized, {} word ranges, {} space ranges, {} case orbits",
            engine.word.ranges().len(),
            engine.space.ranges().len(),
            engine.folds.len()
        );

        engine
    }

    /// `\d`
    pub fn digit(&self) -> &CharClass {
        &self.digit
    }

    /// `\w`
    pub fn word(&self) -> &CharClass {
        &self.word
    }

    /// `\s`
    pub fn space(&self) -> &CharClass {
        &self.space
    }

    pub fn posix(&self, name: &str) -> Option<&CharClass> {
        self.posix.get(name)
    }

    pub fn is_word_char(&self, c: char) -> bool {
        if c.is_ascii() {
            c == '_' || c.is_ascii_alphanumeric()
        } else {
            self.word.contains(c)
        }
    }

    /// All characters that are equal to `c` under simple case folding, `c` included.
    pub fn case_orbit(&self, c: char) -> Option<&[char]> {
        self.folds.get(&c).map(Vec::as_slice)
    }

    /// The largest character that has any case variant.
    pub fn fold_max(&self) -> char {
        self.fold_max
    }
}

fn scan_class<F: Fn(char) -> bool>(pred: F) -> CharClass {
    let mut ranges: Vec<(char, char)> = vec![];

    for c in '\0'..=char::MAX {
        if !pred(c) {
            continue;
        }

        match ranges.last_mut() {
            Some(last) if crate::compile::class::increment(last.1) == Some(c) => last.1 = c,
            _ => ranges.push((c, c)),
        }
    }

    CharClass::from_ranges(ranges)
}

fn single<I: Iterator<Item = char>>(mut it: I) -> Option<char> {
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn case_orbits() -> (HashMap<char, Vec<char>>, char) {
    let mut orbits: HashMap<char, Vec<char>> = HashMap::new();

    for c in '\0'..=char::MAX {
        let canonical = single(c.to_uppercase())
            .and_then(|upper| single(upper.to_lowercase()))
            .or_else(|| single(c.to_lowercase()))
            .unwrap_or(c);

        orbits.entry(canonical).or_default().push(c);
    }

    let mut folds = HashMap::new();
    let mut fold_max = '\0';

    for (_, orbit) in orbits.into_iter().filter(|(_, orbit)| orbit.len() > 1) {
        for &c in &orbit {
            fold_max = fold_max.max(c);
            folds.insert(c, orbit.clone());
        }
    }

    (folds, fold_max)
}

fn posix_classes() -> HashMap<&'static str, CharClass> {
    let table: &[(&'static str, &[(char, char)])] = &[
        ("alnum", &[('0', '9'), ('A', 'Z'), ('a', 'z')]),
        ("alpha", &[('A', 'Z'), ('a', 'z')]),
        ("ascii", &[('\0', '\x7F')]),
        ("blank", &[('\t', '\t'), (' ', ' ')]),
        ("cntrl", &[('\0', '\x1F'), ('\x7F', '\x7F')]),
        ("digit", &[('0', '9')]),
        ("graph", &[('!', '~')]),
        ("lower", &[('a', 'z')]),
        ("print", &[(' ', '~')]),
        ("punct", &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')]),
        ("space", &[('\t', '\r'), (' ', ' ')]),
        ("upper", &[('A', 'Z')]),
        ("word", &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')]),
        ("xdigit", &[('0', '9'), ('A', 'F'), ('a', 'f')]),
    ];

    table
        .iter()
        .map(|&(name, ranges)| (name, CharClass::from_ranges(ranges.iter().cloned())))
        .collect()
}
